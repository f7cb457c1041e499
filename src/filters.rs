// ABOUTME: Table selection for export: live listing plus include/exclude filtering
// ABOUTME: Implements the (live ∩ include) \ exclude rule over server table order

use crate::client::Client;
use crate::config::DumpConfig;
use crate::dump::Table;
use crate::error::DatabaseError;

/// Represents table selection rules
#[derive(Debug, Clone, Default)]
pub struct TableFilter {
    include_tables: Option<Vec<String>>,
    exclude_tables: Option<Vec<String>>,
}

impl TableFilter {
    /// Empty lists mean "no restriction" / "nothing excluded".
    pub fn new(include_tables: Vec<String>, exclude_tables: Vec<String>) -> Self {
        Self {
            include_tables: non_empty(include_tables),
            exclude_tables: non_empty(exclude_tables),
        }
    }

    pub fn from_config(config: &DumpConfig) -> Self {
        Self::new(config.in_table.clone(), config.not_in_table.clone())
    }

    /// Creates an empty filter (export everything)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Checks if any filters are active
    pub fn is_empty(&self) -> bool {
        self.include_tables.is_none() && self.exclude_tables.is_none()
    }

    /// Determines if a table should be exported
    pub fn should_export_table(&self, table_name: &str) -> bool {
        // If include list exists, table must be in it
        if let Some(ref include) = self.include_tables {
            if !include.iter().any(|t| t == table_name) {
                return false;
            }
        }

        // Exclusion is applied after inclusion
        if let Some(ref exclude) = self.exclude_tables {
            if exclude.iter().any(|t| t == table_name) {
                return false;
            }
        }

        true
    }

    /// Filter a live table list, keeping its order.
    pub fn apply(&self, live_tables: Vec<String>) -> Vec<String> {
        live_tables
            .into_iter()
            .filter(|table| self.should_export_table(table))
            .collect()
    }
}

fn non_empty(tables: Vec<String>) -> Option<Vec<String>> {
    if tables.is_empty() {
        None
    } else {
        Some(tables)
    }
}

/// List the tables an export run covers.
///
/// Reads the live table list, applies the config's inclusion then exclusion
/// sets, and binds each surviving name to the config. Fails only when the
/// listing query fails.
pub async fn show_tables<'a, C: Client>(
    client: &mut C,
    config: &'a DumpConfig,
) -> Result<Vec<Table<'a>>, DatabaseError> {
    let live_tables = crate::mysql::reader::list_tables(client).await?;
    let live_count = live_tables.len();

    let filter = TableFilter::from_config(config);
    let selected = filter.apply(live_tables);

    if !filter.is_empty() {
        tracing::info!(
            "Selected {} of {} table(s) after include/exclude filtering",
            selected.len(),
            live_count
        );
    }

    Ok(selected
        .into_iter()
        .map(|name| Table::new(name, config))
        .collect())
}
