// ABOUTME: Per-table dump sections: schema creation followed by row data
// ABOUTME: Defines the TableExporter seam and its MySQL implementation

use crate::client::Client;
use crate::config::DumpConfig;
use crate::error::DumpError;
use crate::mysql::{converter, reader};
use crate::utils::{quote_ident, sanitize_identifier};
use std::future::Future;
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// Marks the last line of a schema-creation statement in a dump script.
pub const ENGINE_MARKER: &str = "ENGINE=";

/// One table selected for export, bound to the run's config.
#[derive(Debug, Clone)]
pub struct Table<'a> {
    name: String,
    config: &'a DumpConfig,
}

impl<'a> Table<'a> {
    pub fn new(name: impl Into<String>, config: &'a DumpConfig) -> Self {
        Self {
            name: name.into(),
            config,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &'a DumpConfig {
        self.config
    }
}

/// Writes one table's section of a dump script.
///
/// A section must consist of a schema-creation statement whose final line
/// carries [`ENGINE_MARKER`] and ends with `;`, followed by single-line data
/// statements each ending with `;`. That is the shape the import state
/// machine reassembles.
pub trait TableExporter {
    fn export_table<C: Client, W: AsyncWrite + Unpin>(
        &self,
        table: &Table<'_>,
        client: &mut C,
        sink: &mut W,
    ) -> impl Future<Output = Result<(), DumpError>>;
}

/// Exports a table with `SHOW CREATE TABLE` and `SELECT *`, mysqldump style.
#[derive(Debug, Clone, Copy, Default)]
pub struct MysqlTableExporter;

impl TableExporter for MysqlTableExporter {
    async fn export_table<C: Client, W: AsyncWrite + Unpin>(
        &self,
        table: &Table<'_>,
        client: &mut C,
        sink: &mut W,
    ) -> Result<(), DumpError> {
        let config = table.config();
        let quoted = quote_ident(table.name());

        let create_sql = reader::show_create_table(client, table.name()).await?;
        warn_on_unreplayable_ddl(table.name(), &create_sql);

        let mut section = String::new();
        section.push_str("-- ----------------------------\n");
        section.push_str(&format!("-- Table structure for {}\n", quoted));
        section.push_str("-- ----------------------------\n");
        if config.drop_table_if_exists {
            section.push_str(&format!("DROP TABLE IF EXISTS {};\n", quoted));
        }
        section.push_str(create_sql.trim_end().trim_end_matches(';'));
        section.push_str(";\n\n");
        sink.write_all(section.as_bytes()).await?;

        if config.schema_only {
            tracing::debug!("Wrote schema of table '{}'", sanitize_identifier(table.name()));
            return Ok(());
        }

        let rows = reader::read_table_data(client, table.name()).await?;

        let mut records = String::new();
        records.push_str("-- ----------------------------\n");
        records.push_str(&format!("-- Records of {}\n", quoted));
        records.push_str("-- ----------------------------\n");
        sink.write_all(records.as_bytes()).await?;

        let rows_per_statement = config.extended_insert_rows.max(1);
        for chunk in rows.chunks(rows_per_statement) {
            sink.write_all(insert_statement(&quoted, chunk).as_bytes())
                .await?;
        }
        sink.write_all(b"\n").await?;

        tracing::debug!(
            "Wrote table '{}' ({} rows)",
            sanitize_identifier(table.name()),
            rows.len()
        );

        Ok(())
    }
}

/// Build one single-line `INSERT ... VALUES (...),(...);` statement.
fn insert_statement(quoted_table: &str, rows: &[crate::client::Row]) -> String {
    let tuples: Vec<String> = rows.iter().map(|row| converter::row_to_tuple(row)).collect();
    format!("INSERT INTO {} VALUES {};\n", quoted_table, tuples.join(","))
}

/// Table definitions are replayed line by line; a `;` on an inner line or a
/// missing engine clause would split or swallow the statement on import.
fn warn_on_unreplayable_ddl(table_name: &str, create_sql: &str) {
    let mut lines = create_sql.trim_end().lines().collect::<Vec<_>>();
    let last = lines.pop().unwrap_or_default();

    if !last.contains(ENGINE_MARKER) {
        tracing::warn!(
            "Definition of table '{}' does not end with an {} clause; the dump may not import cleanly",
            sanitize_identifier(table_name),
            ENGINE_MARKER
        );
    }
    if lines
        .iter()
        .any(|line| line.contains(';') || line.contains(ENGINE_MARKER))
    {
        tracing::warn!(
            "Definition of table '{}' has ';' or {} on an inner line; the dump may not import cleanly",
            sanitize_identifier(table_name),
            ENGINE_MARKER
        );
    }
}
