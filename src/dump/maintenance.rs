// ABOUTME: REPAIR TABLE and OPTIMIZE TABLE over the configured table list
// ABOUTME: Single statement, single attempt; no-op when no tables are named

use crate::client::{Client, Row};
use crate::config::DumpConfig;
use crate::error::DatabaseError;
use crate::utils::quote_ident;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RepairOptions {
    pub no_write_to_binlog: bool,
    pub quick: bool,
    pub extended: bool,
    pub use_frm: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OptimizeOptions {
    pub no_write_to_binlog: bool,
}

fn table_list(tables: &[String]) -> Option<String> {
    if tables.is_empty() {
        return None;
    }
    let quoted: Vec<String> = tables.iter().map(|t| quote_ident(t)).collect();
    Some(quoted.join(","))
}

/// `REPAIR [NO_WRITE_TO_BINLOG] TABLE ... [QUICK] [EXTENDED] [USE_FRM]`, or
/// `None` when `tables` is empty.
pub fn repair_statement(tables: &[String], options: RepairOptions) -> Option<String> {
    let names = table_list(tables)?;

    let mut sql = String::from("REPAIR");
    if options.no_write_to_binlog {
        sql.push_str(" NO_WRITE_TO_BINLOG");
    }
    sql.push_str(&format!(" TABLE {}", names));
    if options.quick {
        sql.push_str(" QUICK");
    }
    if options.extended {
        sql.push_str(" EXTENDED");
    }
    if options.use_frm {
        sql.push_str(" USE_FRM");
    }
    Some(sql)
}

/// `OPTIMIZE [NO_WRITE_TO_BINLOG] TABLE ...;`, or `None` when `tables` is empty.
pub fn optimize_statement(tables: &[String], options: OptimizeOptions) -> Option<String> {
    let names = table_list(tables)?;

    let mut sql = String::from("OPTIMIZE");
    if options.no_write_to_binlog {
        sql.push_str(" NO_WRITE_TO_BINLOG");
    }
    sql.push_str(&format!(" TABLE {};", names));
    Some(sql)
}

/// Repair the tables named in `config.in_table`.
///
/// Returns `Ok(None)` without touching the connection when no tables are
/// configured, otherwise the server's per-table status rows.
pub async fn repair<C: Client>(
    client: &mut C,
    config: &DumpConfig,
    options: RepairOptions,
) -> Result<Option<Vec<Row>>, DatabaseError> {
    run_maintenance(client, repair_statement(&config.in_table, options)).await
}

/// Optimize the tables named in `config.in_table`. Same contract as [`repair`].
pub async fn optimize<C: Client>(
    client: &mut C,
    config: &DumpConfig,
    options: OptimizeOptions,
) -> Result<Option<Vec<Row>>, DatabaseError> {
    run_maintenance(client, optimize_statement(&config.in_table, options)).await
}

async fn run_maintenance<C: Client>(
    client: &mut C,
    statement: Option<String>,
) -> Result<Option<Vec<Row>>, DatabaseError> {
    let Some(sql) = statement else {
        tracing::info!("No tables configured, skipping maintenance");
        return Ok(None);
    };

    tracing::info!("Running: {}", sql);
    let rows = client.raw_query(&sql).await?;
    Ok(Some(rows))
}
