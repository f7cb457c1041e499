// ABOUTME: Assembles a full dump script: header, one section per table, footer
// ABOUTME: Runs lifecycle hooks around the header and completion line

use crate::client::Client;
use crate::config::DumpConfig;
use crate::dump::table::{MysqlTableExporter, TableExporter};
use crate::error::DumpError;
use crate::utils::dump_timestamp;
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// Fixed first line of every dump header.
pub const DUMP_LABEL: &str = "-- Seren MySQL dump";

/// Export the selected tables to `sink` using [`MysqlTableExporter`].
///
/// Writes nothing at all when no table survives filtering.
///
/// # Examples
///
/// ```no_run
/// # use seren_mysqldump::{config::DumpConfig, dump::export, mysql::connect_mysql};
/// # async fn example() -> anyhow::Result<()> {
/// let mut client = connect_mysql("mysql://localhost:3306/mydb").await?;
/// let config = DumpConfig::default().with_not_in_table(["sessions"]);
/// let mut out = tokio::io::stdout();
/// export(&mut out, &mut client, &config).await?;
/// # Ok(())
/// # }
/// ```
pub async fn export<C, W>(sink: &mut W, client: &mut C, config: &DumpConfig) -> Result<(), DumpError>
where
    C: Client,
    W: AsyncWrite + Unpin,
{
    export_with(sink, client, config, &MysqlTableExporter).await
}

/// Export with a caller-supplied per-table exporter.
///
/// Tables are written one after another in enumeration order; the sink is
/// owned by this call until it returns.
pub async fn export_with<C, W, E>(
    sink: &mut W,
    client: &mut C,
    config: &DumpConfig,
    exporter: &E,
) -> Result<(), DumpError>
where
    C: Client,
    W: AsyncWrite + Unpin,
    E: TableExporter,
{
    let start_time = dump_timestamp();

    let tables = crate::filters::show_tables(client, config).await?;
    if tables.is_empty() {
        tracing::info!("No tables selected for export, nothing written");
        return Ok(());
    }

    tracing::info!("Exporting {} table(s)", tables.len());

    let server = client.server_info();
    let version = crate::mysql::reader::server_version(client).await?;

    let mut front = build_header(config, &server.host, &server.database, &version, &start_time);
    if let Some(hook) = &config.callbacks.on_write_front {
        front = hook(&server, &front);
    }
    sink.write_all(front.as_bytes()).await?;

    for table in &tables {
        tracing::debug!("Exporting table '{}'", table.name());
        exporter.export_table(table, client, sink).await?;
    }

    let mut end = format!("-- Dump completed on {}\n", dump_timestamp());
    if let Some(hook) = &config.callbacks.on_write_completed {
        // the completion hook is handed the header, as it always has been
        end = hook(&server, &front);
    }
    sink.write_all(end.as_bytes()).await?;
    sink.flush().await?;

    tracing::info!("✓ Exported {} table(s)", tables.len());
    Ok(())
}

fn build_header(
    config: &DumpConfig,
    host: &str,
    database: &str,
    version: &str,
    start_time: &str,
) -> String {
    let mut front = format!("{}, for {}\n", DUMP_LABEL, std::env::consts::OS);
    front.push_str("--\n");
    front.push_str(&format!("-- Host: {}    Database: {}\n", host, database));
    front.push_str("-- ------------------------------------------------------\n");
    front.push_str(&format!(
        "-- Server version\t{}   Date: {}\n\n",
        version, start_time
    ));

    if let Some(names) = &config.names {
        front.push_str(&format!("SET NAMES {};\n", names));
    }

    if config.close_foreign_key_checks {
        front.push_str("SET FOREIGN_KEY_CHECKS = 0;\n");
    }

    front.push('\n');
    front
}
