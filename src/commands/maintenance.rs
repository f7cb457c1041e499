// ABOUTME: Repair and optimize command implementations
// ABOUTME: Run one maintenance statement over the configured tables and print the status rows

use crate::client::Row;
use crate::config::DumpConfig;
use crate::dump::{OptimizeOptions, RepairOptions};
use crate::mysql::connect_mysql;
use crate::mysql::converter::value_as_text;
use anyhow::{Context, Result};

/// Run `REPAIR TABLE` on `config.in_table`.
pub async fn repair(target_url: &str, config: &DumpConfig, options: RepairOptions) -> Result<()> {
    let mut client = connect_mysql(target_url)
        .await
        .context("Failed to connect to target database")?;

    let rows = crate::dump::repair(&mut client, config, options)
        .await
        .context("REPAIR TABLE failed")?;
    print_status("repair", rows);

    client.disconnect().await?;
    Ok(())
}

/// Run `OPTIMIZE TABLE` on `config.in_table`.
pub async fn optimize(
    target_url: &str,
    config: &DumpConfig,
    options: OptimizeOptions,
) -> Result<()> {
    let mut client = connect_mysql(target_url)
        .await
        .context("Failed to connect to target database")?;

    let rows = crate::dump::optimize(&mut client, config, options)
        .await
        .context("OPTIMIZE TABLE failed")?;
    print_status("optimize", rows);

    client.disconnect().await?;
    Ok(())
}

fn print_status(operation: &str, rows: Option<Vec<Row>>) {
    let Some(rows) = rows else {
        tracing::warn!("⚠ No tables given, nothing to {}", operation);
        return;
    };

    // Table | Op | Msg_type | Msg_text
    for row in rows {
        let cells: Vec<String> = row
            .iter()
            .map(|value| value_as_text(value).unwrap_or_else(|| "NULL".to_string()))
            .collect();
        println!("{}", cells.join("\t"));
    }
    tracing::info!("✓ {} finished", operation);
}
