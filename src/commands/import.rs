// ABOUTME: Import command implementation - replay a dump script into a database
// ABOUTME: Shows per-line progress and reports the success/failure tally

use crate::config::DumpConfig;
use crate::dump::{ImportMode, ImportResult};
use crate::error::DumpError;
use crate::mysql::connect_mysql;
use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::Duration;

/// Replay `input` against `target_url`.
///
/// The tally is printed as a summary, or as JSON with `json` set. An aborted
/// import still reports the counters gathered before the failing statement,
/// then returns the error.
///
/// # Errors
///
/// This function will return an error if:
/// - Cannot connect to the target database
/// - The input file cannot be opened
/// - A statement exhausts its retries with continue-on-error disabled
pub async fn import(
    target_url: &str,
    input: &Path,
    mode: ImportMode,
    config: DumpConfig,
    json: bool,
) -> Result<()> {
    tracing::info!("Starting import of {}...", input.display());

    let progress = ProgressBar::new_spinner();
    progress.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner} [{elapsed_precise}] {pos} lines read {msg}")
            .context("Invalid progress template")?,
    );
    progress.enable_steady_tick(Duration::from_millis(120));

    let pb = progress.clone();
    let config = config.on_importing(move |_, _| pb.inc(1));

    let mut client = connect_mysql(target_url)
        .await
        .context("Failed to connect to target database")?;

    let outcome = crate::dump::import(&mut client, &config, input, mode).await;
    progress.finish_and_clear();

    if let Err(e) = client.disconnect().await {
        tracing::warn!("{:#}", e);
    }

    match outcome {
        Ok(result) => report(&result, json),
        Err(err) => {
            if let Some(partial) = err.partial_result() {
                report(partial, json)?;
            }
            let context = match &err {
                DumpError::Resource { .. } => "Cannot read import input",
                DumpError::ImportAborted { .. } => "Import aborted",
                _ => "Import failed",
            };
            Err(anyhow::Error::new(err).context(context))
        }
    }
}

fn report(result: &ImportResult, json: bool) -> Result<()> {
    if json {
        let rendered =
            serde_json::to_string_pretty(result).context("Failed to render import result")?;
        println!("{}", rendered);
        return Ok(());
    }

    tracing::info!("Statements succeeded: {}", result.success_num);
    tracing::info!("Failed attempts:      {}", result.error_num);
    if let (Some(msg), Some(sql)) = (&result.error_msg, &result.error_sql) {
        tracing::warn!("⚠ Last error: {}", msg);
        tracing::warn!(
            "  in statement: {}",
            crate::utils::truncate_statement(sql, 200)
        );
    }
    Ok(())
}
