// ABOUTME: Replays a dump script against a live connection
// ABOUTME: Reassembles statements line by line, executes them in batches with bounded retries

use crate::client::Client;
use crate::config::DumpConfig;
use crate::dump::result::ImportResult;
use crate::dump::table::ENGINE_MARKER;
use crate::error::DumpError;
use crate::utils::truncate_statement;
use std::path::Path;
use std::str::FromStr;
use tokio::fs::OpenOptions;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

/// Statement terminator recognised at the end of a data statement.
pub const TERMINATOR: char = ';';

/// How the input file is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImportMode {
    /// `r`
    #[default]
    Read,
    /// `r+`: the file must also be writable.
    ReadWrite,
}

impl FromStr for ImportMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "r" | "rb" => Ok(ImportMode::Read),
            "r+" | "rb+" | "r+b" => Ok(ImportMode::ReadWrite),
            other => Err(format!(
                "unsupported open mode '{}', expected 'r' or 'r+'",
                other
            )),
        }
    }
}

/// What a single script line contributes to statement reassembly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Empty after trimming, or starting with `--` after trimming. Never buffered.
    CommentOrBlank,
    /// No terminator, or carries the engine marker: part of a schema-creation statement.
    SchemaPart,
    /// A complete statement on one line.
    Statement,
}

/// Classify one script line for statement reassembly.
pub fn classify_line(line: &str) -> LineKind {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with("--") {
        LineKind::CommentOrBlank
    } else if !line.contains(TERMINATOR) || line.contains(ENGINE_MARKER) {
        LineKind::SchemaPart
    } else {
        LineKind::Statement
    }
}

#[derive(Debug, Default)]
enum SchemaState {
    #[default]
    Idle,
    Accumulating(String),
}

/// Line-fed state machine producing executable statements.
///
/// Complete statements queue up in `pending` until the caller takes them as a
/// batch. A schema-creation statement spread over several lines is collected
/// separately and queued once its engine clause shows up.
#[derive(Debug, Default)]
pub struct StatementAssembler {
    pending: Vec<String>,
    schema: SchemaState,
}

impl StatementAssembler {
    /// An assembler with nothing queued and no schema in progress.
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume one script line, queueing any statement it completes.
    pub fn feed(&mut self, line: &str) {
        match classify_line(line) {
            LineKind::CommentOrBlank => {}
            LineKind::SchemaPart => {
                let mut buffer = match std::mem::take(&mut self.schema) {
                    SchemaState::Idle => String::new(),
                    SchemaState::Accumulating(buffer) => buffer,
                };
                buffer.push_str(line);
                buffer.push('\n');

                if buffer.contains(ENGINE_MARKER) {
                    self.pending.push(buffer);
                } else {
                    self.schema = SchemaState::Accumulating(buffer);
                }
            }
            LineKind::Statement => self.pending.push(line.to_string()),
        }
    }

    /// Number of complete statements waiting for the next batch.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// A batch is due once `size` statements are queued, or at end of input
    /// with anything queued.
    pub fn should_flush(&self, size: usize, at_eof: bool) -> bool {
        !self.pending.is_empty() && (self.pending.len() == size || at_eof)
    }

    /// Drain the queued statements in script order.
    pub fn take_batch(&mut self) -> Vec<String> {
        std::mem::take(&mut self.pending)
    }

    /// Schema text still waiting for its engine clause.
    pub fn partial_schema(&self) -> Option<&str> {
        match &self.schema {
            SchemaState::Idle => None,
            SchemaState::Accumulating(buffer) => Some(buffer),
        }
    }
}

/// Text actually sent to the server: embedded newlines removed, then trimmed.
pub fn normalize_statement(raw: &str) -> String {
    raw.replace('\n', "").trim().to_string()
}

/// Import a dump script from a file.
///
/// # Errors
///
/// - [`DumpError::Resource`] if the path is missing, not a regular file, or
///   cannot be opened in `mode`. Nothing is executed in that case.
/// - [`DumpError::ImportAborted`] when a statement exhausts its retries with
///   continue-on-error disabled.
/// - [`DumpError::Io`] if reading the script fails midway.
///
/// The file handle is released on every exit path.
///
/// # Examples
///
/// ```no_run
/// # use seren_mysqldump::{config::DumpConfig, dump::{import, ImportMode}, mysql::connect_mysql};
/// # async fn example() -> anyhow::Result<()> {
/// let mut client = connect_mysql("mysql://localhost:3306/restore").await?;
/// let config = DumpConfig { continue_on_error: true, ..Default::default() };
/// let result = import(&mut client, &config, "backup.sql", ImportMode::Read).await?;
/// println!("{} ok, {} failed attempts", result.success_num, result.error_num);
/// # Ok(())
/// # }
/// ```
pub async fn import<C, P>(
    client: &mut C,
    config: &DumpConfig,
    path: P,
    mode: ImportMode,
) -> Result<ImportResult, DumpError>
where
    C: Client,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let resource_error = |source: std::io::Error| DumpError::Resource {
        path: path.to_path_buf(),
        source,
    };

    let metadata = tokio::fs::metadata(path).await.map_err(resource_error)?;
    if !metadata.is_file() {
        return Err(resource_error(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "not a regular file",
        )));
    }

    let file = OpenOptions::new()
        .read(true)
        .write(mode == ImportMode::ReadWrite)
        .open(path)
        .await
        .map_err(resource_error)?;

    tracing::info!("Importing {}", path.display());

    import_from_reader(client, config, BufReader::new(file)).await
}

/// Import a dump script from an already-open stream.
pub async fn import_from_reader<C, R>(
    client: &mut C,
    config: &DumpConfig,
    reader: R,
) -> Result<ImportResult, DumpError>
where
    C: Client,
    R: AsyncBufRead + Unpin,
{
    let server = client.server_info();
    let callbacks = &config.callbacks;

    let before_value = match &callbacks.on_before_import {
        Some(hook) => hook(&server),
        None => serde_json::Value::Null,
    };

    let mut result = ImportResult::new();
    let mut assembler = StatementAssembler::new();
    let mut reader = reader;
    let mut buf = Vec::new();
    let mut line_count: u64 = 0;

    // one line of lookahead tells whether the current line is the last
    let mut next = read_script_line(&mut reader, &mut buf).await?;
    while let Some(line) = next.take() {
        next = read_script_line(&mut reader, &mut buf).await?;
        let at_eof = next.is_none();
        line_count += 1;

        if let Some(hook) = &callbacks.on_importing {
            hook(&server, &before_value);
        }

        assembler.feed(&line);

        if assembler.should_flush(config.size, at_eof) {
            let batch = assembler.take_batch();
            execute_batch(client, config, &batch, &mut result).await?;
        }
    }

    if let Some(partial) = assembler.partial_schema() {
        tracing::warn!(
            "Input ended inside a table definition; discarded: {}",
            truncate_statement(&normalize_statement(partial), 120)
        );
    }

    if let Some(hook) = &callbacks.on_after_import {
        hook(&server);
    }

    tracing::info!(
        "✓ Import finished: {} line(s), {} statement(s) succeeded, {} failed attempt(s)",
        line_count,
        result.success_num,
        result.error_num
    );

    Ok(result)
}

/// Next line without its `\n` / `\r\n` ending, or `None` at end of input.
///
/// Bytes that are not valid UTF-8 become U+FFFD instead of failing the read.
async fn read_script_line<R: AsyncBufRead + Unpin>(
    reader: &mut R,
    buf: &mut Vec<u8>,
) -> Result<Option<String>, DumpError> {
    buf.clear();
    if reader.read_until(b'\n', buf).await? == 0 {
        return Ok(None);
    }
    if buf.ends_with(b"\n") {
        buf.pop();
        if buf.ends_with(b"\r") {
            buf.pop();
        }
    }
    Ok(Some(String::from_utf8_lossy(buf).into_owned()))
}

async fn execute_batch<C: Client>(
    client: &mut C,
    config: &DumpConfig,
    batch: &[String],
    result: &mut ImportResult,
) -> Result<(), DumpError> {
    tracing::debug!("Executing batch of {} statement(s)", batch.len());

    for raw in batch {
        let sql = normalize_statement(raw);
        execute_with_retry(client, config, &sql, result).await?;
    }

    Ok(())
}

/// Run one statement up to `max_fails + 1` times.
///
/// Every failed attempt is counted and becomes the result's last error. Once
/// attempts exceed `max_fails` the statement is either dropped
/// (continue-on-error) or the whole import aborts.
async fn execute_with_retry<C: Client>(
    client: &mut C,
    config: &DumpConfig,
    sql: &str,
    result: &mut ImportResult,
) -> Result<(), DumpError> {
    let max_attempts = u64::from(config.max_fails) + 1;
    let mut attempts: u64 = 0;

    loop {
        let err = match client.raw_query(sql).await {
            Ok(_) => {
                result.record_success();
                return Ok(());
            }
            Err(err) => err,
        };

        result.record_failure(&err.message, sql);
        attempts += 1;

        tracing::warn!(
            "Statement failed (attempt {}/{}): {} -- {}",
            attempts,
            max_attempts,
            err,
            truncate_statement(sql, 120)
        );

        if attempts >= max_attempts {
            if config.continue_on_error {
                tracing::warn!("Giving up on statement, continuing with the next one");
                return Ok(());
            }
            return Err(DumpError::ImportAborted {
                sql: sql.to_string(),
                source: err,
                partial: Box::new(result.clone()),
            });
        }

        if !config.retry_delay.is_zero() {
            tokio::time::sleep(config.retry_delay).await;
        }
    }
}
