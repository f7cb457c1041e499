// ABOUTME: Dump/restore options, lifecycle hooks and TOML config file parsing
// ABOUTME: DumpConfig is built once and only read by export, import and maintenance

use crate::client::ServerInfo;
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_NAMES: &str = "utf8mb4";
pub const DEFAULT_BATCH_SIZE: usize = 200;
pub const DEFAULT_MAX_FAILS: u32 = 3;
pub const DEFAULT_EXTENDED_INSERT_ROWS: usize = 100;

/// Lifecycle points a hook can be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    WriteFront,
    WriteCompleted,
    BeforeImportTableData,
    ImportingTableData,
    AfterImportTableData,
}

impl EventKind {
    pub const ALL: [EventKind; 5] = [
        EventKind::WriteFront,
        EventKind::WriteCompleted,
        EventKind::BeforeImportTableData,
        EventKind::ImportingTableData,
        EventKind::AfterImportTableData,
    ];

    pub fn name(self) -> &'static str {
        match self {
            EventKind::WriteFront => "on_write_front",
            EventKind::WriteCompleted => "on_write_completed",
            EventKind::BeforeImportTableData => "on_before_import_table_data",
            EventKind::ImportingTableData => "on_importing_table_data",
            EventKind::AfterImportTableData => "on_after_import_table_data",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Rewrites dump text before it is written. Gets the connection identity and
/// the header text, returns the text to write.
pub type WriteHook = Arc<dyn Fn(&ServerInfo, &str) -> String + Send + Sync>;
/// Runs once before the import loop. Its value is handed to every per-line hook call.
pub type BeforeImportHook = Arc<dyn Fn(&ServerInfo) -> serde_json::Value + Send + Sync>;
pub type ImportingHook = Arc<dyn Fn(&ServerInfo, &serde_json::Value) + Send + Sync>;
pub type AfterImportHook = Arc<dyn Fn(&ServerInfo) + Send + Sync>;

/// Optional user functions, one slot per [`EventKind`]. An empty slot means
/// the event is not observed.
#[derive(Clone, Default)]
pub struct Callbacks {
    pub on_write_front: Option<WriteHook>,
    pub on_write_completed: Option<WriteHook>,
    pub on_before_import: Option<BeforeImportHook>,
    pub on_importing: Option<ImportingHook>,
    pub on_after_import: Option<AfterImportHook>,
}

impl Callbacks {
    pub fn is_bound(&self, event: EventKind) -> bool {
        match event {
            EventKind::WriteFront => self.on_write_front.is_some(),
            EventKind::WriteCompleted => self.on_write_completed.is_some(),
            EventKind::BeforeImportTableData => self.on_before_import.is_some(),
            EventKind::ImportingTableData => self.on_importing.is_some(),
            EventKind::AfterImportTableData => self.on_after_import.is_some(),
        }
    }
}

impl fmt::Debug for Callbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bound: Vec<&str> = EventKind::ALL
            .iter()
            .filter(|event| self.is_bound(**event))
            .map(|event| event.name())
            .collect();
        f.debug_struct("Callbacks").field("bound", &bound).finish()
    }
}

/// Options shared by export, import and the maintenance commands.
#[derive(Debug, Clone)]
pub struct DumpConfig {
    /// If non-empty, only these tables are exported or maintained.
    pub in_table: Vec<String>,
    /// Removed after `in_table` filtering.
    pub not_in_table: Vec<String>,
    /// Character set for the `SET NAMES` header directive.
    pub names: Option<String>,
    pub close_foreign_key_checks: bool,
    /// Statements buffered before a batch is executed.
    pub size: usize,
    /// Extra attempts per failing statement.
    pub max_fails: u32,
    pub continue_on_error: bool,
    /// Pause between two attempts of the same statement.
    pub retry_delay: Duration,
    pub drop_table_if_exists: bool,
    pub schema_only: bool,
    /// Rows grouped into one INSERT statement.
    pub extended_insert_rows: usize,
    pub callbacks: Callbacks,
}

impl Default for DumpConfig {
    fn default() -> Self {
        Self {
            in_table: Vec::new(),
            not_in_table: Vec::new(),
            names: Some(DEFAULT_NAMES.to_string()),
            close_foreign_key_checks: true,
            size: DEFAULT_BATCH_SIZE,
            max_fails: DEFAULT_MAX_FAILS,
            continue_on_error: false,
            retry_delay: Duration::ZERO,
            drop_table_if_exists: true,
            schema_only: false,
            extended_insert_rows: DEFAULT_EXTENDED_INSERT_ROWS,
            callbacks: Callbacks::default(),
        }
    }
}

impl DumpConfig {
    pub fn with_in_table<I, S>(mut self, tables: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.in_table = tables.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_not_in_table<I, S>(mut self, tables: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.not_in_table = tables.into_iter().map(Into::into).collect();
        self
    }

    pub fn on_write_front<F>(mut self, hook: F) -> Self
    where
        F: Fn(&ServerInfo, &str) -> String + Send + Sync + 'static,
    {
        self.callbacks.on_write_front = Some(Arc::new(hook));
        self
    }

    /// Note: the hook receives the dump *header* text, not the completion line.
    pub fn on_write_completed<F>(mut self, hook: F) -> Self
    where
        F: Fn(&ServerInfo, &str) -> String + Send + Sync + 'static,
    {
        self.callbacks.on_write_completed = Some(Arc::new(hook));
        self
    }

    pub fn on_before_import<F>(mut self, hook: F) -> Self
    where
        F: Fn(&ServerInfo) -> serde_json::Value + Send + Sync + 'static,
    {
        self.callbacks.on_before_import = Some(Arc::new(hook));
        self
    }

    pub fn on_importing<F>(mut self, hook: F) -> Self
    where
        F: Fn(&ServerInfo, &serde_json::Value) + Send + Sync + 'static,
    {
        self.callbacks.on_importing = Some(Arc::new(hook));
        self
    }

    pub fn on_after_import<F>(mut self, hook: F) -> Self
    where
        F: Fn(&ServerInfo) + Send + Sync + 'static,
    {
        self.callbacks.on_after_import = Some(Arc::new(hook));
        self
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    #[serde(default)]
    tables: TablesSection,
    #[serde(default)]
    export: ExportSection,
    #[serde(default)]
    import: ImportSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct TablesSection {
    #[serde(default)]
    include: Vec<String>,
    #[serde(default)]
    exclude: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ExportSection {
    names: Option<String>,
    close_foreign_key_checks: Option<bool>,
    drop_table_if_exists: Option<bool>,
    schema_only: Option<bool>,
    extended_insert_rows: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ImportSection {
    size: Option<usize>,
    max_fails: Option<u32>,
    continue_on_error: Option<bool>,
    retry_delay_ms: Option<u64>,
}

/// Parse a TOML config file into a [`DumpConfig`], starting from defaults.
///
/// An empty `names` string disables the `SET NAMES` directive.
pub fn load_config_from_file(path: &str) -> Result<DumpConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file at {}", path))?;
    parse_config(&raw).with_context(|| format!("Failed to parse TOML config at {}", path))
}

fn parse_config(raw: &str) -> Result<DumpConfig> {
    let parsed: FileConfig = toml::from_str(raw)?;

    let mut config = DumpConfig::default()
        .with_in_table(parsed.tables.include)
        .with_not_in_table(parsed.tables.exclude);

    let export = parsed.export;
    if let Some(names) = export.names {
        config.names = if names.trim().is_empty() {
            None
        } else {
            Some(names)
        };
    }
    if let Some(flag) = export.close_foreign_key_checks {
        config.close_foreign_key_checks = flag;
    }
    if let Some(flag) = export.drop_table_if_exists {
        config.drop_table_if_exists = flag;
    }
    if let Some(flag) = export.schema_only {
        config.schema_only = flag;
    }
    if let Some(rows) = export.extended_insert_rows {
        if rows == 0 {
            bail!("export.extended_insert_rows must be greater than 0");
        }
        config.extended_insert_rows = rows;
    }

    let import = parsed.import;
    if let Some(size) = import.size {
        if size == 0 {
            bail!("import.size must be greater than 0");
        }
        config.size = size;
    }
    if let Some(max_fails) = import.max_fails {
        config.max_fails = max_fails;
    }
    if let Some(flag) = import.continue_on_error {
        config.continue_on_error = flag;
    }
    if let Some(ms) = import.retry_delay_ms {
        config.retry_delay = Duration::from_millis(ms);
    }

    Ok(config)
}
