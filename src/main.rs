// ABOUTME: CLI entry point for seren-mysqldump
// ABOUTME: Parses commands and routes to appropriate handlers

use clap::{Args, Parser, Subcommand};
use seren_mysqldump::commands;
use seren_mysqldump::config::{load_config_from_file, DumpConfig};
use seren_mysqldump::dump::{ImportMode, OptimizeOptions, RepairOptions};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "seren-mysqldump")]
#[command(about = "Portable MySQL dump and fault-tolerant restore", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct TableArgs {
    /// TOML config file with table, export and import settings
    #[arg(long)]
    config: Option<String>,
    /// Include only these tables (comma-separated)
    #[arg(long, value_delimiter = ',')]
    include_tables: Option<Vec<String>>,
    /// Exclude these tables (comma-separated)
    #[arg(long, value_delimiter = ',')]
    exclude_tables: Option<Vec<String>>,
}

impl TableArgs {
    fn load(&self) -> anyhow::Result<DumpConfig> {
        let mut config = match &self.config {
            Some(path) => load_config_from_file(path)?,
            None => DumpConfig::default(),
        };
        if let Some(include) = &self.include_tables {
            config.in_table = include.clone();
        }
        if let Some(exclude) = &self.exclude_tables {
            config.not_in_table = exclude.clone();
        }
        Ok(config)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Dump schema and data of the selected tables to a replayable script
    Export {
        #[arg(long)]
        source: String,
        /// Output file (stdout when omitted)
        #[arg(long, short)]
        output: Option<PathBuf>,
        #[command(flatten)]
        tables: TableArgs,
        /// Character set for the SET NAMES directive
        #[arg(long)]
        names: Option<String>,
        /// Do not disable foreign key checks in the script header
        #[arg(long)]
        keep_foreign_key_checks: bool,
        /// Dump table definitions only
        #[arg(long)]
        schema_only: bool,
    },
    /// Replay a dump script against a database
    Import {
        #[arg(long)]
        target: String,
        /// Dump script to replay
        #[arg(long, short)]
        input: PathBuf,
        /// Open mode of the input file: r or r+
        #[arg(long, default_value = "r")]
        mode: ImportMode,
        #[arg(long)]
        config: Option<String>,
        /// Statements executed per batch
        #[arg(long)]
        size: Option<usize>,
        /// Extra attempts for a failing statement
        #[arg(long)]
        max_fails: Option<u32>,
        /// Skip statements that keep failing instead of aborting
        #[arg(long)]
        continue_on_error: bool,
        /// Pause between attempts of the same statement, in milliseconds
        #[arg(long)]
        retry_delay_ms: Option<u64>,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Run REPAIR TABLE on the given tables
    Repair {
        #[arg(long)]
        target: String,
        /// Tables to repair (comma-separated)
        #[arg(long, value_delimiter = ',')]
        tables: Vec<String>,
        #[arg(long)]
        no_write_to_binlog: bool,
        #[arg(long)]
        quick: bool,
        #[arg(long)]
        extended: bool,
        #[arg(long)]
        use_frm: bool,
    },
    /// Run OPTIMIZE TABLE on the given tables
    Optimize {
        #[arg(long)]
        target: String,
        /// Tables to optimize (comma-separated)
        #[arg(long, value_delimiter = ',')]
        tables: Vec<String>,
        #[arg(long)]
        no_write_to_binlog: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging - default to INFO level if RUST_LOG not set.
    // Logs go to stderr so an export to stdout stays a clean script.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Export {
            source,
            output,
            tables,
            names,
            keep_foreign_key_checks,
            schema_only,
        } => {
            let mut config = tables.load()?;
            if let Some(names) = names {
                config.names = Some(names);
            }
            if keep_foreign_key_checks {
                config.close_foreign_key_checks = false;
            }
            if schema_only {
                config.schema_only = true;
            }
            commands::export(&source, output.as_deref(), &config).await
        }
        Commands::Import {
            target,
            input,
            mode,
            config,
            size,
            max_fails,
            continue_on_error,
            retry_delay_ms,
            json,
        } => {
            let mut dump_config = match config {
                Some(path) => load_config_from_file(&path)?,
                None => DumpConfig::default(),
            };
            if let Some(size) = size {
                anyhow::ensure!(size > 0, "--size must be greater than 0");
                dump_config.size = size;
            }
            if let Some(max_fails) = max_fails {
                dump_config.max_fails = max_fails;
            }
            if continue_on_error {
                dump_config.continue_on_error = true;
            }
            if let Some(ms) = retry_delay_ms {
                dump_config.retry_delay = Duration::from_millis(ms);
            }
            commands::import(&target, &input, mode, dump_config, json).await
        }
        Commands::Repair {
            target,
            tables,
            no_write_to_binlog,
            quick,
            extended,
            use_frm,
        } => {
            let config = DumpConfig::default().with_in_table(tables);
            let options = RepairOptions {
                no_write_to_binlog,
                quick,
                extended,
                use_frm,
            };
            commands::repair(&target, &config, options).await
        }
        Commands::Optimize {
            target,
            tables,
            no_write_to_binlog,
        } => {
            let config = DumpConfig::default().with_in_table(tables);
            commands::optimize(&target, &config, OptimizeOptions { no_write_to_binlog }).await
        }
    }
}
