// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{error, info, warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::{Path, PathBuf};

use alttext_sync::app_config::{self, Config};
use alttext_sync::app_controller::Controller;
use alttext_sync::database::{import_catalog, CatalogFixture, DatabaseConnection};

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate alternative texts for product and category media (default command)
    Generate,

    /// Import a JSON catalog fixture into the database
    Import {
        /// Catalog fixture file
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Print catalog statistics
    Stats,

    /// Generate shell completions for alttext-sync
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// alttext-sync - alternative texts for catalog media
///
/// Writes product and category names onto the alternative texts of their media,
/// for every language the entity is named in.
#[derive(Parser, Debug)]
#[command(name = "alttext-sync")]
#[command(version)]
#[command(about = "Generate media alternative texts from product and category names")]
#[command(long_about = "alttext-sync writes product and category names onto the alternative texts of their media.

EXAMPLES:
    alttext-sync                               # Generate using default config
    alttext-sync --database shop.db generate   # Use a specific catalog database
    alttext-sync import catalog.json           # Load a catalog fixture
    alttext-sync stats                         # Show catalog counts
    alttext-sync completions bash > alttext-sync.bash

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json", global = true)]
    config: String,

    /// Catalog database file (overrides the config file)
    #[arg(short, long, global = true, env = "ALTTEXT_SYNC_DATABASE")]
    database: Option<PathBuf>,

    /// Set logging level
    #[arg(short, long, value_enum, global = true)]
    log_level: Option<CliLogLevel>,

    /// Hide progress bars
    #[arg(short, long, global = true)]
    quiet: bool,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji for log level
    fn get_emoji_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "❌ ",
            Level::Warn => "🚧 ",
            Level::Info => " ",
            Level::Debug => "🔍 ",
            Level::Trace => "📋 ",
        }
    }

    // @returns: ANSI color code for log level
    fn get_color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "1;31",
            Level::Warn => "1;33",
            Level::Info => "1;32",
            Level::Debug => "1;36",
            Level::Trace => "1;35",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let level = record.level();

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "\x1B[{}m{} {} {}\x1B[0m",
                Self::get_color_for_level(level),
                now,
                Self::get_emoji_for_level(level),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() {
    // The logger accepts every level; the effective level is set via log::set_max_level
    if let Err(e) = CustomLogger::init(LevelFilter::Trace) {
        eprintln!("Failed to initialize logger: {}", e);
    }
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    if let Err(e) = run(cli).await {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: CommandLineOptions) -> Result<()> {
    if let Some(Commands::Completions { shell }) = &cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(*shell, &mut cmd, "alttext-sync", &mut std::io::stdout());
        return Ok(());
    }

    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &cli.log_level {
        let level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    let config = load_config(&cli)?;

    // If log level was not set via command line, update it from config now
    if cli.log_level.is_none() {
        log::set_max_level(config.log_level.to_level_filter());
    }

    match cli.command {
        None | Some(Commands::Generate) => {
            let controller = Controller::with_config(config)?;
            let summary = controller.run().await?;
            info!(
                "Finished: {} writes ({} products, {} categories)",
                summary.total_writes(),
                summary.products.entities,
                summary.categories.entities
            );
        }
        Some(Commands::Import { file }) => {
            let fixture = CatalogFixture::from_file(&file)?;
            let db = DatabaseConnection::new(config.database.resolved_path()?)?;
            let summary = import_catalog(&db, fixture)
                .await
                .with_context(|| format!("Failed to import catalog from {:?}", file))?;
            println!("Imported {}", summary);
        }
        Some(Commands::Stats) => {
            let db = DatabaseConnection::new(config.database.resolved_path()?)?;
            println!("{}", db.stats()?);
        }
        Some(Commands::Completions { .. }) => {}
    }

    Ok(())
}

/// Load or create the configuration, then apply command line overrides
fn load_config(cli: &CommandLineOptions) -> Result<Config> {
    let config_path = Path::new(&cli.config);

    let mut config = if config_path.exists() {
        Config::from_file(config_path)?
    } else {
        warn!("Config file not found at '{}', creating default config.", cli.config);

        let mut config = Config::default();
        if let Some(log_level) = &cli.log_level {
            config.log_level = log_level.clone().into();
        }
        config.save(config_path)?;
        config
    };

    // Override config with CLI options if provided
    if let Some(database) = &cli.database {
        config.database.path = Some(database.clone());
    }
    if let Some(log_level) = &cli.log_level {
        config.log_level = log_level.clone().into();
    }
    if cli.quiet {
        config.sync.show_progress = false;
    }

    config.validate().context("Configuration validation failed")?;

    Ok(config)
}
