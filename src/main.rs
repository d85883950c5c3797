// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, anyhow, Context};
use log::{warn, debug, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::path::{Path, PathBuf};
use std::io::Write;
use clap::{Parser, ValueEnum, CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use assmin::app_config::{self, Config};
use assmin::file_utils::FileManager;
use assmin::{Controller, RunOptions};

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
    /// Generate shell completions for assmin
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Write the default configuration file
    InitConfig {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

/// assmin - subtitle font subsetting
///
/// Builds one small font holding only the glyphs an ASS subtitle uses and
/// rewrites the subtitle to use it.
#[derive(Parser, Debug)]
#[command(name = "assmin")]
#[command(version)]
#[command(about = "Subset and merge the fonts used by an ASS subtitle")]
#[command(long_about = "assmin finds the fonts an ASS subtitle uses, keeps only the glyphs it needs,
merges them into a single font and rewrites the subtitle to use that font.

EXAMPLES:
    assmin episode.ass                              # Search the platform font directories
    assmin episode.ass --folder ./fonts             # Search a specific directory
    assmin --subtitle episode.ass --folder a --folder b
    assmin episode.ass --target-dir out --font-name MYFONT
    assmin completions bash > assmin.bash           # Generate bash completions

OUTPUT:
    <target-dir>/episode.min.ass and <target-dir>/episode.min.ttf by default.

REQUIREMENTS:
    FontForge must be installed. Set FONTFORGE_PATH or --fontforge when it is
    not on the PATH.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Subtitle file to process
    #[arg(value_name = "SUBTITLE")]
    input_path: Option<PathBuf>,

    /// Subtitle file to process (alternative to the positional argument)
    #[arg(long, conflicts_with = "input_path")]
    subtitle: Option<PathBuf>,

    /// Directory to search for fonts (repeatable)
    #[arg(long = "folder", value_name = "DIR")]
    folders: Vec<PathBuf>,

    /// Directory for the output subtitle and font
    #[arg(long)]
    target_dir: Option<PathBuf>,

    /// Output subtitle path
    #[arg(long)]
    target_path: Option<PathBuf>,

    /// Name of the merged font
    #[arg(long)]
    font_name: Option<String>,

    /// Output font path
    #[arg(long)]
    font_path: Option<PathBuf>,

    /// Font used for fonts that cannot be found
    #[arg(long)]
    fallback_font: Option<String>,

    /// FontForge executable
    #[arg(long, env = "FONTFORGE_PATH")]
    fontforge: Option<String>,

    /// Font engine timeout in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Configuration file path
    #[arg(short, long = "config", default_value = "assmin.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
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

    // @returns: Emoji and ANSI color for log level
    fn decoration_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("❌ ", "1;31"),
            Level::Warn => ("🚧 ", "1;33"),
            Level::Info => (" ", "1;32"),
            Level::Debug => ("🔍 ", "1;36"),
            Level::Trace => ("📋 ", "1;35"),
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
            let (emoji, color) = Self::decoration_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "\x1B[{}m{} {} {}\x1B[0m",
                color, now, emoji, record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize with trace so the max level alone decides what is shown
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "assmin", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::InitConfig { force }) => init_config(&cli.config_path, force),
        None => run_subset(cli).await,
    }
}

fn init_config(config_path: &str, force: bool) -> Result<()> {
    if Path::new(config_path).exists() && !force {
        return Err(anyhow!("Config file already exists: {} (use --force to overwrite)", config_path));
    }
    Config::default()
        .save(config_path)
        .context(format!("Failed to write default config to file: {}", config_path))?;
    println!("Wrote {}", config_path);
    Ok(())
}

async fn run_subset(options: CommandLineOptions) -> Result<()> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &options.log_level {
        let level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    let config = load_config(&options)?;

    // If log level was not set via command line, update it from config now
    if options.log_level.is_none() {
        log::set_max_level(config.log_level.to_level_filter());
    }

    let subtitle = options
        .subtitle
        .clone()
        .or_else(|| options.input_path.clone())
        .ok_or_else(|| anyhow!("SUBTITLE is required (positional or --subtitle)"))?;

    let font_dirs = if !options.folders.is_empty() {
        options.folders.clone()
    } else if !config.font_dirs.is_empty() {
        config.font_dirs.clone()
    } else {
        let defaults = FileManager::default_font_dirs();
        debug!("No font directories given, using {:?}", defaults);
        defaults
    };

    let controller = Controller::with_config(config)?;
    controller
        .run(RunOptions {
            subtitle,
            font_dirs,
            target_dir: options.target_dir,
            target_path: options.target_path,
            font_name: options.font_name,
            font_path: options.font_path,
        })
        .await?;

    Ok(())
}

// @returns: Config from file (or defaults) with CLI overrides applied
fn load_config(options: &CommandLineOptions) -> Result<Config> {
    let config_path = &options.config_path;
    let mut config = if Path::new(config_path).exists() {
        Config::load(config_path).context(format!("Failed to load config file: {}", config_path))?
    } else {
        if config_path != "assmin.json" {
            warn!("Config file not found at '{}', using defaults.", config_path);
        }
        Config::default()
    };

    if let Some(fallback) = &options.fallback_font {
        config.fallback_font = fallback.clone();
    }
    if let Some(fontforge) = &options.fontforge {
        config.engine.executable = fontforge.clone();
    }
    if let Some(timeout) = options.timeout_secs {
        config.engine.timeout_secs = timeout;
    }
    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }

    config.validate().context("Configuration validation failed")?;
    Ok(config)
}
