// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, Context};
use log::{error, warn, info, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::path::PathBuf;
use std::io::{BufRead, Write};
use clap::{Parser, ValueEnum, CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use farasa_rs::app_config::{self, Config};
use farasa_rs::app_controller::{Controller, Operation, Task};
use farasa_rs::errors::AppError;
use farasa_rs::pos_tagger::TagOptions;
use farasa_rs::segmenter::{SegmentOptions, DEFAULT_SPLIT_CHAR};

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
    /// Generate shell completions for farasa
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// farasa - run the Farasa segmenter or POS tagger on a file or folder
#[derive(Parser, Debug)]
#[command(name = "farasa")]
#[command(version = "0.1.0")]
#[command(about = "Segment or POS tag Arabic text with the Farasa tools")]
#[command(long_about = "Runs the Farasa segmenter or POS tagger jars on a text file, or on every file
of a folder, and cleans up their input and output.

EXAMPLES:
    farasa -f segment -i test.txt -o test_segmented.txt
    farasa -f segment -r -s @ -i test.txt -o test_segmented.txt
    farasa -f POS_tag -i test.txt -o test_tagged.txt
    farasa -f POS_tag -d -i test_folder -o tagged_folder
    farasa completions bash > farasa.bash

Missing function, input or output paths are asked for interactively.

CONFIGURATION:
    Tool locations are stored in farasa.json by default. If the config file
    doesn't exist, a default one will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Remove all non-Arabic text before POS tagging
    #[arg(short = 'd', long = "ditch-non-arabic", alias = "ditch_non_Arabic")]
    ditch_non_arabic: bool,

    /// Reconnect ta marbuta to the preceding token after segmentation
    #[arg(short = 'r', long = "restore-ta-marbuta", alias = "restore_ta_marbuta")]
    restore_ta_marbuta: bool,

    /// Function to run: `segment` or `POS_tag`
    #[arg(short = 'f', long = "func", value_name = "FUNC")]
    func: Option<String>,

    /// Path to the input file (or folder, for batch processing)
    #[arg(short = 'i', long = "inpath", value_name = "INPUT_PATH")]
    inpath: Option<PathBuf>,

    /// Path to the output file (or folder, for batch processing)
    #[arg(short = 'o', long = "outpath", value_name = "OUTPUT_PATH")]
    outpath: Option<PathBuf>,

    /// Character marking prefixes and suffixes after segmentation
    #[arg(short = 's', long = "split-char", alias = "split_char", value_name = "CHAR")]
    split_char: Option<char>,

    /// POS tag non-Arabic text too instead of masking it
    #[arg(long)]
    tag_all: bool,

    /// Keep going after a file fails in folder mode
    #[arg(long)]
    keep_going: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "farasa.json")]
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

    // @returns: Colour code and tag for a log level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("1;31", "ERROR"),
            Level::Warn => ("1;33", "WARN "),
            Level::Info => ("1;32", "INFO "),
            Level::Debug => ("1;36", "DEBUG"),
            Level::Trace => ("1;35", "TRACE"),
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
            let (colour, tag) = Self::style_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "\x1B[{}m{} {} {}\x1B[0m",
                colour, now, tag, record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

// @prompts: Ask for a missing argument on stdin
fn prompt(message: &str) -> Result<String> {
    print!("{}", message);
    std::io::stdout().flush()?;

    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)
        .context("Failed to read from stdin")?;
    Ok(line.trim().to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logger starts at trace so the config can lower the level later
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    if let Some(Commands::Completions { shell }) = &cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(*shell, &mut cmd, "farasa", &mut std::io::stdout());
        return Ok(());
    }

    if let Err(e) = run(cli).await {
        error!("{:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

async fn run(options: CommandLineOptions) -> Result<()> {
    if let Some(cmd_log_level) = &options.log_level {
        let level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    // Load or create configuration
    let (mut config, created) = Config::load_or_create(&options.config_path)?;
    if created {
        warn!("Config file not found at '{}', created default config.", options.config_path);
    }

    // Override config with CLI options if provided
    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }
    if options.keep_going {
        config.continue_on_error = true;
    }

    config.validate()
        .context("Configuration validation failed")?;

    if options.log_level.is_none() {
        log::set_max_level(config.log_level.to_level_filter());
    }

    let func = match options.func {
        Some(func) => func,
        None => prompt("Please provide a function: `segment` or `POS_tag`: ")?,
    };
    let operation = func.parse::<Operation>()
        .context("Aborting")?;

    let input_path = match options.inpath {
        Some(path) => path,
        None => PathBuf::from(prompt("Please provide a path to an input file or folder: ")?),
    };
    if !input_path.exists() {
        return Err(AppError::InputNotFound(input_path.display().to_string()))
            .context("Aborting");
    }

    let output_path = match options.outpath {
        Some(path) => path,
        None => PathBuf::from(prompt("Please provide a path to an output file or folder: ")?),
    };

    let task = match operation {
        Operation::Segment => Task::Segment(SegmentOptions {
            restore_ta_marbuta: options.restore_ta_marbuta,
            split_char: options.split_char.unwrap_or(DEFAULT_SPLIT_CHAR),
        }),
        Operation::PosTag => Task::Tag(TagOptions {
            only_arabic: !options.tag_all,
            ditch_non_arabic: options.ditch_non_arabic,
        }),
    };

    let controller = Controller::with_config(config)?;
    let report = controller.run(&task, input_path, output_path).await?;

    if !report.failed.is_empty() {
        warn!("{} of {} file(s) failed", report.failed.len(), report.total());
        for (path, message) in &report.failed {
            warn!("  {}: {}", path.display(), message);
        }
    } else {
        info!("{} file(s) done", report.processed.len());
    }

    Ok(())
}
