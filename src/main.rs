// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{anyhow, Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{info, warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::{Path, PathBuf};

use transcript_ingest::app_config::{self, Config};
use transcript_ingest::app_controller::{ConvertStatus, Controller, OutputFormat};
use transcript_ingest::diagnostics::LogSink;
use transcript_ingest::file_utils::FileManager;
use transcript_ingest::formats::TranscriptFormat;

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

/// CLI Wrapper for TranscriptFormat to implement ValueEnum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliFormat {
    Vtt,
    Srt,
    Youtube,
    Json,
    Plain,
}

impl From<CliFormat> for TranscriptFormat {
    fn from(cli_format: CliFormat) -> Self {
        match cli_format {
            CliFormat::Vtt => TranscriptFormat::Vtt,
            CliFormat::Srt => TranscriptFormat::Srt,
            CliFormat::Youtube => TranscriptFormat::YoutubeCopyPaste,
            CliFormat::Json => TranscriptFormat::JsonTimestamps,
            CliFormat::Plain => TranscriptFormat::PlainText,
        }
    }
}

/// CLI Wrapper for OutputFormat to implement ValueEnum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliOutput {
    Json,
    Vtt,
    Text,
}

impl From<CliOutput> for OutputFormat {
    fn from(cli_output: CliOutput) -> Self {
        match cli_output {
            CliOutput::Json => OutputFormat::Json,
            CliOutput::Vtt => OutputFormat::Vtt,
            CliOutput::Text => OutputFormat::Text,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Detect the format of a transcript file
    Detect {
        /// Transcript file to inspect
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Parse a transcript file and print its segments
    Parse {
        /// Transcript file to parse
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Skip detection and use this format
        #[arg(short, long, value_enum)]
        format: Option<CliFormat>,

        /// How to print the segments
        #[arg(short, long, value_enum, default_value = "json")]
        output: CliOutput,
    },

    /// Parse a transcript file and report what was kept and dropped
    Validate {
        /// Transcript file to check
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Print a preview of the first segments
        #[arg(short, long)]
        show_segments: bool,
    },

    /// Convert a transcript file or directory to WebVTT
    Convert {
        /// Transcript file or directory
        #[arg(value_name = "INPUT_PATH")]
        input_path: PathBuf,

        /// Output directory (defaults to the file's directory, or INPUT_PATH/vtt for folders)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Force overwrite of existing output files
        #[arg(short, long)]
        force_overwrite: bool,
    },

    /// List supported transcript formats
    Formats,

    /// Generate shell completions for transcript-ingest
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// transcript-ingest - Transcript format detection and parsing
///
/// Detects the format of transcript text, parses it into timed segments,
/// drops invalid ones and converts the result to WebVTT.
#[derive(Parser, Debug)]
#[command(name = "transcript-ingest")]
#[command(version)]
#[command(about = "Transcript format detection, parsing and validation")]
#[command(long_about = "transcript-ingest reads VTT, SRT, YouTube copy-paste, JSON and plain-text transcripts.

EXAMPLES:
    transcript-ingest detect talk.txt                  # Show detected format and confidence
    transcript-ingest parse talk.srt -o text           # Print segments as text
    transcript-ingest parse notes.txt -f plain         # Skip detection
    transcript-ingest validate talk.vtt -s             # Report kept and dropped segments
    transcript-ingest convert talk.json                # Write talk.vtt next to the input
    transcript-ingest convert ./transcripts -f         # Convert a whole folder
    transcript-ingest completions bash > ti.bash       # Generate bash completions

CONFIGURATION:
    Configuration is read from conf.json by default. You can specify a different
    config file with --config. Missing files fall back to built-in defaults.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = "conf.json")]
    config: PathBuf,

    /// Set logging level
    #[arg(short, long, global = true, value_enum)]
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

    // @returns: Marker and ANSI color for log level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("✖", "\x1B[1;31m"),
            Level::Warn => ("!", "\x1B[1;33m"),
            Level::Info => (" ", "\x1B[1;32m"),
            Level::Debug => ("·", "\x1B[1;36m"),
            Level::Trace => ("»", "\x1B[1;35m"),
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
            let (marker, color) = Self::style_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "{}{} {} {}\x1B[0m", color, now, marker, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn main() -> Result<()> {
    // Initialize with the most verbose level; the effective level is set via set_max_level
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(shell, &mut cmd, "transcript-ingest", &mut std::io::stdout());
        return Ok(());
    }

    let config = load_config(&cli.config, cli.log_level.clone())?;
    log::set_max_level(config.log_level.to_level_filter());

    let controller = Controller::with_config(config)?;

    match cli.command {
        Commands::Detect { file } => {
            let result = controller.detect_file(&file)?;
            println!("{} (confidence {:.2})", result.format, result.confidence);
            let description = result.format.info().description;
            if !description.is_empty() {
                println!("  {}", description);
            }
        }
        Commands::Parse { file, format, output } => {
            let outcome = controller.parse_file(&file, format.map(Into::into), &mut LogSink)?;
            println!("{}", controller.render(&outcome.segments, output.into())?);
        }
        Commands::Validate { file, show_segments } => run_validate(&controller, &file, show_segments)?,
        Commands::Convert { input_path, output_dir, force_overwrite } => {
            run_convert(&controller, &input_path, output_dir, force_overwrite)?
        }
        Commands::Formats => {
            for format in TranscriptFormat::SUPPORTED {
                let info = format.info();
                println!("{} ({})", info.name, format);
                println!("  {}", info.description);
                for line in info.example.lines() {
                    println!("    {}", line);
                }
                println!();
            }
        }
        Commands::Completions { .. } => {}
    }

    Ok(())
}

// Load the config file, or defaults when it does not exist; CLI log level wins
fn load_config(path: &Path, log_level: Option<CliLogLevel>) -> Result<Config> {
    let mut config = if path.exists() {
        Config::from_file(path)?
    } else {
        if path != Path::new("conf.json") {
            warn!("Config file not found at {:?}, using defaults.", path);
        }
        Config::default()
    };

    if let Some(log_level) = log_level {
        config.log_level = log_level.into();
    }

    config.validate().context("Configuration validation failed")?;
    Ok(config)
}

fn run_validate(controller: &Controller, file: &Path, show_segments: bool) -> Result<()> {
    let report = controller.validate_file(file)?;
    let outcome = &report.outcome;

    println!("File: {}", file.display());
    println!("  Size: {} bytes", report.file_size);
    println!("  Extension: {}", report.extension.as_deref().unwrap_or("none"));
    println!(
        "Detected format: {} (confidence {:.2})",
        outcome.detection.format, outcome.detection.confidence
    );
    if outcome.used_fallback {
        println!("Parsed with fallback: {}", outcome.format);
    }
    if let Some(encoding) = outcome.encoding {
        println!("Encoding: {}", encoding);
    }
    println!(
        "Segments: {} valid, {} dropped, {} total",
        outcome.summary.valid,
        outcome.summary.dropped(),
        outcome.summary.total
    );
    if !outcome.segments.is_empty() {
        let duration = report.total_duration();
        println!("Duration: {:.1} seconds ({:.1} minutes)", duration, duration / 60.0);
    }

    for warning in &report.warnings {
        println!("  warning: {}", warning);
    }

    if show_segments {
        for line in controller.preview(&outcome.segments) {
            println!("  {}", line);
        }
    }

    Ok(())
}

fn run_convert(
    controller: &Controller,
    input_path: &Path,
    output_dir: Option<PathBuf>,
    force_overwrite: bool,
) -> Result<()> {
    if FileManager::file_exists(input_path) {
        let output_dir = output_dir.unwrap_or_else(|| {
            input_path.parent().unwrap_or(Path::new(".")).to_path_buf()
        });
        match controller.convert_file(input_path, &output_dir, force_overwrite)? {
            ConvertStatus::Written(path) => info!("Success: {:?}", path),
            ConvertStatus::Skipped(path) => info!("Skipped: {:?}", path),
        }
    } else if FileManager::dir_exists(input_path) {
        let output_dir = output_dir.unwrap_or_else(|| input_path.join("vtt"));
        let summary = controller.convert_folder(input_path, &output_dir, force_overwrite)?;
        if summary.failed > 0 {
            return Err(anyhow!("{} file(s) failed to convert", summary.failed));
        }
    } else {
        return Err(anyhow!("Input path does not exist: {:?}", input_path));
    }

    Ok(())
}
