// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, anyhow};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, info, warn};
use std::io::Write;
use std::path::{Path, PathBuf};

use subforge::app_config::{self, Config};
use subforge::app_controller::Controller;
use subforge::formats::SubtitleFormat;
use subforge::style_engine::StyleOptions;
use subforge::theme::VerticalPosition;

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

/// CLI Wrapper for VerticalPosition to implement ValueEnum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliPosition {
    Top,
    Center,
    Bottom,
}

impl From<CliPosition> for VerticalPosition {
    fn from(position: CliPosition) -> Self {
        match position {
            CliPosition::Top => VerticalPosition::Top,
            CliPosition::Center => VerticalPosition::Center,
            CliPosition::Bottom => VerticalPosition::Bottom,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert a subtitle file to another format
    Convert {
        /// Input subtitle file
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output file
        #[arg(short, long)]
        output: PathBuf,

        /// Target format (srt, vtt, ass, txt); taken from the output extension when omitted
        #[arg(short = 't', long = "to")]
        format: Option<String>,
    },

    /// Write a themed ASS version of a subtitle file
    Style {
        /// Input subtitle file
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output ASS file
        #[arg(short, long)]
        output: PathBuf,

        /// Theme name (see `subforge themes`)
        #[arg(long)]
        theme: Option<String>,

        /// Font size override
        #[arg(long)]
        font_size: Option<u32>,

        /// Vertical position override
        #[arg(long, value_enum)]
        position: Option<CliPosition>,

        /// Draw a translucent box behind the text
        #[arg(long, conflicts_with = "no_background")]
        background: bool,

        /// Never draw a background box, even when the config enables it
        #[arg(long)]
        no_background: bool,
    },

    /// List the available themes
    Themes,

    /// Convert every subtitle file in a directory
    Batch {
        /// Directory to scan recursively
        #[arg(value_name = "INPUT_DIR")]
        input_dir: PathBuf,

        /// Target format; the configured default when omitted
        #[arg(short = 't', long = "to")]
        format: Option<String>,

        /// Directory receiving the converted files; the input directory when omitted
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Force overwrite of existing output files
        #[arg(short, long)]
        force_overwrite: bool,
    },

    /// Generate shell completions for subforge
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Subforge - subtitle conversion and styling
///
/// Converts between SubRip, WebVTT, Advanced SubStation Alpha and plain text,
/// and restyles subtitles with named themes.
#[derive(Parser, Debug)]
#[command(name = "subforge")]
#[command(version = "0.1.0")]
#[command(about = "Subtitle conversion and styling tool")]
#[command(long_about = "Subforge converts subtitles between SRT, WebVTT, ASS and plain text and writes themed ASS output.

EXAMPLES:
    subforge convert movie.srt -o movie.vtt             # Format taken from the extension
    subforge convert notes.txt -o notes.srt -t srt      # Explicit target format
    subforge style movie.srt -o movie.ass --theme cinema
    subforge style movie.ass -o big.ass --font-size 32 --position top --background
    subforge batch ./subs -t vtt --output-dir ./out     # Convert a whole directory
    subforge completions bash > subforge.bash           # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config. If the config file doesn't exist, a default one
    will be created automatically. Custom themes listed there are available to
    the style command next to the built-in ones.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = "conf.json")]
    config: String,

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

    // @returns: ANSI color and tag for log level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("\x1B[1;31m", "ERROR"),
            Level::Warn => ("\x1B[1;33m", "WARN "),
            Level::Info => ("\x1B[1;32m", "INFO "),
            Level::Debug => ("\x1B[1;36m", "DEBUG"),
            Level::Trace => ("\x1B[1;35m", "TRACE"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S%.3f");
            let (color, tag) = Self::style_for_level(record.level());

            let _ = writeln!(
                std::io::stderr(),
                "{}{} {} {}\x1B[0m",
                color,
                now,
                tag,
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logger accepts everything; the effective level is set through max_level below
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(shell, &mut cmd, "subforge", &mut std::io::stdout());
        return Ok(());
    }

    if let Some(level) = &cli.log_level {
        let level: app_config::LogLevel = level.clone().into();
        log::set_max_level(level.into());
    }

    let mut config = Config::load_or_create(&cli.config)?;
    match &cli.log_level {
        Some(level) => config.log_level = level.clone().into(),
        None => log::set_max_level(config.log_level.into()),
    }

    let controller = Controller::with_config(config)?;

    match cli.command {
        Commands::Convert { input, output, format } => {
            let target = match format {
                Some(name) => SubtitleFormat::from_name(&name)?,
                None => SubtitleFormat::from_path(&output)?,
            };
            controller.convert_file(&input, &output, target)?;
        }
        Commands::Style {
            input,
            output,
            theme,
            font_size,
            position,
            background,
            no_background,
        } => {
            if !has_extension(&output, SubtitleFormat::Ass.extension()) {
                warn!("Styled output is ASS but {} has another extension", output.display());
            }
            let options = StyleOptions {
                theme,
                font_size,
                position: position.map(Into::into),
                add_background: match (background, no_background) {
                    (true, _) => Some(true),
                    (_, true) => Some(false),
                    _ => None,
                },
            };
            controller.style_file(&input, &output, &options)?;
        }
        Commands::Themes => list_themes(&controller),
        Commands::Batch {
            input_dir,
            format,
            output_dir,
            force_overwrite,
        } => {
            let target = match format {
                Some(name) => SubtitleFormat::from_name(&name)?,
                None => controller.config().default_output_format()?,
            };
            let output_dir = output_dir.unwrap_or_else(|| input_dir.clone());

            let summary = controller
                .run_folder(input_dir, output_dir, target, force_overwrite)
                .await?;
            if !summary.failed.is_empty() {
                return Err(anyhow!("{} file(s) failed to convert", summary.failed.len()));
            }
        }
        Commands::Completions { .. } => {}
    }

    Ok(())
}

fn list_themes(controller: &Controller) {
    for theme in controller.registry().themes() {
        info!(
            "{:<10} {} {}pt, alignment {}{}",
            theme.name,
            theme.font_name,
            theme.font_size,
            theme.alignment,
            if theme.border_style == 3 { ", boxed" } else { "" }
        );
    }
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
}
