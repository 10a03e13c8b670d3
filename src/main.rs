// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{anyhow, Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{info, warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::PathBuf;

use subgen::app_config::{self, Config};
use subgen::app_controller::Controller;
use subgen::formats::SubtitleFormat;

/// CLI wrapper for SubtitleFormat to implement ValueEnum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliFormat {
    Srt,
    Vtt,
    Ass,
}

impl From<CliFormat> for SubtitleFormat {
    fn from(cli_format: CliFormat) -> Self {
        match cli_format {
            CliFormat::Srt => SubtitleFormat::Srt,
            CliFormat::Vtt => SubtitleFormat::Vtt,
            CliFormat::Ass => SubtitleFormat::Ass,
        }
    }
}

/// CLI wrapper for LogLevel to implement ValueEnum
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

fn level_filter(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert a subtitle file, or every subtitle file in a directory
    Convert {
        /// Input subtitle file or directory
        #[arg(value_name = "INPUT_PATH")]
        input_path: PathBuf,

        /// Target format (defaults to export.default_format from the config)
        #[arg(short = 't', long = "to", value_enum)]
        to: Option<CliFormat>,

        /// Output directory (defaults to the input's directory)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Force overwrite of existing output files
        #[arg(short, long)]
        force_overwrite: bool,
    },

    /// Show cue count, duration and speakers of a subtitle file
    Info {
        #[arg(value_name = "INPUT_FILE")]
        input_file: PathBuf,
    },

    /// Work with saved projects
    Projects {
        #[command(subcommand)]
        action: ProjectCommands,
    },

    /// Generate shell completions for subgen
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand, Debug)]
enum ProjectCommands {
    /// List saved projects
    List,

    /// Export a project's subtitles
    Export {
        /// Project id
        id: String,

        /// Target format (defaults to export.default_format from the config)
        #[arg(short = 't', long = "to", value_enum)]
        to: Option<CliFormat>,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,

        /// Force overwrite of existing output files
        #[arg(short, long)]
        force_overwrite: bool,
    },
}

/// SubGEN - subtitle editing and export toolkit
///
/// Converts subtitles between SRT, WebVTT and ASS and exports saved projects.
#[derive(Parser, Debug)]
#[command(name = "subgen")]
#[command(version)]
#[command(about = "Subtitle conversion and export tool")]
#[command(long_about = "SubGEN converts subtitles between SRT, WebVTT and ASS and exports saved projects.

EXAMPLES:
    subgen convert movie.srt --to vtt          # Convert one file
    subgen convert -f --to ass /subtitles/      # Convert a directory, overwriting outputs
    subgen info movie.ass                       # Show a summary of a subtitle file
    subgen projects list                        # List saved projects
    subgen projects export <ID> --to srt        # Export a saved project
    subgen completions bash > subgen.bash       # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long = "config", global = true, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, global = true, value_enum)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation; the level lives in log::max_level
struct CustomLogger;

impl CustomLogger {
    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(CustomLogger))?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI colour and marker for a level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("1;31", "❌"),
            Level::Warn => ("1;33", "🚧"),
            Level::Info => ("1;32", " "),
            Level::Debug => ("1;36", "🔍"),
            Level::Trace => ("1;35", "📋"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (colour, marker) = Self::style_for_level(record.level());
            let _ = writeln!(
                std::io::stderr(),
                "\x1B[{}m{} {} {}\x1B[0m",
                colour,
                now,
                marker,
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
    // Info until the config says otherwise
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(shell, &mut cmd, "subgen", &mut std::io::stdout());
        return Ok(());
    }

    if let Some(cmd_log_level) = &cli.log_level {
        log::set_max_level(level_filter(&cmd_log_level.clone().into()));
    }

    let mut config = Config::load_or_create(&cli.config_path)?;
    if let Some(log_level) = &cli.log_level {
        config.log_level = log_level.clone().into();
    }
    config
        .validate()
        .context("Configuration validation failed")?;
    log::set_max_level(level_filter(&config.log_level));

    let default_format = config.export.default_format;
    let controller = Controller::with_config(config)?;

    match cli.command {
        Commands::Convert {
            input_path,
            to,
            output_dir,
            force_overwrite,
        } => {
            let to = to.map(SubtitleFormat::from).unwrap_or(default_format);
            if input_path.is_file() {
                let report =
                    controller.convert_file(&input_path, output_dir.as_deref(), to, force_overwrite)?;
                if !report.skipped {
                    info!("Success: {:?}", report.output);
                }
            } else if input_path.is_dir() {
                if output_dir.is_some() {
                    warn!("--output-dir is ignored for directories, outputs are written next to each input");
                }
                controller.convert_folder(&input_path, to, force_overwrite)?;
            } else {
                return Err(anyhow!("Input path does not exist: {:?}", input_path));
            }
        }
        Commands::Info { input_file } => {
            let summary = controller.describe_file(&input_file)?;
            println!("Format:    {}", summary.format);
            println!("Cues:      {}", summary.cue_count);
            println!("Duration:  {}", subgen::timecode::format_srt(summary.duration));
            println!(
                "Language:  {}",
                summary.language.as_deref().unwrap_or("unknown")
            );
            if !summary.speakers.is_empty() {
                println!("Speakers:  {}", summary.speakers.join(", "));
            }
            if summary.out_of_order > 0 {
                println!("Out of order cues: {}", summary.out_of_order);
            }
            if !summary.import_warnings.is_empty() {
                println!("Skipped blocks: {}", summary.import_warnings.len());
            }
        }
        Commands::Projects { action } => match action {
            ProjectCommands::List => {
                let projects = controller.projects()?;
                if projects.is_empty() {
                    info!("No saved projects");
                }
                for project in projects {
                    println!("{}", project);
                }
            }
            ProjectCommands::Export {
                id,
                to,
                output_dir,
                force_overwrite,
            } => {
                let to = to.map(SubtitleFormat::from).unwrap_or(default_format);
                let output = controller.export_project(&id, to, &output_dir, force_overwrite)?;
                info!("Success: {:?}", output);
            }
        },
        Commands::Completions { .. } => {}
    }

    Ok(())
}
