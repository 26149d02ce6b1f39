//! rec CLI — pick a capture device pair and record it with ffmpeg.
//!
//! Usage:
//!   rec [record]          Choose audio and video devices, then record
//!   rec devices           List the devices ffmpeg reports
//!   rec check             Check that ffmpeg and capture devices are usable
//!   rec config            Show or write the effective configuration

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use rec_common::config::{config_file_path, RecConfig, SelectionOrder};
use rec_common::error::RecError;

mod commands;

#[derive(Parser)]
#[command(
    name = "rec",
    about = "Record from an interactively chosen audio/video device pair",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Read configuration from this file instead of the standard location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// ffmpeg program to run
    #[arg(long, global = true)]
    ffmpeg: Option<String>,

    /// Directory recordings are written to
    #[arg(short, long, global = true)]
    output_dir: Option<PathBuf>,

    /// Pick the video device before the audio device
    #[arg(long, global = true)]
    video_first: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Choose devices and start a recording (default)
    Record {
        /// Print the recording summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// List capture devices reported by ffmpeg
    Devices {
        /// Print the inventories as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check system capabilities
    Check,

    /// Show the effective configuration
    Config {
        /// Save it to the standard config location
        #[arg(long)]
        write: bool,
    },
}

impl Cli {
    /// Effective configuration plus, when the config file was ignored, why.
    fn load_config(&self) -> anyhow::Result<(RecConfig, Option<RecError>)> {
        let path = self.config.clone().unwrap_or_else(config_file_path);
        let (mut config, ignored) = RecConfig::load_or_default(&path);
        if let Some(program) = &self.ffmpeg {
            config.ffmpeg.program = program.clone();
        }
        if let Some(dir) = &self.output_dir {
            config.output.dir = dir.clone();
        }
        if self.video_first {
            config.selection_order = SelectionOrder::VideoFirst;
        }
        if self.verbose {
            config.logging.level = "debug".to_string();
        }
        config.validate()?;
        Ok((config, ignored))
    }
}

fn warn_ignored_config(reason: &RecError) {
    tracing::warn!(error = %reason, "Ignoring configuration file, using defaults");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let (config, ignored) = cli.load_config()?;

    rec_common::logging::init_logging(&config.logging)?;
    if let Some(reason) = &ignored {
        warn_ignored_config(reason);
    }
    tracing::debug!(?config, "Configuration loaded");

    match cli.command.unwrap_or(Commands::Record { json: false }) {
        Commands::Record { json } => commands::record::run(&config, json).await,
        Commands::Devices { json } => commands::devices::run(&config, json).await,
        Commands::Check => commands::check::run(&config).await,
        Commands::Config { write } => commands::config::run(&config, write),
    }
}
