//! Vidmark CLI — Annotate videos and inspect streams.
//!
//! Usage:
//!   vidmark annotate <INPUT> -o <OUTPUT>   Annotate a video
//!   vidmark info <PATH>                    Show stream metadata
//!   vidmark check                          Check system capabilities

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "vidmark",
    about = "Periodic frame analysis with cached overlay rendering",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Annotate a video, replaying cached results onto skipped frames
    Annotate {
        /// Input video path
        input: PathBuf,

        /// Output video path
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Run expensive analysis every N frames (1 = every frame)
        #[arg(long)]
        interval: Option<u32>,

        /// JSONL file of precomputed annotations to replay through the
        /// pipeline
        #[arg(long)]
        annotations: Option<PathBuf>,

        /// Write each output frame's annotations to this JSONL sidecar
        #[arg(long)]
        annotations_out: Option<PathBuf>,

        /// Label font file (TrueType). Defaults to config, then system
        /// discovery
        #[arg(long)]
        font: Option<PathBuf>,
    },

    /// Show stream metadata for a video file
    Info {
        /// Path to the video file
        path: PathBuf,
    },

    /// Check system capabilities
    Check,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    vidmark_common::logging::init_logging(&vidmark_common::config::LoggingConfig {
        level: log_level.to_string(),
        json: false,
        file: None,
    });

    match cli.command {
        Commands::Annotate {
            input,
            output,
            interval,
            annotations,
            annotations_out,
            font,
        } => {
            commands::annotate::run(input, output, interval, annotations, annotations_out, font)
                .await
        }
        Commands::Info { path } => commands::info::run(path),
        Commands::Check => commands::check::run(),
    }
}
