// SPDX-License-Identifier: GPL-3.0-only

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cli;

#[derive(Parser)]
#[command(name = "photobooth")]
#[command(about = "Photo booth: three timed shots composed into a photo strip")]
#[command(version = photobooth::constants::app_info::version())]
#[command(subcommand_required = false)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a timed three-shot session and export the strip
    Session {
        /// Use an image file as the camera (default: synthetic test pattern)
        #[arg(short, long)]
        image: Option<PathBuf>,

        /// Filter id (see 'photobooth filters')
        #[arg(short, long)]
        filter: Option<String>,

        /// Overlay id (see 'photobooth overlays')
        #[arg(long)]
        overlay: Option<String>,

        /// Output directory (default: ~/Pictures/Photobooth)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Compose a strip from three image files
    Compose {
        /// Exactly three images, top to bottom
        #[arg(required = true, num_args = 3)]
        inputs: Vec<PathBuf>,

        /// Filter id (see 'photobooth filters')
        #[arg(short, long)]
        filter: Option<String>,

        /// Overlay id (see 'photobooth overlays')
        #[arg(long)]
        overlay: Option<String>,

        /// Footer title
        #[arg(short, long)]
        title: Option<String>,

        /// Output directory (default: ~/Pictures/Photobooth)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List available filters
    Filters,

    /// List available overlays
    Overlays,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Set RUST_LOG to control log level, e.g. RUST_LOG=photobooth=debug
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(true)
        .with_level(true)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Session {
            image,
            filter,
            overlay,
            output,
        }) => cli::run_session(image, filter, overlay, output),
        Some(Commands::Compose {
            inputs,
            filter,
            overlay,
            title,
            output,
        }) => cli::compose_files(&inputs, filter, overlay, title, output),
        Some(Commands::Filters) => cli::list_filters(),
        Some(Commands::Overlays) => cli::list_overlays(),
        None => cli::run_session(None, None, None, None),
    }
}
