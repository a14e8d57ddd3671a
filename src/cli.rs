//! Root CLI structure for emberglow

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "emberglow")]
#[command(about = "Fireworks and Saturn particle scenes", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Scene to run
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (can be repeated for more detail)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 2D fireworks with a text finale
    Fireworks {
        #[command(flatten)]
        run: RunArgs,

        /// Finale text, overriding the config
        #[arg(long)]
        text: Option<String>,

        /// Image whose opaque pixels form the finale, overriding the text
        #[arg(long)]
        image: Option<PathBuf>,
    },

    /// 3D point-cloud planet driven by hand gestures
    Saturn {
        #[command(flatten)]
        run: RunArgs,
    },
}

/// Options shared by every scene.
#[derive(Args)]
pub struct RunArgs {
    /// JSON config file; missing fields keep their defaults
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// RNG seed for reproducible runs
    #[arg(long)]
    pub seed: Option<u64>,

    /// Render headless into this directory instead of opening a window
    #[arg(long)]
    pub record: Option<PathBuf>,

    /// Number of frames to record
    #[arg(long, default_value_t = 300)]
    pub frames: u32,

    /// Fixed tick length in milliseconds when recording
    #[arg(long, default_value_t = 16)]
    pub frame_ms: u64,

    /// Scene time multiplier, overriding the config
    #[arg(long)]
    pub speed: Option<f32>,

    /// Surface width in pixels, overriding the config
    #[arg(long)]
    pub width: Option<u32>,

    /// Surface height in pixels, overriding the config
    #[arg(long)]
    pub height: Option<u32>,
}
