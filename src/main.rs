//! Main entry point for the emberglow CLI

mod cli;

use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use emberglow::{record_frames, Canvas, Config, Fireworks, Saturn, Scene};

use crate::cli::{Cli, Commands, RunArgs};

fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    if cli.verbose > 0 {
        log::set_max_level(match cli.verbose {
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        });
    } else if cli.quiet {
        log::set_max_level(log::LevelFilter::Error);
    }

    match cli.command {
        Commands::Fireworks { run, text, image } => {
            let mut config = load_config(&run)?;
            if let Some(text) = text {
                config.fireworks.finale.text = text;
            }
            if image.is_some() {
                config.fireworks.finale.image = image;
            }
            let scene = Fireworks::new(&config).context("failed to build the finale mask")?;
            execute(Box::new(scene), &config, &run)
        }
        Commands::Saturn { run } => {
            let config = load_config(&run)?;
            execute(Box::new(Saturn::new(&config)), &config, &run)
        }
    }
}

fn load_config(run: &RunArgs) -> Result<Config> {
    let mut config = match &run.config {
        Some(path) => Config::load(path).with_context(|| format!("failed to load {}", path.display()))?,
        None => Config::default(),
    };
    if run.seed.is_some() {
        config.seed = run.seed;
    }
    if let Some(width) = run.width {
        config.width = width;
    }
    if let Some(height) = run.height {
        config.height = height;
    }
    if let Some(speed) = run.speed {
        config.time_scale = speed;
    }
    Ok(config)
}

fn execute(mut scene: Box<dyn Scene>, config: &Config, run: &RunArgs) -> Result<()> {
    match &run.record {
        Some(dir) => {
            let mut canvas = Canvas::new(config.width, config.height);
            let written = record_frames(
                scene.as_mut(),
                &mut canvas,
                run.frames,
                Duration::from_millis(run.frame_ms),
                config.time_scale,
                dir,
            )?;
            println!("wrote {} frames to {}", written.len(), dir.display());
            Ok(())
        }
        None => {
            emberglow::window::run(scene, config)?;
            Ok(())
        }
    }
}
