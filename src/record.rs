//! Headless frame recording.
//!
//! Runs a scene at a fixed delta on a [`Canvas`] and writes every frame as
//! a PNG, without a window or GPU.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::canvas::Canvas;
use crate::error::RecordError;
use crate::scene::Scene;
use crate::time::Time;

/// Tick `scene` for `frames` frames of `dt` each, saving
/// `frame_00000.png`, `frame_00001.png`, ... into `out_dir`.
///
/// Each tick hands the scene `dt * time_scale`. Returns the written paths
/// in order.
pub fn record_frames(
    scene: &mut dyn Scene,
    canvas: &mut Canvas,
    frames: u32,
    dt: Duration,
    time_scale: f32,
    out_dir: impl AsRef<Path>,
) -> Result<Vec<PathBuf>, RecordError> {
    let out_dir = out_dir.as_ref();
    fs::create_dir_all(out_dir)?;

    let mut time = Time::new();
    time.set_fixed_delta(Some(dt));
    time.set_time_scale(time_scale);

    let mut written = Vec::with_capacity(frames as usize);
    for frame in 0..frames {
        let step = time.advance(dt);
        scene.tick(step, canvas);

        let path = out_dir.join(format!("frame_{frame:05}.png"));
        canvas.to_rgba8().save(&path)?;
        written.push(path);
    }

    log::info!("recorded {} frames to {}", written.len(), out_dir.display());
    Ok(written)
}
