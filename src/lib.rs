//! # emberglow
//!
//! Two decorative particle scenes sharing one simulation shape: spawn,
//! integrate, age and cull, then draw.
//!
//! - [`Fireworks`]: rising projectiles that burst into sparks, a spark trail
//!   following the pointer, and a one-shot finale in which a line of text
//!   explodes into glyph points.
//! - [`Saturn`]: a noise-perturbed spherical core inside a Keplerian ring,
//!   scaled, lit and spun by hand-gesture control values.
//!
//! ## Quick Start
//!
//! ```ignore
//! use emberglow::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::default();
//!     let scene = Fireworks::new(&config)?;
//!     emberglow::window::run(Box::new(scene), &config)?;
//!     Ok(())
//! }
//! ```
//!
//! ## Headless
//!
//! Scenes draw through the [`Surface`] trait and never touch the GPU, so they
//! can run against the software [`Canvas`] alone:
//!
//! ```ignore
//! let mut scene = Saturn::new(&config);
//! let mut canvas = Canvas::new(config.width, config.height);
//! record_frames(&mut scene, &mut canvas, 120, Duration::from_millis(16), 1.0, "out")?;
//! ```
//!
//! ## Determinism
//!
//! Every scene owns a seedable RNG. With `Config::seed` set and a fixed
//! tick delta, two runs produce identical frames.
//!
//! ## Gestures
//!
//! The Saturn scene reads a lock-free [`ControlRecord`]. A landmark detector
//! on any thread writes into it through a [`GestureTracker`]; without one,
//! the scene derives a synthetic hand from the mouse.

pub mod camera;
pub mod canvas;
pub mod color;
pub mod config;
pub mod easing;
pub mod emitter;
pub mod error;
pub mod gesture;
pub mod glyph;
pub mod gpu;
pub mod input;
pub mod noise;
pub mod particles;
pub mod pool;
pub mod record;
pub mod scene;
pub mod surface;
pub mod time;
pub mod volume;
pub mod window;

pub use canvas::Canvas;
pub use config::{Config, FireworksConfig, SaturnConfig};
pub use emitter::{Emitter, MaskSource};
pub use error::{ConfigError, GpuError, MaskError, RecordError, RunError};
pub use gesture::{ControlRecord, GestureTracker, Landmark};
pub use glam::{Vec2, Vec3};
pub use glyph::{BitmapFont, GlyphMask, TextRasterizer};
pub use pool::{FireworkPools, Pool};
pub use record::record_frames;
pub use scene::{Fireworks, Saturn, Scene};
pub use surface::{PointCloud, Surface};
pub use time::Time;

/// Convenient imports for hosts.
pub mod prelude {
    pub use crate::config::{Config, FireworksConfig, SaturnConfig};
    pub use crate::gesture::{synthetic_hand, ControlRecord, GestureTracker, Landmark};
    pub use crate::glyph::{BitmapFont, GlyphMask, TextRasterizer};
    pub use crate::input::PointerButton;
    pub use crate::record::record_frames;
    pub use crate::scene::{Fireworks, Saturn, Scene};
    pub use crate::surface::Surface;
    pub use crate::time::Time;
    pub use crate::Canvas;
    pub use crate::{Vec2, Vec3};
}
