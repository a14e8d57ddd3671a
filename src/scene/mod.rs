//! The two scenes and the interface hosts drive them through.
//!
//! A scene is a self-contained context: it owns its pools, clock, RNG and
//! control readings. Hosts call [`Scene::tick`] once per frame and only
//! schedule the next frame after it returns.

mod fireworks;
mod saturn;

pub use fireworks::{Fireworks, TickReport};
pub use saturn::{Saturn, SaturnFrame};

use std::time::Duration;

use glam::{UVec2, Vec2};
use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::input::PointerButton;
use crate::surface::Surface;

/// A frame-driven experience.
pub trait Scene {
    /// Window title.
    fn title(&self) -> &str;

    /// Advance by `dt` and draw into `surface`.
    fn tick(&mut self, dt: Duration, surface: &mut dyn Surface);

    /// The surface changed size.
    fn resize(&mut self, size: UVec2);

    /// The pointer moved to a new position, or left the surface.
    fn pointer_moved(&mut self, _position: Option<Vec2>) {}

    /// A pointer button was pressed or released.
    fn pointer_button(&mut self, _button: PointerButton, _pressed: bool) {}
}

/// Scene RNG: reproducible when seeded, from entropy otherwise.
pub(crate) fn scene_rng(seed: Option<u64>) -> SmallRng {
    match seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_entropy(),
    }
}
