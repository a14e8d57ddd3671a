use std::time::Duration;

use glam::{UVec2, Vec2, Vec3};
use rand::rngs::SmallRng;

use super::{scene_rng, Scene};
use crate::config::Config;
use crate::emitter::{Emitted, Emitter, MaskSource};
use crate::error::MaskError;
use crate::glyph::GlyphMask;
use crate::input::{Pointer, PointerButton};
use crate::pool::FireworkPools;
use crate::surface::Surface;

/// What one fireworks tick did to the pools.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    pub emitted: Emitted,
    /// Projectiles that burst.
    pub bursts: usize,
    /// Sparks added by those bursts.
    pub burst_sparks: usize,
    /// Sparks that faded out.
    pub sparks_culled: usize,
    /// Glyph points that faded out.
    pub glyphs_culled: usize,
}

/// The 2D fireworks scene.
///
/// Every tick fades the previous frame, emits, updates and culls the three
/// pools in order (projectiles, sparks, glyph points) and draws what
/// survived.
#[derive(Debug)]
pub struct Fireworks {
    emitter: Emitter,
    pools: FireworkPools,
    rng: SmallRng,
    bounds: UVec2,
    pointer: Pointer,
    elapsed: Duration,
}

impl Fireworks {
    /// Build the scene from `config`.
    ///
    /// The finale mask comes from `finale.image` when set, otherwise from
    /// `finale.text` in the built-in bitmap font.
    pub fn new(config: &Config) -> Result<Self, MaskError> {
        let finale = &config.fireworks.finale;
        let mask = match &finale.image {
            Some(path) => MaskSource::Image(GlyphMask::open(path)?),
            None => MaskSource::text(finale.text.clone()),
        };
        Self::with_mask(config, mask)
    }

    /// Build the scene with a custom finale mask source.
    pub fn with_mask(config: &Config, mask: MaskSource) -> Result<Self, MaskError> {
        let bounds = UVec2::new(config.width.max(1), config.height.max(1));
        // Surface a bad string now rather than when the finale fires.
        mask.sample_positions(bounds, config.fireworks.finale.stride)?;

        log::info!(
            "fireworks: {}x{} surface, launch every {:?}, finale after {:?}, seed {:?}",
            bounds.x,
            bounds.y,
            config.fireworks.launch_interval(),
            config.fireworks.finale.delay(),
            config.seed,
        );

        Ok(Self {
            emitter: Emitter::new(config.fireworks.clone(), mask),
            pools: FireworkPools::new(),
            rng: scene_rng(config.seed),
            bounds,
            pointer: Pointer::default(),
            elapsed: Duration::ZERO,
        })
    }

    pub fn pools(&self) -> &FireworkPools {
        &self.pools
    }

    pub fn bounds(&self) -> UVec2 {
        self.bounds
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn finale_fired(&self) -> bool {
        self.emitter.finale_fired()
    }

    /// Run one tick and report what changed.
    pub fn step(&mut self, dt: Duration, surface: &mut dyn Surface) -> TickReport {
        self.elapsed += dt;
        surface.fade(Vec3::ZERO, self.emitter.config().fade_alpha);

        let emitted = self
            .emitter
            .emit(dt, self.bounds, self.pointer.position, &mut self.pools, &mut self.rng);

        let projectiles = self.pools.projectiles.update(&mut self.rng);
        let burst_sparks = projectiles.spawned.len();
        self.pools.sparks.extend(projectiles.spawned);
        let sparks = self.pools.sparks.update(&mut self.rng);
        let glyphs = self.pools.glyphs.update(&mut self.rng);

        self.pools.projectiles.render_all(surface);
        self.pools.sparks.render_all(surface);
        self.pools.glyphs.render_all(surface);

        TickReport {
            emitted,
            bursts: projectiles.terminated,
            burst_sparks,
            sparks_culled: sparks.terminated,
            glyphs_culled: glyphs.terminated,
        }
    }
}

impl Scene for Fireworks {
    fn title(&self) -> &str {
        "emberglow: fireworks"
    }

    fn tick(&mut self, dt: Duration, surface: &mut dyn Surface) {
        let report = self.step(dt, surface);
        log::trace!("{report:?}");
    }

    fn resize(&mut self, size: UVec2) {
        self.bounds = size.max(UVec2::ONE);
    }

    fn pointer_moved(&mut self, position: Option<Vec2>) {
        self.pointer.move_to(position);
    }

    fn pointer_button(&mut self, button: PointerButton, pressed: bool) {
        if button != PointerButton::Primary {
            return;
        }
        self.pointer.down = pressed;
        if let (true, Some(at)) = (pressed, self.pointer.position) {
            self.emitter
                .launch_at(at, self.bounds, &mut self.pools, &mut self.rng);
        }
    }
}
