//! Spawning for the fireworks scene.
//!
//! The emitter decides when and where entities are created. It only ever
//! appends to the pools; existing entities are never touched.
//!
//! # Sources
//!
//! | Source | Trigger | Creates |
//! |--------|---------|---------|
//! | launch [`Cadence`] | every `launch_interval` while below `max_projectiles` | one [`Projectile`] |
//! | finale [`OneShot`] | once, after `delay` | one [`GlyphPoint`] per opaque mask sample |
//! | pointer | every tick while the pointer is known | `pointer_sparks` [`Spark`]s |
//! | pointer press | on press, below `max_projectiles` | one [`Projectile`] aimed at the pointer |

use std::fmt;
use std::time::Duration;

use glam::{IVec2, UVec2, Vec2};
use rand::Rng;

use crate::color::random_hue;
use crate::config::FireworksConfig;
use crate::error::MaskError;
use crate::glyph::{BitmapFont, GlyphMask, TextRasterizer};
use crate::particles::{GlyphPoint, Projectile, Spark};
use crate::pool::FireworkPools;

/// Fires once per `interval` of accumulated time.
///
/// Time is accumulated as an integer [`Duration`], so ticking exactly one
/// interval always yields exactly one firing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cadence {
    interval: Duration,
    accumulated: Duration,
}

impl Cadence {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            accumulated: Duration::ZERO,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Accumulate `dt` and return how many intervals completed.
    ///
    /// A zero interval never fires.
    pub fn advance(&mut self, dt: Duration) -> u32 {
        if self.interval.is_zero() {
            return 0;
        }
        self.accumulated += dt;
        let mut fired = 0;
        while self.accumulated >= self.interval {
            self.accumulated -= self.interval;
            fired += 1;
        }
        fired
    }
}

/// Fires exactly once, the first time accumulated time reaches `delay`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OneShot {
    delay: Duration,
    elapsed: Duration,
    fired: bool,
}

impl OneShot {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            elapsed: Duration::ZERO,
            fired: false,
        }
    }

    pub fn advance(&mut self, dt: Duration) -> bool {
        if self.fired {
            return false;
        }
        self.elapsed += dt;
        if self.elapsed >= self.delay {
            self.fired = true;
            return true;
        }
        false
    }

    pub fn has_fired(&self) -> bool {
        self.fired
    }
}

/// Where the finale's glyph mask comes from.
pub enum MaskSource {
    /// Rasterize `text` at the surface size when the finale fires.
    Text {
        text: String,
        rasterizer: Box<dyn TextRasterizer + Send>,
    },
    /// A pre-rendered mask, centred on the surface.
    Image(GlyphMask),
}

impl fmt::Debug for MaskSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text { text, .. } => f.debug_struct("Text").field("text", text).finish_non_exhaustive(),
            Self::Image(mask) => f.debug_tuple("Image").field(&mask.size()).finish(),
        }
    }
}

impl MaskSource {
    /// Text drawn with the built-in bitmap font.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text {
            text: text.into(),
            rasterizer: Box::new(BitmapFont::default()),
        }
    }

    /// Surface positions of the opaque mask samples on a `stride` grid.
    pub fn sample_positions(&self, surface: UVec2, stride: u32) -> Result<Vec<Vec2>, MaskError> {
        match self {
            Self::Text { text, rasterizer } => {
                let mask = rasterizer.rasterize(text, surface)?;
                Ok(mask.samples(stride).collect())
            }
            Self::Image(mask) => {
                let offset = (surface.as_ivec2() - mask.size().as_ivec2()) / IVec2::splat(2);
                let offset = offset.as_vec2();
                Ok(mask.samples(stride).map(|p| p + offset).collect())
            }
        }
    }
}

/// Counts of what one [`Emitter::emit`] call appended.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Emitted {
    pub projectiles: usize,
    pub glyphs: usize,
    pub sparks: usize,
}

/// Spawner for the fireworks scene.
#[derive(Debug)]
pub struct Emitter {
    config: FireworksConfig,
    cadence: Cadence,
    finale: OneShot,
    mask: MaskSource,
}

impl Emitter {
    pub fn new(config: FireworksConfig, mask: MaskSource) -> Self {
        Self {
            cadence: Cadence::new(config.launch_interval()),
            finale: OneShot::new(config.finale.delay()),
            config,
            mask,
        }
    }

    pub fn config(&self) -> &FireworksConfig {
        &self.config
    }

    pub fn finale_fired(&self) -> bool {
        self.finale.has_fired()
    }

    /// Run all sources for one tick of `dt` on a surface of `bounds` pixels.
    pub fn emit<R: Rng + ?Sized>(
        &mut self,
        dt: Duration,
        bounds: UVec2,
        pointer: Option<Vec2>,
        pools: &mut FireworkPools,
        rng: &mut R,
    ) -> Emitted {
        let mut emitted = Emitted::default();

        for _ in 0..self.cadence.advance(dt) {
            if pools.projectiles.len() < self.config.max_projectiles {
                pools.projectiles.push(self.launch(bounds, rng));
                emitted.projectiles += 1;
            }
        }

        if self.finale.advance(dt) {
            emitted.glyphs = self.explode_mask(bounds, pools, rng);
        }

        if let Some(at) = pointer {
            for _ in 0..self.config.pointer_sparks {
                pools.sparks.push(Spark::new(at, random_hue(rng), &self.config.pointer, rng));
                emitted.sparks += 1;
            }
        }

        emitted
    }

    /// Launch from a random point on the bottom edge toward a random target
    /// in the upper band.
    pub fn launch<R: Rng + ?Sized>(&self, bounds: UVec2, rng: &mut R) -> Projectile {
        let size = bounds.as_vec2();
        let target = Vec2::new(
            rng.gen::<f32>() * size.x,
            rng.gen::<f32>() * size.y * self.config.projectile.target_band,
        );
        self.launch_toward(target, bounds, rng)
    }

    /// Launch from a random point on the bottom edge toward `target`.
    pub fn launch_toward<R: Rng + ?Sized>(&self, target: Vec2, bounds: UVec2, rng: &mut R) -> Projectile {
        let size = bounds.as_vec2();
        let origin = Vec2::new(rng.gen::<f32>() * size.x, size.y);
        let color = random_hue(rng);
        Projectile::launch(origin, target, color, &self.config.projectile, &self.config.burst, rng)
    }

    /// Append a projectile aimed at `target` unless the pool is full.
    pub fn launch_at<R: Rng + ?Sized>(
        &self,
        target: Vec2,
        bounds: UVec2,
        pools: &mut FireworkPools,
        rng: &mut R,
    ) -> bool {
        if pools.projectiles.len() >= self.config.max_projectiles {
            return false;
        }
        pools.projectiles.push(self.launch_toward(target, bounds, rng));
        true
    }

    fn explode_mask<R: Rng + ?Sized>(&self, bounds: UVec2, pools: &mut FireworkPools, rng: &mut R) -> usize {
        let finale = &self.config.finale;
        match self.mask.sample_positions(bounds, finale.stride) {
            Ok(positions) => {
                let count = positions.len();
                pools
                    .glyphs
                    .extend(positions.into_iter().map(|p| GlyphPoint::new(p, &finale.glyph, rng)));
                log::debug!("finale fired with {count} glyph points");
                count
            }
            Err(err) => {
                log::warn!("finale skipped: {err}");
                0
            }
        }
    }
}
