//! Scene configuration.
//!
//! Every tunable of both scenes lives here, so cadences, delays and physics
//! constants can be changed from a JSON file without touching code. All
//! fields have defaults; a config file only needs the values it overrides.
//!
//! ```ignore
//! let mut config = Config::load("fireworks.json")?;
//! config.seed = Some(7);
//! config.save("fireworks.json")?;
//! ```

use std::f32::consts::PI;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::color::from_hex;
use crate::easing::lerp;
use crate::error::ConfigError;
use crate::gesture::GestureConfig;

/// A numeric interval, used both for random sampling and for interpolation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub start: f32,
    pub end: f32,
}

impl Span {
    pub const fn new(start: f32, end: f32) -> Self {
        Self { start, end }
    }

    /// Uniform sample in `[start, end)`.
    #[inline]
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        lerp(self.start, self.end, rng.gen())
    }

    /// Linear interpolation, `t = 0` gives `start`.
    #[inline]
    pub fn lerp(&self, t: f32) -> f32 {
        lerp(self.start, self.end, t)
    }
}

/// Top-level configuration shared by the binary and both scenes.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// RNG seed. `None` seeds from entropy.
    pub seed: Option<u64>,
    /// Initial surface width in pixels.
    pub width: u32,
    /// Initial surface height in pixels.
    pub height: u32,
    /// Scene time multiplier; 1.0 is real time.
    pub time_scale: f32,
    pub fireworks: FireworksConfig,
    pub saturn: SaturnConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed: None,
            width: 1280,
            height: 720,
            time_scale: 1.0,
            fireworks: FireworksConfig::default(),
            saturn: SaturnConfig::default(),
        }
    }
}

impl Config {
    /// Save the configuration to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Load a configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        let config = serde_json::from_str(&json)?;
        Ok(config)
    }
}

/// Spark behaviour, shared by burst sparks and pointer-trail sparks.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SparkConfig {
    /// Initial speed in pixels per tick.
    pub speed: Span,
    /// Alpha lost per tick.
    pub decay: Span,
    /// Stroke width in pixels.
    pub width: Span,
    /// Speed multiplier per tick.
    pub friction: f32,
    /// Downward displacement per tick.
    pub gravity: f32,
    /// Trail length in positions.
    pub trail: usize,
}

impl SparkConfig {
    /// Sparks thrown by a bursting projectile.
    pub fn burst() -> Self {
        Self {
            speed: Span::new(2.0, 10.0),
            decay: Span::new(0.015, 0.035),
            width: Span::new(1.0, 3.0),
            friction: 0.96,
            gravity: 1.0,
            trail: 5,
        }
    }

    /// Short-lived sparks following the pointer.
    pub fn pointer() -> Self {
        Self {
            speed: Span::new(1.0, 5.0),
            decay: Span::new(0.04, 0.08),
            ..Self::burst()
        }
    }
}

impl Default for SparkConfig {
    fn default() -> Self {
        Self::burst()
    }
}

/// Rising projectile behaviour.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileConfig {
    /// Launch speed in pixels per tick.
    pub speed: Span,
    /// Speed multiplier per tick, must exceed 1.
    pub growth: f32,
    /// Speed at which the projectile bursts regardless of altitude.
    pub ceiling: f32,
    /// Targets are picked in the top `target_band` fraction of the surface.
    pub target_band: f32,
    /// Trail length in positions.
    pub trail: usize,
    /// Trail stroke width in pixels.
    pub width: f32,
    /// Minimum burst size.
    pub burst_min: u32,
    /// Burst size is `burst_min + rand(burst_extra)`.
    pub burst_extra: u32,
}

impl Default for ProjectileConfig {
    fn default() -> Self {
        Self {
            speed: Span::new(2.0, 4.0),
            growth: 1.04,
            ceiling: 12.0,
            target_band: 1.0 / 2.5,
            trail: 10,
            width: 3.0,
            burst_min: 100,
            burst_extra: 100,
        }
    }
}

/// Glyph point behaviour for the text finale.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlyphConfig {
    /// Each velocity axis starts uniform in `[-spread / 2, spread / 2)`.
    pub spread: f32,
    /// Per-point velocity multiplier per tick.
    pub friction: Span,
    /// Added to vertical velocity every tick.
    pub gravity: f32,
    /// Alpha lost per tick.
    pub decay: Span,
    /// Disc radius in pixels.
    pub size: f32,
}

impl Default for GlyphConfig {
    fn default() -> Self {
        Self {
            spread: 25.0,
            friction: Span::new(0.95, 0.97),
            gravity: 0.5,
            decay: Span::new(0.005, 0.015),
            size: 2.0,
        }
    }
}

/// The one-shot text explosion.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinaleConfig {
    /// Text rasterized by the built-in bitmap font.
    pub text: String,
    /// Image whose opaque pixels replace the text, if set.
    pub image: Option<PathBuf>,
    /// Delay from scene start, in milliseconds.
    pub delay_ms: u64,
    /// Mask sampling stride in pixels.
    pub stride: u32,
    pub glyph: GlyphConfig,
}

impl Default for FinaleConfig {
    fn default() -> Self {
        Self {
            text: "HAPPY NEW YEAR".into(),
            image: None,
            delay_ms: 5000,
            stride: 4,
            glyph: GlyphConfig::default(),
        }
    }
}

impl FinaleConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

/// The fireworks scene.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FireworksConfig {
    /// Launch cadence in milliseconds.
    pub launch_interval_ms: u64,
    /// No launches while this many projectiles are live.
    pub max_projectiles: usize,
    /// Opacity of the black fade painted every tick.
    pub fade_alpha: f32,
    /// Pointer-trail sparks emitted per tick while the pointer is known.
    pub pointer_sparks: u32,
    pub projectile: ProjectileConfig,
    pub burst: SparkConfig,
    pub pointer: SparkConfig,
    pub finale: FinaleConfig,
}

impl Default for FireworksConfig {
    fn default() -> Self {
        Self {
            launch_interval_ms: 400,
            max_projectiles: 10,
            fade_alpha: 0.1,
            pointer_sparks: 2,
            projectile: ProjectileConfig::default(),
            burst: SparkConfig::burst(),
            pointer: SparkConfig::pointer(),
            finale: FinaleConfig::default(),
        }
    }
}

impl FireworksConfig {
    pub fn launch_interval(&self) -> Duration {
        Duration::from_millis(self.launch_interval_ms)
    }
}

/// The noise-perturbed spherical core.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    pub count: usize,
    pub radius: f32,
    /// Radius is `rand^exponent * radius`; below 1 packs points to the center.
    pub radial_exponent: f32,
    /// Per-point noise time rate.
    pub rate: Span,
    /// Spatial frequency applied to the initial position.
    pub frequency: f32,
    /// Displacement per unit of noise.
    pub amplitude: f32,
    pub color: Vec3,
    pub size: f32,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            count: 8000,
            radius: 2.5,
            radial_exponent: 0.7,
            rate: Span::new(0.05, 0.15),
            frequency: 0.5,
            amplitude: 0.1,
            color: from_hex(0xff9933),
            size: 0.2,
        }
    }
}

/// The orbiting ring.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RingConfig {
    pub count: usize,
    pub inner_radius: f32,
    pub outer_radius: f32,
    /// Angular speed at radius 1, in radians per 60 Hz tick.
    pub base_speed: f32,
    /// Vertical spread of the ring plane.
    pub thickness: f32,
    /// Per-point colors are lerped between these two.
    pub colors: [Vec3; 2],
    pub size: f32,
    /// Tilt of the ring plane about X, in radians.
    pub tilt: f32,
}

impl Default for RingConfig {
    fn default() -> Self {
        Self {
            count: 40_000,
            inner_radius: 3.5,
            outer_radius: 8.0,
            base_speed: 0.005,
            thickness: 0.15,
            colors: [from_hex(0xad9e87), from_hex(0x756b5c)],
            size: 0.06,
            tilt: -0.4 * PI,
        }
    }
}

/// The Saturn scene.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SaturnConfig {
    pub core: CoreConfig,
    pub ring: RingConfig,
    pub gesture: GestureConfig,
    /// Exponential smoothing factor for openness.
    pub openness_smoothing: f32,
    /// Exponential smoothing factor for rotation intent.
    pub rotation_smoothing: f32,
    /// Group scale from closed to open hand.
    pub scale: Span,
    /// Camera distance from closed to open hand.
    pub camera_distance: Span,
    /// Light intensity from closed to open hand.
    pub light: Span,
    /// Eased openness above which the ring starts to jitter.
    pub chaos_threshold: f32,
    /// Jitter amplitude at full chaos.
    pub chaos_strength: f32,
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    /// Orbit camera damping factor.
    pub damping: f32,
    /// Radians of orbit per pixel dragged.
    pub orbit_sensitivity: f32,
}

impl Default for SaturnConfig {
    fn default() -> Self {
        Self {
            core: CoreConfig::default(),
            ring: RingConfig::default(),
            gesture: GestureConfig::default(),
            openness_smoothing: 0.05,
            rotation_smoothing: 0.1,
            scale: Span::new(0.5, 1.5),
            camera_distance: Span::new(20.0, 10.0),
            light: Span::new(0.5, 1.5),
            chaos_threshold: 0.9,
            chaos_strength: 5.0,
            fov_degrees: 75.0,
            damping: 0.05,
            orbit_sensitivity: 0.005,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_span_sample_stays_in_range() {
        let span = Span::new(2.0, 4.0);
        let mut rng = SmallRng::seed_from_u64(1);
        for _ in 0..1000 {
            let v = span.sample(&mut rng);
            assert!((2.0..4.0).contains(&v));
        }
    }

    #[test]
    fn test_span_lerp_runs_backwards() {
        let span = Span::new(20.0, 10.0);
        assert_eq!(span.lerp(0.0), 20.0);
        assert_eq!(span.lerp(0.5), 15.0);
        assert_eq!(span.lerp(1.0), 10.0);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let json = r#"{ "seed": 9, "fireworks": { "launch_interval_ms": 250 } }"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.fireworks.launch_interval(), Duration::from_millis(250));
        assert_eq!(config.fireworks.max_projectiles, 10);
        assert_eq!(config.saturn.ring.count, 40_000);
        assert_eq!(config.time_scale, 1.0);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = Config::default();
        config.fireworks.finale.text = "HELLO".into();
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.fireworks, config.fireworks);
        assert_eq!(loaded.saturn, config.saturn);
    }

    #[test]
    fn test_load_reports_bad_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(Config::load(&path), Err(ConfigError::Json(_))));
    }
}
