//! Fixed-size 3D point populations of the Saturn scene.
//!
//! Neither population ever grows, shrinks or culls; every tick recomputes
//! all positions into a [`PointCloud`] and flags it for upload.

use std::f32::consts::TAU;

use glam::Vec3;
use rand::Rng;

use crate::config::{CoreConfig, RingConfig};
use crate::easing::inverse_lerp;
use crate::noise::Simplex3;
use crate::surface::PointCloud;

/// Angular speed at `radius`: `base / radius^1.5`, so inner orbits run
/// faster.
#[inline]
pub fn angular_speed(base: f32, radius: f32) -> f32 {
    base / radius.powf(1.5)
}

/// Chaos amount in `[0, 1]` for an eased openness.
///
/// Zero up to `threshold`, then ramps linearly to 1 at full openness.
#[inline]
pub fn chaos_factor(eased: f32, threshold: f32) -> f32 {
    if eased > threshold {
        inverse_lerp(threshold, 1.0, eased).clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Uniformly distributed unit vector.
fn random_direction<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    let theta = rng.gen::<f32>() * TAU;
    let phi = (2.0 * rng.gen::<f32>() - 1.0).acos();
    Vec3::new(phi.sin() * theta.cos(), phi.sin() * theta.sin(), phi.cos())
}

/// The noise-perturbed spherical core.
#[derive(Debug)]
pub struct Core {
    initial: Vec<Vec3>,
    rates: Vec<f32>,
    noise: Simplex3,
    frequency: f32,
    amplitude: f32,
    cloud: PointCloud,
}

impl Core {
    pub fn new<R: Rng + ?Sized>(config: &CoreConfig, rng: &mut R) -> Self {
        let noise = Simplex3::new(rng);
        let mut initial = Vec::with_capacity(config.count);
        let mut rates = Vec::with_capacity(config.count);
        let mut cloud = PointCloud::new(config.count);

        for i in 0..config.count {
            let r = rng.gen::<f32>().powf(config.radial_exponent) * config.radius;
            let p = random_direction(rng) * r;
            initial.push(p);
            rates.push(config.rate.sample(rng));
            cloud.set(i, p);
        }

        Self {
            initial,
            rates,
            noise,
            frequency: config.frequency,
            amplitude: config.amplitude,
            cloud,
        }
    }

    /// Recompute positions at scene time `t` seconds.
    pub fn update(&mut self, t: f32) {
        for (i, (&p, &rate)) in self.initial.iter().zip(&self.rates).enumerate() {
            let q = p * self.frequency + Vec3::splat(t * rate);
            let n = self.noise.sample(q.x, q.y, q.z);
            self.cloud.set(i, p + Vec3::splat(n * self.amplitude));
        }
        self.cloud.mark_dirty();
    }

    pub fn len(&self) -> usize {
        self.initial.len()
    }

    pub fn is_empty(&self) -> bool {
        self.initial.is_empty()
    }

    pub fn initial(&self) -> &[Vec3] {
        &self.initial
    }

    pub fn cloud(&self) -> &PointCloud {
        &self.cloud
    }

    pub fn cloud_mut(&mut self) -> &mut PointCloud {
        &mut self.cloud
    }
}

/// One ring particle in polar form.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RingPoint {
    pub radius: f32,
    pub angle: f32,
    /// Radians per 60 Hz tick.
    pub speed: f32,
    /// Height above the ring plane.
    pub height: f32,
}

impl RingPoint {
    #[inline]
    pub fn position(&self) -> Vec3 {
        Vec3::new(
            self.radius * self.angle.cos(),
            self.height,
            self.radius * self.angle.sin(),
        )
    }
}

/// The Keplerian ring.
#[derive(Debug)]
pub struct Ring {
    points: Vec<RingPoint>,
    cloud: PointCloud,
}

impl Ring {
    pub fn new<R: Rng + ?Sized>(config: &RingConfig, rng: &mut R) -> Self {
        let mut points = Vec::with_capacity(config.count);
        let mut colors = Vec::with_capacity(config.count);

        for _ in 0..config.count {
            let radius = config.inner_radius + rng.gen::<f32>() * (config.outer_radius - config.inner_radius);
            points.push(RingPoint {
                radius,
                angle: rng.gen::<f32>() * TAU,
                speed: angular_speed(config.base_speed, radius),
                height: (rng.gen::<f32>() - 0.5) * config.thickness,
            });
            colors.push(config.colors[0].lerp(config.colors[1], rng.gen()));
        }

        let mut cloud = PointCloud::new(config.count).with_colors(&colors);
        for (i, p) in points.iter().enumerate() {
            cloud.set(i, p.position());
        }
        Self { points, cloud }
    }

    /// Advance every orbit by `dt` seconds and write positions.
    ///
    /// With `chaos > 0` each written position gets uniform jitter of up to
    /// `strength * chaos / 2` per axis; the orbit itself is unaffected.
    pub fn update<R: Rng + ?Sized>(&mut self, dt: f32, chaos: f32, strength: f32, rng: &mut R) {
        let jitter = strength * chaos;
        for (i, point) in self.points.iter_mut().enumerate() {
            point.angle = (point.angle + point.speed * 60.0 * dt) % TAU;
            let mut p = point.position();
            if jitter > 0.0 {
                p += Vec3::new(rng.gen::<f32>() - 0.5, rng.gen::<f32>() - 0.5, rng.gen::<f32>() - 0.5) * jitter;
            }
            self.cloud.set(i, p);
        }
        self.cloud.mark_dirty();
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[RingPoint] {
        &self.points
    }

    pub fn cloud(&self) -> &PointCloud {
        &self.cloud
    }

    pub fn cloud_mut(&mut self) -> &mut PointCloud {
        &mut self.cloud
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_angular_speed_decreases_with_radius() {
        let mut prev = f32::INFINITY;
        for i in 0..=45 {
            let r = 3.5 + i as f32 * 0.1;
            let speed = angular_speed(0.005, r);
            assert!(speed < prev);
            prev = speed;
        }
    }

    #[test]
    fn test_chaos_factor_ramp() {
        assert_eq!(chaos_factor(0.5, 0.9), 0.0);
        assert_eq!(chaos_factor(0.9, 0.9), 0.0);
        assert!((chaos_factor(0.95, 0.9) - 0.5).abs() < 1e-4);
        assert_eq!(chaos_factor(1.0, 0.9), 1.0);
    }

    #[test]
    fn test_core_stays_near_initial_positions() {
        let mut rng = SmallRng::seed_from_u64(5);
        let config = CoreConfig {
            count: 500,
            ..CoreConfig::default()
        };
        let mut core = Core::new(&config, &mut rng);
        core.update(12.5);

        assert!(core.cloud().needs_upload());
        for (i, &p) in core.initial().iter().enumerate() {
            assert!(p.length() <= config.radius + 1e-4);
            let offset = core.cloud().get(i) - p;
            // Same scalar on every axis.
            assert!((offset.x - offset.y).abs() < 1e-6 && (offset.y - offset.z).abs() < 1e-6);
            assert!(offset.x.abs() <= config.amplitude * 1.1);
        }
    }

    #[test]
    fn test_core_follows_noise_of_initial_position() {
        let mut rng = SmallRng::seed_from_u64(7);
        let config = CoreConfig {
            count: 200,
            ..CoreConfig::default()
        };
        let mut core = Core::new(&config, &mut rng);
        let t = 3.75;

        core.update(t);
        let first: Vec<Vec3> = core.cloud().points().collect();
        for (i, &p) in core.initial().iter().enumerate() {
            let q = p * config.frequency + Vec3::splat(t * core.rates[i]);
            let n = core.noise.sample(q.x, q.y, q.z);
            assert_eq!(first[i], p + Vec3::splat(n * config.amplitude));
        }

        // Positions are a function of time, not accumulated.
        core.update(9.0);
        core.update(t);
        let again: Vec<Vec3> = core.cloud().points().collect();
        assert_eq!(first, again);
    }

    #[test]
    fn test_ring_keeps_radius_and_height() {
        let mut rng = SmallRng::seed_from_u64(6);
        let config = RingConfig {
            count: 300,
            ..RingConfig::default()
        };
        let mut ring = Ring::new(&config, &mut rng);
        for _ in 0..60 {
            ring.update(1.0 / 60.0, 0.0, 5.0, &mut rng);
        }

        for (i, point) in ring.points().iter().enumerate() {
            assert!((3.5..8.0).contains(&point.radius));
            assert!(point.height.abs() <= 0.075);
            let p = ring.cloud().get(i);
            assert!((Vec3::new(p.x, 0.0, p.z).length() - point.radius).abs() < 1e-3);
            assert!(ring.cloud().color(i).is_some());
        }
    }

    #[test]
    fn test_ring_advances_by_speed_per_tick() {
        let mut rng = SmallRng::seed_from_u64(7);
        let config = RingConfig {
            count: 10,
            ..RingConfig::default()
        };
        let mut ring = Ring::new(&config, &mut rng);
        let before: Vec<RingPoint> = ring.points().to_vec();
        ring.update(1.0 / 60.0, 0.0, 5.0, &mut rng);

        for (a, b) in before.iter().zip(ring.points()) {
            let delta = (b.angle - a.angle).rem_euclid(TAU);
            assert!((delta - a.speed).abs() < 1e-5);
        }
    }

    #[test]
    fn test_chaos_jitter_is_not_persisted() {
        let mut rng = SmallRng::seed_from_u64(8);
        let config = RingConfig {
            count: 50,
            ..RingConfig::default()
        };
        let mut ring = Ring::new(&config, &mut rng);
        ring.update(0.0, 1.0, 5.0, &mut rng);

        let moved = (0..ring.len()).any(|i| (ring.cloud().get(i) - ring.points()[i].position()).length() > 1e-3);
        assert!(moved);
        for (i, point) in ring.points().iter().enumerate() {
            let offset = ring.cloud().get(i) - point.position();
            assert!(offset.abs().max_element() <= 2.5 + 1e-4);
        }

        ring.update(0.0, 0.0, 5.0, &mut rng);
        for (i, point) in ring.points().iter().enumerate() {
            assert_eq!(ring.cloud().get(i), point.position());
        }
    }
}
