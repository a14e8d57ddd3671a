//! 3D simplex noise for the Saturn core.
//!
//! Wraps [`noise::Simplex`], seeded through the injected RNG so runs are
//! reproducible. Output is roughly in `[-1, 1]`.

use ::noise::{NoiseFn, Seedable, Simplex};
use rand::Rng;

/// Seeded 3D simplex noise generator.
#[derive(Clone)]
pub struct Simplex3 {
    inner: Simplex,
}

impl std::fmt::Debug for Simplex3 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simplex3").field("seed", &self.seed()).finish()
    }
}

impl Simplex3 {
    /// Draw a seed from `rng`.
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            inner: Simplex::new(rng.gen()),
        }
    }

    pub fn seed(&self) -> u32 {
        self.inner.seed()
    }

    /// Sample the noise field at `(x, y, z)`.
    #[inline]
    pub fn sample(&self, x: f32, y: f32, z: f32) -> f32 {
        self.inner.get([f64::from(x), f64::from(y), f64::from(z)]) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_same_seed_same_field() {
        let a = Simplex3::new(&mut SmallRng::seed_from_u64(42));
        let b = Simplex3::new(&mut SmallRng::seed_from_u64(42));
        assert_eq!(a.seed(), b.seed());
        for i in 0..100 {
            let p = i as f32 * 0.37;
            assert_eq!(a.sample(p, -p, p * 0.5), b.sample(p, -p, p * 0.5));
        }
    }

    #[test]
    fn test_different_seeds_differ() {
        let a = Simplex3::new(&mut SmallRng::seed_from_u64(1));
        let b = Simplex3::new(&mut SmallRng::seed_from_u64(2));
        let differs = (0..100).any(|i| {
            let p = i as f32 * 0.37 + 0.11;
            a.sample(p, 0.5, -p) != b.sample(p, 0.5, -p)
        });
        assert!(differs);
    }

    #[test]
    fn test_output_is_bounded() {
        let noise = Simplex3::new(&mut SmallRng::seed_from_u64(7));
        let mut rng = SmallRng::seed_from_u64(8);
        for _ in 0..10_000 {
            let v = noise.sample(
                rng.gen_range(-100.0..100.0),
                rng.gen_range(-100.0..100.0),
                rng.gen_range(-100.0..100.0),
            );
            assert!(v.abs() <= 1.1, "{v}");
        }
    }

    #[test]
    fn test_continuity() {
        let noise = Simplex3::new(&mut SmallRng::seed_from_u64(3));
        for i in 0..1000 {
            let x = i as f32 * 0.013;
            let a = noise.sample(x, 0.3, 0.7);
            let b = noise.sample(x + 1e-3, 0.3, 0.7);
            assert!((a - b).abs() < 0.05);
        }
    }
}
