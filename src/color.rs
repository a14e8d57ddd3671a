//! Color helpers.
//!
//! Colors are `Vec3` RGB triples in display space, each channel in `[0, 1]`.

use glam::Vec3;
use rand::Rng;

/// Convert HSV to RGB.
///
/// `h`, `s` and `v` are all in `[0, 1]`; hue wraps.
pub fn hsv_to_rgb(h: f32, s: f32, v: f32) -> Vec3 {
    let c = v * s;
    let h = h.rem_euclid(1.0) * 6.0;
    let x = c * (1.0 - ((h % 2.0) - 1.0).abs());
    let m = v - c;

    let (r, g, b) = if h < 1.0 {
        (c, x, 0.0)
    } else if h < 2.0 {
        (x, c, 0.0)
    } else if h < 3.0 {
        (0.0, c, x)
    } else if h < 4.0 {
        (0.0, x, c)
    } else if h < 5.0 {
        (x, 0.0, c)
    } else {
        (c, 0.0, x)
    };

    Vec3::new(r + m, g + m, b + m)
}

/// A fully saturated color of random hue.
///
/// Matches `hsl(random, 100%, 50%)`, which is HSV with full saturation and
/// value.
pub fn random_hue<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    hsv_to_rgb(rng.gen::<f32>(), 1.0, 1.0)
}

/// Decode a `0xRRGGBB` literal.
pub const fn from_hex(hex: u32) -> Vec3 {
    Vec3::new(
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_primary_hues() {
        assert!(hsv_to_rgb(0.0, 1.0, 1.0).abs_diff_eq(Vec3::X, 1e-5));
        assert!(hsv_to_rgb(1.0 / 3.0, 1.0, 1.0).abs_diff_eq(Vec3::Y, 1e-5));
        assert!(hsv_to_rgb(2.0 / 3.0, 1.0, 1.0).abs_diff_eq(Vec3::Z, 1e-5));
    }

    #[test]
    fn test_random_hue_is_saturated() {
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..100 {
            let c = random_hue(&mut rng);
            assert!((c.max_element() - 1.0).abs() < 1e-5);
            assert!(c.min_element() < 1e-5);
        }
    }

    #[test]
    fn test_from_hex() {
        let c = from_hex(0xff9933);
        assert_eq!(c.x, 1.0);
        assert!((c.y - 0.6).abs() < 1e-6);
        assert!((c.z - 0.2).abs() < 1e-6);
    }
}
