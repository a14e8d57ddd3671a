//! Software rendering surface, used for headless frame recording and tests.
//!
//! [`Canvas`] keeps an RGB float framebuffer so repeated low-alpha fades
//! decay smoothly instead of stalling on 8-bit rounding. Strokes and discs
//! are anti-aliased and composited source-over; point clouds are splatted
//! additively, the way point sprites are blended on the GPU.

use glam::{Mat4, UVec2, Vec2, Vec3, Vec4Swizzles};
use image::{DynamicImage, Rgb, Rgb32FImage, RgbaImage};

use crate::surface::{Paint, PointCloud, PointStyle, Stroke, Surface};

/// CPU framebuffer implementing [`Surface`].
pub struct Canvas {
    pixels: Rgb32FImage,
}

impl Canvas {
    /// A black canvas of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: Rgb32FImage::new(width.max(1), height.max(1)),
        }
    }

    /// Resize, discarding the current contents.
    pub fn resize(&mut self, width: u32, height: u32) {
        if self.pixels.dimensions() != (width.max(1), height.max(1)) {
            self.pixels = Rgb32FImage::new(width.max(1), height.max(1));
        }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Color of one pixel.
    pub fn pixel(&self, x: u32, y: u32) -> Vec3 {
        Vec3::from_array(self.pixels.get_pixel(x, y).0)
    }

    /// Clamp the framebuffer into 8-bit RGBA, row-major.
    pub fn to_rgba8(&self) -> RgbaImage {
        DynamicImage::ImageRgb32F(self.pixels.clone()).to_rgba8()
    }

    /// Pixel bounds of a box around `min..max`, clipped to the canvas.
    fn clip(&self, min: Vec2, max: Vec2) -> Option<(u32, u32, u32, u32)> {
        let w = self.width() as f32;
        let h = self.height() as f32;
        if max.x < 0.0 || max.y < 0.0 || min.x >= w || min.y >= h || !min.is_finite() || !max.is_finite() {
            return None;
        }
        let x0 = min.x.max(0.0).floor() as u32;
        let y0 = min.y.max(0.0).floor() as u32;
        let x1 = (max.x.ceil() as u32).min(self.width() - 1);
        let y1 = (max.y.ceil() as u32).min(self.height() - 1);
        Some((x0, y0, x1, y1))
    }

    #[inline]
    fn blend_over(&mut self, x: u32, y: u32, color: Vec3, alpha: f32) {
        let px = self.pixels.get_pixel_mut(x, y);
        let dst = Vec3::from_array(px.0);
        *px = Rgb((dst * (1.0 - alpha) + color * alpha).to_array());
    }

    #[inline]
    fn blend_add(&mut self, x: u32, y: u32, color: Vec3) {
        let px = self.pixels.get_pixel_mut(x, y);
        *px = Rgb((Vec3::from_array(px.0) + color).to_array());
    }
}

impl Surface for Canvas {
    fn size(&self) -> UVec2 {
        UVec2::new(self.width(), self.height())
    }

    fn fade(&mut self, color: Vec3, alpha: f32) {
        let alpha = alpha.clamp(0.0, 1.0);
        for px in self.pixels.pixels_mut() {
            let dst = Vec3::from_array(px.0);
            *px = Rgb((dst * (1.0 - alpha) + color * alpha).to_array());
        }
    }

    fn stroke(&mut self, path: &[Vec2], stroke: Stroke) {
        if path.len() < 2 || stroke.alpha <= 0.0 {
            return;
        }
        let half = stroke.width.max(0.5) * 0.5;
        let (min, max) = path.iter().fold(
            (Vec2::splat(f32::INFINITY), Vec2::splat(f32::NEG_INFINITY)),
            |(lo, hi), p| (lo.min(*p), hi.max(*p)),
        );
        let Some((x0, y0, x1, y1)) = self.clip(min - half - 1.0, max + half + 1.0) else {
            return;
        };

        for y in y0..=y1 {
            for x in x0..=x1 {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                // Nearest segment, so joints are not composited twice.
                let d = path
                    .windows(2)
                    .map(|seg| distance_to_segment(p, seg[0], seg[1]))
                    .fold(f32::INFINITY, f32::min);
                let coverage = (half + 0.5 - d).clamp(0.0, 1.0);
                if coverage > 0.0 {
                    self.blend_over(x, y, stroke.color, coverage * stroke.alpha);
                }
            }
        }
    }

    fn fill_disc(&mut self, center: Vec2, radius: f32, paint: Paint) {
        if radius <= 0.0 || paint.alpha <= 0.0 {
            return;
        }
        let Some((x0, y0, x1, y1)) = self.clip(center - radius - 1.0, center + radius + 1.0) else {
            return;
        };
        for y in y0..=y1 {
            for x in x0..=x1 {
                let d = Vec2::new(x as f32 + 0.5, y as f32 + 0.5).distance(center);
                let coverage = (radius + 0.5 - d).clamp(0.0, 1.0);
                if coverage > 0.0 {
                    self.blend_over(x, y, paint.color, coverage * paint.alpha);
                }
            }
        }
    }

    fn draw_points(&mut self, cloud: &mut PointCloud, view_proj: Mat4, style: PointStyle) {
        cloud.take_upload();
        let size = Vec2::new(self.width() as f32, self.height() as f32);

        for (i, point) in cloud.points().enumerate() {
            let clip = view_proj * point.extend(1.0);
            if clip.w <= 1e-4 {
                continue;
            }
            let ndc = clip.xyz() / clip.w;
            if ndc.z < 0.0 || ndc.z > 1.0 {
                continue;
            }
            let screen = Vec2::new((ndc.x + 1.0) * 0.5 * size.x, (1.0 - ndc.y) * 0.5 * size.y);
            // Attenuated point diameter, as for GPU point sprites.
            let radius = style.size * size.y * 0.25 / clip.w;
            let color = cloud.color(i).unwrap_or(style.color) * style.opacity;

            if radius < 0.75 {
                if screen.x >= 0.0 && screen.y >= 0.0 && screen.x < size.x && screen.y < size.y {
                    let area = (std::f32::consts::PI * radius * radius).min(1.0);
                    self.blend_add(screen.x as u32, screen.y as u32, color * area);
                }
                continue;
            }

            let Some((x0, y0, x1, y1)) = self.clip(screen - radius - 1.0, screen + radius + 1.0) else {
                continue;
            };
            for y in y0..=y1 {
                for x in x0..=x1 {
                    let d = Vec2::new(x as f32 + 0.5, y as f32 + 0.5).distance(screen);
                    let coverage = (radius + 0.5 - d).clamp(0.0, 1.0);
                    if coverage > 0.0 {
                        self.blend_add(x, y, color * coverage);
                    }
                }
            }
        }
    }
}

fn distance_to_segment(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq <= f32::EPSILON {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}
