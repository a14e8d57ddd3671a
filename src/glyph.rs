//! Glyph masks for the text finale.
//!
//! A [`GlyphMask`] is a dense alpha bitmap. It either comes from a
//! [`TextRasterizer`] (the built-in [`BitmapFont`] by default) or from an
//! image file, and is sampled on a regular grid to seed glyph points.

use std::fs;
use std::path::Path;

use glam::{UVec2, Vec2};
use image::{DynamicImage, GenericImageView};

use crate::error::MaskError;

/// Per-pixel alpha, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GlyphMask {
    width: u32,
    height: u32,
    alpha: Vec<u8>,
}

impl GlyphMask {
    /// A fully transparent mask.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            alpha: vec![0; width as usize * height as usize],
        }
    }

    /// Build a mask from an image: its alpha channel when it has one,
    /// luminance otherwise.
    pub fn from_image(image: &DynamicImage) -> Self {
        let (width, height) = image.dimensions();
        let alpha = if image.color().has_alpha() {
            image.to_rgba8().pixels().map(|p| p.0[3]).collect()
        } else {
            image.to_luma8().into_raw()
        };
        Self { width, height, alpha }
    }

    /// Load an image file as a mask.
    ///
    /// A file that cannot be read is [`MaskError::Io`]; one that does not
    /// decode is [`MaskError::Image`].
    pub fn open(path: impl AsRef<Path>) -> Result<Self, MaskError> {
        let bytes = fs::read(path)?;
        let image = image::load_from_memory(&bytes)?;
        Ok(Self::from_image(&image))
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn size(&self) -> UVec2 {
        UVec2::new(self.width, self.height)
    }

    #[inline]
    pub fn get(&self, x: u32, y: u32) -> u8 {
        if x < self.width && y < self.height {
            self.alpha[(y * self.width + x) as usize]
        } else {
            0
        }
    }

    #[inline]
    pub fn set(&mut self, x: u32, y: u32, alpha: u8) {
        if x < self.width && y < self.height {
            self.alpha[(y * self.width + x) as usize] = alpha;
        }
    }

    /// Fill an axis-aligned block, clipped to the mask.
    pub fn fill_rect(&mut self, x: i64, y: i64, w: u32, h: u32, alpha: u8) {
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = (x + w as i64).min(self.width as i64);
        let y1 = (y + h as i64).min(self.height as i64);
        for py in y0..y1 {
            for px in x0..x1 {
                self.alpha[(py as u64 * self.width as u64 + px as u64) as usize] = alpha;
            }
        }
    }

    /// Number of non-transparent pixels.
    pub fn coverage(&self) -> usize {
        self.alpha.iter().filter(|&&a| a > 0).count()
    }

    /// Positions of non-transparent pixels on a `stride` grid, row-major.
    ///
    /// A stride of 0 is treated as 1.
    pub fn samples(&self, stride: u32) -> impl Iterator<Item = Vec2> + '_ {
        let stride = stride.max(1) as usize;
        (0..self.height)
            .step_by(stride)
            .flat_map(move |y| (0..self.width).step_by(stride).map(move |x| (x, y)))
            .filter(|&(x, y)| self.get(x, y) > 0)
            .map(|(x, y)| Vec2::new(x as f32, y as f32))
    }
}

/// Turns a string into a glyph mask.
pub trait TextRasterizer {
    /// Rasterize `text`, centred, into a mask of `size` pixels.
    fn rasterize(&self, text: &str, size: UVec2) -> Result<GlyphMask, MaskError>;
}

const GLYPH_WIDTH: u32 = 5;
const GLYPH_HEIGHT: u32 = 7;
/// Advance per character, one column of spacing.
const ADVANCE: u32 = GLYPH_WIDTH + 1;
/// Line advance, two rows of spacing.
const LINE_ADVANCE: u32 = GLYPH_HEIGHT + 2;

/// A 5x7 bitmap font covering A-Z, 0-9 and common punctuation.
///
/// Lowercase letters render as uppercase; characters without a glyph are
/// skipped but still advance. Text is scaled by whole pixels to fill at
/// most `width_fill` of the mask width and `height_fill` of its height.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BitmapFont {
    pub width_fill: f32,
    pub height_fill: f32,
}

impl Default for BitmapFont {
    fn default() -> Self {
        Self {
            width_fill: 0.8,
            height_fill: 0.3,
        }
    }
}

impl BitmapFont {
    /// Pixel scale for a block of `columns` by `rows` characters.
    fn scale(&self, columns: u32, rows: u32, size: UVec2) -> u32 {
        let text_w = (columns * ADVANCE).saturating_sub(1).max(1) as f32;
        let text_h = (rows * LINE_ADVANCE).saturating_sub(2).max(1) as f32;
        let by_width = self.width_fill * size.x as f32 / text_w;
        let by_height = self.height_fill * size.y as f32 / text_h;
        (by_width.min(by_height).floor() as u32).max(1)
    }
}

impl TextRasterizer for BitmapFont {
    fn rasterize(&self, text: &str, size: UVec2) -> Result<GlyphMask, MaskError> {
        let lines: Vec<Vec<char>> = text.lines().map(|l| l.chars().collect()).collect();
        let drawable = lines.iter().flatten().any(|&c| glyph_rows(c).is_some_and(|rows| rows != [0; 7]));
        if !drawable {
            return Err(MaskError::EmptyText(text.to_owned()));
        }

        let columns = lines.iter().map(Vec::len).max().unwrap_or(0) as u32;
        let rows = lines.len() as u32;
        let scale = self.scale(columns, rows, size);

        let block_h = ((rows * LINE_ADVANCE).saturating_sub(2) * scale) as i64;
        let top = (size.y as i64 - block_h) / 2;

        let mut mask = GlyphMask::new(size.x, size.y);
        for (line_index, line) in lines.iter().enumerate() {
            let line_w = ((line.len() as u32 * ADVANCE).saturating_sub(1) * scale) as i64;
            let left = (size.x as i64 - line_w) / 2;
            let y = top + (line_index as u32 * LINE_ADVANCE * scale) as i64;

            for (i, &c) in line.iter().enumerate() {
                let Some(bits) = glyph_rows(c) else {
                    continue;
                };
                let x = left + (i as u32 * ADVANCE * scale) as i64;
                for (row, bits) in bits.iter().enumerate() {
                    for col in 0..GLYPH_WIDTH {
                        if bits & (1 << (GLYPH_WIDTH - 1 - col)) != 0 {
                            mask.fill_rect(
                                x + (col * scale) as i64,
                                y + (row as u32 * scale) as i64,
                                scale,
                                scale,
                                255,
                            );
                        }
                    }
                }
            }
        }
        Ok(mask)
    }
}

/// Bit rows of a glyph, top first; bit 4 is the leftmost column.
fn glyph_rows(c: char) -> Option<[u8; 7]> {
    let rows = match c.to_ascii_uppercase() {
        'A' => [0x0E, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
        'B' => [0x1E, 0x11, 0x11, 0x1E, 0x11, 0x11, 0x1E],
        'C' => [0x0E, 0x11, 0x10, 0x10, 0x10, 0x11, 0x0E],
        'D' => [0x1E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x1E],
        'E' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x1F],
        'F' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x10],
        'G' => [0x0E, 0x11, 0x10, 0x17, 0x11, 0x11, 0x0F],
        'H' => [0x11, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
        'I' => [0x0E, 0x04, 0x04, 0x04, 0x04, 0x04, 0x0E],
        'J' => [0x07, 0x02, 0x02, 0x02, 0x02, 0x12, 0x0C],
        'K' => [0x11, 0x12, 0x14, 0x18, 0x14, 0x12, 0x11],
        'L' => [0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x1F],
        'M' => [0x11, 0x1B, 0x15, 0x15, 0x11, 0x11, 0x11],
        'N' => [0x11, 0x11, 0x19, 0x15, 0x13, 0x11, 0x11],
        'O' => [0x0E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
        'P' => [0x1E, 0x11, 0x11, 0x1E, 0x10, 0x10, 0x10],
        'Q' => [0x0E, 0x11, 0x11, 0x11, 0x15, 0x12, 0x0D],
        'R' => [0x1E, 0x11, 0x11, 0x1E, 0x14, 0x12, 0x11],
        'S' => [0x0F, 0x10, 0x10, 0x0E, 0x01, 0x01, 0x1E],
        'T' => [0x1F, 0x04, 0x04, 0x04, 0x04, 0x04, 0x04],
        'U' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
        'V' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x0A, 0x04],
        'W' => [0x11, 0x11, 0x11, 0x15, 0x15, 0x15, 0x0A],
        'X' => [0x11, 0x11, 0x0A, 0x04, 0x0A, 0x11, 0x11],
        'Y' => [0x11, 0x11, 0x11, 0x0A, 0x04, 0x04, 0x04],
        'Z' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x10, 0x1F],
        '0' => [0x0E, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0E],
        '1' => [0x04, 0x0C, 0x04, 0x04, 0x04, 0x04, 0x0E],
        '2' => [0x0E, 0x11, 0x01, 0x02, 0x04, 0x08, 0x1F],
        '3' => [0x1F, 0x02, 0x04, 0x02, 0x01, 0x11, 0x0E],
        '4' => [0x02, 0x06, 0x0A, 0x12, 0x1F, 0x02, 0x02],
        '5' => [0x1F, 0x10, 0x1E, 0x01, 0x01, 0x11, 0x0E],
        '6' => [0x06, 0x08, 0x10, 0x1E, 0x11, 0x11, 0x0E],
        '7' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08],
        '8' => [0x0E, 0x11, 0x11, 0x0E, 0x11, 0x11, 0x0E],
        '9' => [0x0E, 0x11, 0x11, 0x0F, 0x01, 0x02, 0x0C],
        ' ' => [0; 7],
        '!' => [0x04, 0x04, 0x04, 0x04, 0x04, 0x00, 0x04],
        '?' => [0x0E, 0x11, 0x01, 0x02, 0x04, 0x00, 0x04],
        '.' => [0x00, 0x00, 0x00, 0x00, 0x00, 0x0C, 0x0C],
        ',' => [0x00, 0x00, 0x00, 0x00, 0x0C, 0x04, 0x08],
        '-' => [0x00, 0x00, 0x00, 0x1F, 0x00, 0x00, 0x00],
        '\'' => [0x04, 0x04, 0x08, 0x00, 0x00, 0x00, 0x00],
        ':' => [0x00, 0x0C, 0x0C, 0x00, 0x0C, 0x0C, 0x00],
        '*' => [0x00, 0x04, 0x15, 0x0E, 0x15, 0x04, 0x00],
        _ => return None,
    };
    Some(rows)
}
