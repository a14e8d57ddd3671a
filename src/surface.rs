//! The drawing surface seen by scenes and entities.
//!
//! Scenes issue 2D primitives (strokes, discs, a translucent fade) and
//! point-cloud submissions through the [`Surface`] trait. The window host
//! records them into a [`DrawList`] for the GPU; [`Canvas`] rasterizes them
//! in software for frame recording. Tests use recording doubles.
//!
//! [`Canvas`]: crate::Canvas
//! [`DrawList`]: crate::gpu::DrawList

use glam::{Mat4, UVec2, Vec2, Vec3};

/// Line stroke parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stroke {
    pub color: Vec3,
    /// Line width in pixels.
    pub width: f32,
    /// Global alpha applied to the whole stroke.
    pub alpha: f32,
}

/// Fill parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Paint {
    pub color: Vec3,
    pub alpha: f32,
}

/// Point-cloud appearance.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointStyle {
    /// Color used when the cloud carries no per-point colors.
    pub color: Vec3,
    /// Point size in world units, attenuated by depth.
    pub size: f32,
    /// Multiplier on the additive contribution of each point.
    pub opacity: f32,
}

/// A drawing surface.
pub trait Surface {
    /// Surface size in pixels.
    fn size(&self) -> UVec2;

    /// Paint `color` at `alpha` over the whole surface.
    ///
    /// With a low alpha this leaves fading trails instead of erasing.
    fn fade(&mut self, color: Vec3, alpha: f32);

    /// Erase the surface to `color`.
    fn clear(&mut self, color: Vec3) {
        self.fade(color, 1.0);
    }

    /// Stroke a polyline. Paths with fewer than two points draw nothing.
    fn stroke(&mut self, path: &[Vec2], stroke: Stroke);

    /// Fill a disc.
    fn fill_disc(&mut self, center: Vec2, radius: f32, paint: Paint);

    /// Consume a point cloud, projecting it with `view_proj`.
    ///
    /// Implementations clear the cloud's upload flag once they have read it.
    fn draw_points(&mut self, cloud: &mut PointCloud, view_proj: Mat4, style: PointStyle);
}

/// A fixed-size point buffer handed to the renderer every tick.
///
/// Positions are stored interleaved (`x, y, z, x, y, z, ...`), optionally
/// with interleaved per-point RGB colors.
#[derive(Clone, Debug, Default)]
pub struct PointCloud {
    positions: Vec<f32>,
    colors: Vec<f32>,
    needs_upload: bool,
}

impl PointCloud {
    /// A cloud of `len` points at the origin.
    pub fn new(len: usize) -> Self {
        Self {
            positions: vec![0.0; len * 3],
            colors: Vec::new(),
            needs_upload: true,
        }
    }

    /// Attach per-point colors. `colors` must have one entry per point.
    pub fn with_colors(mut self, colors: &[Vec3]) -> Self {
        debug_assert_eq!(colors.len(), self.len());
        self.colors = colors.iter().flat_map(|c| c.to_array()).collect();
        self
    }

    pub fn len(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Overwrite the position of point `index`.
    #[inline]
    pub fn set(&mut self, index: usize, position: Vec3) {
        let i = index * 3;
        self.positions[i..i + 3].copy_from_slice(&position.to_array());
    }

    #[inline]
    pub fn get(&self, index: usize) -> Vec3 {
        Vec3::from_slice(&self.positions[index * 3..index * 3 + 3])
    }

    /// Raw interleaved coordinates.
    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    /// Raw coordinates as bytes, ready for a GPU vertex buffer.
    pub fn position_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.positions)
    }

    /// Per-point color, if the cloud carries colors.
    #[inline]
    pub fn color(&self, index: usize) -> Option<Vec3> {
        self.colors
            .get(index * 3..index * 3 + 3)
            .map(Vec3::from_slice)
    }

    /// Iterate over all positions.
    pub fn points(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.positions.chunks_exact(3).map(Vec3::from_slice)
    }

    /// Flag the buffer as changed since the renderer last read it.
    pub fn mark_dirty(&mut self) {
        self.needs_upload = true;
    }

    pub fn needs_upload(&self) -> bool {
        self.needs_upload
    }

    /// Clear the upload flag, returning whether it was set.
    pub fn take_upload(&mut self) -> bool {
        std::mem::replace(&mut self.needs_upload, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_cloud_interleaving() {
        let mut cloud = PointCloud::new(2);
        cloud.set(1, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(cloud.positions(), &[0.0, 0.0, 0.0, 1.0, 2.0, 3.0]);
        assert_eq!(cloud.get(1), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(cloud.position_bytes().len(), 24);
        assert_eq!(cloud.points().count(), 2);
    }

    #[test]
    fn test_upload_flag() {
        let mut cloud = PointCloud::new(1);
        assert!(cloud.take_upload());
        assert!(!cloud.needs_upload());
        cloud.mark_dirty();
        assert!(cloud.take_upload());
    }

    #[test]
    fn test_colors_are_optional() {
        let cloud = PointCloud::new(2);
        assert_eq!(cloud.color(0), None);

        let cloud = PointCloud::new(2).with_colors(&[Vec3::X, Vec3::Z]);
        assert_eq!(cloud.color(1), Some(Vec3::Z));
    }
}
