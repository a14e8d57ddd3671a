//! Frame command recording for the GPU renderer.
//!
//! [`DrawList`] implements [`Surface`] by turning every call into GPU
//! instance data:
//!
//! - strokes become one capsule per segment;
//! - discs are capsules of zero length;
//! - a fade is a disc covering the whole frame;
//! - point clouds become point sprites that reference a batch uniform
//!   carrying the view-projection and style.
//!
//! Calls are grouped into layers so the renderer can replay them in order,
//! switching pipelines only when the primitive kind changes.

use std::ops::Range;

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, UVec2, Vec2, Vec3};

use crate::surface::{Paint, PointCloud, PointStyle, Stroke, Surface};

/// Point-cloud submissions per frame. Must match `MAX_POINT_BATCHES` in the
/// scene shader.
pub const MAX_POINT_BATCHES: usize = 8;

/// An anti-aliased capsule from `a` to `b` in pixel coordinates.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct ShapeInstance {
    pub a: [f32; 2],
    pub b: [f32; 2],
    /// RGB plus global alpha.
    pub color: [f32; 4],
    /// Half width of the capsule.
    pub radius: f32,
}

impl ShapeInstance {
    pub const ATTRIBS: [wgpu::VertexAttribute; 4] =
        wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x2, 2 => Float32x4, 3 => Float32];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBS,
        }
    }
}

/// One world-space point sprite.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct PointInstance {
    pub position: [f32; 3],
    pub color: [f32; 3],
    /// Index into the frame's point batches.
    pub batch: u32,
}

impl PointInstance {
    pub const ATTRIBS: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![4 => Float32x3, 5 => Float32x3, 6 => Uint32];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBS,
        }
    }
}

/// Per-submission uniform for a point cloud.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct PointBatch {
    pub view_proj: [[f32; 4]; 4],
    /// Opacity in `w`; RGB is unused since instances carry their color.
    pub color: [f32; 4],
    /// `x` = point size in world units.
    pub params: [f32; 4],
}

/// Frame-wide uniform block shared by both scene pipelines.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct SceneUniforms {
    /// Frame size in pixels in `xy`.
    pub screen: [f32; 4],
    pub batches: [PointBatch; MAX_POINT_BATCHES],
}

/// A run of consecutive instances of one kind.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Layer {
    Shapes(Range<u32>),
    Points(Range<u32>),
}

/// Recorded draw calls for one frame.
#[derive(Debug)]
pub struct DrawList {
    size: UVec2,
    shapes: Vec<ShapeInstance>,
    points: Vec<PointInstance>,
    batches: Vec<PointBatch>,
    layers: Vec<Layer>,
    dropped_batches: usize,
}

impl DrawList {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: UVec2::new(width.max(1), height.max(1)),
            shapes: Vec::new(),
            points: Vec::new(),
            batches: Vec::new(),
            layers: Vec::new(),
            dropped_batches: 0,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.size = UVec2::new(width.max(1), height.max(1));
    }

    /// Forget everything recorded, keeping allocations.
    pub fn reset(&mut self) {
        self.shapes.clear();
        self.points.clear();
        self.batches.clear();
        self.layers.clear();
        self.dropped_batches = 0;
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn shapes(&self) -> &[ShapeInstance] {
        &self.shapes
    }

    pub fn points(&self) -> &[PointInstance] {
        &self.points
    }

    pub fn batches(&self) -> &[PointBatch] {
        &self.batches
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Point-cloud submissions skipped this frame for lack of batch slots.
    pub fn dropped_batches(&self) -> usize {
        self.dropped_batches
    }

    /// The uniform block for this frame; unused batch slots are zeroed.
    pub fn uniforms(&self) -> SceneUniforms {
        let mut uniforms = SceneUniforms::zeroed();
        uniforms.screen = [self.size.x as f32, self.size.y as f32, 0.0, 0.0];
        uniforms.batches[..self.batches.len()].copy_from_slice(&self.batches);
        uniforms
    }

    fn push_shape(&mut self, shape: ShapeInstance) {
        let index = self.shapes.len() as u32;
        self.shapes.push(shape);
        match self.layers.last_mut() {
            Some(Layer::Shapes(range)) if range.end == index => range.end += 1,
            _ => self.layers.push(Layer::Shapes(index..index + 1)),
        }
    }
}

impl Surface for DrawList {
    fn size(&self) -> UVec2 {
        self.size
    }

    fn fade(&mut self, color: Vec3, alpha: f32) {
        let size = self.size.as_vec2();
        let center = size * 0.5;
        self.push_shape(ShapeInstance {
            a: center.to_array(),
            b: center.to_array(),
            color: color.extend(alpha.clamp(0.0, 1.0)).to_array(),
            radius: size.length(),
        });
    }

    fn stroke(&mut self, path: &[Vec2], stroke: Stroke) {
        if path.len() < 2 || stroke.alpha <= 0.0 {
            return;
        }
        let color = stroke.color.extend(stroke.alpha).to_array();
        let radius = stroke.width.max(0.5) * 0.5;
        for segment in path.windows(2) {
            self.push_shape(ShapeInstance {
                a: segment[0].to_array(),
                b: segment[1].to_array(),
                color,
                radius,
            });
        }
    }

    fn fill_disc(&mut self, center: Vec2, radius: f32, paint: Paint) {
        if radius <= 0.0 || paint.alpha <= 0.0 {
            return;
        }
        self.push_shape(ShapeInstance {
            a: center.to_array(),
            b: center.to_array(),
            color: paint.color.extend(paint.alpha).to_array(),
            radius,
        });
    }

    fn draw_points(&mut self, cloud: &mut PointCloud, view_proj: Mat4, style: PointStyle) {
        cloud.take_upload();
        if cloud.is_empty() {
            return;
        }
        if self.batches.len() == MAX_POINT_BATCHES {
            if self.dropped_batches == 0 {
                log::warn!("more than {MAX_POINT_BATCHES} point clouds in one frame, extra clouds skipped");
            }
            self.dropped_batches += 1;
            return;
        }

        let batch = self.batches.len() as u32;
        self.batches.push(PointBatch {
            view_proj: view_proj.to_cols_array_2d(),
            color: style.color.extend(style.opacity).to_array(),
            params: [style.size, 0.0, 0.0, 0.0],
        });

        let start = self.points.len() as u32;
        self.points.extend(cloud.points().enumerate().map(|(i, p)| PointInstance {
            position: p.to_array(),
            color: cloud.color(i).unwrap_or(style.color).to_array(),
            batch,
        }));
        let end = self.points.len() as u32;

        match self.layers.last_mut() {
            Some(Layer::Points(range)) if range.end == start => range.end = end,
            _ => self.layers.push(Layer::Points(start..end)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STYLE: PointStyle = PointStyle {
        color: Vec3::new(1.0, 0.6, 0.2),
        size: 0.2,
        opacity: 0.9,
    };

    #[test]
    fn test_uniform_layout_matches_shader() {
        assert_eq!(std::mem::size_of::<ShapeInstance>(), 36);
        assert_eq!(std::mem::size_of::<PointInstance>(), 28);
        assert_eq!(std::mem::size_of::<PointBatch>(), 96);
        assert_eq!(std::mem::size_of::<SceneUniforms>(), 16 + 96 * MAX_POINT_BATCHES);
    }

    #[test]
    fn test_fade_covers_the_frame() {
        let mut list = DrawList::new(300, 400);
        list.fade(Vec3::ZERO, 0.1);

        let shape = list.shapes()[0];
        assert_eq!(shape.a, [150.0, 200.0]);
        assert_eq!(shape.a, shape.b);
        assert_eq!(shape.color, [0.0, 0.0, 0.0, 0.1]);
        // The half-diagonal is 250, so every pixel is inside.
        assert_eq!(shape.radius, 500.0);
    }

    #[test]
    fn test_stroke_emits_one_capsule_per_segment() {
        let mut list = DrawList::new(100, 100);
        let path = [Vec2::ZERO, Vec2::new(10.0, 0.0), Vec2::new(10.0, 10.0)];
        list.stroke(
            &path,
            Stroke {
                color: Vec3::ONE,
                width: 3.0,
                alpha: 0.5,
            },
        );

        assert_eq!(list.shapes().len(), 2);
        assert_eq!(list.shapes()[1].a, [10.0, 0.0]);
        assert_eq!(list.shapes()[1].b, [10.0, 10.0]);
        assert_eq!(list.shapes()[0].radius, 1.5);
        assert_eq!(list.shapes()[0].color[3], 0.5);
        assert_eq!(list.layers(), &[Layer::Shapes(0..2)]);
    }

    #[test]
    fn test_degenerate_calls_record_nothing() {
        let mut list = DrawList::new(100, 100);
        let stroke = Stroke {
            color: Vec3::ONE,
            width: 1.0,
            alpha: 1.0,
        };
        list.stroke(&[Vec2::ONE], stroke);
        list.stroke(&[Vec2::ZERO, Vec2::ONE], Stroke { alpha: 0.0, ..stroke });
        list.fill_disc(Vec2::ONE, 0.0, Paint { color: Vec3::ONE, alpha: 1.0 });
        list.draw_points(&mut PointCloud::new(0), Mat4::IDENTITY, STYLE);
        assert!(list.is_empty());
    }

    #[test]
    fn test_layers_follow_call_order() {
        let mut list = DrawList::new(64, 64);
        let mut cloud = PointCloud::new(3);
        let paint = Paint {
            color: Vec3::ONE,
            alpha: 1.0,
        };

        list.clear(Vec3::ZERO);
        list.fill_disc(Vec2::splat(8.0), 2.0, paint);
        list.draw_points(&mut cloud, Mat4::IDENTITY, STYLE);
        list.draw_points(&mut cloud, Mat4::IDENTITY, STYLE);
        list.fill_disc(Vec2::splat(8.0), 2.0, paint);

        assert_eq!(
            list.layers(),
            &[Layer::Shapes(0..2), Layer::Points(0..6), Layer::Shapes(2..3)]
        );
        assert_eq!(list.batches().len(), 2);
        assert_eq!(list.points()[4].batch, 1);
    }

    #[test]
    fn test_points_carry_cloud_colors_and_batch_style() {
        let mut list = DrawList::new(64, 64);
        let mut cloud = PointCloud::new(2).with_colors(&[Vec3::X, Vec3::Y]);
        cloud.set(1, Vec3::new(1.0, 2.0, 3.0));
        cloud.mark_dirty();
        let view_proj = Mat4::from_scale(Vec3::splat(2.0));

        list.draw_points(&mut cloud, view_proj, STYLE);

        assert!(!cloud.needs_upload());
        assert_eq!(list.points()[1].position, [1.0, 2.0, 3.0]);
        assert_eq!(list.points()[1].color, [0.0, 1.0, 0.0]);
        let batch = list.batches()[0];
        assert_eq!(batch.view_proj, view_proj.to_cols_array_2d());
        assert_eq!(batch.color[3], 0.9);
        assert_eq!(batch.params[0], 0.2);
    }

    #[test]
    fn test_plain_cloud_uses_style_color() {
        let mut list = DrawList::new(64, 64);
        list.draw_points(&mut PointCloud::new(1), Mat4::IDENTITY, STYLE);
        assert_eq!(list.points()[0].color, STYLE.color.to_array());
    }

    #[test]
    fn test_extra_batches_are_skipped() {
        let mut list = DrawList::new(64, 64);
        let mut cloud = PointCloud::new(1);
        for _ in 0..MAX_POINT_BATCHES + 2 {
            list.draw_points(&mut cloud, Mat4::IDENTITY, STYLE);
        }
        assert_eq!(list.batches().len(), MAX_POINT_BATCHES);
        assert_eq!(list.points().len(), MAX_POINT_BATCHES);
        assert_eq!(list.dropped_batches(), 2);

        let uniforms = list.uniforms();
        assert_eq!(uniforms.screen, [64.0, 64.0, 0.0, 0.0]);
        assert_eq!(uniforms.batches[MAX_POINT_BATCHES - 1].params[0], 0.2);
    }

    #[test]
    fn test_reset_empties_the_frame() {
        let mut list = DrawList::new(64, 64);
        list.fade(Vec3::ZERO, 0.5);
        list.draw_points(&mut PointCloud::new(4), Mat4::IDENTITY, STYLE);
        list.reset();
        assert!(list.is_empty());
        assert!(list.shapes().is_empty() && list.points().is_empty() && list.batches().is_empty());
    }
}
