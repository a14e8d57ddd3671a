//! Instanced rendering of a [`DrawList`] into the accumulation target.
//!
//! Shapes (capsules, discs, fades) are drawn as screen-space quads with
//! analytic coverage and alpha blending. Point clouds are billboarded in
//! clip space from their batch's view-projection and blended additively.

use super::draw_list::{DrawList, Layer, PointInstance, ShapeInstance, MAX_POINT_BATCHES};

/// WGSL source of both scene pipelines.
///
/// The batch array length is `MAX_POINT_BATCHES`.
pub const SCENE_WGSL: &str = r#"
struct PointBatch {
    view_proj: mat4x4<f32>,
    color: vec4<f32>,
    params: vec4<f32>,
};

struct SceneUniforms {
    screen: vec4<f32>,
    batches: array<PointBatch, 8>,
};

@group(0) @binding(0)
var<uniform> scene: SceneUniforms;

fn pixel_to_clip(pixel: vec2<f32>) -> vec4<f32> {
    let ndc = vec2<f32>(pixel.x / scene.screen.x * 2.0 - 1.0, 1.0 - pixel.y / scene.screen.y * 2.0);
    return vec4<f32>(ndc, 0.0, 1.0);
}

// ---------------------------------------------------------------------------
// Shapes
// ---------------------------------------------------------------------------

struct ShapeInput {
    @location(0) a: vec2<f32>,
    @location(1) b: vec2<f32>,
    @location(2) color: vec4<f32>,
    @location(3) radius: f32,
};

struct ShapeOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) pixel: vec2<f32>,
    @location(1) @interpolate(flat) a: vec2<f32>,
    @location(2) @interpolate(flat) b: vec2<f32>,
    @location(3) @interpolate(flat) color: vec4<f32>,
    @location(4) @interpolate(flat) radius: f32,
};

@vertex
fn vs_shape(@builtin(vertex_index) vertex_index: u32, shape: ShapeInput) -> ShapeOutput {
    var corners = array<vec2<f32>, 6>(
        vec2<f32>(0.0, 0.0),
        vec2<f32>(1.0, 0.0),
        vec2<f32>(0.0, 1.0),
        vec2<f32>(0.0, 1.0),
        vec2<f32>(1.0, 0.0),
        vec2<f32>(1.0, 1.0),
    );

    // Bounding box of the capsule plus one pixel of antialiasing.
    let pad = vec2<f32>(shape.radius + 1.0);
    let lo = min(shape.a, shape.b) - pad;
    let hi = max(shape.a, shape.b) + pad;
    let pixel = mix(lo, hi, corners[vertex_index]);

    var out: ShapeOutput;
    out.clip_position = pixel_to_clip(pixel);
    out.pixel = pixel;
    out.a = shape.a;
    out.b = shape.b;
    out.color = shape.color;
    out.radius = shape.radius;
    return out;
}

@fragment
fn fs_shape(in: ShapeOutput) -> @location(0) vec4<f32> {
    let ab = in.b - in.a;
    let len_sq = dot(ab, ab);
    var t = 0.0;
    if len_sq > 1e-6 {
        t = clamp(dot(in.pixel - in.a, ab) / len_sq, 0.0, 1.0);
    }
    let d = distance(in.pixel, in.a + ab * t);
    let coverage = clamp(in.radius + 0.5 - d, 0.0, 1.0);
    if coverage <= 0.0 {
        discard;
    }
    return vec4<f32>(in.color.rgb, in.color.a * coverage);
}

// ---------------------------------------------------------------------------
// Points
// ---------------------------------------------------------------------------

struct PointInput {
    @location(4) position: vec3<f32>,
    @location(5) color: vec3<f32>,
    @location(6) batch: u32,
};

struct PointOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) offset: vec2<f32>,
    @location(1) @interpolate(flat) color: vec3<f32>,
    @location(2) @interpolate(flat) radius: f32,
};

@vertex
fn vs_point(@builtin(vertex_index) vertex_index: u32, point: PointInput) -> PointOutput {
    var corners = array<vec2<f32>, 6>(
        vec2<f32>(-1.0, -1.0),
        vec2<f32>( 1.0, -1.0),
        vec2<f32>(-1.0,  1.0),
        vec2<f32>(-1.0,  1.0),
        vec2<f32>( 1.0, -1.0),
        vec2<f32>( 1.0,  1.0),
    );

    let batch = scene.batches[min(point.batch, 7u)];
    let clip = batch.view_proj * vec4<f32>(point.position, 1.0);

    var out: PointOutput;
    if clip.w <= 1e-4 {
        // Behind the camera: push outside the depth range.
        out.clip_position = vec4<f32>(0.0, 0.0, -1.0, 1.0);
        out.offset = vec2<f32>(0.0);
        out.color = vec3<f32>(0.0);
        out.radius = 0.0;
        return out;
    }

    // Depth-attenuated radius in pixels.
    let radius = batch.params.x * scene.screen.y * 0.25 / clip.w;
    // Sub-pixel points trade size for brightness.
    let brightness = select(1.0, min(3.14159265 * radius * radius, 1.0), radius < 0.75);
    let drawn = max(radius, 0.5);
    let extent = drawn + 1.0;

    let corner = corners[vertex_index];
    let offset_ndc = corner * extent * 2.0 / scene.screen.xy;
    out.clip_position = vec4<f32>(clip.xy + offset_ndc * clip.w, clip.z, clip.w);
    out.offset = corner * extent;
    out.color = point.color * batch.color.w * brightness;
    out.radius = drawn;
    return out;
}

@fragment
fn fs_point(in: PointOutput) -> @location(0) vec4<f32> {
    let coverage = clamp(in.radius + 0.5 - length(in.offset), 0.0, 1.0);
    if coverage <= 0.0 {
        discard;
    }
    return vec4<f32>(in.color * coverage, 0.0);
}
"#;

/// Initial instance capacity of each buffer.
const INITIAL_CAPACITY: usize = 4096;

const ADDITIVE: wgpu::BlendState = wgpu::BlendState {
    color: wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::One,
        dst_factor: wgpu::BlendFactor::One,
        operation: wgpu::BlendOperation::Add,
    },
    alpha: wgpu::BlendComponent::OVER,
};

/// GPU resources for replaying a [`DrawList`].
pub struct ScenePass {
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    shape_pipeline: wgpu::RenderPipeline,
    point_pipeline: wgpu::RenderPipeline,
    shape_buffer: wgpu::Buffer,
    shape_capacity: usize,
    point_buffer: wgpu::Buffer,
    point_capacity: usize,
}

impl ScenePass {
    pub fn new(device: &wgpu::Device, target_format: wgpu::TextureFormat) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Scene Shader"),
            source: wgpu::ShaderSource::Wgsl(SCENE_WGSL.into()),
        });

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Scene Uniform Buffer"),
            size: std::mem::size_of::<super::draw_list::SceneUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Scene Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Scene Bind Group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Scene Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let shape_pipeline = create_pipeline(
            device,
            &pipeline_layout,
            &shader,
            ("vs_shape", "fs_shape"),
            ShapeInstance::layout(),
            wgpu::BlendState::ALPHA_BLENDING,
            target_format,
        );
        let point_pipeline = create_pipeline(
            device,
            &pipeline_layout,
            &shader,
            ("vs_point", "fs_point"),
            PointInstance::layout(),
            ADDITIVE,
            target_format,
        );

        Self {
            uniform_buffer,
            bind_group,
            shape_pipeline,
            point_pipeline,
            shape_buffer: create_instance_buffer::<ShapeInstance>(device, "Shape Instance Buffer", INITIAL_CAPACITY),
            shape_capacity: INITIAL_CAPACITY,
            point_buffer: create_instance_buffer::<PointInstance>(device, "Point Instance Buffer", INITIAL_CAPACITY),
            point_capacity: INITIAL_CAPACITY,
        }
    }

    /// Upload the list's uniforms and instances, growing buffers as needed.
    pub fn prepare(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, list: &DrawList) {
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&list.uniforms()));

        if list.shapes().len() > self.shape_capacity {
            self.shape_capacity = list.shapes().len().next_power_of_two();
            self.shape_buffer =
                create_instance_buffer::<ShapeInstance>(device, "Shape Instance Buffer", self.shape_capacity);
        }
        if !list.shapes().is_empty() {
            queue.write_buffer(&self.shape_buffer, 0, bytemuck::cast_slice(list.shapes()));
        }

        if list.points().len() > self.point_capacity {
            self.point_capacity = list.points().len().next_power_of_two();
            log::debug!("point instance buffer grown to {}", self.point_capacity);
            self.point_buffer =
                create_instance_buffer::<PointInstance>(device, "Point Instance Buffer", self.point_capacity);
        }
        if !list.points().is_empty() {
            queue.write_buffer(&self.point_buffer, 0, bytemuck::cast_slice(list.points()));
        }
    }

    /// Replay the list's layers in order. Call after [`prepare`](Self::prepare).
    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>, list: &DrawList) {
        pass.set_bind_group(0, &self.bind_group, &[]);
        for layer in list.layers() {
            let (pipeline, buffer, stride, range) = match layer {
                Layer::Shapes(range) => (
                    &self.shape_pipeline,
                    &self.shape_buffer,
                    std::mem::size_of::<ShapeInstance>(),
                    range,
                ),
                Layer::Points(range) => (
                    &self.point_pipeline,
                    &self.point_buffer,
                    std::mem::size_of::<PointInstance>(),
                    range,
                ),
            };
            if range.is_empty() {
                continue;
            }
            let start = range.start as u64 * stride as u64;
            let end = range.end as u64 * stride as u64;
            pass.set_pipeline(pipeline);
            pass.set_vertex_buffer(0, buffer.slice(start..end));
            pass.draw(0..6, 0..range.len() as u32);
        }
    }
}

fn create_instance_buffer<T>(device: &wgpu::Device, label: &str, capacity: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size: (capacity * std::mem::size_of::<T>()) as u64,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn create_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    (vs, fs): (&str, &str),
    instances: wgpu::VertexBufferLayout<'static>,
    blend: wgpu::BlendState,
    target_format: wgpu::TextureFormat,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(vs),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some(vs),
            buffers: &[instances],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some(fs),
            targets: &[Some(wgpu::ColorTargetState {
                format: target_format,
                blend: Some(blend),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            cull_mode: None,
            ..Default::default()
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}
