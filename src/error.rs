//! Error types for emberglow.
//!
//! The simulation itself never fails. Errors come from the layers around it:
//! configuration files, glyph images, GPU setup, the window host and frame
//! recording.

use thiserror::Error;

/// Errors that can occur while loading or saving a [`Config`](crate::Config).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read or write the config file.
    #[error("failed to access config file: {0}")]
    Io(#[from] std::io::Error),
    /// The file is not valid config JSON.
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors that can occur while building a [`GlyphMask`](crate::GlyphMask).
#[derive(Debug, Error)]
pub enum MaskError {
    /// Failed to decode the mask image.
    #[error("failed to load mask image: {0}")]
    Image(#[from] image::ImageError),
    /// Failed to read the mask file from disk.
    #[error("failed to read mask file: {0}")]
    Io(#[from] std::io::Error),
    /// The text has no glyphs the rasterizer can draw.
    #[error("text {0:?} has no drawable glyphs")]
    EmptyText(String),
}

/// Errors that can occur during GPU initialization.
#[derive(Debug, Error)]
pub enum GpuError {
    /// Failed to create a surface for rendering.
    #[error("failed to create GPU surface: {0}")]
    SurfaceCreation(#[from] wgpu::CreateSurfaceError),
    /// No compatible GPU adapter found.
    #[error("no compatible GPU adapter found; ensure your system supports WebGPU/Vulkan/Metal/DX12")]
    NoAdapter,
    /// Failed to create GPU device.
    #[error("failed to create GPU device: {0}")]
    DeviceCreation(#[from] wgpu::RequestDeviceError),
}

/// Errors that can occur while recording frames to disk.
#[derive(Debug, Error)]
pub enum RecordError {
    /// Failed to create the output directory.
    #[error("failed to prepare output directory: {0}")]
    Io(#[from] std::io::Error),
    /// Failed to encode a frame.
    #[error("failed to write frame: {0}")]
    Image(#[from] image::ImageError),
}

/// Errors that can occur when running a scene in a window.
#[derive(Debug, Error)]
pub enum RunError {
    /// Failed to create event loop.
    #[error("failed to create event loop: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    /// Failed to create window.
    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),
    /// GPU initialization failed.
    #[error("GPU error: {0}")]
    Gpu(#[from] GpuError),
}
