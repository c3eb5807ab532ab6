//! softpipe: a CPU triangle pipeline with a shader-style programming model
//!
//! User vertex and fragment shaders drive a software rasterizer with depth
//! testing and varying interpolation. Frames are grids of 16-level intensity
//! (palette index) pixels; displaying them is up to the host.
//!
//! A frame is `Renderer::clear` followed by one or more `Renderer::render`
//! calls, then reading `Renderer::framebuffer`.

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod rasterizer;
pub mod world;
pub mod config;
pub mod io;
pub mod logging;

pub use rasterizer::{
    FragmentShader, Mat4, RenderStats, Renderer, Uniforms, Value, Vec3, Vec4, VertexAttributes,
    VertexOutput, VertexShader,
};
pub use world::Geometry;
