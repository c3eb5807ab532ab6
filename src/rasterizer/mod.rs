//! Software triangle pipeline with programmable shading
//!
//! Features:
//! - Pluggable vertex and fragment shaders (closures, fns or trait objects)
//! - Perspective divide with a w ~ 0 guard, no clipping
//! - Bounding-box barycentric rasterization, inclusive edges
//! - Z-buffer, strictly-nearer wins, shared across draw calls until cleared
//! - Affine (screen-space) varying interpolation
//! - 16-level intensity framebuffer

mod math;
mod types;
mod shader;
mod render;
pub mod present;

pub use math::*;
pub use types::*;
pub use shader::*;
pub use render::*;

/// Default screen dimensions
pub const WIDTH: usize = 320;
pub const HEIGHT: usize = 240;

/// Brightest palette index
pub const MAX_INTENSITY: u8 = 15;

/// Number of palette entries
pub const PALETTE_LEVELS: usize = MAX_INTENSITY as usize + 1;
