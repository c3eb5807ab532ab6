//! Core rendering functions
//! Vertex shading, perspective divide, triangle rasterization and depth testing

use super::math::{barycentric, Vec3, Vec4, DEGENERATE_AREA};
use super::shader::{FragmentShader, VertexShader};
use super::types::{Bag, Uniforms, VertexOutput};
use super::MAX_INTENSITY;
use crate::world::Geometry;

/// Clip-space `w` closer to zero than this skips the perspective divide
pub const W_EPSILON: f32 = 1e-4;

/// Intensity and depth buffers for software rendering
pub struct Framebuffer {
    pub pixels: Vec<u8>,    // Palette index 0..=15, 1 byte per pixel
    pub zbuffer: Vec<f32>,  // Depth buffer, NDC z (smaller is nearer)
    pub width: usize,
    pub height: usize,
}

impl Framebuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            pixels: vec![0; width * height],
            zbuffer: vec![f32::INFINITY; width * height],
            width,
            height,
        }
    }

    pub fn clear(&mut self) {
        self.pixels.fill(0);
        self.zbuffer.fill(f32::INFINITY);
    }

    pub fn get_pixel(&self, x: usize, y: usize) -> Option<u8> {
        if x < self.width && y < self.height {
            Some(self.pixels[y * self.width + x])
        } else {
            None
        }
    }

    pub fn get_depth(&self, x: usize, y: usize) -> Option<f32> {
        if x < self.width && y < self.height {
            Some(self.zbuffer[y * self.width + x])
        } else {
            None
        }
    }

    /// Depth test at (x, y). Strictly nearer fragments win and claim the depth slot.
    pub fn test_and_set_depth(&mut self, x: usize, y: usize, z: f32) -> bool {
        if x < self.width && y < self.height {
            let idx = y * self.width + x;
            if z < self.zbuffer[idx] {
                self.zbuffer[idx] = z;
                return true;
            }
        }
        false
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, intensity: u8) {
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x] = intensity.min(MAX_INTENSITY);
        }
    }
}

/// Counters for one draw call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Triangles submitted
    pub triangles: usize,
    /// Triangles with (near) zero screen area, never covering a pixel
    pub degenerate: usize,
    /// Pixels that passed the depth test and ran the fragment shader
    pub fragments: usize,
    /// Covered pixels discarded by the depth test
    pub depth_rejected: usize,
}

/// Perspective divide, guarding against w near zero
pub fn to_ndc(clip: Vec4) -> Vec3 {
    if clip.w.abs() < W_EPSILON {
        return clip.xyz();
    }
    Vec3::new(clip.x / clip.w, clip.y / clip.w, clip.z / clip.w)
}

/// NDC to screen space: x, y floored to pixel coordinates (row 0 at the top),
/// z kept as the depth key
pub fn viewport(ndc: Vec3, width: usize, height: usize) -> Vec3 {
    Vec3 {
        x: ((ndc.x + 1.0) * 0.5 * width as f32).floor(),
        y: ((1.0 - ndc.y) * 0.5 * height as f32).floor(),
        z: ndc.z,
    }
}

/// Palette index for a fragment shader result: clamp to 0..=15, truncate. NaN maps to 0.
pub fn quantize(intensity: f32) -> u8 {
    intensity.clamp(0.0, MAX_INTENSITY as f32) as u8
}

/// Shaded triangle ready for rasterization
struct Surface {
    pub v1: Vec3, // Screen-space vertex 1 (z = depth key)
    pub v2: Vec3, // Screen-space vertex 2
    pub v3: Vec3, // Screen-space vertex 3
    pub out1: VertexOutput,
    pub out2: VertexOutput,
    pub out3: VertexOutput,
}

/// The pipeline: owns the framebuffer and depth buffer for its lifetime.
///
/// A frame is `clear()` followed by any number of `render()` calls; draws
/// accumulate and the depth test arbitrates between them.
pub struct Renderer {
    fb: Framebuffer,
}

impl Renderer {
    pub fn new(width: usize, height: usize) -> Self {
        log::debug!("renderer created: {}x{}", width, height);
        Self { fb: Framebuffer::new(width, height) }
    }

    pub fn width(&self) -> usize {
        self.fb.width
    }

    pub fn height(&self) -> usize {
        self.fb.height
    }

    /// Reset every pixel to 0 and every depth to +infinity
    pub fn clear(&mut self) {
        self.fb.clear();
    }

    /// Palette indices, row-major, row 0 at the top
    pub fn framebuffer(&self) -> &[u8] {
        &self.fb.pixels
    }

    pub fn depth_buffer(&self) -> &[f32] {
        &self.fb.zbuffer
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<u8> {
        self.fb.get_pixel(x, y)
    }

    pub fn depth(&self, x: usize, y: usize) -> Option<f32> {
        self.fb.get_depth(x, y)
    }

    /// Draw a mesh.
    ///
    /// Triangles are processed in index order. Panics if an index is out of
    /// range for the vertex buffer.
    pub fn render<V, F>(
        &mut self,
        geometry: &Geometry,
        vertex_shader: &V,
        fragment_shader: &F,
        uniforms: &Uniforms,
    ) -> RenderStats
    where
        V: VertexShader + ?Sized,
        F: FragmentShader + ?Sized,
    {
        let mut stats = RenderStats::default();

        for [i0, i1, i2] in geometry.triangles() {
            stats.triangles += 1;

            // Vertex stage, no reuse between triangles sharing a vertex
            let out1 = vertex_shader.shade(&geometry.vertices[i0], uniforms);
            let out2 = vertex_shader.shade(&geometry.vertices[i1], uniforms);
            let out3 = vertex_shader.shade(&geometry.vertices[i2], uniforms);

            let (w, h) = (self.fb.width, self.fb.height);
            let surface = Surface {
                v1: viewport(to_ndc(out1.position), w, h),
                v2: viewport(to_ndc(out2.position), w, h),
                v3: viewport(to_ndc(out3.position), w, h),
                out1,
                out2,
                out3,
            };

            if signed_area(&surface).abs() < DEGENERATE_AREA {
                log::trace!("skipping degenerate triangle ({}, {}, {})", i0, i1, i2);
                stats.degenerate += 1;
                continue;
            }

            self.rasterize_triangle(&surface, fragment_shader, uniforms, &mut stats);
        }

        log::trace!(
            "draw: {} triangles ({} degenerate), {} fragments, {} depth-rejected",
            stats.triangles,
            stats.degenerate,
            stats.fragments,
            stats.depth_rejected
        );
        stats
    }

    /// Rasterize a single triangle
    fn rasterize_triangle<F>(
        &mut self,
        surface: &Surface,
        fragment_shader: &F,
        uniforms: &Uniforms,
        stats: &mut RenderStats,
    ) where
        F: FragmentShader + ?Sized,
    {
        if self.fb.width == 0 || self.fb.height == 0 {
            return;
        }

        // Bounding box, clamped to the framebuffer
        let max_px = (self.fb.width - 1) as f32;
        let max_py = (self.fb.height - 1) as f32;
        let lo_x = surface.v1.x.min(surface.v2.x).min(surface.v3.x);
        let hi_x = surface.v1.x.max(surface.v2.x).max(surface.v3.x);
        let lo_y = surface.v1.y.min(surface.v2.y).min(surface.v3.y);
        let hi_y = surface.v1.y.max(surface.v2.y).max(surface.v3.y);

        // Entirely off-screen (or NaN positions)
        if !(hi_x >= 0.0 && lo_x <= max_px && hi_y >= 0.0 && lo_y <= max_py) {
            return;
        }

        let min_x = lo_x.max(0.0) as usize;
        let max_x = hi_x.min(max_px) as usize;
        let min_y = lo_y.max(0.0) as usize;
        let max_y = hi_y.min(max_py) as usize;

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let p = Vec3::new(x as f32 + 0.5, y as f32 + 0.5, 0.0);
                let bc = match barycentric(p, surface.v1, surface.v2, surface.v3) {
                    Some(bc) => bc,
                    None => continue,
                };

                // Inclusive edges
                if bc.x < 0.0 || bc.y < 0.0 || bc.z < 0.0 {
                    continue;
                }

                // Interpolate depth
                let z = bc.x * surface.v1.z + bc.y * surface.v2.z + bc.z * surface.v3.z;

                // Z-buffer test
                if !self.fb.test_and_set_depth(x, y, z) {
                    stats.depth_rejected += 1;
                    continue;
                }

                // Affine (screen-space) varying interpolation
                let varying = VertexOutput {
                    position: Vec4::new(p.x, p.y, z, 1.0),
                    varyings: Bag::interpolate(
                        &surface.out1.varyings,
                        &surface.out2.varyings,
                        &surface.out3.varyings,
                        bc,
                    ),
                };

                let intensity = fragment_shader.shade(&varying, uniforms);
                self.fb.set_pixel(x, y, quantize(intensity));
                stats.fragments += 1;
            }
        }
    }
}

/// Twice the signed screen area of the triangle
fn signed_area(surface: &Surface) -> f32 {
    (surface.v2.x - surface.v1.x) * (surface.v3.y - surface.v1.y)
        - (surface.v3.x - surface.v1.x) * (surface.v2.y - surface.v1.y)
}
