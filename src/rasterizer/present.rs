//! Turning palette-index frames into something a host can display

use std::path::Path;
use image::{GrayImage, Luma};
use super::render::Renderer;
use super::{MAX_INTENSITY, PALETTE_LEVELS};
use crate::io::AssetError;

/// RGBA color (0-255 per channel)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0, a: 255 };
    pub const WHITE: Color = Color { r: 255, g: 255, b: 255, a: 255 };

    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Apply shading (multiply by intensity 0.0-1.0)
    pub fn shade(self, intensity: f32) -> Self {
        let i = intensity.clamp(0.0, 1.0);
        Self {
            r: (self.r as f32 * i) as u8,
            g: (self.g as f32 * i) as u8,
            b: (self.b as f32 * i) as u8,
            a: self.a,
        }
    }

    pub fn to_bytes(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// The 16 display colors for intensities 0..=15
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub colors: [Color; PALETTE_LEVELS],
}

impl Default for Palette {
    fn default() -> Self {
        Self::grayscale()
    }
}

impl Palette {
    /// Black to white in even steps (level * 17)
    pub fn grayscale() -> Self {
        Self::tinted(Color::WHITE)
    }

    /// Black to `color` in even steps
    pub fn tinted(color: Color) -> Self {
        let mut colors = [Color::BLACK; PALETTE_LEVELS];
        for (level, slot) in colors.iter_mut().enumerate() {
            *slot = color.shade(level as f32 / MAX_INTENSITY as f32);
        }
        Self { colors }
    }

    /// Color for a palette index; indices past the top clamp to the brightest
    pub fn color(&self, index: u8) -> Color {
        self.colors[index.min(MAX_INTENSITY) as usize]
    }

    /// Expand the current frame to RGBA8, 4 bytes per pixel, row 0 at the top
    pub fn to_rgba(&self, renderer: &Renderer) -> Vec<u8> {
        let mut out = Vec::with_capacity(renderer.framebuffer().len() * 4);
        for &index in renderer.framebuffer() {
            out.extend_from_slice(&self.color(index).to_bytes());
        }
        out
    }
}

/// Current frame as an 8-bit grayscale image
pub fn to_gray_image(renderer: &Renderer) -> GrayImage {
    let palette = Palette::grayscale();
    let width = renderer.width();
    GrayImage::from_fn(renderer.width() as u32, renderer.height() as u32, |x, y| {
        let index = renderer.framebuffer()[y as usize * width + x as usize];
        Luma([palette.color(index).r])
    })
}

/// Write the current frame as a grayscale PNG
pub fn save_png<P: AsRef<Path>>(renderer: &Renderer, path: P) -> Result<(), AssetError> {
    let path = path.as_ref();
    to_gray_image(renderer).save_with_format(path, image::ImageFormat::Png)?;
    log::info!("saved frame to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rasterizer::{ConstantShader, TransformShader, Uniforms, Vec3, VertexAttributes};
    use crate::world::Geometry;

    fn lit_renderer() -> Renderer {
        let mut g = Geometry::new();
        // Top-left quarter of the screen
        g.add_vertex(VertexAttributes::new(Vec3::new(-1.0, 1.0, 0.0)));
        g.add_vertex(VertexAttributes::new(Vec3::new(0.0, 1.0, 0.0)));
        g.add_vertex(VertexAttributes::new(Vec3::new(-1.0, 0.0, 0.0)));
        g.add_triangle(0, 1, 2);

        let mut r = Renderer::new(8, 8);
        r.render(&g, &TransformShader, &ConstantShader(15.0), &Uniforms::default());
        r
    }

    #[test]
    fn test_grayscale_levels() {
        let p = Palette::grayscale();
        assert_eq!(p.color(0), Color::BLACK);
        assert_eq!(p.color(15), Color::WHITE);
        assert_eq!(p.color(1).r, 17);
        assert_eq!(p.color(200), Color::WHITE);
    }

    #[test]
    fn test_tinted_palette_keeps_hue() {
        let p = Palette::tinted(Color::new(255, 0, 0));
        let c = p.color(15);
        assert_eq!((c.r, c.g, c.b), (255, 0, 0));
        assert_eq!(p.color(0), Color::BLACK);
    }

    #[test]
    fn test_to_rgba_matches_framebuffer() {
        let r = lit_renderer();
        let rgba = Palette::grayscale().to_rgba(&r);
        assert_eq!(rgba.len(), 8 * 8 * 4);
        // Top-left pixel is covered, bottom-right isn't
        assert_eq!(&rgba[0..4], &[255, 255, 255, 255]);
        let last = rgba.len() - 4;
        assert_eq!(&rgba[last..], &[0, 0, 0, 255]);
    }

    #[test]
    fn test_png_export() {
        let r = lit_renderer();
        let img = to_gray_image(&r);
        assert_eq!(img.get_pixel(0, 0).0[0], 255);
        assert_eq!(img.get_pixel(7, 7).0[0], 0);

        let path = std::env::temp_dir().join("softpipe-frame-test.png");
        save_png(&r, &path).unwrap();
        let loaded = image::open(&path).unwrap().to_luma8();
        assert_eq!(loaded, img);
        let _ = std::fs::remove_file(&path);
    }
}
