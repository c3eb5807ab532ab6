//! Render configuration
//!
//! Framebuffer size, camera, projection and lighting, stored as RON.
//! Every field has a default, so a config file only needs the fields it changes.

use std::f32::consts::FRAC_PI_3;
use std::path::Path;
use serde::{Serialize, Deserialize};
use crate::io::{self, AssetError};
use crate::rasterizer::{Mat4, Uniforms, Vec3, DEFAULT_AMBIENT, HEIGHT, WIDTH};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    pub width: usize,
    pub height: usize,
    /// Vertical field of view in radians
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    /// Direction towards the light
    pub light_dir: Vec3,
    /// Ambient term, 0..1
    pub ambient: f32,
    /// Model rotation speed in radians per second (demo only)
    pub spin_speed: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: WIDTH,
            height: HEIGHT,
            fov_y: FRAC_PI_3,
            near: 0.1,
            far: 100.0,
            eye: Vec3::new(0.0, 0.0, 3.0),
            target: Vec3::ZERO,
            up: Vec3::UP,
            light_dir: Vec3::new(0.5, 1.0, 1.0),
            ambient: DEFAULT_AMBIENT,
            spin_speed: 0.8,
        }
    }
}

impl RenderConfig {
    pub fn aspect(&self) -> f32 {
        if self.height == 0 {
            return 1.0;
        }
        self.width as f32 / self.height as f32
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at(self.eye, self.target, self.up)
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::perspective(self.fov_y, self.aspect(), self.near, self.far)
    }

    /// Uniforms for one draw call: camera matrices, `light_dir` and `ambient`
    pub fn uniforms(&self, model: Mat4) -> Uniforms {
        Uniforms::new(model, self.view(), self.projection())
            .with("light_dir", self.light_dir)
            .with("ambient", self.ambient)
    }
}

/// Load a render config from a RON file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<RenderConfig, AssetError> {
    io::load_ron(path)
}

/// Parse a render config from a RON string
pub fn config_from_str(s: &str) -> Result<RenderConfig, AssetError> {
    io::from_ron_str(s)
}

/// Save a render config to a RON file
pub fn save_config<P: AsRef<Path>>(config: &RenderConfig, path: P) -> Result<(), AssetError> {
    io::save_ron(config, path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = config_from_str("(width: 64, height: 32, ambient: 0.5)").unwrap();
        assert_eq!(config.width, 64);
        assert_eq!(config.height, 32);
        assert_eq!(config.ambient, 0.5);
        assert_eq!(config.near, 0.1);
        assert_eq!(config.eye, Vec3::new(0.0, 0.0, 3.0));
        assert_eq!(config.aspect(), 2.0);
    }

    #[test]
    fn test_config_file_round_trip() {
        let config = RenderConfig {
            width: 128,
            eye: Vec3::new(1.0, 2.0, 5.0),
            ..Default::default()
        };
        let path = std::env::temp_dir().join("softpipe-config-test.ron");
        save_config(&config, &path).unwrap();
        assert_eq!(load_config(&path).unwrap(), config);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_uniforms_carry_lighting() {
        let config = RenderConfig::default();
        let u = config.uniforms(Mat4::identity());
        assert_eq!(u.values.vec3("light_dir"), Some(config.light_dir));
        assert_eq!(u.values.scalar("ambient"), Some(config.ambient));
        assert_eq!(u.view, config.view());
        assert_eq!(u.projection, config.projection());
    }

    #[test]
    fn test_unknown_field_is_parse_error() {
        assert!(matches!(config_from_str("(widht: 10)"), Err(AssetError::ParseError(_))));
    }
}
