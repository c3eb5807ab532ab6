//! Programmable stages of the pipeline
//!
//! A vertex shader turns vertex attributes into a clip-space position plus
//! varyings; a fragment shader turns interpolated varyings into an intensity
//! on the 0..=15 palette scale. Any `Fn` with the right signature is a shader.
//! Shaders must be pure: the pipeline may call them in any order within a
//! draw call, apart from a triangle's vertices being shaded before it is
//! rasterized.

use super::math::{Vec3, Vec4};
use super::types::{Uniforms, Value, VertexAttributes, VertexOutput};
use super::MAX_INTENSITY;

pub trait VertexShader {
    fn shade(&self, attributes: &VertexAttributes, uniforms: &Uniforms) -> VertexOutput;
}

pub trait FragmentShader {
    /// Intensity for one covered pixel. Out-of-range results are clamped by the pipeline.
    fn shade(&self, varying: &VertexOutput, uniforms: &Uniforms) -> f32;
}

impl<F> VertexShader for F
where
    F: Fn(&VertexAttributes, &Uniforms) -> VertexOutput,
{
    fn shade(&self, attributes: &VertexAttributes, uniforms: &Uniforms) -> VertexOutput {
        self(attributes, uniforms)
    }
}

impl<F> FragmentShader for F
where
    F: Fn(&VertexOutput, &Uniforms) -> f32,
{
    fn shade(&self, varying: &VertexOutput, uniforms: &Uniforms) -> f32 {
        self(varying, uniforms)
    }
}

/// Standard model-view-projection vertex shader.
///
/// Outputs `projection * view * model * position`. A `normal` attribute is
/// rotated into world space by the model matrix and renormalized; every other
/// attribute is passed through untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransformShader;

impl VertexShader for TransformShader {
    fn shade(&self, attributes: &VertexAttributes, uniforms: &Uniforms) -> VertexOutput {
        let position = uniforms.mvp() * Vec4::point(attributes.position);
        let mut out = VertexOutput::new(position);
        for (name, value) in attributes.values.iter() {
            match (name, value) {
                ("normal", Value::Vec3(n)) => {
                    out.varyings.set(name, uniforms.model.transform_direction(n).normalize());
                }
                _ => out.varyings.set(name, value),
            }
        }
        out
    }
}

/// Default ambient term when the `ambient` uniform is absent
pub const DEFAULT_AMBIENT: f32 = 0.2;

/// Diffuse lighting from the interpolated `normal` varying.
///
/// Reads the `light_dir` uniform (direction towards the light, need not be
/// normalized) and an optional `ambient` uniform in 0..1. Missing normal or
/// light direction leaves only the ambient term.
#[derive(Debug, Clone, Copy, Default)]
pub struct LambertShader;

/// Ambient + diffuse intensity in 0..1
pub fn shade_intensity(normal: Vec3, light_dir: Vec3, ambient: f32) -> f32 {
    let diffuse = normal.normalize().dot(light_dir.normalize()).max(0.0);
    (ambient + (1.0 - ambient) * diffuse).clamp(0.0, 1.0)
}

impl FragmentShader for LambertShader {
    fn shade(&self, varying: &VertexOutput, uniforms: &Uniforms) -> f32 {
        let ambient = uniforms.values.scalar("ambient").unwrap_or(DEFAULT_AMBIENT);
        let normal = varying.varyings.vec3("normal").unwrap_or(Vec3::ZERO);
        let light_dir = uniforms.values.vec3("light_dir").unwrap_or(Vec3::ZERO);
        shade_intensity(normal, light_dir, ambient) * MAX_INTENSITY as f32
    }
}

/// Fills every covered pixel with the same intensity
#[derive(Debug, Clone, Copy)]
pub struct ConstantShader(pub f32);

impl FragmentShader for ConstantShader {
    fn shade(&self, _varying: &VertexOutput, _uniforms: &Uniforms) -> f32 {
        self.0
    }
}
