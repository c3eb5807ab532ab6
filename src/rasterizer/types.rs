//! Core types exchanged between geometry, shaders and the pipeline

use serde::{Serialize, Deserialize};
use super::math::{Mat4, Vec3, Vec4};

/// A named attribute, varying or uniform value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Scalar(f32),
    Vec3(Vec3),
}

impl Value {
    pub fn as_scalar(&self) -> Option<f32> {
        match self {
            Value::Scalar(s) => Some(*s),
            Value::Vec3(_) => None,
        }
    }

    pub fn as_vec3(&self) -> Option<Vec3> {
        match self {
            Value::Vec3(v) => Some(*v),
            Value::Scalar(_) => None,
        }
    }

    /// Weighted sum `a*u + b*v + c*w`, per component for vectors.
    /// `None` if the three values don't share a tag.
    pub fn blend(a: Value, b: Value, c: Value, weights: Vec3) -> Option<Value> {
        match (a, b, c) {
            (Value::Scalar(a), Value::Scalar(b), Value::Scalar(c)) => {
                Some(Value::Scalar(a * weights.x + b * weights.y + c * weights.z))
            }
            (Value::Vec3(a), Value::Vec3(b), Value::Vec3(c)) => {
                Some(Value::Vec3(a * weights.x + b * weights.y + c * weights.z))
            }
            _ => None,
        }
    }
}

impl From<f32> for Value {
    fn from(s: f32) -> Self {
        Value::Scalar(s)
    }
}

impl From<Vec3> for Value {
    fn from(v: Vec3) -> Self {
        Value::Vec3(v)
    }
}

/// Ordered name -> value mapping. Names are unique, insertion order is kept.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Bag {
    entries: Vec<(String, Value)>,
}

impl Bag {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Insert or replace (in place) a named value
    pub fn set(&mut self, name: &str, value: impl Into<Value>) {
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name.to_string(), value)),
        }
    }

    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, v)| *v)
    }

    pub fn scalar(&self, name: &str) -> Option<f32> {
        self.get(name).and_then(|v| v.as_scalar())
    }

    pub fn vec3(&self, name: &str) -> Option<Vec3> {
        self.get(name).and_then(|v| v.as_vec3())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(n, _)| n == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Value)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Blend three bags with barycentric weights.
    ///
    /// Walks the names of `a`; a name missing from `b` or `c`, or carrying a
    /// different tag there, is dropped from the result.
    pub fn interpolate(a: &Bag, b: &Bag, c: &Bag, weights: Vec3) -> Bag {
        let mut out = Bag { entries: Vec::with_capacity(a.len()) };
        for (name, va) in a.iter() {
            let blended = b
                .get(name)
                .zip(c.get(name))
                .and_then(|(vb, vc)| Value::blend(va, vb, vc, weights));
            if let Some(value) = blended {
                out.entries.push((name.to_string(), value));
            }
        }
        out
    }
}

/// Per-vertex input record: a position plus arbitrary named extras
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VertexAttributes {
    pub position: Vec3,
    #[serde(default)]
    pub values: Bag,
}

impl VertexAttributes {
    pub fn new(position: Vec3) -> Self {
        Self { position, values: Bag::new() }
    }

    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.values.set(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        self.values.get(name)
    }
}

/// Vertex shader output: clip-space position plus varyings for the fragment stage
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VertexOutput {
    pub position: Vec4,
    pub varyings: Bag,
}

impl VertexOutput {
    pub fn new(position: Vec4) -> Self {
        Self { position, varyings: Bag::new() }
    }

    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.varyings.set(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        self.varyings.get(name)
    }
}

/// Values constant across one draw call
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Uniforms {
    pub model: Mat4,
    pub view: Mat4,
    pub projection: Mat4,
    #[serde(default)]
    pub values: Bag,
}

impl Uniforms {
    pub fn new(model: Mat4, view: Mat4, projection: Mat4) -> Self {
        Self { model, view, projection, values: Bag::new() }
    }

    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.values.set(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        self.values.get(name)
    }

    /// projection * view * model
    pub fn mvp(&self) -> Mat4 {
        self.projection * self.view * self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bag_set_replaces_in_place() {
        let mut bag = Bag::new().with("a", 1.0f32).with("b", Vec3::UP);
        bag.set("a", 2.0f32);
        let names: Vec<&str> = bag.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(bag.scalar("a"), Some(2.0));
        assert_eq!(bag.vec3("b"), Some(Vec3::UP));
        assert_eq!(bag.scalar("b"), None);
    }

    #[test]
    fn test_blend_scalar_and_vector() {
        let w = Vec3::new(0.5, 0.25, 0.25);
        let s = Value::blend(Value::Scalar(4.0), Value::Scalar(8.0), Value::Scalar(0.0), w).unwrap();
        assert_eq!(s, Value::Scalar(4.0));

        let v = Value::blend(
            Value::Vec3(Vec3::new(1.0, 0.0, 0.0)),
            Value::Vec3(Vec3::new(0.0, 1.0, 0.0)),
            Value::Vec3(Vec3::new(0.0, 0.0, 1.0)),
            w,
        )
        .unwrap();
        assert_eq!(v, Value::Vec3(Vec3::new(0.5, 0.25, 0.25)));
    }

    #[test]
    fn test_blend_mismatched_tags() {
        let w = Vec3::new(1.0, 0.0, 0.0);
        assert!(Value::blend(Value::Scalar(1.0), Value::Vec3(Vec3::ZERO), Value::Scalar(1.0), w).is_none());
    }

    #[test]
    fn test_interpolate_skips_missing_names() {
        let a = Bag::new().with("shade", 3.0f32).with("only_a", 1.0f32);
        let b = Bag::new().with("shade", 6.0f32);
        let c = Bag::new().with("shade", 9.0f32).with("only_a", 1.0f32);
        let out = Bag::interpolate(&a, &b, &c, Vec3::new(1.0 / 3.0, 1.0 / 3.0, 1.0 / 3.0));
        assert_eq!(out.len(), 1);
        assert!((out.scalar("shade").unwrap() - 6.0).abs() < 1e-4);
        assert!(!out.contains("only_a"));
    }

    #[test]
    fn test_uniforms_mvp_order() {
        let u = Uniforms::new(
            Mat4::translate(1.0, 0.0, 0.0),
            Mat4::scale(2.0, 2.0, 2.0),
            Mat4::identity(),
        );
        // Model applied first, then view
        let p = u.mvp().transform_point(Vec3::ZERO);
        assert_eq!(p.x, 2.0);
    }
}
