//! Vector and matrix math for the pipeline
//!
//! Row-major 4x4 matrices applied to column vectors (`m * v`).
//! Right-handed, camera looks down -Z, NDC depth grows away from the viewer.

use std::ops::{Add, Mul, Neg, Sub};
use serde::{Serialize, Deserialize};

/// 3D Vector
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 { x: 0.0, y: 0.0, z: 0.0 };
    pub const UP: Vec3 = Vec3 { x: 0.0, y: 1.0, z: 0.0 };

    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn add(self, other: Vec3) -> Vec3 {
        Vec3 {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }

    pub fn sub(self, other: Vec3) -> Vec3 {
        Vec3 {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }

    pub fn dot(self, other: Vec3) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(self, other: Vec3) -> Vec3 {
        Vec3 {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    pub fn len(self) -> f32 {
        self.dot(self).sqrt()
    }

    /// Unit vector in the same direction. The zero vector maps to itself.
    pub fn normalize(self) -> Vec3 {
        let l = self.len();
        if l == 0.0 {
            return Vec3::ZERO;
        }
        Vec3 {
            x: self.x / l,
            y: self.y / l,
            z: self.z / l,
        }
    }

    pub fn scale(self, s: f32) -> Vec3 {
        Vec3 {
            x: self.x * s,
            y: self.y * s,
            z: self.z * s,
        }
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    fn add(self, other: Vec3) -> Vec3 {
        Vec3::add(self, other)
    }
}

impl Sub for Vec3 {
    type Output = Vec3;
    fn sub(self, other: Vec3) -> Vec3 {
        Vec3::sub(self, other)
    }
}

impl Mul<f32> for Vec3 {
    type Output = Vec3;
    fn mul(self, s: f32) -> Vec3 {
        self.scale(s)
    }
}

impl Neg for Vec3 {
    type Output = Vec3;
    fn neg(self) -> Vec3 {
        self.scale(-1.0)
    }
}

/// Homogeneous 4D vector (clip-space positions)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec4 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Vec4 {
    pub fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// Lift a position into homogeneous space (w = 1)
    pub fn point(v: Vec3) -> Self {
        Self { x: v.x, y: v.y, z: v.z, w: 1.0 }
    }

    /// Lift a direction into homogeneous space (w = 0, unaffected by translation)
    pub fn direction(v: Vec3) -> Self {
        Self { x: v.x, y: v.y, z: v.z, w: 0.0 }
    }

    pub fn xyz(self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }
}

impl Default for Vec4 {
    fn default() -> Self {
        Self { x: 0.0, y: 0.0, z: 0.0, w: 1.0 }
    }
}

/// 4x4 matrix, row-major: row `i`, column `j` lives at `m[i * 4 + j]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Mat4 {
    pub m: [f32; 16],
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::identity()
    }
}

impl Mat4 {
    pub const IDENTITY: Mat4 = Mat4 {
        m: [
            1.0, 0.0, 0.0, 0.0,
            0.0, 1.0, 0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            0.0, 0.0, 0.0, 1.0,
        ],
    };

    pub fn identity() -> Self {
        Self::IDENTITY
    }

    pub fn from_rows(m: [f32; 16]) -> Self {
        Self { m }
    }

    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.m[row * 4 + col]
    }

    /// Matrix product `a * b` (b is applied first when transforming vectors)
    pub fn multiply(a: &Mat4, b: &Mat4) -> Mat4 {
        let mut out = [0.0; 16];
        for i in 0..4 {
            for j in 0..4 {
                let mut sum = 0.0;
                for k in 0..4 {
                    sum += a.m[i * 4 + k] * b.m[k * 4 + j];
                }
                out[i * 4 + j] = sum;
            }
        }
        Mat4 { m: out }
    }

    pub fn multiply_vec4(m: &Mat4, v: Vec4) -> Vec4 {
        let r = |i: usize| {
            m.m[i * 4] * v.x + m.m[i * 4 + 1] * v.y + m.m[i * 4 + 2] * v.z + m.m[i * 4 + 3] * v.w
        };
        Vec4 { x: r(0), y: r(1), z: r(2), w: r(3) }
    }

    pub fn transform_point(&self, p: Vec3) -> Vec4 {
        Mat4::multiply_vec4(self, Vec4::point(p))
    }

    /// Apply the linear part only (no translation)
    pub fn transform_direction(&self, d: Vec3) -> Vec3 {
        Mat4::multiply_vec4(self, Vec4::direction(d)).xyz()
    }

    pub fn transpose(&self) -> Mat4 {
        let mut out = [0.0; 16];
        for i in 0..4 {
            for j in 0..4 {
                out[j * 4 + i] = self.m[i * 4 + j];
            }
        }
        Mat4 { m: out }
    }

    /// Symmetric perspective projection (OpenGL convention).
    ///
    /// View-space `z = -near` maps to NDC `z = -1` and `z = -far` to `+1`.
    /// Requires `0 < near < far`; not checked, bad input yields non-finite entries.
    pub fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
        let f = 1.0 / (fov_y / 2.0).tan();
        let range = near - far;
        Mat4::from_rows([
            f / aspect, 0.0, 0.0, 0.0,
            0.0, f, 0.0, 0.0,
            0.0, 0.0, (far + near) / range, 2.0 * far * near / range,
            0.0, 0.0, -1.0, 0.0,
        ])
    }

    /// World-to-view matrix for a camera at `eye` looking at `target`.
    ///
    /// If `up` is parallel to the view direction the right axis collapses to zero;
    /// the result is degenerate but finite.
    pub fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Mat4 {
        let forward = (eye - target).normalize();
        let right = up.cross(forward).normalize();
        let true_up = forward.cross(right);

        Mat4::from_rows([
            right.x, right.y, right.z, -right.dot(eye),
            true_up.x, true_up.y, true_up.z, -true_up.dot(eye),
            forward.x, forward.y, forward.z, -forward.dot(eye),
            0.0, 0.0, 0.0, 1.0,
        ])
    }

    pub fn translate(x: f32, y: f32, z: f32) -> Mat4 {
        Mat4::from_rows([
            1.0, 0.0, 0.0, x,
            0.0, 1.0, 0.0, y,
            0.0, 0.0, 1.0, z,
            0.0, 0.0, 0.0, 1.0,
        ])
    }

    pub fn scale(x: f32, y: f32, z: f32) -> Mat4 {
        Mat4::from_rows([
            x, 0.0, 0.0, 0.0,
            0.0, y, 0.0, 0.0,
            0.0, 0.0, z, 0.0,
            0.0, 0.0, 0.0, 1.0,
        ])
    }

    pub fn rotate_x(angle: f32) -> Mat4 {
        let (s, c) = angle.sin_cos();
        Mat4::from_rows([
            1.0, 0.0, 0.0, 0.0,
            0.0, c, -s, 0.0,
            0.0, s, c, 0.0,
            0.0, 0.0, 0.0, 1.0,
        ])
    }

    pub fn rotate_y(angle: f32) -> Mat4 {
        let (s, c) = angle.sin_cos();
        Mat4::from_rows([
            c, 0.0, s, 0.0,
            0.0, 1.0, 0.0, 0.0,
            -s, 0.0, c, 0.0,
            0.0, 0.0, 0.0, 1.0,
        ])
    }

    pub fn rotate_z(angle: f32) -> Mat4 {
        let (s, c) = angle.sin_cos();
        Mat4::from_rows([
            c, -s, 0.0, 0.0,
            s, c, 0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            0.0, 0.0, 0.0, 1.0,
        ])
    }
}

impl Mul for Mat4 {
    type Output = Mat4;
    fn mul(self, other: Mat4) -> Mat4 {
        Mat4::multiply(&self, &other)
    }
}

impl Mul<Vec4> for Mat4 {
    type Output = Vec4;
    fn mul(self, v: Vec4) -> Vec4 {
        Mat4::multiply_vec4(&self, v)
    }
}

/// Below this signed double-area a screen triangle has no coverage
pub const DEGENERATE_AREA: f32 = 1e-3;

/// Barycentric coordinates of `p` in the screen triangle (a, b, c), z ignored.
///
/// Returns (u, v, w) weighting (a, b, c), summing to 1.
/// `None` if the triangle is degenerate.
pub fn barycentric(p: Vec3, a: Vec3, b: Vec3, c: Vec3) -> Option<Vec3> {
    let (v0x, v0y) = (b.x - a.x, b.y - a.y);
    let (v1x, v1y) = (c.x - a.x, c.y - a.y);
    let (v2x, v2y) = (p.x - a.x, p.y - a.y);

    let denom = v0x * v1y - v1x * v0y;
    if denom.abs() < DEGENERATE_AREA {
        return None;
    }

    let v = (v2x * v1y - v1x * v2y) / denom;
    let w = (v0x * v2y - v2x * v0y) / denom;
    Some(Vec3::new(1.0 - v - w, v, w))
}
