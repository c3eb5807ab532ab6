//! Indexed triangle meshes
//!
//! Pure data: a vertex buffer of attribute records and a flat index buffer,
//! three indices per triangle.

use std::path::Path;
use serde::{Serialize, Deserialize};
use crate::io::{self, AssetError};
use crate::rasterizer::{Vec3, VertexAttributes};

/// An indexed triangle mesh
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    pub vertices: Vec<VertexAttributes>,
    /// Vertex indices, grouped in triples
    pub indices: Vec<usize>,
}

impl Geometry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a vertex and return its index
    pub fn add_vertex(&mut self, attributes: VertexAttributes) -> usize {
        let idx = self.vertices.len();
        self.vertices.push(attributes);
        idx
    }

    /// Append a triangle. Indices aren't range-checked here; a bad index
    /// panics when the mesh is rendered.
    pub fn add_triangle(&mut self, i0: usize, i1: usize, i2: usize) {
        self.indices.extend_from_slice(&[i0, i1, i2]);
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Index triples in submission order. A trailing partial triple is ignored.
    pub fn triangles(&self) -> impl Iterator<Item = [usize; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }

    /// Check the index buffer against the vertex buffer
    pub fn validate(&self) -> Result<(), AssetError> {
        if self.indices.len() % 3 != 0 {
            return Err(AssetError::InvalidGeometry(format!(
                "index count {} is not a multiple of 3",
                self.indices.len()
            )));
        }
        if let Some((pos, idx)) = self
            .indices
            .iter()
            .enumerate()
            .find(|&(_, &i)| i >= self.vertices.len())
        {
            return Err(AssetError::InvalidGeometry(format!(
                "index {} at position {} out of range for {} vertices",
                idx,
                pos,
                self.vertices.len()
            )));
        }
        Ok(())
    }

    /// The [-1, 1] cube: 8 shared corners with outward (corner-direction)
    /// normals and 12 triangles wound counter-clockwise seen from outside.
    pub fn cube() -> Self {
        let mut geometry = Self::new();

        // Corner i has x from bit 0, y from bit 1, z from bit 2
        for i in 0..8 {
            let coord = |bit: usize| if i & (1 << bit) != 0 { 1.0 } else { -1.0 };
            let position = Vec3::new(coord(0), coord(1), coord(2));
            geometry.add_vertex(VertexAttributes::new(position).with("normal", position.normalize()));
        }

        let faces: [[usize; 4]; 6] = [
            [4, 5, 7, 6], // +Z
            [0, 2, 3, 1], // -Z
            [1, 3, 7, 5], // +X
            [0, 4, 6, 2], // -X
            [2, 6, 7, 3], // +Y
            [0, 1, 5, 4], // -Y
        ];

        // Two triangles per face
        for [a, b, c, d] in faces {
            geometry.add_triangle(a, b, c);
            geometry.add_triangle(a, c, d);
        }

        geometry
    }
}

/// Load and validate a mesh from a RON file
pub fn load_geometry<P: AsRef<Path>>(path: P) -> Result<Geometry, AssetError> {
    let geometry: Geometry = io::load_ron(path)?;
    check(geometry)
}

/// Load and validate a mesh from a RON string
pub fn geometry_from_str(s: &str) -> Result<Geometry, AssetError> {
    let geometry: Geometry = io::from_ron_str(s)?;
    check(geometry)
}

/// Save a mesh to a RON file
pub fn save_geometry<P: AsRef<Path>>(geometry: &Geometry, path: P) -> Result<(), AssetError> {
    io::save_ron(geometry, path)
}

fn check(geometry: Geometry) -> Result<Geometry, AssetError> {
    if let Err(e) = geometry.validate() {
        log::warn!("rejecting mesh: {}", e);
        return Err(e);
    }
    Ok(geometry)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_vertex_returns_sequential_indices() {
        let mut g = Geometry::new();
        assert_eq!(g.add_vertex(VertexAttributes::new(Vec3::ZERO)), 0);
        assert_eq!(g.add_vertex(VertexAttributes::new(Vec3::UP)), 1);
        g.add_triangle(0, 1, 0);
        assert_eq!(g.vertex_count(), 2);
        assert_eq!(g.triangle_count(), 1);
        assert_eq!(g.triangles().collect::<Vec<_>>(), vec![[0, 1, 0]]);
    }

    #[test]
    fn test_add_triangle_does_not_validate() {
        let mut g = Geometry::new();
        g.add_triangle(0, 1, 2);
        assert_eq!(g.triangle_count(), 1);
        assert!(matches!(g.validate(), Err(AssetError::InvalidGeometry(_))));
    }

    #[test]
    fn test_cube_shape() {
        let cube = Geometry::cube();
        assert_eq!(cube.vertex_count(), 8);
        assert_eq!(cube.triangle_count(), 12);
        assert!(cube.validate().is_ok());

        for v in &cube.vertices {
            let n = v.values.vec3("normal").unwrap();
            assert!((n.len() - 1.0).abs() < 1e-5);
            assert!(n.dot(v.position) > 0.0);
        }
    }

    #[test]
    fn test_cube_winding_faces_outward() {
        let cube = Geometry::cube();
        for [a, b, c] in cube.triangles() {
            let (pa, pb, pc) = (
                cube.vertices[a].position,
                cube.vertices[b].position,
                cube.vertices[c].position,
            );
            let normal = (pb - pa).cross(pc - pa);
            let centroid = (pa + pb + pc) * (1.0 / 3.0);
            assert!(normal.dot(centroid) > 0.0, "triangle {:?} winds inward", [a, b, c]);
        }
    }

    #[test]
    fn test_ron_round_trip_and_validation() {
        let cube = Geometry::cube();
        let text = io::to_ron_string(&cube).unwrap();
        assert_eq!(geometry_from_str(&text).unwrap(), cube);

        let path = std::env::temp_dir().join("softpipe-cube-test.ron");
        save_geometry(&cube, &path).unwrap();
        assert_eq!(load_geometry(&path).unwrap(), cube);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_load_rejects_bad_indices() {
        let text = "(vertices: [(position: (x: 0.0, y: 0.0, z: 0.0))], indices: [0, 0, 1])";
        assert!(matches!(geometry_from_str(text), Err(AssetError::InvalidGeometry(_))));

        let text = "(vertices: [(position: (x: 0.0, y: 0.0, z: 0.0))], indices: [0, 0])";
        assert!(matches!(geometry_from_str(text), Err(AssetError::InvalidGeometry(_))));
    }
}
