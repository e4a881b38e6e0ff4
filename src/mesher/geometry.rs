//! Mesh geometry types.

use crate::types::BoundingBox;
use glam::{Mat4, Vec3};

/// A vertex in the output mesh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    /// Position in 3D space.
    pub position: [f32; 3],
    /// Normal vector.
    pub normal: [f32; 3],
    /// Texture coordinates.
    pub uv: [f32; 2],
}

impl Vertex {
    pub fn new(position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> Self {
        Self {
            position,
            normal,
            uv,
        }
    }
}

impl Default for Vertex {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0, 0.0],
            normal: [0.0, 1.0, 0.0],
            uv: [0.0, 0.0],
        }
    }
}

/// A triangle mesh.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    /// Vertex data.
    pub vertices: Vec<Vertex>,
    /// Triangle indices (3 per triangle).
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a vertex and return its index.
    pub fn add_vertex(&mut self, vertex: Vertex) -> u32 {
        let index = self.vertices.len() as u32;
        self.vertices.push(vertex);
        index
    }

    /// Add a triangle by vertex indices.
    pub fn add_triangle(&mut self, i0: u32, i1: u32, i2: u32) {
        self.indices.push(i0);
        self.indices.push(i1);
        self.indices.push(i2);
    }

    /// Get the number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Get the number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Check if the mesh is empty.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Merge another mesh into this one.
    pub fn merge(&mut self, other: &Mesh) {
        let offset = self.vertices.len() as u32;

        self.vertices.extend_from_slice(&other.vertices);

        for index in &other.indices {
            self.indices.push(index + offset);
        }
    }

    /// Copy of this mesh with positions and normals carried through `matrix`.
    pub fn transformed(&self, matrix: &Mat4) -> Mesh {
        let vertices = self
            .vertices
            .iter()
            .map(|v| {
                let p = matrix.transform_point3(Vec3::from(v.position));
                let n = matrix
                    .transform_vector3(Vec3::from(v.normal))
                    .normalize_or_zero();
                Vertex {
                    position: p.to_array(),
                    normal: n.to_array(),
                    ..*v
                }
            })
            .collect();

        Mesh {
            vertices,
            indices: self.indices.clone(),
        }
    }

    /// Replace the UV attribute from a flat `[u0, v0, u1, v1, ...]` array.
    ///
    /// Extra pairs are ignored; vertices without a pair keep their UV.
    pub fn set_uvs(&mut self, uvs: &[f32]) {
        for (vertex, uv) in self.vertices.iter_mut().zip(uvs.chunks_exact(2)) {
            vertex.uv = [uv[0], uv[1]];
        }
    }

    /// Bounding box of all vertex positions.
    pub fn bounds(&self) -> Option<BoundingBox> {
        BoundingBox::from_points(self.vertices.iter().map(|v| v.position))
    }

    /// Get positions as a flat array (for glTF export).
    pub fn positions_flat(&self) -> Vec<f32> {
        self.vertices
            .iter()
            .flat_map(|v| v.position)
            .collect()
    }

    /// Get normals as a flat array (for glTF export).
    pub fn normals_flat(&self) -> Vec<f32> {
        self.vertices
            .iter()
            .flat_map(|v| v.normal)
            .collect()
    }

    /// Get UVs as a flat array (for glTF export).
    pub fn uvs_flat(&self) -> Vec<f32> {
        self.vertices
            .iter()
            .flat_map(|v| v.uv)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle(offset: f32) -> Mesh {
        let mut mesh = Mesh::new();
        let v0 = mesh.add_vertex(Vertex::new([offset, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0]));
        let v1 = mesh.add_vertex(Vertex::new([offset + 1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [1.0, 0.0]));
        let v2 = mesh.add_vertex(Vertex::new([offset, 0.0, 1.0], [0.0, 1.0, 0.0], [0.0, 1.0]));
        mesh.add_triangle(v0, v1, v2);
        mesh
    }

    #[test]
    fn test_mesh_creation() {
        let mesh = triangle(0.0);
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.triangle_count(), 1);
        assert!(!mesh.is_empty());
        assert!(Mesh::new().is_empty());
    }

    #[test]
    fn test_mesh_merge() {
        let mut mesh1 = triangle(0.0);
        mesh1.merge(&triangle(2.0));

        assert_eq!(mesh1.vertex_count(), 6);
        assert_eq!(mesh1.triangle_count(), 2);
        // Second triangle indices should be offset by 3
        assert_eq!(mesh1.indices, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_transformed_keeps_uvs_and_rotates_normals() {
        let mesh = triangle(0.0);
        let rotated = mesh.transformed(&Mat4::from_rotation_x(std::f32::consts::FRAC_PI_2));

        assert_eq!(rotated.uvs_flat(), mesh.uvs_flat());
        assert_eq!(rotated.indices, mesh.indices);
        // +Y normal turns to +Z
        let n = rotated.vertices[0].normal;
        assert!((n[2] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_set_uvs() {
        let mut mesh = triangle(0.0);
        mesh.set_uvs(&[0.5, 0.5, 0.25, 0.75]);
        assert_eq!(mesh.vertices[0].uv, [0.5, 0.5]);
        assert_eq!(mesh.vertices[1].uv, [0.25, 0.75]);
        assert_eq!(mesh.vertices[2].uv, [0.0, 1.0]);
    }

    #[test]
    fn test_bounds() {
        let bounds = triangle(1.0).bounds().unwrap();
        assert_eq!(bounds.min, [1.0, 0.0, 0.0]);
        assert_eq!(bounds.max, [2.0, 0.0, 1.0]);
        assert!(Mesh::new().bounds().is_none());
    }
}
