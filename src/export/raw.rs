//! Raw mesh data export for custom rendering.

use crate::rig::RigOutput;

/// Raw mesh data for custom use.
#[derive(Debug)]
pub struct RawMeshData {
    /// Vertex positions (3 floats per vertex).
    pub positions: Vec<[f32; 3]>,
    /// Vertex normals (3 floats per vertex).
    pub normals: Vec<[f32; 3]>,
    /// Texture coordinates in image space (V=0 at the top row).
    pub uvs: Vec<[f32; 2]>,
    /// Triangle indices (3 per triangle).
    pub indices: Vec<u32>,
    /// Index into `indices` where the posable parts begin; everything before
    /// it belongs to the base, stand and shoulder.
    pub parts_index_start: usize,
    /// Texture RGBA data.
    pub texture_rgba: Vec<u8>,
    /// Texture width.
    pub texture_width: u32,
    /// Texture height.
    pub texture_height: u32,
}

/// Export a posed rig as raw data.
/// Opaque and transparent meshes are concatenated; `parts_index_start`
/// marks the split.
pub fn export_raw(output: &RigOutput) -> RawMeshData {
    let mesh = output.mesh();
    let texture = &output.texture;

    RawMeshData {
        positions: mesh.vertices.iter().map(|v| v.position).collect(),
        normals: mesh.vertices.iter().map(|v| v.normal).collect(),
        uvs: mesh
            .vertices
            .iter()
            .map(|v| texture.image_space_uv(v.uv))
            .collect(),
        indices: mesh.indices,
        parts_index_start: output.opaque_mesh.indices.len(),
        texture_rgba: texture.pixels.clone(),
        texture_width: texture.width,
        texture_height: texture.height,
    }
}

impl RawMeshData {
    /// Get positions as a flat array.
    pub fn positions_flat(&self) -> Vec<f32> {
        self.positions.iter().flat_map(|p| p.iter().copied()).collect()
    }

    /// Get normals as a flat array.
    pub fn normals_flat(&self) -> Vec<f32> {
        self.normals.iter().flat_map(|n| n.iter().copied()).collect()
    }

    /// Get UVs as a flat array.
    pub fn uvs_flat(&self) -> Vec<f32> {
        self.uvs.iter().flat_map(|uv| uv.iter().copied()).collect()
    }

    /// Get the number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Get the number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}
