//! Box UV mapping for Minecraft-style spritesheets.
//!
//! Replaces the default per-face UVs of a [`box_mesh`] with coordinates that
//! address a region of a 64×32 texel atlas. Each face pair samples from an
//! entry of the face offset table:
//!
//! ```text
//!   entry    u (texels)            v (texels)
//!   front    u0                    v0
//!   back     u0 + W + D            v0
//!   top      u0 + W                v0
//!   bottom   u0 + 2W               v0
//!   right    u0 + 2W + D           v0
//!   left     u0 + D                v0
//! ```
//!
//! Vertex `i` belongs to face `i / 4` and reads entry `(i / 4) / 2`, so faces
//! are consumed two at a time and only the first three entries are reached.
//! The armor stand's part offsets were laid out against exactly this
//! arithmetic; do not "fix" it without re-laying the atlas.

use super::box_geometry::{box_mesh, VERTICES_PER_FACE};
use super::geometry::Mesh;
use crate::error::{Result, RigError};

/// Atlas width in texels.
pub const ATLAS_WIDTH: u32 = 64;

/// Atlas height in texels.
pub const ATLAS_HEIGHT: u32 = 32;

/// Box dimensions (model units, 1/16 block) and atlas offset (texels).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxSpec {
    pub width: f32,
    pub height: f32,
    pub depth: f32,
    pub u_offset: f32,
    pub v_offset: f32,
}

impl BoxSpec {
    pub const fn new(width: f32, height: f32, depth: f32, u_offset: f32, v_offset: f32) -> Self {
        Self {
            width,
            height,
            depth,
            u_offset,
            v_offset,
        }
    }

    /// Per-face atlas origins in texels: front, back, top, bottom, right, left.
    pub fn face_offsets(&self) -> [[f32; 2]; 6] {
        let (u, v, w, d) = (self.u_offset, self.v_offset, self.width, self.depth);
        [
            [u, v],
            [u + w + d, v],
            [u + w, v],
            [u + w + w, v],
            [u + w + w + d, v],
            [u + d, v],
        ]
    }

    /// Largest texel coordinates sampled by the mapped box, as (u, v).
    pub fn atlas_extent(&self) -> [f32; 2] {
        let offsets = self.face_offsets();
        let mut extent = [0.0f32; 2];
        for face in 0..6 {
            let [u, v] = offsets[face / 2];
            extent[0] = extent[0].max(u + self.width);
            extent[1] = extent[1].max(v + self.height);
        }
        extent
    }

    /// Check that every sampled texel lies inside the atlas.
    pub fn validate(&self) -> Result<()> {
        let [needed_u, needed_v] = self.atlas_extent();
        let in_bounds = self.u_offset >= 0.0
            && self.v_offset >= 0.0
            && needed_u <= ATLAS_WIDTH as f32
            && needed_v <= ATLAS_HEIGHT as f32;

        if in_bounds {
            Ok(())
        } else {
            Err(RigError::AtlasOutOfBounds {
                needed_u,
                needed_v,
                atlas_width: ATLAS_WIDTH,
                atlas_height: ATLAS_HEIGHT,
            })
        }
    }
}

/// Compute the flat UV attribute (`2 × vertex_count` floats) for a box.
///
/// Vertices past the last addressable face pair are left at `(0, 0)`.
pub fn box_uvs(spec: &BoxSpec, vertex_count: usize) -> Vec<f32> {
    let faces = spec.face_offsets();
    let atlas_w = ATLAS_WIDTH as f32;
    let atlas_h = ATLAS_HEIGHT as f32;
    let mut uvs = vec![0.0f32; vertex_count * 2];
    let addressable = faces.len() * 2 * VERTICES_PER_FACE;

    for i in 0..vertex_count.min(addressable) {
        let face_index = i / VERTICES_PER_FACE;
        let corner = i % VERTICES_PER_FACE;
        let [face_u, face_v] = faces[face_index / 2];

        let u = face_u / atlas_w;
        let v = face_v / atlas_h;
        let w = if corner == 0 || corner == 3 { spec.width / atlas_w } else { 0.0 };
        let h = if corner == 0 || corner == 1 { spec.height / atlas_h } else { 0.0 };

        uvs[i * 2] = u + w;
        // Atlas rows run top-down; box texture space runs bottom-up.
        uvs[i * 2 + 1] = 1.0 - (v + h);
    }

    uvs
}

/// Build a box whose UVs address `spec`'s region of the atlas.
pub fn minecraft_box(spec: &BoxSpec) -> Mesh {
    let mut mesh = box_mesh(spec.width, spec.height, spec.depth);
    let uvs = box_uvs(spec, mesh.vertex_count());
    mesh.set_uvs(&uvs);
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-6;

    fn specs() -> Vec<BoxSpec> {
        vec![
            BoxSpec::new(8.0, 8.0, 8.0, 0.0, 0.0),
            BoxSpec::new(2.0, 12.0, 2.0, 24.0, 0.0),
            BoxSpec::new(2.0, 12.0, 2.0, 16.0, 0.0),
            BoxSpec::new(2.0, 11.0, 2.0, 8.0, 0.0),
            BoxSpec::new(2.0, 11.0, 2.0, 40.0, 16.0),
        ]
    }

    #[test]
    fn test_uv_attribute_length() {
        for spec in specs() {
            let mesh = minecraft_box(&spec);
            assert_eq!(mesh.uvs_flat().len(), 2 * mesh.vertex_count());
            assert_eq!(mesh.vertex_count(), 24);
        }
    }

    #[test]
    fn test_uvs_stay_in_unit_range() {
        for spec in specs() {
            assert!(spec.validate().is_ok(), "{:?}", spec);
            for value in minecraft_box(&spec).uvs_flat() {
                assert!((0.0..=1.0).contains(&value), "{:?} -> {}", spec, value);
            }
        }
    }

    #[test]
    fn test_mapping_is_deterministic() {
        let spec = BoxSpec::new(2.0, 12.0, 2.0, 24.0, 0.0);
        assert_eq!(minecraft_box(&spec), minecraft_box(&spec));
    }

    #[test]
    fn test_head_front_first_vertex() {
        let mesh = minecraft_box(&BoxSpec::new(8.0, 8.0, 8.0, 0.0, 0.0));
        let [u, v] = mesh.vertices[0].uv;
        assert!((u - 0.125).abs() < EPS);
        assert!((v - (1.0 - 0.25)).abs() < EPS);
    }

    #[test]
    fn test_quad_corner_convention() {
        // Face 0, head: corners 0=(w,h) 1=(0,h) 2=(0,0) 3=(w,0) before the flip.
        let uvs = box_uvs(&BoxSpec::new(8.0, 8.0, 8.0, 0.0, 0.0), 4);
        let expected = [0.125, 0.75, 0.0, 0.75, 0.0, 1.0, 0.125, 1.0];
        for (got, want) in uvs.iter().zip(expected) {
            assert!((got - want).abs() < EPS);
        }
    }

    #[test]
    fn test_faces_are_paired() {
        let spec = BoxSpec::new(2.0, 12.0, 2.0, 24.0, 0.0);
        let uvs = box_uvs(&spec, 24);
        // Faces 0 and 1 share entry 0, faces 2 and 3 share entry 1.
        assert_eq!(uvs[0..8], uvs[8..16]);
        assert_eq!(uvs[16..24], uvs[24..32]);
        // Face 2, corner 2 sits on the back entry origin: u = (24 + 2 + 2) / 64.
        assert!((uvs[16 + 4] - 28.0 / 64.0).abs() < EPS);
        // Face 4, corner 2 sits on the top entry origin: u = (24 + 2) / 64.
        assert!((uvs[32 + 4] - 26.0 / 64.0).abs() < EPS);
    }

    #[test]
    fn test_v_offset_is_flipped() {
        let uvs = box_uvs(&BoxSpec::new(2.0, 11.0, 2.0, 40.0, 16.0), 4);
        // Corner 2 has no height offset: v = 1 - 16/32.
        assert!((uvs[5] - 0.5).abs() < EPS);
        // Corner 0 adds the height: v = 1 - 27/32.
        assert!((uvs[1] - 5.0 / 32.0).abs() < EPS);
    }

    #[test]
    fn test_positions_match_plain_box() {
        let spec = BoxSpec::new(2.0, 11.0, 2.0, 8.0, 0.0);
        let mapped = minecraft_box(&spec);
        let plain = box_mesh(2.0, 11.0, 2.0);
        assert_eq!(mapped.positions_flat(), plain.positions_flat());
        assert_eq!(mapped.indices, plain.indices);
    }

    #[test]
    fn test_atlas_extent_and_validation() {
        let head = BoxSpec::new(8.0, 8.0, 8.0, 0.0, 0.0);
        assert_eq!(head.atlas_extent(), [24.0, 8.0]);

        let too_wide = BoxSpec::new(8.0, 8.0, 8.0, 48.0, 0.0);
        assert!(matches!(
            too_wide.validate(),
            Err(RigError::AtlasOutOfBounds { needed_u, .. }) if needed_u == 72.0
        ));

        let too_tall = BoxSpec::new(2.0, 12.0, 2.0, 0.0, 24.0);
        assert!(too_tall.validate().is_err());

        let negative = BoxSpec::new(2.0, 2.0, 2.0, -1.0, 0.0);
        assert!(negative.validate().is_err());
    }

    #[test]
    fn test_oversized_vertex_count() {
        let uvs = box_uvs(&BoxSpec::new(8.0, 8.0, 8.0, 0.0, 0.0), 60);
        assert_eq!(uvs.len(), 120);
        assert_eq!(&uvs[96..], &[0.0; 24]);
    }

    #[test]
    fn test_out_of_bounds_spec_still_maps() {
        let mesh = minecraft_box(&BoxSpec::new(8.0, 8.0, 8.0, 60.0, 30.0));
        assert_eq!(mesh.vertex_count(), 24);
        assert!(mesh.uvs_flat().iter().any(|v| !(0.0..=1.0).contains(v)));
    }
}
