//! Mesh generation for box-built models.
//!
//! [`box_geometry`] emits plain boxes; [`box_uv`] re-maps their UVs onto a
//! Minecraft-style spritesheet.

pub mod box_geometry;
pub mod box_uv;
pub mod geometry;

pub use box_geometry::box_mesh;
pub use box_uv::{box_uvs, minecraft_box, BoxSpec, ATLAS_HEIGHT, ATLAS_WIDTH};
pub use geometry::{Mesh, Vertex};
