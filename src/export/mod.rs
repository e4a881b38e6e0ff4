//! Mesh export formats.
//!
//! Every exporter takes a baked [`RigOutput`](crate::rig::RigOutput) and
//! writes UVs in image space, matching what the live renderer samples.

pub mod gltf;
pub mod obj;
pub mod raw;

pub use gltf::export_glb;
pub use obj::{export_obj, ObjExport};
pub use raw::{export_raw, RawMeshData};
