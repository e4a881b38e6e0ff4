//! # Armor Stand Rig
//!
//! A posable Minecraft armor stand built from textured boxes.
//!
//! ## Overview
//!
//! The model is eight boxes: a base plate, a central stand and a shoulder bar
//! that never move, plus a head, two arms and two legs that rotate about
//! their pivots. Posable parts sample a 64×32 spritesheet through the
//! Minecraft box UV layout; the structure uses plain per-face UVs.
//!
//! ## Quick Start
//!
//! ```ignore
//! use armor_stand_rig::{ArmorStand, Pose, RigConfig, SceneGraph, export_glb};
//!
//! let mut scene = SceneGraph::new();
//! let mut stand = ArmorStand::new(RigConfig::default());
//! stand.mount(&mut scene)?;
//!
//! // Once per tick
//! let pose = Pose::from_json_str(frame_json)?;
//! stand.update(&mut scene, &pose);
//!
//! // Offline snapshot
//! stand.wait_for_texture();
//! let glb_bytes = export_glb(&stand.output(&scene)?)?;
//! ```
//!
//! ## UV Mapping Only
//!
//! The box UV mapper works on its own for any box-built entity model:
//!
//! ```ignore
//! use armor_stand_rig::{BoxSpec, minecraft_box};
//!
//! let head = minecraft_box(&BoxSpec::new(8.0, 8.0, 8.0, 0.0, 0.0));
//! ```

pub mod config;
pub mod error;
pub mod export;
pub mod mesher;
pub mod rig;
pub mod scene;
pub mod texture;
pub mod types;

// Re-export main types for convenience
pub use config::RigConfig;
pub use error::{Result, RigError};
pub use export::gltf::export_glb;
pub use export::obj::{export_obj, ObjExport};
pub use export::raw::{export_raw, RawMeshData};
pub use mesher::{box_mesh, box_uvs, minecraft_box, BoxSpec, Mesh, Vertex};
pub use rig::{ApplyOutcome, ArmorStand, PoseApplicator, RigOutput};
pub use scene::{Material, MeshRole, NodeId, SceneGraph};
pub use texture::{TextureData, TextureSlot, TextureSource, TextureStatus};
pub use types::{BoundingBox, EulerDegrees, Joint, Pose, Transform};

/// Parse a sequence of pose frames from a JSON array.
pub fn load_frames(json: &str) -> Result<Vec<Pose>> {
    Ok(serde_json::from_str(json)?)
}

#[cfg(feature = "wasm")]
pub mod wasm;
