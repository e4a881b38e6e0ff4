//! The posable armor stand.
//!
//! [`ArmorStand`] owns the shared geometry and texture, places its nodes in a
//! host-owned [`SceneGraph`] on [`mount`](ArmorStand::mount), and rotates
//! them on every [`update`](ArmorStand::update).

pub mod armor_stand;
pub mod pose;

pub use armor_stand::{ModelGeometry, PartDef, StructureDef, PART_DEFS, STRUCTURE_DEFS};
pub use pose::{ApplyOutcome, PoseApplicator};

use crate::config::RigConfig;
use crate::error::{Result, RigError};
use crate::mesher::Mesh;
use crate::scene::{Material, MeshRole, NodeId, SceneGraph};
use crate::texture::{TextureData, TextureSlot, TextureSource, TextureStatus};
use crate::types::{BoundingBox, Joint, Pose};
use std::sync::Arc;
use tracing::debug;

/// Default root node name.
pub const DEFAULT_LABEL: &str = "armor_stand";

/// A posed armor stand baked to world space.
///
/// The meshes are split by role, not by blending: `opaque_mesh` always holds
/// the structure and `transparent_mesh` the posable parts, whatever the
/// configured materials say.
#[derive(Debug)]
pub struct RigOutput {
    /// Base, stand and shoulder.
    pub opaque_mesh: Mesh,
    /// The five posable parts.
    pub transparent_mesh: Mesh,
    /// Material of the structure.
    pub opaque_material: Material,
    /// Material of the posable parts.
    pub transparent_material: Material,
    /// Shared texture at the time of the snapshot.
    pub texture: TextureData,
    pub bounds: BoundingBox,
}

impl RigOutput {
    /// Structure followed by parts in one mesh. Drops the material split.
    pub fn mesh(&self) -> Mesh {
        let mut combined = self.opaque_mesh.clone();
        combined.merge(&self.transparent_mesh);
        combined
    }

    /// Get total vertex count across both meshes.
    pub fn total_vertices(&self) -> usize {
        self.opaque_mesh.vertex_count() + self.transparent_mesh.vertex_count()
    }

    /// Get total triangle count across both meshes.
    pub fn total_triangles(&self) -> usize {
        self.opaque_mesh.triangle_count() + self.transparent_mesh.triangle_count()
    }
}

/// A posable armor stand.
pub struct ArmorStand {
    config: RigConfig,
    label: String,
    geometry: ModelGeometry,
    texture: TextureSlot,
    applicator: PoseApplicator,
    root: Option<NodeId>,
}

impl ArmorStand {
    /// Create a stand and start loading the configured texture URL.
    pub fn new(config: RigConfig) -> Self {
        let source = TextureSource::Url(config.texture_url.clone());
        Self::with_texture(config, source)
    }

    /// Create a stand that loads its texture from `source`.
    pub fn with_texture(config: RigConfig, source: TextureSource) -> Self {
        let texture = TextureSlot::load(source, config.fallback_color);
        Self::with_texture_slot(config, texture)
    }

    /// Create a stand around an existing texture slot.
    pub fn with_texture_slot(config: RigConfig, texture: TextureSlot) -> Self {
        if config.validate_atlas_bounds {
            armor_stand::check_atlas_bounds();
        }

        Self {
            geometry: ModelGeometry::build(),
            texture,
            applicator: PoseApplicator::new(DEFAULT_LABEL),
            label: DEFAULT_LABEL.to_string(),
            root: None,
            config,
        }
    }

    /// Use a different root name so several stands can share one scene.
    /// Takes effect on the next mount.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self.applicator = PoseApplicator::new(&self.label);
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn config(&self) -> &RigConfig {
        &self.config
    }

    /// Add the model's nodes to `scene`. Mounting an already mounted stand
    /// returns the existing root.
    pub fn mount(&mut self, scene: &mut SceneGraph) -> Result<NodeId> {
        if let Some(root) = self.mounted_root(scene) {
            return Ok(root);
        }

        let root = armor_stand::assemble(scene, &self.label, &self.geometry, &self.config)?;
        self.root = Some(root);
        Ok(root)
    }

    /// Remove the model's nodes from `scene`.
    pub fn unmount(&mut self, scene: &mut SceneGraph) -> bool {
        let removed = self
            .root
            .take()
            .and_then(|root| scene.remove(root))
            .is_some();
        if removed {
            debug!(label = %self.label, "unmounted armor stand");
        }
        removed
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Per-tick entry point: pick up a finished texture load, then pose the
    /// joints.
    pub fn update(&mut self, scene: &mut SceneGraph, pose: &Pose) -> ApplyOutcome {
        self.texture.poll();
        if self.mounted_root(scene).is_none() {
            return ApplyOutcome::NotReady;
        }
        self.applicator.apply(scene, pose)
    }

    fn mounted_root(&self, scene: &SceneGraph) -> Option<NodeId> {
        self.root.filter(|root| scene.get(*root).is_some())
    }

    /// Current local rotation (radians) of a joint, if mounted.
    pub fn joint_rotation(&self, scene: &SceneGraph, joint: Joint) -> Option<[f32; 3]> {
        let id = scene.find(self.applicator.node_name(joint))?;
        Some(scene.get(id)?.transform.rotation)
    }

    /// The atlas-mapped geometry of a posable part.
    pub fn part_geometry(&self, joint: Joint) -> &Arc<Mesh> {
        self.geometry.part(joint)
    }

    /// Replace the texture, starting a new load from `source`.
    pub fn set_texture(&mut self, source: TextureSource) {
        self.texture = TextureSlot::load(source, self.config.fallback_color);
    }

    pub fn texture(&self) -> &TextureData {
        self.texture.texture()
    }

    pub fn texture_status(&self) -> TextureStatus {
        self.texture.status()
    }

    /// Block until the texture load finishes. For offline export only.
    pub fn wait_for_texture(&mut self) -> TextureStatus {
        self.texture.wait()
    }

    /// Bake the mounted model, in its current pose, to world space.
    pub fn output(&self, scene: &SceneGraph) -> Result<RigOutput> {
        let root = self
            .mounted_root(scene)
            .ok_or_else(|| RigError::NodeNotFound(self.label.clone()))?;

        let mut opaque_mesh = Mesh::new();
        let mut transparent_mesh = Mesh::new();
        for baked in scene.bake(root) {
            match baked.role {
                MeshRole::Structure => opaque_mesh.merge(&baked.mesh),
                MeshRole::Part => transparent_mesh.merge(&baked.mesh),
            }
        }

        let bounds = BoundingBox::from_points(
            opaque_mesh
                .vertices
                .iter()
                .chain(&transparent_mesh.vertices)
                .map(|v| v.position),
        )
        .unwrap_or(BoundingBox::new([0.0; 3], [0.0; 3]));

        Ok(RigOutput {
            opaque_mesh,
            transparent_mesh,
            opaque_material: self.config.plain_material,
            transparent_material: self.config.standard_material,
            texture: self.texture.texture().clone(),
            bounds,
        })
    }
}
