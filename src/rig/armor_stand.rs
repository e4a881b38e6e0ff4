//! Armor stand model layout.
//!
//! Positions are in model units (1/16 block) relative to the model root,
//! which sits on the floor at the center of the base plate. Box geometry is
//! centered on each node's origin.

use crate::config::RigConfig;
use crate::error::{Result, RigError};
use crate::mesher::{box_mesh, minecraft_box, BoxSpec, Mesh};
use crate::scene::{MeshInstance, MeshRole, NodeId, SceneGraph};
use crate::types::{Joint, Transform};
use std::sync::Arc;
use tracing::{debug, warn};

/// A posable part: its joint, atlas-mapped box and pivot position.
#[derive(Debug, Clone, Copy)]
pub struct PartDef {
    pub joint: Joint,
    pub spec: BoxSpec,
    pub position: [f32; 3],
}

/// A fixed structural box using the default per-face UVs.
#[derive(Debug, Clone, Copy)]
pub struct StructureDef {
    pub name: &'static str,
    pub size: [f32; 3],
    pub position: [f32; 3],
}

pub static PART_DEFS: [PartDef; 5] = [
    PartDef {
        joint: Joint::Head,
        spec: BoxSpec::new(8.0, 8.0, 8.0, 0.0, 0.0),
        position: [0.0, 32.0, 0.0],
    },
    PartDef {
        joint: Joint::LeftArm,
        spec: BoxSpec::new(2.0, 12.0, 2.0, 24.0, 0.0),
        position: [5.0, 28.0, 0.0],
    },
    PartDef {
        joint: Joint::RightArm,
        spec: BoxSpec::new(2.0, 12.0, 2.0, 16.0, 0.0),
        position: [-5.0, 28.0, 0.0],
    },
    PartDef {
        joint: Joint::LeftLeg,
        spec: BoxSpec::new(2.0, 11.0, 2.0, 8.0, 0.0),
        position: [2.0, 12.0, 0.0],
    },
    PartDef {
        joint: Joint::RightLeg,
        spec: BoxSpec::new(2.0, 11.0, 2.0, 40.0, 16.0),
        position: [-2.0, 12.0, 0.0],
    },
];

pub static STRUCTURE_DEFS: [StructureDef; 3] = [
    StructureDef {
        name: "base",
        size: [12.0, 1.0, 12.0],
        position: [0.0, 0.0, 0.0],
    },
    StructureDef {
        name: "stand",
        size: [2.0, 31.0, 2.0],
        position: [0.0, 15.5, 0.0],
    },
    StructureDef {
        name: "shoulder",
        size: [12.0, 2.0, 2.0],
        position: [0.0, 28.0, 0.0],
    },
];

/// Scene node name for a part of the model labelled `label`.
pub fn node_name(label: &str, part: &str) -> String {
    format!("{}/{}", label, part)
}

/// Geometry for every box of the model, built once and shared by the scene.
#[derive(Debug, Clone)]
pub struct ModelGeometry {
    /// Indexed by joint, in `PART_DEFS` order.
    parts: Vec<Arc<Mesh>>,
    structures: Vec<Arc<Mesh>>,
}

impl ModelGeometry {
    pub fn build() -> Self {
        let parts = PART_DEFS
            .iter()
            .map(|def| Arc::new(minecraft_box(&def.spec)))
            .collect();
        let structures = STRUCTURE_DEFS
            .iter()
            .map(|def| Arc::new(box_mesh(def.size[0], def.size[1], def.size[2])))
            .collect();

        Self { parts, structures }
    }

    /// The atlas-mapped box of a posable part.
    pub fn part(&self, joint: Joint) -> &Arc<Mesh> {
        &self.parts[joint as usize]
    }
}

/// Warn about part specs that sample outside the atlas.
pub fn check_atlas_bounds() -> usize {
    let mut violations = 0;
    for def in &PART_DEFS {
        if let Err(e) = def.spec.validate() {
            warn!(joint = %def.joint, "{}", e);
            violations += 1;
        }
    }
    violations
}

/// Every scene name a model labelled `label` occupies, root first.
pub fn node_names(label: &str) -> Vec<String> {
    let mut names = vec![label.to_string()];
    names.extend(STRUCTURE_DEFS.iter().map(|def| node_name(label, def.name)));
    for def in &PART_DEFS {
        names.push(node_name(label, def.joint.name()));
        names.push(node_name(label, &format!("{}_mesh", def.joint.name())));
    }
    names
}

/// Create the model's nodes in `scene` and return the root.
///
/// Fails without touching `scene` if any of the model's names is taken.
pub fn assemble(
    scene: &mut SceneGraph,
    label: &str,
    geometry: &ModelGeometry,
    config: &RigConfig,
) -> Result<NodeId> {
    if let Some(taken) = node_names(label).into_iter().find(|name| scene.find(name).is_some()) {
        return Err(RigError::DuplicateNode(taken));
    }

    let root = scene.add_node(
        None,
        Some(label),
        Transform::default().with_uniform_scale(config.scale),
        None,
    )?;

    if let Err(e) = add_children(scene, root, label, geometry, config) {
        scene.remove(root);
        return Err(e);
    }

    debug!(label, nodes = scene.len(), "assembled armor stand");
    Ok(root)
}

fn add_children(
    scene: &mut SceneGraph,
    root: NodeId,
    label: &str,
    geometry: &ModelGeometry,
    config: &RigConfig,
) -> Result<()> {
    for (def, mesh) in STRUCTURE_DEFS.iter().zip(&geometry.structures) {
        scene.add_node(
            Some(root),
            Some(&node_name(label, def.name)),
            Transform::from_position(def.position),
            Some(MeshInstance::lit(mesh.clone(), config.plain_material, MeshRole::Structure)),
        )?;
    }

    // Each posable part is a rotatable group holding its mesh at the pivot.
    for def in &PART_DEFS {
        let group = scene.add_node(
            Some(root),
            Some(&node_name(label, def.joint.name())),
            Transform::from_position(def.position),
            None,
        )?;
        scene.add_node(
            Some(group),
            Some(&node_name(label, &format!("{}_mesh", def.joint.name()))),
            Transform::default(),
            Some(MeshInstance::lit(
                geometry.part(def.joint).clone(),
                config.standard_material,
                MeshRole::Part,
            )),
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Material;

    #[test]
    fn test_part_defs_follow_joint_order() {
        for (def, joint) in PART_DEFS.iter().zip(Joint::ALL) {
            assert_eq!(def.joint, joint);
            assert_eq!(joint as usize, PART_DEFS.iter().position(|d| d.joint == joint).unwrap());
        }
    }

    #[test]
    fn test_part_defs_fit_atlas() {
        assert_eq!(check_atlas_bounds(), 0);
    }

    #[test]
    fn test_geometry_is_shared() {
        let geometry = ModelGeometry::build();
        let head = geometry.part(Joint::Head);
        assert_eq!(head.vertex_count(), 24);
        assert!((head.vertices[0].uv[0] - 0.125).abs() < 1e-6);
        assert_eq!(geometry.structures.len(), 3);
    }

    #[test]
    fn test_assemble_hierarchy() {
        let mut scene = SceneGraph::new();
        let geometry = ModelGeometry::build();
        let config = RigConfig::default();
        let root = assemble(&mut scene, "stand", &geometry, &config).unwrap();

        // root + 3 structures + 5 groups + 5 part meshes
        assert_eq!(scene.len(), 14);
        assert_eq!(scene.get(root).unwrap().transform.scale, [0.0625; 3]);

        let head = scene.find("stand/head").unwrap();
        let head_node = scene.get(head).unwrap();
        assert_eq!(head_node.transform.position, [0.0, 32.0, 0.0]);
        assert!(head_node.mesh.is_none());

        let head_mesh = scene.get(head_node.children()[0]).unwrap();
        let instance = head_mesh.mesh.as_ref().unwrap();
        assert_eq!(instance.material, Material::standard());
        assert_eq!(instance.role, MeshRole::Part);
        assert!(instance.cast_shadow && instance.receive_shadow);

        let base = scene.get(scene.find("stand/base").unwrap()).unwrap();
        let base_instance = base.mesh.as_ref().unwrap();
        assert_eq!(base_instance.material, Material::plain());
        assert_eq!(base_instance.role, MeshRole::Structure);
        assert_eq!(base_instance.mesh.vertices[0].uv, [0.0, 1.0]);
    }

    #[test]
    fn test_assemble_twice_with_same_label_fails() {
        let mut scene = SceneGraph::new();
        let geometry = ModelGeometry::build();
        let config = RigConfig::default();
        assemble(&mut scene, "stand", &geometry, &config).unwrap();
        assert!(assemble(&mut scene, "stand", &geometry, &config).is_err());
        assert!(assemble(&mut scene, "other", &geometry, &config).is_ok());
    }

    #[test]
    fn test_node_names_cover_assembly() {
        let mut scene = SceneGraph::new();
        let geometry = ModelGeometry::build();
        assemble(&mut scene, "stand", &geometry, &RigConfig::default()).unwrap();

        let names = node_names("stand");
        assert_eq!(names.len(), scene.len());
        assert!(names.iter().all(|name| scene.find(name).is_some()));
    }

    #[test]
    fn test_clashing_part_name_leaves_scene_untouched() {
        let mut scene = SceneGraph::new();
        let foreign = scene
            .add_node(None, Some("stand/left_leg"), Transform::default(), None)
            .unwrap();
        let geometry = ModelGeometry::build();

        let result = assemble(&mut scene, "stand", &geometry, &RigConfig::default());
        assert!(matches!(result, Err(RigError::DuplicateNode(ref name)) if name == "stand/left_leg"));
        assert_eq!(scene.len(), 1);
        assert!(scene.find("stand").is_none());
        assert!(scene.find("stand/head").is_none());
        assert_eq!(scene.find("stand/left_leg"), Some(foreign));
    }
}
