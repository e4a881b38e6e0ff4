//! Scene graph arena.
//!
//! Nodes live in a flat table and are addressed by [`NodeId`] or by a unique
//! name. Removed slots are never reused, so an id that outlives its node
//! resolves to `None` instead of aliasing a newer node.

pub mod material;

pub use material::Material;

use crate::error::{Result, RigError};
use crate::mesher::Mesh;
use crate::types::Transform;
use glam::Mat4;
use std::collections::HashMap;
use std::sync::Arc;

/// Stable handle to a scene node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// What a mesh is part of, independent of how it is shaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshRole {
    /// Fixed geometry: base, stand, shoulder.
    Structure,
    /// A posable part.
    Part,
}

/// Geometry attached to a node.
#[derive(Debug, Clone)]
pub struct MeshInstance {
    /// Shared, immutable geometry in node-local space.
    pub mesh: Arc<Mesh>,
    pub material: Material,
    pub role: MeshRole,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
}

impl MeshInstance {
    /// A shadow-casting, shadow-receiving instance.
    pub fn lit(mesh: Arc<Mesh>, material: Material, role: MeshRole) -> Self {
        Self {
            mesh,
            material,
            role,
            cast_shadow: true,
            receive_shadow: true,
        }
    }
}

/// A node in the scene graph.
#[derive(Debug, Clone)]
pub struct Node {
    pub name: Option<String>,
    pub transform: Transform,
    pub mesh: Option<MeshInstance>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// A mesh carried into world space.
#[derive(Debug, Clone)]
pub struct BakedMesh {
    pub mesh: Mesh,
    pub material: Material,
    pub role: MeshRole,
}

/// Arena of scene nodes.
#[derive(Debug, Default)]
pub struct SceneGraph {
    nodes: Vec<Option<Node>>,
    names: HashMap<String, NodeId>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node under `parent` (or as a root). Names must be unique.
    pub fn add_node(
        &mut self,
        parent: Option<NodeId>,
        name: Option<&str>,
        transform: Transform,
        mesh: Option<MeshInstance>,
    ) -> Result<NodeId> {
        if let Some(name) = name {
            if self.names.contains_key(name) {
                return Err(RigError::DuplicateNode(name.to_string()));
            }
        }
        if let Some(parent) = parent {
            if self.get(parent).is_none() {
                return Err(RigError::NodeNotFound(format!("{:?}", parent)));
            }
        }

        let id = NodeId(self.nodes.len());
        self.nodes.push(Some(Node {
            name: name.map(str::to_string),
            transform,
            mesh,
            parent,
            children: Vec::new(),
        }));

        if let Some(parent) = parent.and_then(|p| self.get_mut(p)) {
            parent.children.push(id);
        }
        if let Some(name) = name {
            self.names.insert(name.to_string(), id);
        }

        Ok(id)
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0).and_then(Option::as_mut)
    }

    /// Look a node up by name.
    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.names.get(name).copied()
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Overwrite a node's local rotation. Returns false if the node is gone.
    pub fn set_rotation(&mut self, id: NodeId, rotation: [f32; 3]) -> bool {
        match self.get_mut(id) {
            Some(node) => {
                node.transform.rotation = rotation;
                true
            }
            None => false,
        }
    }

    /// Remove a node and its whole subtree.
    pub fn remove(&mut self, id: NodeId) -> Option<Node> {
        let node = self.nodes.get_mut(id.0)?.take()?;

        if let Some(name) = &node.name {
            self.names.remove(name);
        }
        if let Some(parent) = node.parent.and_then(|p| self.get_mut(p)) {
            parent.children.retain(|child| *child != id);
        }
        for child in node.children.clone() {
            self.remove(child);
        }

        Some(node)
    }

    /// Product of all local matrices from the root down to `id`.
    pub fn world_matrix(&self, id: NodeId) -> Option<Mat4> {
        let node = self.get(id)?;
        let local = node.transform.matrix();
        match node.parent {
            Some(parent) => Some(self.world_matrix(parent)? * local),
            None => Some(local),
        }
    }

    /// Every mesh in `root`'s subtree, transformed to world space, in
    /// depth-first insertion order.
    pub fn bake(&self, root: NodeId) -> Vec<BakedMesh> {
        let mut baked = Vec::new();
        let parent_matrix = self
            .get(root)
            .and_then(|node| node.parent)
            .and_then(|parent| self.world_matrix(parent))
            .unwrap_or(Mat4::IDENTITY);
        self.bake_into(root, parent_matrix, &mut baked);
        baked
    }

    fn bake_into(&self, id: NodeId, parent_matrix: Mat4, baked: &mut Vec<BakedMesh>) {
        let Some(node) = self.get(id) else {
            return;
        };
        let matrix = parent_matrix * node.transform.matrix();

        if let Some(instance) = &node.mesh {
            baked.push(BakedMesh {
                mesh: instance.mesh.transformed(&matrix),
                material: instance.material,
                role: instance.role,
            });
        }
        for child in &node.children {
            self.bake_into(*child, matrix, baked);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesher::box_mesh;
    use glam::Vec3;

    fn cube() -> Arc<Mesh> {
        Arc::new(box_mesh(2.0, 2.0, 2.0))
    }

    #[test]
    fn test_add_and_find() {
        let mut scene = SceneGraph::new();
        let root = scene.add_node(None, Some("root"), Transform::default(), None).unwrap();
        let child = scene
            .add_node(Some(root), Some("child"), Transform::default(), None)
            .unwrap();

        assert_eq!(scene.find("root"), Some(root));
        assert_eq!(scene.find("child"), Some(child));
        assert_eq!(scene.get(child).unwrap().parent(), Some(root));
        assert_eq!(scene.get(root).unwrap().children(), &[child]);
        assert_eq!(scene.len(), 2);
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let mut scene = SceneGraph::new();
        scene.add_node(None, Some("head"), Transform::default(), None).unwrap();
        assert!(matches!(
            scene.add_node(None, Some("head"), Transform::default(), None),
            Err(RigError::DuplicateNode(_))
        ));
    }

    #[test]
    fn test_missing_parent_rejected() {
        let mut scene = SceneGraph::new();
        let root = scene.add_node(None, None, Transform::default(), None).unwrap();
        scene.remove(root);
        assert!(matches!(
            scene.add_node(Some(root), None, Transform::default(), None),
            Err(RigError::NodeNotFound(_))
        ));
    }

    #[test]
    fn test_remove_subtree_and_stale_ids() {
        let mut scene = SceneGraph::new();
        let root = scene.add_node(None, Some("root"), Transform::default(), None).unwrap();
        let child = scene
            .add_node(Some(root), Some("child"), Transform::default(), None)
            .unwrap();

        assert!(scene.remove(root).is_some());
        assert!(scene.is_empty());
        assert!(scene.find("child").is_none());
        assert!(!scene.set_rotation(child, [1.0, 0.0, 0.0]));

        // New nodes never take over old ids.
        let fresh = scene.add_node(None, Some("child"), Transform::default(), None).unwrap();
        assert_ne!(fresh, child);
        assert!(scene.get(child).is_none());
    }

    #[test]
    fn test_world_matrix_composes_parents() {
        let mut scene = SceneGraph::new();
        let root = scene
            .add_node(None, None, Transform::default().with_uniform_scale(0.5), None)
            .unwrap();
        let child = scene
            .add_node(Some(root), None, Transform::from_position([4.0, 0.0, 0.0]), None)
            .unwrap();

        let p = scene.world_matrix(child).unwrap().transform_point3(Vec3::ZERO);
        assert!((p - Vec3::new(2.0, 0.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn test_bake_transforms_meshes() {
        let mut scene = SceneGraph::new();
        let root = scene.add_node(None, None, Transform::default(), None).unwrap();
        scene
            .add_node(
                Some(root),
                None,
                Transform::from_position([0.0, 10.0, 0.0]),
                Some(MeshInstance::lit(cube(), Material::standard(), MeshRole::Part)),
            )
            .unwrap();

        let baked = scene.bake(root);
        assert_eq!(baked.len(), 1);
        assert_eq!(baked[0].material, Material::standard());
        assert_eq!(baked[0].role, MeshRole::Part);
        let bounds = baked[0].mesh.bounds().unwrap();
        assert_eq!(bounds.min, [-1.0, 9.0, -1.0]);
        assert_eq!(bounds.max, [1.0, 11.0, 1.0]);
    }

    #[test]
    fn test_set_rotation_overwrites() {
        let mut scene = SceneGraph::new();
        let id = scene.add_node(None, None, Transform::default(), None).unwrap();
        assert!(scene.set_rotation(id, [0.1, 0.2, 0.3]));
        assert!(scene.set_rotation(id, [0.0, 0.5, 0.0]));
        assert_eq!(scene.get(id).unwrap().transform.rotation, [0.0, 0.5, 0.0]);
    }
}
