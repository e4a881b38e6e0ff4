//! Per-tick pose application.

use super::armor_stand::node_name;
use crate::scene::{NodeId, SceneGraph};
use crate::types::{Joint, Pose};

/// Result of one [`PoseApplicator::apply`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// All five joints were written.
    Applied,
    /// The model is not mounted, or at least one joint node does not exist
    /// yet (or any more); nothing was written.
    NotReady,
}

/// Writes a [`Pose`] onto the joint nodes of one model.
///
/// Joint nodes are resolved by name on every call rather than cached, so the
/// applicator never holds a handle that outlives the model.
#[derive(Debug, Clone)]
pub struct PoseApplicator {
    node_names: [String; 5],
}

impl PoseApplicator {
    pub fn new(label: &str) -> Self {
        Self {
            node_names: Joint::ALL.map(|joint| node_name(label, joint.name())),
        }
    }

    /// Scene name of a joint's group node.
    pub fn node_name(&self, joint: Joint) -> &str {
        &self.node_names[joint as usize]
    }

    /// Resolve all joint nodes, or `None` if any is missing.
    pub fn resolve(&self, scene: &SceneGraph) -> Option<[NodeId; 5]> {
        let [head, left_arm, right_arm, left_leg, right_leg] = &self.node_names;
        Some([
            scene.find(head)?,
            scene.find(left_arm)?,
            scene.find(right_arm)?,
            scene.find(left_leg)?,
            scene.find(right_leg)?,
        ])
    }

    /// Overwrite each joint's rotation with the pose, converted to radians.
    pub fn apply(&self, scene: &mut SceneGraph, pose: &Pose) -> ApplyOutcome {
        let Some(handles) = self.resolve(scene) else {
            return ApplyOutcome::NotReady;
        };

        for (joint, id) in Joint::ALL.into_iter().zip(handles) {
            scene.set_rotation(id, pose.get(joint).to_radians());
        }
        ApplyOutcome::Applied
    }
}
