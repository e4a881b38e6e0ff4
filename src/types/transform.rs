//! Local transforms for scene nodes.

use glam::{Mat4, Vec3};

/// Convert degrees to radians.
pub fn to_radians(degrees: f32) -> f32 {
    degrees * std::f32::consts::PI / 180.0
}

/// Node-local transform: translate, then rotate (intrinsic XYZ), then scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Translation in parent units.
    pub position: [f32; 3],
    /// Rotation (x, y, z) in radians.
    pub rotation: [f32; 3],
    /// Scale factors.
    pub scale: [f32; 3],
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0, 0.0],
            rotation: [0.0, 0.0, 0.0],
            scale: [1.0, 1.0, 1.0],
        }
    }
}

impl Transform {
    pub fn from_position(position: [f32; 3]) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    pub fn with_uniform_scale(mut self, scale: f32) -> Self {
        self.scale = [scale; 3];
        self
    }

    /// Build the local matrix. Rotation order matches an XYZ Euler set:
    /// `Rx * Ry * Rz`.
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_translation(Vec3::from(self.position))
            * Mat4::from_rotation_x(self.rotation[0])
            * Mat4::from_rotation_y(self.rotation[1])
            * Mat4::from_rotation_z(self.rotation[2])
            * Mat4::from_scale(Vec3::from(self.scale))
    }
}
