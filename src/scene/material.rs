//! Surface materials for scene meshes.

use serde::{Deserialize, Serialize};

/// Physically-based material parameters. All materials sample the model's
/// shared texture.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Material {
    /// Surface roughness (0.0 = mirror, 1.0 = fully diffuse).
    pub roughness: f32,
    /// Metalness (0.0 = dielectric, 1.0 = metal).
    pub metalness: f32,
    /// Alpha-blended instead of opaque.
    pub transparent: bool,
}

impl Material {
    /// Opaque, fully rough, non-metallic.
    pub const fn plain() -> Self {
        Self {
            roughness: 1.0,
            metalness: 0.0,
            transparent: false,
        }
    }

    /// The posable parts' semi-transparent lit material.
    pub const fn standard() -> Self {
        Self {
            roughness: 0.95,
            metalness: 0.05,
            transparent: true,
        }
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::plain()
    }
}
