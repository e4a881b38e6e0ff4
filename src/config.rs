//! Rig configuration.

use crate::error::Result;
use crate::scene::Material;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// The wooden armor stand spritesheet (64×32).
pub const DEFAULT_TEXTURE_URL: &str = "https://raw.githubusercontent.com/InventivetalentDev/minecraft-assets/1.19.3/assets/minecraft/textures/entity/armorstand/wood.png";

/// Armor stand rig configuration.
///
/// Every field has a default, so a JSON config only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RigConfig {
    /// Uniform scale applied at the model root (model units → blocks).
    pub scale: f32,
    /// Default texture location.
    pub texture_url: String,
    /// Color of the placeholder used while loading and after a failed load.
    pub fallback_color: [u8; 4],
    /// Material for the posable parts.
    pub standard_material: Material,
    /// Material for the base, stand and shoulder.
    pub plain_material: Material,
    /// Check part atlas bounds when the model is assembled.
    pub validate_atlas_bounds: bool,
}

impl Default for RigConfig {
    fn default() -> Self {
        Self {
            scale: 1.0 / 16.0,
            texture_url: DEFAULT_TEXTURE_URL.to_string(),
            fallback_color: [143, 118, 69, 255],
            standard_material: Material::standard(),
            plain_material: Material::plain(),
            validate_atlas_bounds: cfg!(debug_assertions),
        }
    }
}

impl RigConfig {
    /// Parse a JSON config.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a JSON config file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_texture_url(mut self, url: impl Into<String>) -> Self {
        self.texture_url = url.into();
        self
    }

    pub fn with_fallback_color(mut self, color: [u8; 4]) -> Self {
        self.fallback_color = color;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RigConfig::default();
        assert_eq!(config.scale, 0.0625);
        assert_eq!(config.texture_url, DEFAULT_TEXTURE_URL);
        assert!(config.standard_material.transparent);
        assert!(!config.plain_material.transparent);
    }

    #[test]
    fn test_partial_json() {
        let config = RigConfig::from_json_str(
            r#"{"scale": 0.5, "standard_material": {"roughness": 0.5}}"#,
        )
        .unwrap();
        assert_eq!(config.scale, 0.5);
        assert_eq!(config.standard_material.roughness, 0.5);
        // Unspecified material fields fall back to the plain defaults.
        assert_eq!(config.standard_material.metalness, 0.0);
        assert_eq!(config.texture_url, DEFAULT_TEXTURE_URL);
    }

    #[test]
    fn test_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rig.json");
        std::fs::write(&path, r#"{"fallback_color": [1, 2, 3, 4]}"#).unwrap();

        let config = RigConfig::from_path(&path).unwrap();
        assert_eq!(config.fallback_color, [1, 2, 3, 4]);
    }

    #[test]
    fn test_builders() {
        let config = RigConfig::default()
            .with_scale(1.0)
            .with_texture_url("file.png")
            .with_fallback_color([0, 0, 0, 255]);
        assert_eq!(config.scale, 1.0);
        assert_eq!(config.texture_url, "file.png");
        assert_eq!(config.fallback_color, [0, 0, 0, 255]);
    }
}
