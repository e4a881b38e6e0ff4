//! Error types for the armor stand rig.

use thiserror::Error;

/// Result type alias using RigError.
pub type Result<T> = std::result::Result<T, RigError>;

/// Main error type for rig construction, texture loading and export.
#[derive(Error, Debug)]
pub enum RigError {
    /// Failed to parse JSON data (poses, configuration).
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Failed to decode or encode an image.
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Texture could not be fetched from its source.
    #[error("Texture fetch error: {0}")]
    Fetch(String),

    /// Joint name is not one of the five posable parts.
    #[error("Unknown joint: {0}")]
    UnknownJoint(String),

    /// Scene node lookup failed.
    #[error("Scene node not found: {0}")]
    NodeNotFound(String),

    /// Scene node name already in use.
    #[error("Duplicate scene node name: {0}")]
    DuplicateNode(String),

    /// A box spec addresses texels outside the atlas.
    #[error("Box spec exceeds {atlas_width}x{atlas_height} atlas: needs {needed_u}x{needed_v} texels")]
    AtlasOutOfBounds {
        needed_u: f32,
        needed_v: f32,
        atlas_width: u32,
        atlas_height: u32,
    },

    /// Failed to format text output.
    #[error("Format error: {0}")]
    Fmt(#[from] std::fmt::Error),

    /// Failed to export mesh.
    #[error("Export error: {0}")]
    Export(String),
}
