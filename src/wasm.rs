//! WASM bindings for armor-stand-rig.
//!
//! This module provides JavaScript-friendly APIs for use in the browser.
//! Threads are unavailable there, so textures are handed over as bytes the
//! host has already fetched.

use crate::rig::ArmorStand;
use crate::scene::SceneGraph;
use crate::texture::{TextureSlot, TextureSource, TextureStatus};
use crate::types::{Joint, Pose};
use crate::{BoxSpec, RigConfig};
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn init() {
    // Set up better panic messages in the browser console
    console_error_panic_hook::set_once();
}

fn js_error(e: impl std::fmt::Display) -> JsError {
    JsError::new(&e.to_string())
}

/// A mounted armor stand and the scene it lives in.
#[wasm_bindgen]
pub struct ArmorStandHandle {
    stand: ArmorStand,
    scene: SceneGraph,
}

#[wasm_bindgen]
impl ArmorStandHandle {
    /// Create a stand from an optional JSON configuration.
    /// It shows the placeholder texture until `set_texture` is called.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<ArmorStandHandle, JsError> {
        let config = match config_json {
            Some(json) => RigConfig::from_json_str(&json).map_err(js_error)?,
            None => RigConfig::default(),
        };

        let slot = TextureSlot::placeholder(config.fallback_color);
        let mut stand = ArmorStand::with_texture_slot(config, slot);
        let mut scene = SceneGraph::new();
        stand.mount(&mut scene).map_err(js_error)?;

        Ok(ArmorStandHandle { stand, scene })
    }

    /// Replace the texture with PNG bytes. Returns false if decoding failed
    /// and the solid fallback is in use.
    pub fn set_texture(&mut self, data: &[u8]) -> bool {
        self.stand.set_texture(TextureSource::Bytes(data.to_vec()));
        self.stand.texture_status() == TextureStatus::Ready
    }

    /// Apply one frame (`{"head": {"x":..,"y":..,"z":..}, ...}`).
    /// Returns false while the model is not mounted.
    pub fn update(&mut self, frame_json: &str) -> Result<bool, JsError> {
        let pose = Pose::from_json_str(frame_json).map_err(js_error)?;
        Ok(self.stand.update(&mut self.scene, &pose) == crate::ApplyOutcome::Applied)
    }

    /// Local rotation of a joint in radians, as `[x, y, z]`.
    pub fn joint_rotation(&self, joint: &str) -> Result<Vec<f32>, JsError> {
        let joint: Joint = joint.parse().map_err(js_error)?;
        let rotation = self
            .stand
            .joint_rotation(&self.scene, joint)
            .ok_or_else(|| JsError::new("model is not mounted"))?;
        Ok(rotation.to_vec())
    }

    /// The atlas UV attribute of a posable part.
    pub fn uv_attribute(&self, joint: &str) -> Result<js_sys::Float32Array, JsError> {
        let joint: Joint = joint.parse().map_err(js_error)?;
        let uvs = self.stand.part_geometry(joint).uvs_flat();
        Ok(js_sys::Float32Array::from(uvs.as_slice()))
    }

    /// Export the current pose as GLB bytes.
    pub fn export_glb(&self) -> Result<Vec<u8>, JsError> {
        let output = self.stand.output(&self.scene).map_err(js_error)?;
        crate::export_glb(&output).map_err(js_error)
    }

    /// Get the total vertex count of the mounted model.
    pub fn vertex_count(&self) -> Result<usize, JsError> {
        let output = self.stand.output(&self.scene).map_err(js_error)?;
        Ok(output.total_vertices())
    }
}

/// Map a 24-vertex box onto the 64×32 atlas.
#[wasm_bindgen]
pub fn box_uvs(
    width: f32,
    height: f32,
    depth: f32,
    u_offset: f32,
    v_offset: f32,
) -> js_sys::Float32Array {
    let spec = BoxSpec::new(width, height, depth, u_offset, v_offset);
    let uvs = crate::box_uvs(&spec, 24);
    js_sys::Float32Array::from(uvs.as_slice())
}
