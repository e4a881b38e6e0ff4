//! Texture data and loading.

pub mod loader;

pub use loader::{TextureSlot, TextureSource, TextureStatus};

use crate::error::Result;
use image::ImageEncoder;

/// Texture filtering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMode {
    /// No blending between texels; keeps pixel art sharp.
    Nearest,
    Linear,
}

/// Raw texture data loaded from PNG.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureData {
    /// Texture width in pixels.
    pub width: u32,
    /// Texture height in pixels.
    pub height: u32,
    /// RGBA8 pixel data (4 bytes per pixel).
    pub pixels: Vec<u8>,
    /// Minification and magnification filter.
    pub filter: FilterMode,
    /// Whether rows are flipped on upload, putting V=0 at the bottom of the
    /// image. Cleared once a load completes.
    pub flip_y: bool,
}

impl TextureData {
    /// Create a new texture from RGBA data.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        Self {
            width,
            height,
            pixels,
            filter: FilterMode::Nearest,
            flip_y: true,
        }
    }

    /// Create a texture filled with a single color.
    pub fn solid(width: u32, height: u32, color: [u8; 4]) -> Self {
        let pixels = color
            .iter()
            .copied()
            .cycle()
            .take((width * height * 4) as usize)
            .collect();
        Self::new(width, height, pixels)
    }

    /// Get a pixel at (x, y), or `None` outside the image.
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = ((y as usize * self.width as usize) + x as usize) * 4;
        let pixel = self.pixels.get(idx..idx + 4)?;
        Some([pixel[0], pixel[1], pixel[2], pixel[3]])
    }

    /// Map a renderer UV to image space (V=0 at the top row).
    pub fn image_space_uv(&self, uv: [f32; 2]) -> [f32; 2] {
        if self.flip_y {
            [uv[0], 1.0 - uv[1]]
        } else {
            uv
        }
    }

    /// Encode the texture as PNG.
    pub fn to_png(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        let cursor = std::io::Cursor::new(&mut bytes);
        let encoder = image::codecs::png::PngEncoder::new(cursor);

        encoder.write_image(
            &self.pixels,
            self.width,
            self.height,
            image::ExtendedColorType::Rgba8,
        )?;

        Ok(bytes)
    }
}

/// Load a texture from PNG bytes.
pub fn load_texture_from_bytes(data: &[u8]) -> Result<TextureData> {
    let img = image::load_from_memory(data)?;
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();

    Ok(TextureData::new(width, height, rgba.into_raw()))
}
