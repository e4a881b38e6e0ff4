//! Background texture loading.
//!
//! A slot starts with a placeholder and a worker thread that fetches and
//! decodes the source. The render loop calls [`TextureSlot::poll`] each tick;
//! it never blocks. Byte sources resolve immediately without a thread.

use super::{load_texture_from_bytes, TextureData};
use crate::error::{Result, RigError};
use crate::mesher::{ATLAS_HEIGHT, ATLAS_WIDTH};
use crossbeam::channel::{bounded, Receiver, TryRecvError};
use std::path::PathBuf;
use std::thread;
use tracing::{debug, warn};

/// Where the shared texture comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum TextureSource {
    Url(String),
    Path(PathBuf),
    Bytes(Vec<u8>),
}

impl TextureSource {
    fn describe(&self) -> String {
        match self {
            TextureSource::Url(url) => url.clone(),
            TextureSource::Path(path) => path.display().to_string(),
            TextureSource::Bytes(bytes) => format!("<{} bytes>", bytes.len()),
        }
    }

    fn read(self) -> Result<Vec<u8>> {
        match self {
            TextureSource::Url(url) => fetch_url(&url),
            TextureSource::Path(path) => Ok(std::fs::read(path)?),
            TextureSource::Bytes(bytes) => Ok(bytes),
        }
    }
}

#[cfg(feature = "fetch")]
fn fetch_url(url: &str) -> Result<Vec<u8>> {
    let response = reqwest::blocking::get(url)
        .and_then(|r| r.error_for_status())
        .map_err(|e| RigError::Fetch(format!("{}: {}", url, e)))?;
    let bytes = response
        .bytes()
        .map_err(|e| RigError::Fetch(format!("{}: {}", url, e)))?;
    Ok(bytes.to_vec())
}

#[cfg(not(feature = "fetch"))]
fn fetch_url(url: &str) -> Result<Vec<u8>> {
    Err(RigError::Fetch(format!(
        "{}: built without the `fetch` feature",
        url
    )))
}

fn load(source: TextureSource) -> Result<TextureData> {
    let bytes = source.read()?;
    load_texture_from_bytes(&bytes)
}

/// Load progress of a [`TextureSlot`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureStatus {
    /// Still loading; the placeholder is in use.
    Pending,
    /// Loaded and reoriented.
    Ready,
    /// Load failed; a solid fallback is in use.
    Failed,
}

/// The shared texture of a model, filled in once its load completes.
#[derive(Debug)]
pub struct TextureSlot {
    texture: TextureData,
    status: TextureStatus,
    pending: Option<Receiver<Result<TextureData>>>,
    fallback_color: [u8; 4],
}

impl TextureSlot {
    /// Start loading `source`. Only byte sources complete before returning.
    pub fn load(source: TextureSource, fallback_color: [u8; 4]) -> Self {
        let placeholder = TextureData::solid(ATLAS_WIDTH, ATLAS_HEIGHT, fallback_color);
        let mut slot = Self {
            texture: placeholder,
            status: TextureStatus::Pending,
            pending: None,
            fallback_color,
        };

        let label = source.describe();
        if matches!(source, TextureSource::Bytes(_)) {
            slot.complete(load(source), &label);
            return slot;
        }

        let (tx, rx) = bounded(1);
        let spawned = thread::Builder::new()
            .name("texture-loader".to_string())
            .spawn(move || {
                let _ = tx.send(load(source));
            });

        match spawned {
            Ok(_) => slot.pending = Some(rx),
            Err(e) => slot.complete(Err(RigError::Io(e)), &label),
        }
        slot
    }

    /// A slot showing the placeholder until a source is supplied later.
    pub fn placeholder(fallback_color: [u8; 4]) -> Self {
        Self {
            texture: TextureData::solid(ATLAS_WIDTH, ATLAS_HEIGHT, fallback_color),
            status: TextureStatus::Pending,
            pending: None,
            fallback_color,
        }
    }

    /// A slot that is already resolved to `texture`.
    pub fn ready(texture: TextureData) -> Self {
        let mut slot = Self::placeholder([255, 255, 255, 255]);
        slot.complete(Ok(texture), "<memory>");
        slot
    }

    /// Pick up a finished load without blocking.
    pub fn poll(&mut self) -> TextureStatus {
        let Some(rx) = &self.pending else {
            return self.status;
        };

        let result = match rx.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return self.status,
            Err(TryRecvError::Disconnected) => {
                Err(RigError::Fetch("texture worker exited without a result".to_string()))
            }
        };
        self.pending = None;
        self.complete(result, "background load");
        self.status
    }

    /// Block until the load finishes. Used by offline exporters.
    pub fn wait(&mut self) -> TextureStatus {
        let Some(rx) = self.pending.take() else {
            return self.status;
        };

        let result = rx.recv().unwrap_or_else(|_| {
            Err(RigError::Fetch("texture worker exited without a result".to_string()))
        });
        self.complete(result, "background load");
        self.status
    }

    fn complete(&mut self, result: Result<TextureData>, label: &str) {
        match result {
            Ok(mut texture) => {
                texture.flip_y = false;
                debug!(width = texture.width, height = texture.height, "texture ready: {}", label);
                self.texture = texture;
                self.status = TextureStatus::Ready;
            }
            Err(e) => {
                warn!("texture load failed ({}), using solid fallback: {}", label, e);
                self.texture = TextureData::solid(ATLAS_WIDTH, ATLAS_HEIGHT, self.fallback_color);
                self.status = TextureStatus::Failed;
            }
        }
    }

    pub fn texture(&self) -> &TextureData {
        &self.texture
    }

    pub fn status(&self) -> TextureStatus {
        self.status
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FALLBACK: [u8; 4] = [200, 100, 50, 255];

    fn png_bytes() -> Vec<u8> {
        TextureData::solid(64, 32, [1, 2, 3, 255]).to_png().unwrap()
    }

    #[test]
    fn test_bytes_source_resolves_immediately() {
        let slot = TextureSlot::load(TextureSource::Bytes(png_bytes()), FALLBACK);
        assert_eq!(slot.status(), TextureStatus::Ready);
        assert!(!slot.texture().flip_y);
        assert_eq!(slot.texture().get_pixel(0, 0), Some([1, 2, 3, 255]));
    }

    #[test]
    fn test_bad_bytes_fall_back() {
        let slot = TextureSlot::load(TextureSource::Bytes(b"nope".to_vec()), FALLBACK);
        assert_eq!(slot.status(), TextureStatus::Failed);
        assert_eq!(slot.texture().width, ATLAS_WIDTH);
        assert_eq!(slot.texture().height, ATLAS_HEIGHT);
        assert_eq!(slot.texture().get_pixel(5, 5), Some(FALLBACK));
    }

    #[test]
    fn test_path_source_loads_in_background() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wood.png");
        std::fs::write(&path, png_bytes()).unwrap();

        let mut slot = TextureSlot::load(TextureSource::Path(path), FALLBACK);
        assert_eq!(slot.wait(), TextureStatus::Ready);
        assert!(!slot.texture().flip_y);
        // Further polls keep the result.
        assert_eq!(slot.poll(), TextureStatus::Ready);
    }

    #[test]
    fn test_missing_path_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let mut slot = TextureSlot::load(TextureSource::Path(dir.path().join("missing.png")), FALLBACK);
        assert_eq!(slot.wait(), TextureStatus::Failed);
        assert_eq!(slot.texture().get_pixel(0, 0), Some(FALLBACK));
    }

    #[test]
    fn test_poll_eventually_completes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wood.png");
        std::fs::write(&path, png_bytes()).unwrap();

        let mut slot = TextureSlot::load(TextureSource::Path(path), FALLBACK);
        let mut status = slot.poll();
        for _ in 0..500 {
            if status != TextureStatus::Pending {
                break;
            }
            std::thread::sleep(std::time::Duration::from_millis(10));
            status = slot.poll();
        }
        assert_eq!(status, TextureStatus::Ready);
    }

    #[cfg(not(feature = "fetch"))]
    #[test]
    fn test_url_without_fetch_falls_back() {
        let mut slot = TextureSlot::load(TextureSource::Url("https://example.invalid/wood.png".into()), FALLBACK);
        assert_eq!(slot.wait(), TextureStatus::Failed);
    }

    #[test]
    fn test_placeholder_stays_pending() {
        let mut slot = TextureSlot::placeholder(FALLBACK);
        assert_eq!(slot.poll(), TextureStatus::Pending);
        assert_eq!(slot.wait(), TextureStatus::Pending);
        assert!(slot.texture().flip_y);
        assert_eq!(slot.texture().get_pixel(0, 0), Some(FALLBACK));
    }

    #[test]
    fn test_ready_slot() {
        let slot = TextureSlot::ready(TextureData::solid(2, 2, [9, 9, 9, 255]));
        assert_eq!(slot.status(), TextureStatus::Ready);
        assert_eq!(slot.texture().width, 2);
    }
}
