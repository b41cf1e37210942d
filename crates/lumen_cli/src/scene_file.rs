//! JSON scene documents.

use anyhow::{Context, Result};
use lumen_renderer::{Camera, CameraSettings, RenderConfig, Scene};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// A scene file: camera, world and optional render settings.
#[derive(Debug, Deserialize)]
pub struct SceneDocument {
    #[serde(default)]
    pub camera: CameraSettings,
    pub scene: Scene,
    #[serde(default)]
    pub render: RenderConfig,
}

impl SceneDocument {
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("Failed to parse scene document")
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read scene file {}", path.display()))?;
        let document = Self::from_json(&text)
            .with_context(|| format!("Invalid scene file {}", path.display()))?;
        log::info!(
            "Loaded {} ({} objects, {} lights)",
            path.display(),
            document.scene.len(),
            document.scene.lights().len()
        );
        Ok(document)
    }

    /// Camera matched to the image proportions of `config`.
    pub fn camera_for(&self, config: &RenderConfig) -> Camera {
        let mut camera = Camera::new(self.camera);
        camera.set_aspect_ratio(config.aspect_ratio());
        camera
    }
}
