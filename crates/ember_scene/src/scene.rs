//! Renderable scene: geometry, camera and environment.

use ember_renderer::{Camera, CameraConfig, Color, HittableList};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while building or loading a scene.
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid scene JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown scene preset: {0}")]
    UnknownPreset(String),

    #[error("Unknown material: {0}")]
    UnknownMaterial(String),

    #[error("Unknown texture: {0}")]
    UnknownTexture(String),

    #[error("Texture references form a cycle through '{0}'")]
    TextureCycle(String),

    #[error("Invalid {what}: {reason}")]
    InvalidParameter { what: String, reason: String },
}

pub type SceneResult<T> = Result<T, SceneError>;

impl SceneError {
    pub(crate) fn invalid(what: impl Into<String>, reason: impl Into<String>) -> Self {
        SceneError::InvalidParameter {
            what: what.into(),
            reason: reason.into(),
        }
    }
}

/// Largest pixel count accepted for a render.
pub const MAX_IMAGE_PIXELS: u64 = u32::MAX as u64;

/// Suggested render settings that travel with a scene.
///
/// Command-line options override these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneSettings {
    pub image_width: u32,
    pub samples_per_pixel: u32,
    pub max_depth: u32,
}

impl Default for SceneSettings {
    fn default() -> Self {
        Self {
            image_width: 400,
            samples_per_pixel: 100,
            max_depth: 50,
        }
    }
}

/// Everything the renderer needs besides the render settings.
///
/// The world is built once and only read afterward.
#[derive(Debug, Clone)]
pub struct Scene {
    pub world: HittableList,
    pub camera: CameraConfig,
    /// Radiance of rays that escape the scene
    pub background: Color,
    pub settings: SceneSettings,
}

impl Scene {
    pub fn new(world: HittableList, camera: CameraConfig, background: Color) -> Self {
        Self {
            world,
            camera,
            background,
            settings: SceneSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: SceneSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Image height for `width`, from the camera's aspect ratio (at least 1).
    pub fn image_height(&self, width: u32) -> u32 {
        let aspect = self.camera.aspect_ratio;
        if aspect <= 0.0 || !aspect.is_finite() {
            return width.max(1);
        }
        ((width as f32 / aspect) as u32).max(1)
    }

    /// Image dimensions for `width`, rejecting sizes too large to allocate.
    pub fn image_size(&self, width: u32) -> SceneResult<(u32, u32)> {
        let height = self.image_height(width);
        let pixels = width as u64 * height as u64;
        if pixels > MAX_IMAGE_PIXELS {
            return Err(SceneError::invalid(
                "image size",
                format!(
                    "{}x{} is {} pixels, more than the limit of {}",
                    width, height, pixels, MAX_IMAGE_PIXELS
                ),
            ));
        }
        Ok((width, height))
    }

    /// Derive the immutable render camera.
    pub fn build_camera(&self) -> Camera {
        self.camera.build()
    }
}
