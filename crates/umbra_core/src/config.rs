//! Render and camera settings.
//!
//! Defaults reproduce the classic "final scene" setup: a 1200x800 image at
//! 10 samples per pixel, viewed from (13, 2, 3) with a narrow lens.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use umbra_math::Vec3;

use crate::error::{CoreError, CoreResult};
use crate::scene::SceneDescription;

/// Image and sampling settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Samples per pixel for anti-aliasing
    pub samples_per_pixel: u32,
    /// Maximum number of scattering bounces
    pub max_depth: u32,
    /// Base seed for the per-pixel random streams
    pub seed: u64,
    /// Jitter samples inside each pixel; when off, every sample goes
    /// through the pixel center
    pub jitter: bool,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 800,
            samples_per_pixel: 10,
            max_depth: 50,
            seed: 0,
            jitter: true,
        }
    }
}

impl RenderSettings {
    /// Set image resolution.
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set quality settings.
    pub fn with_quality(mut self, samples_per_pixel: u32, max_depth: u32) -> Self {
        self.samples_per_pixel = samples_per_pixel;
        self.max_depth = max_depth;
        self
    }

    /// Set the base random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Enable or disable sub-pixel jitter.
    pub fn with_jitter(mut self, jitter: bool) -> Self {
        self.jitter = jitter;
        self
    }

    /// Width over height.
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Check that every count is positive.
    pub fn validate(&self) -> CoreResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(CoreError::InvalidSettings(format!(
                "image size must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        if self.samples_per_pixel == 0 {
            return Err(CoreError::InvalidSettings(
                "samples_per_pixel must be at least 1".into(),
            ));
        }
        if self.max_depth == 0 {
            return Err(CoreError::InvalidSettings(
                "max_depth must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Camera placement and lens settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    pub look_from: Vec3,
    pub look_at: Vec3,
    /// World "up" used to orient the image plane
    pub up: Vec3,
    /// Vertical field of view in degrees
    pub vfov: f32,
    /// Lens diameter; 0 gives a pinhole camera
    pub aperture: f32,
    /// Distance from the camera to the plane of perfect focus
    pub focus_dist: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            look_from: Vec3::new(13.0, 2.0, 3.0),
            look_at: Vec3::ZERO,
            up: Vec3::Y,
            vfov: 20.0,
            aperture: 0.1,
            focus_dist: 10.0,
        }
    }
}

impl CameraSettings {
    /// Set camera position.
    pub fn with_position(mut self, look_from: Vec3, look_at: Vec3, up: Vec3) -> Self {
        self.look_from = look_from;
        self.look_at = look_at;
        self.up = up;
        self
    }

    /// Set lens settings.
    pub fn with_lens(mut self, vfov: f32, aperture: f32, focus_dist: f32) -> Self {
        self.vfov = vfov;
        self.aperture = aperture;
        self.focus_dist = focus_dist;
        self
    }
}

/// A complete render job as stored on disk.
///
/// ```json
/// {
///   "render": { "width": 400, "height": 200, "samples_per_pixel": 50 },
///   "camera": { "look_from": [0, 0, 0], "look_at": [0, 0, -1], "vfov": 90 },
///   "scene": {
///     "materials": [{ "name": "red", "type": "lambertian", "albedo": [0.8, 0.3, 0.3] }],
///     "spheres": [{ "center": [0, 0, -1], "radius": 0.5, "material": "red" }]
///   }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneFile {
    #[serde(default)]
    pub render: RenderSettings,
    #[serde(default)]
    pub camera: CameraSettings,
    pub scene: SceneDescription,
}

impl SceneFile {
    /// Parse a scene file from a JSON string.
    pub fn from_json_str(source: &str) -> CoreResult<Self> {
        let file: SceneFile = serde_json::from_str(source)?;
        file.render.validate()?;
        Ok(file)
    }

    /// Load a scene file from disk.
    pub fn load(path: impl AsRef<Path>) -> CoreResult<Self> {
        let path = path.as_ref();
        let source = fs::read_to_string(path)?;
        let file = Self::from_json_str(&source)?;
        log::info!(
            "Loaded {} ({} materials, {} spheres)",
            path.display(),
            file.scene.materials.len(),
            file.scene.spheres.len()
        );
        Ok(file)
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json_string(&self) -> CoreResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
