//! Umbra Core - scene description, settings and image output.
//!
//! This crate provides:
//!
//! - **Settings**: `RenderSettings` and `CameraSettings`, loadable from JSON
//! - **Scene description**: named materials plus spheres referencing them,
//!   with the built-in `random` and `three_spheres` presets
//! - **Image output**: plain-text P3 PPM and any format the `image` crate
//!   can encode (PNG, JPEG)
//!
//! Nothing here knows how to trace a ray; `umbra_renderer` turns a
//! `SceneDescription` into something it can render.
//!
//! # Example
//!
//! ```ignore
//! use umbra_core::SceneFile;
//!
//! let file = SceneFile::load("scene.json")?;
//! println!("{} spheres, {} materials",
//!     file.scene.spheres.len(),
//!     file.scene.materials.len());
//! ```

pub mod config;
pub mod error;
pub mod output;
pub mod scene;

// Re-export commonly used types
pub use config::{CameraSettings, RenderSettings, SceneFile};
pub use error::{CoreError, CoreResult};
pub use output::{save_image, write_ppm, ImageFormat};
pub use scene::{MaterialDesc, MaterialKind, SceneDescription, SphereDesc};
