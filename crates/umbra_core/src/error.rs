//! Errors for settings, scene loading and image output.

use thiserror::Error;

/// Errors that can occur while loading settings or writing images.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    #[error("Unsupported image format: {0}")]
    UnsupportedFormat(String),

    #[error("Expected {expected} pixels, got {actual}")]
    PixelCount { expected: usize, actual: usize },
}

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;
