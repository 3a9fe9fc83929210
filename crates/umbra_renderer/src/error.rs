//! Errors raised while building or rendering a world.

use thiserror::Error;
use umbra_core::CoreError;
use umbra_math::Vec3;

/// Material parameters that describe no physically meaningful surface.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum MaterialError {
    #[error("albedo {0} is not finite")]
    NonFiniteAlbedo(Vec3),

    #[error("fuzz {0} is not finite")]
    InvalidFuzz(f32),

    #[error("refractive index must be finite and positive, got {0}")]
    InvalidRefractiveIndex(f32),
}

/// Errors that can occur while building a world or rendering it.
#[derive(Error, Debug)]
pub enum RenderError {
    /// Camera or surface parameters that describe no usable geometry
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("Invalid material '{name}': {reason}")]
    InvalidMaterial {
        name: String,
        #[source]
        reason: MaterialError,
    },

    #[error("Unknown material '{0}'")]
    UnknownMaterial(String),

    #[error(transparent)]
    Settings(#[from] CoreError),

    #[error("Render cancelled")]
    Cancelled,
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RenderError>;
