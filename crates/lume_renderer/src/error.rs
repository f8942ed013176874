//! Error types for scene construction and rendering.

use lume_core::ConfigError;
use thiserror::Error;

use crate::object::ObjectId;

/// Invalid shape parameters.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    #[error("Invalid {name}: {value} (must be non-negative and finite)")]
    InvalidLength { name: &'static str, value: f32 },
}

impl GeometryError {
    /// Accept a radius or height if it is finite and not negative.
    pub(crate) fn check_length(name: &'static str, value: f32) -> Result<f32, GeometryError> {
        if value.is_finite() && value >= 0.0 {
            Ok(value)
        } else {
            Err(GeometryError::InvalidLength { name, value })
        }
    }
}

/// Errors raised while building or editing a scene.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    #[error("Unknown object {0}")]
    UnknownObject(ObjectId),

    #[error("Object {0} already belongs to a group or the scene root")]
    AlreadyAttached(ObjectId),

    #[error("Bounding volume {0} cannot bound another bounding volume")]
    NestedBoundingVolume(ObjectId),

    #[error("Face {face} references vertex {vertex}, but the mesh has {len} vertices")]
    InvalidFace { face: usize, vertex: usize, len: usize },

    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

/// Errors that abort a render pass.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Camera must be initialized before rendering")]
    CameraNotInitialized,

    #[error("Pixel ({x}, {y}) is not a finite color")]
    NonFinitePixel { x: u32, y: u32 },

    #[error("Failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
