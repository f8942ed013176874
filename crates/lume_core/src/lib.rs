//! Lume Core - scene description data shared by the renderer and its callers.
//!
//! This crate provides:
//!
//! - **Lights**: point, directional, spot and ambient light models
//! - **Textures**: the `Sampler` trait, image-backed `Texture` and procedural `Checker`
//! - **Configuration**: `RenderSettings` and `CameraSettings`, loadable from JSON
//!
//! # Example
//!
//! ```ignore
//! use lume_core::config::Config;
//!
//! let config = Config::from_file("render.json")?;
//! println!("{}x{} @ {} spp",
//!     config.camera.resolution.0,
//!     config.camera.resolution.1,
//!     config.camera.samples_per_pixel);
//! ```

pub mod config;
pub mod light;
pub mod texture;

use lume_math::Vec3;

/// Linear RGB color, channels nominally in [0, 1].
pub type Color = Vec3;

// Re-export commonly used types
pub use config::{grid_side, Background, CameraSettings, Config, ConfigError, RenderSettings, Sampling};
pub use light::{Light, LightKind, LightSample};
pub use texture::{Checker, Sampler, Texture, TextureError};
