//! Render and camera settings.
//!
//! Both halves deserialize from JSON with every field optional, so a config
//! file only needs to name what it changes:
//!
//! ```json
//! {
//!   "camera": { "resolution": [320, 180], "samples_per_pixel": 4 },
//!   "render": { "sampling": "Random", "seed": 7 }
//! }
//! ```

use std::path::Path;

use lume_math::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Color;

/// Errors that can occur while loading or validating settings.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Resolution must be non-zero, got {0}x{1}")]
    ZeroResolution(u32, u32),

    #[error("Samples per pixel must be at least 1")]
    ZeroSamples,

    #[error("Grid sampling needs a square sample count, got {0}")]
    NonSquareGrid(u32),

    #[error("Batch width must be at least 1")]
    ZeroBatchWidth,

    #[error("Invalid {name}: {value} (must be positive and finite)")]
    NonPositive { name: &'static str, value: f32 },
}

/// How sample offsets inside a pixel are chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Sampling {
    /// Deterministic `k x k` stratified grid; samples per pixel must be square.
    #[default]
    Grid,
    /// Uniform random jitter.
    Random,
}

/// Color returned for rays that escape the scene.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum Background {
    /// Vertical white-to-blue gradient.
    #[default]
    Sky,
    Solid(Color),
}

/// Settings for a render pass that don't belong to the camera.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    pub sampling: Sampling,
    /// Apply gamma 2 (square root) before storing a pixel
    pub gamma: bool,
    pub background: Background,
    /// Pixels per batch along a scanline
    pub batch_width: u32,
    /// Base seed; each batch derives its own stream from it
    pub seed: u64,
    /// Terminate deep bounces probabilistically instead of always following them
    pub russian_roulette: bool,
    /// Worker threads, 0 uses the global rayon pool
    pub worker_threads: usize,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            sampling: Sampling::Grid,
            gamma: true,
            background: Background::Sky,
            batch_width: 64,
            seed: 0,
            russian_roulette: false,
            worker_threads: 0,
        }
    }
}

impl RenderSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.batch_width == 0 {
            return Err(ConfigError::ZeroBatchWidth);
        }
        Ok(())
    }

    /// Check that a sample count suits the sampling pattern.
    pub fn validate_samples(&self, samples: u32) -> Result<(), ConfigError> {
        if samples == 0 {
            return Err(ConfigError::ZeroSamples);
        }
        if self.sampling == Sampling::Grid && grid_side(samples).is_none() {
            return Err(ConfigError::NonSquareGrid(samples));
        }
        Ok(())
    }
}

/// Side length of a square sample grid, if `samples` is a perfect square.
pub fn grid_side(samples: u32) -> Option<u32> {
    let side = (samples as f64).sqrt().round() as u64;
    (side * side == samples as u64).then_some(side as u32)
}

/// Serializable camera description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    pub resolution: (u32, u32),
    pub position: Vec3,
    pub look_at: Vec3,
    /// Roll about the view direction, in degrees
    pub rotation: f32,
    /// Size of the image plane in world units
    pub viewport: (f32, f32),
    /// Distance from the camera to the image plane
    pub focal_distance: f32,
    pub samples_per_pixel: u32,
    pub max_bounce_depth: u32,
    /// Orthographic projection
    pub perpendicular: bool,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            resolution: (640, 360),
            position: Vec3::new(0.0, 0.0, 5.0),
            look_at: Vec3::ZERO,
            rotation: 0.0,
            viewport: (3.2, 1.8),
            focal_distance: 5.0,
            samples_per_pixel: 1,
            max_bounce_depth: 2,
            perpendicular: false,
        }
    }
}

impl CameraSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let (w, h) = self.resolution;
        if w == 0 || h == 0 {
            return Err(ConfigError::ZeroResolution(w, h));
        }
        if self.samples_per_pixel == 0 {
            return Err(ConfigError::ZeroSamples);
        }
        require_positive("viewport width", self.viewport.0)?;
        require_positive("viewport height", self.viewport.1)?;
        require_positive("focal distance", self.focal_distance)?;
        Ok(())
    }
}

/// Fail with `ConfigError::NonPositive` unless `value` is finite and above zero.
pub fn require_positive(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { name, value })
    }
}

/// A complete render configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub camera: CameraSettings,
    pub render: RenderSettings,
}

impl Config {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_json_str(&json)?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Report the first invalid field, if any.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.camera.validate()?;
        self.render.validate()?;
        self.render.validate_samples(self.camera.samples_per_pixel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json() {
        let config = Config::from_json_str(
            r#"{
                "camera": { "resolution": [32, 16], "samples_per_pixel": 9 },
                "render": { "sampling": "Random", "seed": 7, "background": { "Solid": [0.1, 0.2, 0.3] } }
            }"#,
        )
        .unwrap();

        assert_eq!(config.camera.resolution, (32, 16));
        assert_eq!(config.camera.samples_per_pixel, 9);
        assert_eq!(config.camera.focal_distance, 5.0);
        assert_eq!(config.render.sampling, Sampling::Random);
        assert_eq!(config.render.seed, 7);
        assert_eq!(config.render.background, Background::Solid(Color::new(0.1, 0.2, 0.3)));
        assert!(config.render.gamma);
    }

    #[test]
    fn test_invalid_settings() {
        let mut config = Config::default();
        config.camera.resolution = (0, 10);
        assert!(matches!(config.validate(), Err(ConfigError::ZeroResolution(0, 10))));

        let mut config = Config::default();
        config.camera.samples_per_pixel = 0;
        assert!(matches!(config.validate(), Err(ConfigError::ZeroSamples)));

        let mut config = Config::default();
        config.camera.samples_per_pixel = 3;
        assert!(matches!(config.validate(), Err(ConfigError::NonSquareGrid(3))));
        config.render.sampling = Sampling::Random;
        assert!(config.validate().is_ok());

        let mut config = Config::default();
        config.render.batch_width = 0;
        assert!(matches!(config.validate(), Err(ConfigError::ZeroBatchWidth)));

        let mut config = Config::default();
        config.camera.focal_distance = -1.0;
        assert!(matches!(config.validate(), Err(ConfigError::NonPositive { .. })));
    }

    #[test]
    fn test_bad_json() {
        assert!(matches!(
            Config::from_json_str("{ not json"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            Config::from_file("no/such/config.json"),
            Err(ConfigError::Io { .. })
        ));
    }

    #[test]
    fn test_grid_side() {
        assert_eq!(grid_side(1), Some(1));
        assert_eq!(grid_side(16), Some(4));
        assert_eq!(grid_side(15), None);
        assert_eq!(grid_side(65535 * 65535), Some(65535));
        assert_eq!(grid_side(u32::MAX), None);
    }
}
