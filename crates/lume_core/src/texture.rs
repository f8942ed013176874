//! Texture samplers for materials.
//!
//! Primitives hand materials a surface parameterization (u, v); a sampler
//! turns it into a color. Decoding image files is delegated to the `image`
//! crate; anything fancier (cubemaps, mip chains) belongs to the caller.

use std::path::Path;

use lume_math::{Vec2, Vec3};
use thiserror::Error;

use crate::Color;

/// Errors that can occur during texture loading.
#[derive(Error, Debug)]
pub enum TextureError {
    #[error("Failed to load texture {path}: {source}")]
    Load {
        path: String,
        #[source]
        source: image::ImageError,
    },

    #[error("Texture {0} has no pixels")]
    Empty(String),
}

pub type TextureResult<T> = Result<T, TextureError>;

/// Anything that maps surface coordinates to a color.
///
/// Samplers are shared read-only between render workers.
pub trait Sampler: Send + Sync {
    /// Color at surface coordinates `uv`. Coordinates are unbounded; samplers
    /// decide how to wrap them.
    fn sample(&self, uv: Vec2) -> Color;
}

/// An image texture with bilinear filtering and repeat wrapping.
#[derive(Clone, Debug)]
pub struct Texture {
    /// Texture width in pixels
    pub width: u32,

    /// Texture height in pixels
    pub height: u32,

    /// Linear RGB pixels, row-major
    pub pixels: Vec<[f32; 3]>,

    /// How many times the image repeats per unit of surface coordinate
    pub scale: f32,

    /// Original file path (for debugging)
    pub path: String,
}

impl Texture {
    /// Create a new texture from pixel data.
    pub fn new(width: u32, height: u32, pixels: Vec<[f32; 3]>, path: impl Into<String>) -> Self {
        Self {
            width,
            height,
            pixels,
            scale: 1.0,
            path: path.into(),
        }
    }

    /// Create a solid color texture (1x1).
    pub fn solid_color(color: Color) -> Self {
        Self::new(1, 1, vec![[color.x, color.y, color.z]], "<solid>")
    }

    /// Decode an image file into a texture.
    pub fn open(path: impl AsRef<Path>) -> TextureResult<Self> {
        let path = path.as_ref();
        let display = path.display().to_string();

        let img = image::open(path).map_err(|source| TextureError::Load {
            path: display.clone(),
            source,
        })?;

        let rgb = img.to_rgb8();
        let (width, height) = rgb.dimensions();
        if width == 0 || height == 0 {
            return Err(TextureError::Empty(display));
        }

        let pixels = rgb
            .pixels()
            .map(|p| [srgb_to_linear(p[0]), srgb_to_linear(p[1]), srgb_to_linear(p[2])])
            .collect();

        log::debug!("Loaded texture: {} ({}x{})", display, width, height);

        Ok(Self::new(width, height, pixels, display))
    }

    /// Like [`Texture::open`], but falls back to a solid color when the file
    /// can't be loaded.
    pub fn open_or_solid(path: impl AsRef<Path>, fallback: Color) -> Self {
        match Self::open(path) {
            Ok(texture) => texture,
            Err(e) => {
                log::warn!("{}, using solid color", e);
                Self::solid_color(fallback)
            }
        }
    }

    /// Set how many times the image repeats per unit of surface coordinate.
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    /// Get pixel at integer coordinates.
    fn get_pixel(&self, x: u32, y: u32) -> Vec3 {
        let idx = (y * self.width + x) as usize;
        self.pixels
            .get(idx)
            .map(|&p| Vec3::from(p))
            .unwrap_or(Vec3::ZERO)
    }
}

impl Sampler for Texture {
    fn sample(&self, uv: Vec2) -> Color {
        if self.width == 0 || self.height == 0 {
            return Color::ZERO;
        }

        // Repeat wrap
        let u = (uv.x * self.scale).rem_euclid(1.0);
        let v = (uv.y * self.scale).rem_euclid(1.0);

        let x = u * (self.width - 1) as f32;
        let y = (1.0 - v) * (self.height - 1) as f32; // Image rows run top-down

        let x0 = x.floor() as u32;
        let y0 = y.floor() as u32;
        let x1 = (x0 + 1).min(self.width - 1);
        let y1 = (y0 + 1).min(self.height - 1);
        let fx = x.fract();
        let fy = y.fract();

        let top = self.get_pixel(x0, y0).lerp(self.get_pixel(x1, y0), fx);
        let bottom = self.get_pixel(x0, y1).lerp(self.get_pixel(x1, y1), fx);
        top.lerp(bottom, fy)
    }
}

/// Procedural two-color checkerboard.
#[derive(Clone, Debug)]
pub struct Checker {
    pub even: Color,
    pub odd: Color,
    /// Size of one square in surface units
    pub size: f32,
}

impl Checker {
    pub fn new(even: Color, odd: Color, size: f32) -> Self {
        Self { even, odd, size }
    }
}

impl Sampler for Checker {
    fn sample(&self, uv: Vec2) -> Color {
        let cell = (uv / self.size).floor();
        if (cell.x as i64 + cell.y as i64).rem_euclid(2) == 0 {
            self.even
        } else {
            self.odd
        }
    }
}

/// Convert sRGB byte value to linear float.
fn srgb_to_linear(value: u8) -> f32 {
    let v = value as f32 / 255.0;
    if v <= 0.04045 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solid_color_texture() {
        let tex = Texture::solid_color(Vec3::new(1.0, 0.5, 0.0));
        let sample = tex.sample(Vec2::new(0.5, 0.5));
        assert!((sample - Vec3::new(1.0, 0.5, 0.0)).length() < 0.001);

        // Repeats outside [0, 1)
        let wrapped = tex.sample(Vec2::new(-3.25, 7.5));
        assert!((wrapped - sample).length() < 0.001);
    }

    #[test]
    fn test_bilinear_blend() {
        // 2x1 texture: black on the left, white on the right
        let tex = Texture::new(2, 1, vec![[0.0; 3], [1.0; 3]], "<test>");
        let mid = tex.sample(Vec2::new(0.5, 0.0));
        assert!((mid.x - 0.5).abs() < 0.001);
    }

    #[test]
    fn test_checker() {
        let checker = Checker::new(Color::ONE, Color::ZERO, 1.0);
        assert_eq!(checker.sample(Vec2::new(0.5, 0.5)), Color::ONE);
        assert_eq!(checker.sample(Vec2::new(1.5, 0.5)), Color::ZERO);
        assert_eq!(checker.sample(Vec2::new(-0.5, 0.5)), Color::ZERO);
        assert_eq!(checker.sample(Vec2::new(-0.5, -0.5)), Color::ONE);
    }

    #[test]
    fn test_missing_file() {
        let err = Texture::open("definitely/not/here.png").unwrap_err();
        assert!(matches!(err, TextureError::Load { .. }));

        let fallback = Texture::open_or_solid("definitely/not/here.png", Color::new(0.0, 1.0, 0.0));
        assert_eq!((fallback.width, fallback.height), (1, 1));
        assert_eq!(fallback.sample(Vec2::new(0.3, 0.7)), Color::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_srgb_to_linear() {
        assert!((srgb_to_linear(0) - 0.0).abs() < 0.001);
        assert!((srgb_to_linear(255) - 1.0).abs() < 0.001);

        // Mid-gray is darker in linear
        let mid = srgb_to_linear(128);
        assert!(mid < 0.5 && mid > 0.1);
    }
}
