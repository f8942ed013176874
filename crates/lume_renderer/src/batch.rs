//! Scanline batches for parallel rendering.
//!
//! The image is split row-major into runs of at most `batch_width` pixels
//! along each scanline. Batches cover the image exactly once and map onto
//! disjoint slices of the output buffer, so workers never share pixels.

use lume_core::{Color, RenderSettings};
use rand::RngCore;

use crate::renderer::render_pixel;
use crate::{Camera, RenderError, Scene};

/// A run of pixels on one scanline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Batch {
    /// X coordinate of the first pixel
    pub x: u32,
    /// Scanline
    pub y: u32,
    /// Number of pixels in the run
    pub width: u32,
    /// Position in render order, also used to seed the batch RNG
    pub index: usize,
}

impl Batch {
    /// Offset of the first pixel in a row-major buffer of `image_width` columns.
    pub fn start(&self, image_width: u32) -> usize {
        self.y as usize * image_width as usize + self.x as usize
    }
}

/// Default batch width in pixels.
pub const DEFAULT_BATCH_WIDTH: u32 = 64;

/// Split a `width x height` image into scanline batches, in buffer order.
pub fn generate_batches(width: u32, height: u32, batch_width: u32) -> Vec<Batch> {
    let batch_width = batch_width.max(1);
    let mut batches = Vec::new();
    let mut index = 0;

    for y in 0..height {
        let mut x = 0;
        while x < width {
            let w = batch_width.min(width - x);
            batches.push(Batch { x, y, width: w, index });
            index += 1;
            x += batch_width;
        }
    }

    batches
}

/// Per-batch RNG seed, decorrelated from neighbouring batches.
pub fn batch_seed(seed: u64, index: usize) -> u64 {
    seed ^ (index as u64 + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

/// Render one batch into `pixels`, which must hold exactly `batch.width` colors.
pub fn render_batch(
    batch: &Batch,
    pixels: &mut [Color],
    scene: &Scene,
    camera: &Camera,
    settings: &RenderSettings,
    rng: &mut dyn RngCore,
) -> Result<(), RenderError> {
    for (offset, pixel) in pixels.iter_mut().enumerate().take(batch.width as usize) {
        let x = batch.x + offset as u32;
        *pixel = render_pixel(scene, camera, x, batch.y, settings, rng)?;
    }
    Ok(())
}
