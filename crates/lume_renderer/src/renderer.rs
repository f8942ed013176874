//! Recursive ray casting and the parallel render pass.
//!
//! Implements:
//! - Direct shading with shadow rays plus recursive scatter up to a bounce limit
//! - Optional Russian roulette on deep bounces
//! - Multi-sample anti-aliasing with optional gamma correction
//! - Data-parallel batches on rayon, each with its own seeded RNG

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use lume_core::{Background, Color, Config, RenderSettings};
use lume_math::{Ray, Vec3};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use rayon::prelude::*;

use crate::batch::{batch_seed, generate_batches, render_batch};
use crate::sampling::{gen_f32, sample_offset};
use crate::{Camera, ObjectId, RenderError, Scene};

/// Trace `ray` and everything it scatters into.
///
/// Returns the object hit by this ray (not by its bounces) and the color it
/// carries back. `remaining` bounds the number of further bounces; `depth`
/// counts the bounces taken so far.
pub fn cast_ray(
    scene: &Scene,
    ray: Ray,
    remaining: u32,
    depth: u32,
    settings: &RenderSettings,
    rng: &mut dyn RngCore,
) -> (Option<ObjectId>, Color) {
    let mut ray = ray;
    let Some(hit) = scene.trace_nearest(&mut ray) else {
        return (None, background(settings.background, &ray));
    };

    let direct = scene.shade(&hit, &ray);
    if remaining == 0 {
        return (Some(hit.object), direct);
    }

    let Some(object) = scene.object(hit.object) else {
        return (Some(hit.object), direct);
    };
    let normal = scene.face_normal(&hit, &ray);
    let Some(scatter) = object.material.scatter(&ray, hit.point, normal, rng) else {
        return (Some(hit.object), direct);
    };

    let mut weight = scatter.weight;
    if settings.russian_roulette && depth > 0 {
        let survival = 0.5f32.powi(depth as i32);
        if gen_f32(rng) >= survival {
            return (Some(hit.object), direct);
        }
        weight /= survival;
    }

    let (_, bounced) = cast_ray(scene, scatter.ray, remaining - 1, depth + 1, settings, rng);
    (Some(hit.object), direct + weight * bounced)
}

/// Color for a ray that leaves the scene.
pub fn background(background: Background, ray: &Ray) -> Color {
    match background {
        Background::Solid(color) => color,
        Background::Sky => sky_gradient(ray),
    }
}

/// Compute sky gradient background.
fn sky_gradient(ray: &Ray) -> Color {
    let a = 0.5 * (ray.direction.y + 1.0);
    let white = Color::new(1.0, 1.0, 1.0);
    let blue = Color::new(0.5, 0.7, 1.0);
    white * (1.0 - a) + blue * a
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Convert a display color to 8-bit RGB.
pub fn color_to_rgb8(color: Color) -> [u8; 3] {
    let c = color.clamp(Vec3::ZERO, Vec3::ONE) * 255.0;
    [c.x.round() as u8, c.y.round() as u8, c.z.round() as u8]
}

/// Render a single pixel with multi-sampling.
///
/// Samples are averaged unclamped; the result is gamma corrected and then
/// clamped to [0, 1].
pub fn render_pixel(
    scene: &Scene,
    camera: &Camera,
    x: u32,
    y: u32,
    settings: &RenderSettings,
    rng: &mut dyn RngCore,
) -> Result<Color, RenderError> {
    let samples = camera.samples_per_pixel.max(1);
    let mut pixel_color = Color::ZERO;

    for i in 0..samples {
        let offset = sample_offset(settings.sampling, samples, i, rng);
        let ray = camera.ray_at(x, y, offset);
        let (_, color) = cast_ray(scene, ray, camera.max_depth, 0, settings, rng);
        if !color.is_finite() {
            return Err(RenderError::NonFinitePixel { x, y });
        }
        pixel_color += color;
    }

    // Average the samples
    let mut color = pixel_color / samples as f32;
    if settings.gamma {
        color = Color::new(
            linear_to_gamma(color.x),
            linear_to_gamma(color.y),
            linear_to_gamma(color.z),
        );
    }
    Ok(color.clamp(Vec3::ZERO, Vec3::ONE))
}

/// Row-major pixel buffer holding one complete frame.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; width as usize * height as usize],
        }
    }

    /// Get the pixel at (x, y).
    ///
    /// # Panics
    /// If (x, y) is outside the image.
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[self.index(x, y)]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        let index = self.index(x, y);
        self.pixels[index] = color;
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Convert to packed RGB bytes.
    pub fn to_rgb8(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|&c| color_to_rgb8(c)).collect()
    }

    /// Convert to packed RGBA bytes with opaque alpha.
    pub fn to_rgba8(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 4);
        for &color in &self.pixels {
            let [r, g, b] = color_to_rgb8(color);
            bytes.extend_from_slice(&[r, g, b, 255]);
        }
        bytes
    }
}

/// Render the entire scene to an image buffer.
pub fn render(
    scene: &Scene,
    camera: &Camera,
    settings: &RenderSettings,
) -> Result<ImageBuffer, RenderError> {
    render_with_progress(scene, camera, settings, &AtomicUsize::new(0))
}

/// Render the entire scene, counting finished batches in `progress`.
///
/// Blocks until every batch is done. Any batch failure fails the whole pass
/// and no partial image is returned.
pub fn render_with_progress(
    scene: &Scene,
    camera: &Camera,
    settings: &RenderSettings,
    progress: &AtomicUsize,
) -> Result<ImageBuffer, RenderError> {
    if !camera.is_initialized() {
        return Err(RenderError::CameraNotInitialized);
    }
    settings.validate()?;
    settings.validate_samples(camera.samples_per_pixel)?;

    let (width, height) = (camera.image_width, camera.image_height);
    let batches = generate_batches(width, height, settings.batch_width);
    let mut image = ImageBuffer::new(width, height);

    log::info!(
        "Rendering {}x{} @ {} spp, {} bounces, {} batches",
        width,
        height,
        camera.samples_per_pixel,
        camera.max_depth,
        batches.len()
    );
    let start = Instant::now();

    let run = |pixels: &mut [Color]| -> Result<(), RenderError> {
        // Same order as generate_batches: each scanline cut into batch_width runs
        let slices: Vec<&mut [Color]> = pixels
            .chunks_mut(width as usize)
            .flat_map(|row| row.chunks_mut(settings.batch_width as usize))
            .collect();

        batches
            .par_iter()
            .zip(slices.into_par_iter())
            .try_for_each(|(batch, slice)| {
                let mut rng = StdRng::seed_from_u64(batch_seed(settings.seed, batch.index));
                render_batch(batch, slice, scene, camera, settings, &mut rng)?;
                progress.fetch_add(1, Ordering::Relaxed);
                Ok(())
            })
    };

    if settings.worker_threads > 0 {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(settings.worker_threads)
            .build()?;
        log::debug!("Using dedicated pool of {} threads", settings.worker_threads);
        pool.install(|| run(&mut image.pixels))?;
    } else {
        run(&mut image.pixels)?;
    }

    log::info!("Render finished in {:.2?}", start.elapsed());
    Ok(image)
}

/// Where a [`RenderContext`] is in its current pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassState {
    Idle,
    Dispatching,
    Rendering,
    Complete,
}

/// Camera, settings and the last complete frame for an interactive caller.
///
/// Passes run through `&mut self`, so two can never overlap.
#[derive(Debug)]
pub struct RenderContext {
    camera: Camera,
    settings: RenderSettings,
    frame: Option<ImageBuffer>,
    state: PassState,
    progress: Arc<AtomicUsize>,
    total_batches: usize,
}

impl RenderContext {
    /// Create a context, deriving the camera basis.
    pub fn new(mut camera: Camera, settings: RenderSettings) -> Result<Self, RenderError> {
        camera.initialize()?;
        settings.validate()?;
        Ok(Self {
            camera,
            settings,
            frame: None,
            state: PassState::Idle,
            progress: Arc::new(AtomicUsize::new(0)),
            total_batches: 0,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, RenderError> {
        config.validate()?;
        Self::new(Camera::from_settings(&config.camera), config.render.clone())
    }

    /// Replace the camera, re-deriving its basis. The last frame is kept
    /// until the next successful pass.
    pub fn push_camera(&mut self, mut camera: Camera) -> Result<(), RenderError> {
        camera.initialize()?;
        self.camera = camera;
        self.state = PassState::Idle;
        Ok(())
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: RenderSettings) {
        self.settings = settings;
    }

    /// The last complete frame.
    pub fn frame(&self) -> Option<&ImageBuffer> {
        self.frame.as_ref()
    }

    pub fn state(&self) -> PassState {
        self.state
    }

    /// Batches finished and total batches of the current or last pass.
    pub fn progress(&self) -> (usize, usize) {
        (self.progress.load(Ordering::Relaxed), self.total_batches)
    }

    /// Shared counter of finished batches, for polling from another thread.
    pub fn progress_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.progress)
    }

    /// Render a new frame. On failure the previous frame is kept.
    pub fn render(&mut self, scene: &Scene) -> Result<&ImageBuffer, RenderError> {
        self.state = PassState::Dispatching;
        self.progress.store(0, Ordering::Relaxed);
        self.total_batches = generate_batches(
            self.camera.image_width,
            self.camera.image_height,
            self.settings.batch_width,
        )
        .len();

        self.state = PassState::Rendering;
        match render_with_progress(scene, &self.camera, &self.settings, &self.progress) {
            Ok(image) => {
                self.state = PassState::Complete;
                Ok(self.frame.insert(image))
            }
            Err(e) => {
                log::error!("Render pass failed: {}", e);
                self.state = PassState::Idle;
                Err(e)
            }
        }
    }

    /// The nearest object under the center of pixel (x, y).
    pub fn pick(&self, scene: &Scene, x: u32, y: u32) -> Option<ObjectId> {
        if x >= self.camera.image_width || y >= self.camera.image_height {
            return None;
        }
        let mut ray = self.camera.center_ray(x, y);
        scene.trace_nearest(&mut ray).map(|hit| hit.object)
    }
}
