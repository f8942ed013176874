//! Camera for ray generation.

use lume_core::config::require_positive;
use lume_core::{CameraSettings, ConfigError};
use lume_math::{Ray, Vec2, Vec3, Vec3Ext};

/// Camera for generating rays into the scene.
///
/// Configure with the `with_*` builders, then call [`Camera::initialize`]
/// before generating rays. Any builder call invalidates the derived basis.
#[derive(Debug, Clone)]
pub struct Camera {
    // Image settings
    pub image_width: u32,
    pub image_height: u32,
    pub samples_per_pixel: u32,
    pub max_depth: u32,

    // Camera positioning
    position: Vec3,
    look_at: Vec3,
    world_up: Vec3,
    rotation: f32, // Roll in degrees

    // Image plane
    viewport: Vec2,
    vfov: Option<f32>, // Overrides the viewport height when set
    focal_distance: f32,
    perpendicular: bool,

    // Cached computed values (set by initialize())
    initialized: bool,
    direction: Vec3,
    right: Vec3,
    up: Vec3,
    pixel00: Vec3,
    pixel_delta_u: Vec3,
    pixel_delta_v: Vec3,
}

impl Camera {
    /// Create a new camera with default settings.
    pub fn new() -> Self {
        Self {
            image_width: 640,
            image_height: 360,
            samples_per_pixel: 1,
            max_depth: 2,
            position: Vec3::new(0.0, 0.0, 5.0),
            look_at: Vec3::ZERO,
            world_up: Vec3::Y,
            rotation: 0.0,
            viewport: Vec2::new(3.2, 1.8),
            vfov: None,
            focal_distance: 5.0,
            perpendicular: false,
            initialized: false,
            direction: -Vec3::Z,
            right: Vec3::X,
            up: Vec3::Y,
            pixel00: Vec3::ZERO,
            pixel_delta_u: Vec3::ZERO,
            pixel_delta_v: Vec3::ZERO,
        }
    }

    /// Build an uninitialized camera from serialized settings.
    pub fn from_settings(settings: &CameraSettings) -> Self {
        Self::new()
            .with_resolution(settings.resolution.0, settings.resolution.1)
            .with_quality(settings.samples_per_pixel, settings.max_bounce_depth)
            .with_position(settings.position, settings.look_at, Vec3::Y)
            .with_viewport(settings.viewport.0, settings.viewport.1, settings.focal_distance)
            .with_rotation(settings.rotation)
            .with_perpendicular(settings.perpendicular)
    }

    /// Set image resolution.
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.image_width = width;
        self.image_height = height;
        self.initialized = false;
        self
    }

    /// Set quality settings.
    pub fn with_quality(mut self, samples: u32, max_depth: u32) -> Self {
        self.samples_per_pixel = samples;
        self.max_depth = max_depth;
        self.initialized = false;
        self
    }

    /// Set camera position.
    pub fn with_position(mut self, position: Vec3, look_at: Vec3, up: Vec3) -> Self {
        self.position = position;
        self.look_at = look_at;
        self.world_up = up;
        self.initialized = false;
        self
    }

    /// Set the image plane size in world units and its distance from the camera.
    pub fn with_viewport(mut self, width: f32, height: f32, focal_distance: f32) -> Self {
        self.viewport = Vec2::new(width, height);
        self.focal_distance = focal_distance;
        self.vfov = None;
        self.initialized = false;
        self
    }

    /// Size the image plane from a vertical field of view in degrees, keeping
    /// the pixel aspect ratio square.
    pub fn with_fov(mut self, vfov: f32) -> Self {
        self.vfov = Some(vfov);
        self.initialized = false;
        self
    }

    /// Roll about the view direction, in degrees.
    pub fn with_rotation(mut self, degrees: f32) -> Self {
        self.rotation = degrees;
        self.initialized = false;
        self
    }

    /// Use an orthographic projection.
    pub fn with_perpendicular(mut self, perpendicular: bool) -> Self {
        self.perpendicular = perpendicular;
        self.initialized = false;
        self
    }

    /// Validate settings and derive the basis and pixel grid.
    pub fn initialize(&mut self) -> Result<(), ConfigError> {
        if self.image_width == 0 || self.image_height == 0 {
            return Err(ConfigError::ZeroResolution(self.image_width, self.image_height));
        }
        if self.samples_per_pixel == 0 {
            return Err(ConfigError::ZeroSamples);
        }
        require_positive("focal distance", self.focal_distance)?;
        require_positive("view distance", (self.look_at - self.position).length())?;

        if let Some(vfov) = self.vfov {
            if !(vfov > 0.0 && vfov < 180.0) {
                return Err(ConfigError::NonPositive {
                    name: "field of view",
                    value: vfov,
                });
            }
            let height = 2.0 * (vfov.to_radians() / 2.0).tan() * self.focal_distance;
            let aspect = self.image_width as f32 / self.image_height as f32;
            self.viewport = Vec2::new(height * aspect, height);
        }
        require_positive("viewport width", self.viewport.x)?;
        require_positive("viewport height", self.viewport.y)?;

        // Calculate camera basis vectors
        self.direction = (self.look_at - self.position).normalize();
        let mut right = self.direction.cross(self.world_up).normalize_or_zero();
        if right == Vec3::ZERO {
            // Looking straight along `up`
            right = self.direction.cross(Vec3::X).normalize_or_zero();
            if right == Vec3::ZERO {
                right = self.direction.cross(Vec3::Z).normalize();
            }
        }
        let up = right.cross(self.direction);

        let roll = self.rotation.to_radians();
        self.right = right.rotate_about(self.direction, roll);
        self.up = up.rotate_about(self.direction, roll);

        // Calculate pixel delta vectors
        let pixel_size = Vec2::new(
            self.viewport.x / self.image_width as f32,
            self.viewport.y / self.image_height as f32,
        );
        self.pixel_delta_u = self.right * pixel_size.x;
        self.pixel_delta_v = -self.up * pixel_size.y;

        // Center of the top-left pixel
        self.pixel00 = self.position + self.direction * self.focal_distance
            - self.right * (self.viewport.x - pixel_size.x) / 2.0
            + self.up * (self.viewport.y - pixel_size.y) / 2.0;

        self.initialized = true;

        log::debug!(
            "Camera basis: dir={:?} right={:?} up={:?} ({}x{}, {})",
            self.direction,
            self.right,
            self.up,
            self.image_width,
            self.image_height,
            if self.perpendicular { "orthographic" } else { "perspective" }
        );

        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Generate the ray through pixel (x, y), displaced by `offset` pixels
    /// from the pixel center.
    pub fn ray_at(&self, x: u32, y: u32, offset: Vec2) -> Ray {
        let point = self.pixel00
            + (x as f32 + offset.x) * self.pixel_delta_u
            + (y as f32 + offset.y) * self.pixel_delta_v;

        if self.perpendicular {
            Ray::new(point - self.direction * self.focal_distance, self.direction)
        } else {
            Ray::new(self.position, point - self.position)
        }
    }

    /// The ray through the center of pixel (x, y).
    pub fn center_ray(&self, x: u32, y: u32) -> Ray {
        self.ray_at(x, y, Vec2::ZERO)
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    pub fn right(&self) -> Vec3 {
        self.right
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    pub fn is_perpendicular(&self) -> bool {
        self.perpendicular
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: Vec3, b: Vec3) {
        assert!((a - b).length() < 1e-4, "{a} != {b}");
    }

    #[test]
    fn test_camera_initialize() {
        let mut camera = Camera::new()
            .with_resolution(800, 600)
            .with_position(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::Y);

        assert!(!camera.is_initialized());
        camera.initialize().unwrap();
        assert!(camera.is_initialized());

        assert_close(camera.direction(), -Vec3::Z);
        assert_close(camera.right(), Vec3::X);
        assert_close(camera.up(), Vec3::Y);
    }

    #[test]
    fn test_builder_resets_initialization() {
        let mut camera = Camera::new();
        camera.initialize().unwrap();
        let camera = camera.with_rotation(10.0);
        assert!(!camera.is_initialized());
    }

    #[test]
    fn test_center_pixel_looks_forward() {
        let mut camera = Camera::new()
            .with_resolution(101, 101)
            .with_viewport(2.0, 2.0, 1.0)
            .with_position(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::Y);
        camera.initialize().unwrap();

        let ray = camera.center_ray(50, 50);
        assert_close(ray.direction, -Vec3::Z);
        assert_eq!(ray.origin, Vec3::new(0.0, 0.0, 5.0));

        // Top-left pixel points up and to the left
        let corner = camera.center_ray(0, 0);
        assert!(corner.direction.x < 0.0);
        assert!(corner.direction.y > 0.0);
    }

    #[test]
    fn test_perpendicular_rays_are_parallel() {
        let mut camera = Camera::new()
            .with_resolution(10, 10)
            .with_viewport(4.0, 4.0, 1.0)
            .with_perpendicular(true);
        camera.initialize().unwrap();

        let a = camera.center_ray(0, 0);
        let b = camera.center_ray(9, 9);
        assert_close(a.direction, b.direction);
        assert!((a.origin - b.origin).length() > 1.0);
    }

    #[test]
    fn test_roll_rotates_basis() {
        let mut camera = Camera::new().with_rotation(90.0);
        camera.initialize().unwrap();

        assert_close(camera.direction(), -Vec3::Z);
        assert_close(camera.right(), -Vec3::Y);
        assert_close(camera.up(), Vec3::X);
    }

    #[test]
    fn test_looking_straight_down() {
        let mut camera = Camera::new().with_position(Vec3::new(0.0, 5.0, 0.0), Vec3::ZERO, Vec3::Y);
        camera.initialize().unwrap();
        assert!((camera.right().length() - 1.0).abs() < 1e-5);
        assert!(camera.up().dot(camera.direction()).abs() < 1e-5);
    }

    #[test]
    fn test_fov_sets_viewport() {
        let mut camera = Camera::new()
            .with_resolution(100, 100)
            .with_viewport(1.0, 1.0, 1.0)
            .with_fov(90.0);
        camera.initialize().unwrap();

        // 90 degree fov at focal distance 1 spans [-1, 1]: the edge pixel is near 45 degrees
        let edge = camera.center_ray(50, 0);
        let angle = edge.direction.angle_between(camera.direction()).to_degrees();
        assert!((angle - 45.0).abs() < 1.0);
    }

    #[test]
    fn test_invalid_camera() {
        let mut camera = Camera::new().with_resolution(0, 10);
        assert!(matches!(camera.initialize(), Err(ConfigError::ZeroResolution(0, 10))));

        let mut camera = Camera::new().with_quality(0, 1);
        assert!(matches!(camera.initialize(), Err(ConfigError::ZeroSamples)));

        let mut camera = Camera::new().with_viewport(-1.0, 1.0, 1.0);
        assert!(camera.initialize().is_err());

        let mut camera = Camera::new().with_position(Vec3::ONE, Vec3::ONE, Vec3::Y);
        assert!(camera.initialize().is_err());
    }

    #[test]
    fn test_from_settings() {
        let settings = CameraSettings {
            resolution: (32, 16),
            samples_per_pixel: 4,
            max_bounce_depth: 3,
            ..CameraSettings::default()
        };
        let mut camera = Camera::from_settings(&settings);
        camera.initialize().unwrap();
        assert_eq!(camera.image_width, 32);
        assert_eq!(camera.image_height, 16);
        assert_eq!(camera.samples_per_pixel, 4);
        assert_eq!(camera.max_depth, 3);
    }
}
