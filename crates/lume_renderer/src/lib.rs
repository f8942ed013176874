//! Lume renderer - offline CPU ray tracing
//!
//! Builds a scene from analytic primitives, groups and bounding volumes,
//! shades hits with point, directional, spot and ambient lights, follows
//! Lambertian and metal bounces, and renders the image in parallel batches.

mod batch;
mod camera;
mod circle;
mod cone;
mod cylinder;
mod error;
mod material;
mod mesh;
mod object;
mod plane;
mod renderer;
mod sampling;
mod scene;
mod sphere;
mod triangle;

pub use batch::{batch_seed, generate_batches, render_batch, Batch, DEFAULT_BATCH_WIDTH};
pub use camera::Camera;
pub use circle::Circle;
pub use cone::Cone;
pub use cylinder::Cylinder;
pub use error::{GeometryError, RenderError, SceneError};
pub use material::{Material, MaterialKind, Scatter};
pub use mesh::Mesh;
pub use object::{BoundingVolume, Composite, Object, ObjectId, Shape, Surface};
pub use plane::Plane;
pub use renderer::{
    background, cast_ray, color_to_rgb8, linear_to_gamma, render, render_pixel,
    render_with_progress, ImageBuffer, PassState, RenderContext,
};
pub use sampling::sample_offset;
pub use scene::{Hit, Scene};
pub use sphere::Sphere;
pub use triangle::Triangle;

/// Re-export the math and settings types used throughout the API
pub use lume_core::{Color, Light, LightKind, RenderSettings};
pub use lume_math::{Ray, Vec2, Vec3};
