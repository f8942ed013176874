//! Surface materials and their scatter rules.

use std::fmt;
use std::sync::Arc;

use lume_core::{Color, Sampler};
use lume_math::{Ray, Vec2, Vec3, Vec3Ext};
use rand::RngCore;

use crate::sampling::random_unit_vector;

/// How a material bounces light.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MaterialKind {
    /// Diffuse: scatters around the normal.
    Lambertian,
    /// Specular reflection.
    ///
    /// - `reflectivity`: weight of the reflected ray, 0 disables reflection
    /// - `fuzz`: random perturbation of the mirror direction
    /// - `roughness`: blend from mirror (0) toward a diffuse bounce (1)
    Metal {
        reflectivity: f32,
        fuzz: f32,
        roughness: f32,
    },
}

/// A secondary ray produced by a material and its contribution weight.
#[derive(Debug, Clone, Copy)]
pub struct Scatter {
    pub ray: Ray,
    pub weight: f32,
}

/// Surface appearance shared between primitives.
#[derive(Clone)]
pub struct Material {
    pub base_color: Color,
    /// Specular exponent; infinity disables the highlight
    pub shininess: f32,
    pub texture: Option<Arc<dyn Sampler>>,
    pub kind: MaterialKind,
}

impl Material {
    /// Create a diffuse material.
    pub fn lambertian(base_color: Color) -> Self {
        Self {
            base_color,
            shininess: f32::INFINITY,
            texture: None,
            kind: MaterialKind::Lambertian,
        }
    }

    /// Create a reflective material.
    pub fn metal(base_color: Color, reflectivity: f32, fuzz: f32, roughness: f32) -> Self {
        Self {
            base_color,
            shininess: f32::INFINITY,
            texture: None,
            kind: MaterialKind::Metal {
                reflectivity: reflectivity.clamp(0.0, 1.0),
                fuzz: fuzz.max(0.0),
                roughness: roughness.clamp(0.0, 1.0),
            },
        }
    }

    pub fn with_shininess(mut self, shininess: f32) -> Self {
        self.shininess = shininess;
        self
    }

    pub fn with_texture(mut self, texture: Arc<dyn Sampler>) -> Self {
        self.texture = Some(texture);
        self
    }

    /// Surface color at `uv`: the texture if there is one, else the base color.
    pub fn color_at(&self, uv: Vec2) -> Color {
        match &self.texture {
            Some(texture) => texture.sample(uv),
            None => self.base_color,
        }
    }

    /// Produce a secondary ray for a hit at `point`.
    ///
    /// `normal` must face the incoming ray. Returns `None` when the surface
    /// absorbs the ray.
    pub fn scatter(
        &self,
        ray_in: &Ray,
        point: Vec3,
        normal: Vec3,
        rng: &mut dyn RngCore,
    ) -> Option<Scatter> {
        match self.kind {
            MaterialKind::Lambertian => {
                let mut direction = normal + random_unit_vector(rng);

                // Catch degenerate scatter direction
                if direction.length_squared() < 1e-8 {
                    direction = normal;
                }

                Some(Scatter {
                    ray: Ray::new(point, direction),
                    weight: 0.5,
                })
            }
            MaterialKind::Metal {
                reflectivity,
                fuzz,
                roughness,
            } => {
                if reflectivity <= 0.0 {
                    return None;
                }

                let mut direction = ray_in.direction.reflect(normal);
                if fuzz > 0.0 {
                    direction += fuzz * random_unit_vector(rng);
                }
                if roughness > 0.0 {
                    let diffuse = normal + random_unit_vector(rng);
                    direction = direction.normalize_or_zero().lerp(diffuse.normalize_or_zero(), roughness);
                }

                // Fuzz can push the ray below the surface
                if direction.dot(normal) <= 0.0 {
                    return None;
                }

                Some(Scatter {
                    ray: Ray::new(point, direction),
                    weight: reflectivity,
                })
            }
        }
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::lambertian(Color::ONE)
    }
}

impl fmt::Debug for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Material")
            .field("base_color", &self.base_color)
            .field("shininess", &self.shininess)
            .field("textured", &self.texture.is_some())
            .field("kind", &self.kind)
            .finish()
    }
}
