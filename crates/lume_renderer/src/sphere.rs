//! Sphere primitive for ray tracing.

use std::f32::consts::PI;

use lume_math::{Ray, Vec2, Vec3, Vec3Ext, HIT_EPSILON};

use crate::object::Surface;
use crate::GeometryError;

/// A sphere primitive.
#[derive(Debug, Clone, PartialEq)]
pub struct Sphere {
    pub center: Vec3,
    radius: f32,
}

impl Sphere {
    /// Create a new sphere.
    pub fn new(center: Vec3, radius: f32) -> Result<Self, GeometryError> {
        let radius = GeometryError::check_length("radius", radius)?;
        Ok(Self { center, radius })
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }
}

impl Surface for Sphere {
    fn intersect(&self, ray: &mut Ray) -> Option<f32> {
        if ray.direction == Vec3::ZERO {
            return None;
        }

        // Unit direction, so a = 1
        let oc = ray.origin - self.center;
        let b = oc.dot(ray.direction);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = b * b - c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrtd = discriminant.sqrt();
        let near = -b - sqrtd;
        let far = -b + sqrtd;

        // The near root wins whenever it is in front of the ray, even if it
        // lies beyond t_max.
        if near - HIT_EPSILON > HIT_EPSILON {
            return ray.try_hit(near);
        }
        ray.try_hit(far)
    }

    fn normal_at(&self, point: Vec3) -> Vec3 {
        (point - self.center).normalize_or_zero()
    }

    fn surface_uv(&self, point: Vec3) -> Vec2 {
        // theta: angle down from +Y, phi: angle around Y from -X
        let p = self.normal_at(point);
        let theta = (-p.y).clamp(-1.0, 1.0).acos();
        let phi = (-p.z).atan2(p.x) + PI;
        Vec2::new(phi / (2.0 * PI), theta / PI)
    }

    fn translate(&mut self, offset: Vec3) {
        self.center += offset;
    }

    fn rotate(&mut self, pivot: Vec3, axis: Vec3, angle: f32) {
        self.center = self.center.rotate_around(pivot, axis, angle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sphere_hit_from_outside() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -5.0), 1.0).unwrap();
        let mut ray = Ray::new(Vec3::ZERO, -Vec3::Z);

        let t = sphere.intersect(&mut ray).unwrap();
        assert!((t - 4.0).abs() < 2.0 * HIT_EPSILON);
        assert_eq!(ray.t_max, t);
    }

    #[test]
    fn test_sphere_miss() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -5.0), 1.0).unwrap();

        // Passes the sphere with more than a radius to spare
        let mut ray = Ray::new(Vec3::new(2.5, 0.0, 0.0), -Vec3::Z);
        assert!(sphere.intersect(&mut ray).is_none());
        assert_eq!(ray.t_max, f32::INFINITY);

        // Pointing away
        let mut ray = Ray::new(Vec3::ZERO, Vec3::Z);
        assert!(sphere.intersect(&mut ray).is_none());
    }

    #[test]
    fn test_sphere_tangent() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -5.0), 1.0).unwrap();
        let mut ray = Ray::new(Vec3::new(1.0, 0.0, 0.0), -Vec3::Z);

        let t = sphere.intersect(&mut ray).unwrap();
        assert!((t - 5.0).abs() < 1e-3);
    }

    #[test]
    fn test_sphere_from_inside_hits_far_side() {
        let sphere = Sphere::new(Vec3::ZERO, 2.0).unwrap();
        let mut ray = Ray::new(Vec3::ZERO, Vec3::X);

        let t = sphere.intersect(&mut ray).unwrap();
        assert!((t - 2.0).abs() < 2.0 * HIT_EPSILON);
    }

    #[test]
    fn test_sphere_beyond_t_max() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -5.0), 1.0).unwrap();
        let mut ray = Ray::with_t_max(Vec3::ZERO, -Vec3::Z, 3.0);

        // The far root is also beyond t_max, but the near root alone decides
        assert!(sphere.intersect(&mut ray).is_none());
        assert_eq!(ray.t_max, 3.0);
    }

    #[test]
    fn test_sphere_normal_and_uv() {
        let sphere = Sphere::new(Vec3::new(1.0, 0.0, 0.0), 2.0).unwrap();
        assert_eq!(sphere.normal_at(Vec3::new(1.0, 2.0, 0.0)), Vec3::Y);

        let uv = sphere.surface_uv(Vec3::new(1.0, 2.0, 0.0));
        assert!((uv.y - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_negative_radius() {
        assert!(Sphere::new(Vec3::ZERO, -1.0).is_err());
        assert!(Sphere::new(Vec3::ZERO, f32::NAN).is_err());
    }
}
