//! Flat disk primitive, used on its own and as cylinder and cone caps.

use std::f32::consts::PI;

use lume_math::{Ray, Vec2, Vec3};

use crate::object::Surface;
use crate::{GeometryError, Plane};

/// A disk of `radius` around `plane.point`.
#[derive(Debug, Clone, PartialEq)]
pub struct Circle {
    plane: Plane,
    radius: f32,
}

impl Circle {
    pub fn new(center: Vec3, normal: Vec3, radius: f32) -> Result<Self, GeometryError> {
        let radius = GeometryError::check_length("radius", radius)?;
        Ok(Self {
            plane: Plane::new(center, normal),
            radius,
        })
    }

    pub fn center(&self) -> Vec3 {
        self.plane.point
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }
}

impl Surface for Circle {
    fn intersect(&self, ray: &mut Ray) -> Option<f32> {
        let t = self.plane.distance_along(ray)?;
        if !ray.accepts(t) {
            return None;
        }
        if ray.at(t).distance_squared(self.plane.point) > self.radius * self.radius {
            return None;
        }
        ray.try_hit(t)
    }

    fn normal_at(&self, point: Vec3) -> Vec3 {
        self.plane.normal_at(point)
    }

    /// Polar coordinates: angle as a fraction of a turn, distance as a
    /// fraction of the radius.
    fn surface_uv(&self, point: Vec3) -> Vec2 {
        let local = self.plane.local_coords(point);
        let angle = local.y.atan2(local.x) + PI;
        let r = if self.radius > 0.0 {
            local.length() / self.radius
        } else {
            0.0
        };
        Vec2::new(angle / (2.0 * PI), r)
    }

    fn translate(&mut self, offset: Vec3) {
        self.plane.translate(offset);
    }

    fn rotate(&mut self, pivot: Vec3, axis: Vec3, angle: f32) {
        self.plane.rotate(pivot, axis, angle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circle_inside_and_outside() {
        let circle = Circle::new(Vec3::ZERO, Vec3::Y, 1.0).unwrap();

        let mut inside = Ray::new(Vec3::new(0.5, 3.0, 0.0), -Vec3::Y);
        assert!(circle.intersect(&mut inside).is_some());

        let mut outside = Ray::new(Vec3::new(1.5, 3.0, 0.0), -Vec3::Y);
        assert!(circle.intersect(&mut outside).is_none());
        // A rejected hit on the supporting plane must not tighten t_max
        assert_eq!(outside.t_max, f32::INFINITY);
    }

    #[test]
    fn test_circle_uv_radius() {
        let circle = Circle::new(Vec3::ZERO, Vec3::Y, 2.0).unwrap();
        let uv = circle.surface_uv(Vec3::new(1.0, 0.0, 0.0));
        assert!((uv.y - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_negative_radius() {
        assert!(Circle::new(Vec3::ZERO, Vec3::Y, -0.5).is_err());
    }
}
