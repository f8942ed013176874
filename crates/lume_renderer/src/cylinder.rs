//! Finite open cylinder. Caps are separate [`Circle`](crate::Circle)s.

use std::f32::consts::PI;

use lume_math::{Ray, Vec2, Vec3, Vec3Ext};

use crate::object::Surface;
use crate::GeometryError;

#[derive(Debug, Clone, PartialEq)]
pub struct Cylinder {
    base: Vec3,
    axis: Vec3,
    height: f32,
    radius: f32,
}

impl Cylinder {
    /// A cylinder rising `height` from `base` along `axis`.
    pub fn new(base: Vec3, axis: Vec3, height: f32, radius: f32) -> Result<Self, GeometryError> {
        Ok(Self {
            base,
            axis: axis.normalize_or_zero(),
            height: GeometryError::check_length("height", height)?,
            radius: GeometryError::check_length("radius", radius)?,
        })
    }

    pub fn base(&self) -> Vec3 {
        self.base
    }

    pub fn axis(&self) -> Vec3 {
        self.axis
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn top(&self) -> Vec3 {
        self.base + self.axis * self.height
    }

    fn reject_axis(&self, v: Vec3) -> Vec3 {
        v - v.dot(self.axis) * self.axis
    }
}

impl Surface for Cylinder {
    fn intersect(&self, ray: &mut Ray) -> Option<f32> {
        if self.axis == Vec3::ZERO {
            return None;
        }

        let d = self.reject_axis(ray.direction);
        let o = self.reject_axis(ray.origin - self.base);

        let a = d.length_squared();
        if a < 1e-12 {
            // Parallel to the axis
            return None;
        }
        let b = d.dot(o);
        let c = o.length_squared() - self.radius * self.radius;

        let discriminant = b * b - a * c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrtd = discriminant.sqrt();
        [(-b - sqrtd) / a, (-b + sqrtd) / a]
            .into_iter()
            .find(|&t| {
                let s = (ray.at(t) - self.base).dot(self.axis);
                ray.accepts(t) && (0.0..=self.height).contains(&s)
            })
            .and_then(|t| ray.try_hit(t))
    }

    fn normal_at(&self, point: Vec3) -> Vec3 {
        self.reject_axis(point - self.base).normalize_or_zero()
    }

    fn surface_uv(&self, point: Vec3) -> Vec2 {
        if self.axis == Vec3::ZERO {
            return Vec2::ZERO;
        }
        let w = point - self.base;
        let (u_axis, v_axis) = self.axis.any_orthonormal_pair();
        let angle = w.dot(v_axis).atan2(w.dot(u_axis)) + PI;
        let v = if self.height > 0.0 {
            w.dot(self.axis) / self.height
        } else {
            0.0
        };
        Vec2::new(angle / (2.0 * PI), v)
    }

    fn translate(&mut self, offset: Vec3) {
        self.base += offset;
    }

    fn rotate(&mut self, pivot: Vec3, axis: Vec3, angle: f32) {
        self.base = self.base.rotate_around(pivot, axis, angle);
        self.axis = self.axis.rotate_about(axis, angle).normalize_or_zero();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lume_math::HIT_EPSILON;

    fn cylinder() -> Cylinder {
        Cylinder::new(Vec3::ZERO, Vec3::Y, 2.0, 1.0).unwrap()
    }

    #[test]
    fn test_cylinder_side_hit() {
        let cyl = cylinder();
        let mut ray = Ray::new(Vec3::new(-5.0, 1.0, 0.0), Vec3::X);

        let t = cyl.intersect(&mut ray).unwrap();
        assert!((t - 4.0).abs() < 2.0 * HIT_EPSILON);
        assert_eq!(cyl.normal_at(ray.at(4.0)), -Vec3::X);
    }

    #[test]
    fn test_cylinder_clipped_by_height() {
        let cyl = cylinder();
        let mut above = Ray::new(Vec3::new(-5.0, 3.0, 0.0), Vec3::X);
        assert!(cyl.intersect(&mut above).is_none());

        let mut below = Ray::new(Vec3::new(-5.0, -0.1, 0.0), Vec3::X);
        assert!(cyl.intersect(&mut below).is_none());
    }

    #[test]
    fn test_cylinder_parallel_to_axis() {
        let cyl = cylinder();
        let mut ray = Ray::new(Vec3::new(0.5, 5.0, 0.0), -Vec3::Y);
        assert!(cyl.intersect(&mut ray).is_none());
        assert_eq!(ray.t_max, f32::INFINITY);
    }

    #[test]
    fn test_cylinder_from_inside() {
        let cyl = cylinder();
        let mut ray = Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::Z);
        let t = cyl.intersect(&mut ray).unwrap();
        assert!((t - 1.0).abs() < 2.0 * HIT_EPSILON);
    }

    #[test]
    fn test_slanted_ray_enters_through_open_top() {
        let cyl = cylinder();
        // Enters above the rim, then meets the far wall inside the height range
        let mut ray = Ray::new(Vec3::new(-2.0, 3.5, 0.0), Vec3::new(1.0, -1.0, 0.0));
        let t = cyl.intersect(&mut ray).unwrap();
        let hit = ray.at(t);
        assert!((hit.x - 1.0).abs() < 1e-3);
        assert!((hit.y - 0.5).abs() < 1e-3);
    }
}
