//! Finite cone primitive (lateral surface only).

use std::f32::consts::PI;

use lume_math::{Ray, Vec2, Vec3, Vec3Ext};

use crate::object::Surface;
use crate::GeometryError;

/// A cone opening from `apex` along `axis`, reaching `radius` at `height`.
#[derive(Debug, Clone, PartialEq)]
pub struct Cone {
    apex: Vec3,
    /// Unit axis pointing from apex to base
    axis: Vec3,
    height: f32,
    radius: f32,
    /// cos^2 of the half angle
    cos2: f32,
}

impl Cone {
    pub fn new(apex: Vec3, axis: Vec3, height: f32, radius: f32) -> Result<Self, GeometryError> {
        let height = GeometryError::check_length("height", height)?;
        let radius = GeometryError::check_length("radius", radius)?;
        let hyp2 = height * height + radius * radius;
        let cos2 = if hyp2 > 0.0 { height * height / hyp2 } else { 1.0 };
        Ok(Self {
            apex,
            axis: axis.normalize_or_zero(),
            height,
            radius,
            cos2,
        })
    }

    pub fn apex(&self) -> Vec3 {
        self.apex
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

    /// Center of the open end.
    pub fn base_center(&self) -> Vec3 {
        self.apex + self.axis * self.height
    }

    fn within_height(&self, ray: &Ray, t: f32) -> bool {
        let s = (ray.at(t) - self.apex).dot(self.axis);
        (0.0..=self.height).contains(&s)
    }
}

impl Surface for Cone {
    fn intersect(&self, ray: &mut Ray) -> Option<f32> {
        if self.axis == Vec3::ZERO || self.height == 0.0 {
            return None;
        }

        let co = ray.origin - self.apex;
        let dv = ray.direction.dot(self.axis);
        let cv = co.dot(self.axis);

        let a = dv * dv - self.cos2 * ray.direction.length_squared();
        let b = cv * dv - self.cos2 * co.dot(ray.direction);
        let c = cv * cv - self.cos2 * co.length_squared();

        if a.abs() < 1e-12 {
            return None;
        }

        let discriminant = b * b - a * c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrtd = discriminant.sqrt();
        let r0 = (-b - sqrtd) / a;
        let r1 = (-b + sqrtd) / a;
        let (near, far) = if r0 <= r1 { (r0, r1) } else { (r1, r0) };

        // The quadric is double-napped; only the nappe between apex and base counts
        [near, far]
            .into_iter()
            .find(|&t| ray.accepts(t) && self.within_height(ray, t))
            .and_then(|t| ray.try_hit(t))
    }

    fn normal_at(&self, point: Vec3) -> Vec3 {
        let w = point - self.apex;
        (self.cos2 * w - w.dot(self.axis) * self.axis).normalize_or_zero()
    }

    fn surface_uv(&self, point: Vec3) -> Vec2 {
        if self.axis == Vec3::ZERO || self.height == 0.0 {
            return Vec2::ZERO;
        }
        let w = point - self.apex;
        let (u_axis, v_axis) = self.axis.any_orthonormal_pair();
        let angle = w.dot(v_axis).atan2(w.dot(u_axis)) + PI;
        Vec2::new(angle / (2.0 * PI), w.dot(self.axis) / self.height)
    }

    fn translate(&mut self, offset: Vec3) {
        self.apex += offset;
    }

    fn rotate(&mut self, pivot: Vec3, axis: Vec3, angle: f32) {
        self.apex = self.apex.rotate_around(pivot, axis, angle);
        self.axis = self.axis.rotate_about(axis, angle).normalize_or_zero();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lume_math::HIT_EPSILON;

    /// Apex at y = 2, opening downward to radius 1 at y = 0.
    fn cone() -> Cone {
        Cone::new(Vec3::new(0.0, 2.0, 0.0), -Vec3::Y, 2.0, 1.0).unwrap()
    }

    #[test]
    fn test_cone_side_hit() {
        let cone = cone();
        // At y = 1 the radius is 0.5
        let mut ray = Ray::new(Vec3::new(-5.0, 1.0, 0.0), Vec3::X);

        let t = cone.intersect(&mut ray).unwrap();
        assert!((t - 4.5).abs() < 2.0 * HIT_EPSILON + 1e-4);
    }

    #[test]
    fn test_cone_misses_other_nappe() {
        let cone = cone();
        // Above the apex the infinite double cone continues; the finite one doesn't
        let mut ray = Ray::new(Vec3::new(-5.0, 3.0, 0.0), Vec3::X);
        assert!(cone.intersect(&mut ray).is_none());
        assert_eq!(ray.t_max, f32::INFINITY);
    }

    #[test]
    fn test_cone_below_base() {
        let cone = cone();
        let mut ray = Ray::new(Vec3::new(-5.0, -0.5, 0.0), Vec3::X);
        assert!(cone.intersect(&mut ray).is_none());
    }

    #[test]
    fn test_cone_normal_points_out_and_up() {
        let cone = cone();
        let n = cone.normal_at(Vec3::new(0.5, 1.0, 0.0));
        assert!(n.x > 0.0);
        // Downward-opening cone: the side faces slightly up
        assert!(n.y > 0.0);
        assert!((n.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_cone_from_inside() {
        let cone = cone();
        let mut ray = Ray::new(Vec3::new(0.0, 0.5, 0.0), Vec3::X);
        let t = cone.intersect(&mut ray).unwrap();
        // Radius at y = 0.5 is 0.75
        assert!((t - 0.75).abs() < 2.0 * HIT_EPSILON + 1e-4);
    }

    #[test]
    fn test_invalid_cone() {
        assert!(Cone::new(Vec3::ZERO, Vec3::Y, -1.0, 1.0).is_err());
        assert!(Cone::new(Vec3::ZERO, Vec3::Y, 1.0, f32::INFINITY).is_err());
    }
}
