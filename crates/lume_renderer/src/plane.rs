//! Infinite plane primitive.

use lume_math::{Ray, Vec2, Vec3, Vec3Ext};

use crate::object::Surface;

/// An infinite plane through `point` facing `normal`.
#[derive(Debug, Clone, PartialEq)]
pub struct Plane {
    pub point: Vec3,
    normal: Vec3,
}

impl Plane {
    /// Create a plane. A zero normal gives a plane that is never hit.
    pub fn new(point: Vec3, normal: Vec3) -> Self {
        Self {
            point,
            normal: normal.normalize_or_zero(),
        }
    }

    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    /// Raw distance along `ray` to the plane, ignoring `t_max`.
    ///
    /// `None` when the ray runs parallel to the plane.
    pub(crate) fn distance_along(&self, ray: &Ray) -> Option<f32> {
        let denom = ray.direction.dot(self.normal);
        if denom.abs() < 1e-8 {
            return None;
        }
        Some((self.point - ray.origin).dot(self.normal) / denom)
    }

    /// In-plane coordinates of `point` relative to the anchor.
    pub(crate) fn local_coords(&self, point: Vec3) -> Vec2 {
        if self.normal == Vec3::ZERO {
            return Vec2::ZERO;
        }
        let (u_axis, v_axis) = self.normal.any_orthonormal_pair();
        let d = point - self.point;
        Vec2::new(d.dot(u_axis), d.dot(v_axis))
    }
}

impl Surface for Plane {
    fn intersect(&self, ray: &mut Ray) -> Option<f32> {
        let t = self.distance_along(ray)?;
        ray.try_hit(t)
    }

    fn normal_at(&self, _point: Vec3) -> Vec3 {
        self.normal
    }

    fn surface_uv(&self, point: Vec3) -> Vec2 {
        self.local_coords(point)
    }

    fn translate(&mut self, offset: Vec3) {
        self.point += offset;
    }

    fn rotate(&mut self, pivot: Vec3, axis: Vec3, angle: f32) {
        self.point = self.point.rotate_around(pivot, axis, angle);
        self.normal = self.normal.rotate_about(axis, angle).normalize_or_zero();
    }
}
