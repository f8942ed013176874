//! Triangle primitive for ray tracing.
//!
//! Hits the supporting plane first, then accepts the point if the three
//! sub-triangles it forms with the edges add up to the triangle's own area.

use lume_math::{Ray, Vec2, Vec3, Vec3Ext};

use crate::object::Surface;

/// Relative slack allowed when comparing sub-triangle areas.
const AREA_TOLERANCE: f32 = 1e-4;

/// A triangle primitive.
#[derive(Debug, Clone, PartialEq)]
pub struct Triangle {
    /// Vertices
    a: Vec3,
    b: Vec3,
    c: Vec3,
    /// Face normal, zero for a degenerate triangle
    normal: Vec3,
    /// Twice the triangle's area
    area2: f32,
}

impl Triangle {
    /// Create a new triangle from three vertices. Winding is counter-clockwise
    /// seen from the side the normal points to.
    pub fn new(a: Vec3, b: Vec3, c: Vec3) -> Self {
        let cross = (b - a).cross(c - a);
        Self {
            a,
            b,
            c,
            normal: cross.normalize_or_zero(),
            area2: cross.length(),
        }
    }

    pub fn vertices(&self) -> [Vec3; 3] {
        [self.a, self.b, self.c]
    }

    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    pub fn is_degenerate(&self) -> bool {
        self.normal == Vec3::ZERO
    }

    pub fn centroid(&self) -> Vec3 {
        (self.a + self.b + self.c) / 3.0
    }

    /// Twice the areas of the sub-triangles opposite `a`, `b` and `c`.
    fn sub_areas(&self, p: Vec3) -> [f32; 3] {
        [
            (self.b - p).cross(self.c - p).length(),
            (self.c - p).cross(self.a - p).length(),
            (self.a - p).cross(self.b - p).length(),
        ]
    }

    /// Whether a point on the supporting plane lies inside the triangle.
    pub fn contains(&self, p: Vec3) -> bool {
        if self.is_degenerate() {
            return false;
        }
        let sum: f32 = self.sub_areas(p).iter().sum();
        (sum - self.area2).abs() <= AREA_TOLERANCE * self.area2
    }

    fn rebuild(&mut self) {
        *self = Self::new(self.a, self.b, self.c);
    }
}

impl Surface for Triangle {
    fn intersect(&self, ray: &mut Ray) -> Option<f32> {
        if self.is_degenerate() {
            return None;
        }

        let denom = ray.direction.dot(self.normal);
        if denom.abs() < 1e-8 {
            return None;
        }
        let t = (self.a - ray.origin).dot(self.normal) / denom;
        if !ray.accepts(t) || !self.contains(ray.at(t)) {
            return None;
        }
        ray.try_hit(t)
    }

    fn normal_at(&self, _point: Vec3) -> Vec3 {
        self.normal
    }

    /// Barycentric weights of `b` and `c`.
    fn surface_uv(&self, point: Vec3) -> Vec2 {
        if self.is_degenerate() {
            return Vec2::ZERO;
        }
        let [_, wb, wc] = self.sub_areas(point);
        Vec2::new(wb / self.area2, wc / self.area2)
    }

    fn translate(&mut self, offset: Vec3) {
        self.a += offset;
        self.b += offset;
        self.c += offset;
    }

    fn rotate(&mut self, pivot: Vec3, axis: Vec3, angle: f32) {
        self.a = self.a.rotate_around(pivot, axis, angle);
        self.b = self.b.rotate_around(pivot, axis, angle);
        self.c = self.c.rotate_around(pivot, axis, angle);
        self.rebuild();
    }
}
