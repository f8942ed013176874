use crate::Vec3;

/// Offset subtracted from every raw hit distance before it is compared.
///
/// Pulls hit points back toward the ray origin so secondary and shadow rays
/// start just off the surface. Tune relative to scene scale: the default
/// suits scenes a few hundred units across.
pub const HIT_EPSILON: f32 = 1e-4;

/// A ray with a unit direction and a mutable closest-hit distance.
///
/// `t_max` starts at infinity (or the distance to a light for shadow rays)
/// and only ever shrinks as intersections are accepted, so it doubles as the
/// "closest hit so far" for a whole traversal.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
    pub t_max: f32,
}

impl Ray {
    /// Create an unbounded ray. The direction is normalized; a zero direction
    /// stays zero and never hits anything.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self::with_t_max(origin, direction, f32::INFINITY)
    }

    /// Create a ray that ignores anything farther than `t_max`.
    pub fn with_t_max(origin: Vec3, direction: Vec3, t_max: f32) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
            t_max,
        }
    }

    /// Get the point along the ray at parameter t.
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// The point at the current `t_max`, i.e. the closest accepted hit.
    pub fn hit_point(&self) -> Vec3 {
        self.at(self.t_max)
    }

    /// Check whether a raw root would be accepted, without touching `t_max`.
    #[inline]
    pub fn accepts(&self, t: f32) -> bool {
        let t = t - HIT_EPSILON;
        t > HIT_EPSILON && t <= self.t_max
    }

    /// Accept a raw root if it is the closest valid hit so far.
    ///
    /// Returns the corrected distance and lowers `t_max` to it.
    #[inline]
    pub fn try_hit(&mut self, t: f32) -> Option<f32> {
        if !self.accepts(t) {
            return None;
        }
        self.t_max = t - HIT_EPSILON;
        Some(self.t_max)
    }
}
