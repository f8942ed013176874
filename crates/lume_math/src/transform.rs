// Rotation and reflection helpers for Vec3
//
// glam already covers products, lengths and normalization; these are the
// scene-editing operations objects and cameras need on top of that.

use glam::{Vec2, Vec3};

/// Extension trait for Vec3 with the rotations used by the scene API.
pub trait Vec3Ext {
    /// Rotate about the X axis by `angle` radians.
    fn rotate_x(self, angle: f32) -> Vec3;

    /// Rotate about the Y axis by `angle` radians.
    fn rotate_y(self, angle: f32) -> Vec3;

    /// Rotate about the Z axis by `angle` radians.
    fn rotate_z(self, angle: f32) -> Vec3;

    /// Rotate about an arbitrary axis through the origin (Rodrigues' formula).
    /// A zero axis leaves the vector unchanged.
    fn rotate_about(self, axis: Vec3, angle: f32) -> Vec3;

    /// Rotate a point about an axis passing through `pivot`.
    fn rotate_around(self, pivot: Vec3, axis: Vec3, angle: f32) -> Vec3;

    /// Mirror a direction about a surface normal.
    fn reflect(self, normal: Vec3) -> Vec3;
}

impl Vec3Ext for Vec3 {
    fn rotate_x(self, angle: f32) -> Vec3 {
        let (sin, cos) = angle.sin_cos();
        Vec3::new(
            self.x,
            self.y * cos - self.z * sin,
            self.y * sin + self.z * cos,
        )
    }

    fn rotate_y(self, angle: f32) -> Vec3 {
        let (sin, cos) = angle.sin_cos();
        Vec3::new(
            self.x * cos + self.z * sin,
            self.y,
            -self.x * sin + self.z * cos,
        )
    }

    fn rotate_z(self, angle: f32) -> Vec3 {
        let (sin, cos) = angle.sin_cos();
        Vec3::new(
            self.x * cos - self.y * sin,
            self.x * sin + self.y * cos,
            self.z,
        )
    }

    fn rotate_about(self, axis: Vec3, angle: f32) -> Vec3 {
        let k = axis.normalize_or_zero();
        if k == Vec3::ZERO {
            return self;
        }
        let (sin, cos) = angle.sin_cos();
        self * cos + k.cross(self) * sin + k * k.dot(self) * (1.0 - cos)
    }

    fn rotate_around(self, pivot: Vec3, axis: Vec3, angle: f32) -> Vec3 {
        pivot + (self - pivot).rotate_about(axis, angle)
    }

    #[inline]
    fn reflect(self, normal: Vec3) -> Vec3 {
        self - 2.0 * self.dot(normal) * normal
    }
}

/// Rotate a 2D vector counter-clockwise by `angle` radians.
pub fn rotate_2d(v: Vec2, angle: f32) -> Vec2 {
    let (sin, cos) = angle.sin_cos();
    Vec2::new(cos * v.x - sin * v.y, sin * v.x + cos * v.y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    fn assert_close(a: Vec3, b: Vec3) {
        assert!((a - b).length() < 1e-5, "{a} != {b}");
    }

    #[test]
    fn test_axis_rotations() {
        assert_close(Vec3::Y.rotate_x(FRAC_PI_2), Vec3::Z);
        assert_close(Vec3::Z.rotate_y(FRAC_PI_2), Vec3::X);
        assert_close(Vec3::X.rotate_z(FRAC_PI_2), Vec3::Y);
    }

    #[test]
    fn test_rotate_about_matches_axis_rotations() {
        let v = Vec3::new(0.3, -1.2, 2.5);
        assert_close(v.rotate_about(Vec3::X, 0.7), v.rotate_x(0.7));
        assert_close(v.rotate_about(Vec3::Y, 0.7), v.rotate_y(0.7));
        assert_close(v.rotate_about(Vec3::Z, 0.7), v.rotate_z(0.7));
    }

    #[test]
    fn test_rotate_about_preserves_length() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        let rotated = v.rotate_about(Vec3::new(1.0, 1.0, 0.0), 1.3);
        assert!((rotated.length() - v.length()).abs() < 1e-5);
    }

    #[test]
    fn test_rotate_about_zero_axis() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(v.rotate_about(Vec3::ZERO, 1.0), v);
    }

    #[test]
    fn test_rotate_around_pivot() {
        let p = Vec3::new(2.0, 0.0, 0.0);
        let pivot = Vec3::new(1.0, 0.0, 0.0);
        assert_close(p.rotate_around(pivot, Vec3::Y, PI), Vec3::ZERO);
    }

    #[test]
    fn test_reflect() {
        let incoming = Vec3::new(1.0, -1.0, 0.0);
        assert_close(incoming.reflect(Vec3::Y), Vec3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn test_rotate_2d() {
        let r = rotate_2d(Vec2::X, FRAC_PI_2);
        assert!((r - Vec2::Y).length() < 1e-6);
    }
}
