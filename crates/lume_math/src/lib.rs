// Re-export glam for convenience
pub use glam::*;

// Lume math types
mod ray;
mod transform;
pub use ray::{Ray, HIT_EPSILON};
pub use transform::{rotate_2d, Vec3Ext};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec3_reexport() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 5.0, 6.0);
        assert_eq!(a + b, Vec3::new(5.0, 7.0, 9.0));
        assert_eq!(a.dot(b), 32.0);
    }
}
