//! Random and stratified sampling helpers.
//!
//! Every function takes the generator explicitly; each render batch owns its
//! own seeded stream.

use lume_core::{grid_side, Sampling};
use lume_math::{Vec2, Vec3};
use rand::{Rng, RngCore};

/// Uniform float in [0, 1).
#[inline]
pub fn gen_f32(rng: &mut dyn RngCore) -> f32 {
    rng.gen::<f32>()
}

/// Uniformly distributed unit vector (rejection sampling in the unit ball).
pub fn random_unit_vector(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let v = Vec3::new(
            gen_f32(rng) * 2.0 - 1.0,
            gen_f32(rng) * 2.0 - 1.0,
            gen_f32(rng) * 2.0 - 1.0,
        );
        let len_sq = v.length_squared();
        if len_sq > 1e-6 && len_sq <= 1.0 {
            return v / len_sq.sqrt();
        }
    }
}

/// Offset of sample `index` out of `samples` within a pixel, in [-0.5, 0.5).
///
/// Grid sampling places samples at the centers of a `k x k` grid and falls
/// back to the pixel center if `samples` is not square. Random sampling
/// jitters uniformly.
pub fn sample_offset(sampling: Sampling, samples: u32, index: u32, rng: &mut dyn RngCore) -> Vec2 {
    match sampling {
        Sampling::Grid => {
            let Some(side) = grid_side(samples) else {
                return Vec2::ZERO;
            };
            let i = index % side;
            let j = index / side;
            let step = 1.0 / side as f32;
            Vec2::new(
                (i as f32 + 0.5) * step - 0.5,
                (j as f32 + 0.5) * step - 0.5,
            )
        }
        Sampling::Random => Vec2::new(gen_f32(rng) - 0.5, gen_f32(rng) - 0.5),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_random_unit_vector_is_unit() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..100 {
            let v = random_unit_vector(&mut rng);
            assert!((v.length() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_grid_offsets_are_centred() {
        let mut rng = StdRng::seed_from_u64(0);

        assert_eq!(sample_offset(Sampling::Grid, 1, 0, &mut rng), Vec2::ZERO);

        let offsets: Vec<Vec2> = (0..4)
            .map(|i| sample_offset(Sampling::Grid, 4, i, &mut rng))
            .collect();
        assert_eq!(offsets[0], Vec2::new(-0.25, -0.25));
        assert_eq!(offsets[1], Vec2::new(0.25, -0.25));
        assert_eq!(offsets[2], Vec2::new(-0.25, 0.25));
        assert_eq!(offsets[3], Vec2::new(0.25, 0.25));

        let mean = offsets.iter().sum::<Vec2>() / 4.0;
        assert_eq!(mean, Vec2::ZERO);
    }

    #[test]
    fn test_grid_offsets_are_deterministic() {
        let mut a = StdRng::seed_from_u64(1);
        let mut b = StdRng::seed_from_u64(2);
        for i in 0..9 {
            assert_eq!(
                sample_offset(Sampling::Grid, 9, i, &mut a),
                sample_offset(Sampling::Grid, 9, i, &mut b)
            );
        }
    }

    #[test]
    fn test_random_offsets_in_pixel() {
        let mut rng = StdRng::seed_from_u64(7);
        for i in 0..64 {
            let o = sample_offset(Sampling::Random, 64, i, &mut rng);
            assert!(o.x >= -0.5 && o.x < 0.5);
            assert!(o.y >= -0.5 && o.y < 0.5);
        }
    }
}
