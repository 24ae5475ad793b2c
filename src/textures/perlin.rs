// Copyright @yucwang 2026

use crate::core::texture::{MaterialCoords, MaterialMap};
use crate::math::constants::{Float, Vector2f, PI};
use crate::math::warp::uniform_float;

use rand::rngs::StdRng;
use rand::SeedableRng;

const TABLE_SIDE: usize = 256;

fn lattice_hash(i: i64, j: i64) -> usize {
    let mut h = (i as u32).wrapping_mul(0x45d9f3b) ^ (j as u32);
    h = ((h >> 16) ^ h).wrapping_mul(0x45d9f3b);
    h = ((h >> 16) ^ h).wrapping_mul(0x45d9f3b);
    h = (h >> 16) ^ h;
    (h as usize) % (TABLE_SIDE * TABLE_SIDE)
}

fn fade(t: Float) -> Float {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

/// Two dimensional gradient noise over the surface coordinates, in `[0, 1]`.
pub struct PerlinNoise {
    scale: Float,
    gradients: Vec<Vector2f>,
}

impl PerlinNoise {
    pub fn new(scale: Float, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let gradients = (0..TABLE_SIDE * TABLE_SIDE)
            .map(|_| {
                let angle = 2.0 * PI * uniform_float(&mut rng);
                Vector2f::new(angle.cos(), angle.sin())
            })
            .collect();
        Self { scale, gradients }
    }

    /// Raw noise, roughly within `[-sqrt(1/2), sqrt(1/2)]`.
    pub fn noise(&self, p: &Vector2f) -> Float {
        let q = p / self.scale;
        let (ci, cj) = (q.x.floor(), q.y.floor());
        let (fx, fy) = (q.x - ci, q.y - cj);
        let (ci, cj) = (ci as i64, cj as i64);

        let corner = |di: i64, dj: i64| {
            let g = &self.gradients[lattice_hash(ci + di, cj + dj)];
            g.x * (fx - di as Float) + g.y * (fy - dj as Float)
        };

        let (wx, wy) = (fade(fx), fade(fy));
        let lo = corner(0, 0) * (1.0 - wx) + corner(1, 0) * wx;
        let hi = corner(0, 1) * (1.0 - wx) + corner(1, 1) * wx;
        lo * (1.0 - wy) + hi * wy
    }
}

impl MaterialMap for PerlinNoise {
    fn eval(&self, at: &MaterialCoords) -> Float {
        let v = 0.5 + self.noise(&at.mtl2) * std::f64::consts::FRAC_1_SQRT_2;
        v.max(0.0).min(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::constants::Vector3f;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_noise_vanishes_on_lattice() {
        let map = PerlinNoise::new(0.5, 7);
        for i in -3..3 {
            for j in -3..3 {
                let p = Vector2f::new(i as Float * 0.5, j as Float * 0.5);
                assert!(map.noise(&p).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_noise_range_and_determinism() {
        let a = PerlinNoise::new(1.3, 42);
        let b = PerlinNoise::new(1.3, 42);
        let mut rng = StdRng::seed_from_u64(3);
        let mut spread = (Float::INFINITY, Float::NEG_INFINITY);
        for _ in 0..2000 {
            let at = MaterialCoords::new(
                Vector2f::new(rng.gen_range(-20.0..20.0), rng.gen_range(-20.0..20.0)),
                Vector3f::zeros(),
                550.0,
            );
            let v = a.eval(&at);
            assert!((0.0..=1.0).contains(&v));
            assert_eq!(v, b.eval(&at));
            spread = (spread.0.min(v), spread.1.max(v));
        }
        assert!(spread.1 - spread.0 > 0.2);
    }

    #[test]
    fn test_noise_is_continuous() {
        let map = PerlinNoise::new(1.0, 9);
        let p = Vector2f::new(3.999999, 2.5);
        let q = Vector2f::new(4.000001, 2.5);
        assert!((map.noise(&p) - map.noise(&q)).abs() < 1e-4);
    }
}
