// Copyright @yucwang 2023

use super::constants::{Float, Vector3f, PI};

use rand::RngCore;

/// Uniform sample in `[0, 1)` built from the top 53 bits of a draw.
pub fn uniform_float(rng: &mut dyn RngCore) -> Float {
    ((rng.next_u64() >> 11) as Float) * (1.0 / ((1u64 << 53) as Float))
}

pub fn uniform_range(rng: &mut dyn RngCore, lo: Float, hi: Float) -> Float {
    lo + (hi - lo) * uniform_float(rng)
}

/// Uniform index in `0..n`; `n` must be positive.
pub fn uniform_index(rng: &mut dyn RngCore, n: usize) -> usize {
    ((uniform_float(rng) * n as Float) as usize).min(n - 1)
}

/// Uniform point in the unit ball, never the origin.
pub fn sample_unit_ball(rng: &mut dyn RngCore) -> Vector3f {
    loop {
        let p = Vector3f::new(uniform_range(rng, -1.0, 1.0),
                              uniform_range(rng, -1.0, 1.0),
                              uniform_range(rng, -1.0, 1.0));
        let n2 = p.norm_squared();
        if n2 > 0.0 && n2 <= 1.0 {
            return p;
        }
    }
}

/// Uniform direction on the unit sphere.
pub fn sample_unit_sphere(rng: &mut dyn RngCore) -> Vector3f {
    sample_unit_ball(rng).normalize()
}

/// Uniform direction on the hemisphere around `n`.
pub fn sample_hemisphere(rng: &mut dyn RngCore, n: &Vector3f) -> Vector3f {
    let d = sample_unit_sphere(rng);
    if d.dot(n) < 0.0 {
        -d
    } else {
        d
    }
}

/// Standard normal deviate by the Box-Muller transform.
pub fn sample_standard_normal(rng: &mut dyn RngCore) -> Float {
    let u = 1.0 - uniform_float(rng);
    let v = uniform_float(rng);
    (-2.0 * u.ln()).sqrt() * (2.0 * PI * v).cos()
}

/// Two unit tangents completing `n` to a right-handed orthonormal frame.
pub fn tangent_frame(n: &Vector3f) -> (Vector3f, Vector3f) {
    let helper = if n.x.abs() < 0.9 { Vector3f::x() } else { Vector3f::y() };
    let s = n.cross(&helper).normalize();
    let t = n.cross(&s);
    (s, t)
}
