// Copyright 2020 @TwoCookingMice

use super::constants::{Float, Vector3f};

/// Integral of the CIE 1931 luminance matching function over the visible
/// range; dividing by it maps a flat unit spectrum to `Y = 1`.
pub const CIE_Y_INTEGRAL: Float = 106.856895;

/// Signal sampled at `samples.len()` evenly spaced points over `[lo, hi]`.
#[derive(Debug, Clone, PartialEq)]
pub struct DenseSignal {
    pub lo: Float,
    pub hi: Float,
    pub samples: Vec<Float>,
}

impl DenseSignal {
    pub fn new(lo: Float, hi: Float, samples: Vec<Float>) -> Self {
        Self { lo, hi, samples }
    }

    pub fn constant(value: Float) -> Self {
        Self { lo: 0.0, hi: 0.0, samples: vec![value] }
    }

    /// Piecewise-linear value at `x`, held constant outside `[lo, hi]`.
    pub fn interpolate(&self, x: Float) -> Float {
        let n = self.samples.len();
        match n {
            0 => return 0.0,
            1 => return self.samples[0],
            _ => {}
        }
        if x <= self.lo {
            return self.samples[0];
        }
        if x >= self.hi {
            return self.samples[n - 1];
        }

        let pos = (x - self.lo) / (self.hi - self.lo) * ((n - 1) as Float);
        let i = (pos.floor() as usize).min(n - 2);
        let frac = pos - i as Float;
        self.samples[i] * (1.0 - frac) + self.samples[i + 1] * frac
    }

    pub fn max_value(&self) -> Float {
        self.samples.iter().cloned().fold(Float::NEG_INFINITY, Float::max)
    }

    pub fn min_value(&self) -> Float {
        self.samples.iter().cloned().fold(Float::INFINITY, Float::min)
    }
}

fn lobe(lambda: Float, mu: Float, sigma_lo: Float, sigma_hi: Float) -> Float {
    let sigma = if lambda < mu { sigma_lo } else { sigma_hi };
    let d = (lambda - mu) / sigma;
    (-0.5 * d * d).exp()
}

/// CIE 1931 2-degree matching functions at `lambda` nanometers, using the
/// multi-lobe Gaussian fit of Wyman, Sloan and Shirley.
pub fn cie_xyz(lambda: Float) -> Vector3f {
    let x = 1.056 * lobe(lambda, 599.8, 37.9, 31.0)
        + 0.362 * lobe(lambda, 442.0, 16.0, 26.7)
        - 0.065 * lobe(lambda, 501.1, 20.4, 26.2);
    let y = 0.821 * lobe(lambda, 568.8, 46.9, 40.5)
        + 0.286 * lobe(lambda, 530.9, 16.3, 31.1);
    let z = 1.217 * lobe(lambda, 437.0, 11.8, 36.0)
        + 0.681 * lobe(lambda, 459.0, 26.0, 13.8);
    Vector3f::new(x, y, z)
}

/// Tristimulus contribution of spectral power `power`, assumed constant over
/// `[lambda_lo, lambda_hi]`: `power` times the matching functions integrated
/// over that bin (Simpson's rule, about one nanometer per step).
pub fn spectral_to_xyz(lambda_lo: Float, lambda_hi: Float, power: Float) -> Vector3f {
    let width = lambda_hi - lambda_lo;
    if !(width > 0.0) || power == 0.0 {
        return Vector3f::zeros();
    }

    let steps = ((width.ceil() as usize).max(1) + 1) / 2 * 2;
    let h = width / steps as Float;
    let mut acc = cie_xyz(lambda_lo) + cie_xyz(lambda_hi);
    for i in 1..steps {
        let w = if i % 2 == 1 { 4.0 } else { 2.0 };
        acc += cie_xyz(lambda_lo + h * i as Float) * w;
    }
    acc * (h / 3.0 * power)
}

/// CIE XYZ (as accumulated by the renderer) to linear sRGB primaries.
pub fn xyz_to_linear_srgb(xyz: &Vector3f) -> Vector3f {
    let s = xyz / CIE_Y_INTEGRAL;
    Vector3f::new(3.240479 * s.x - 1.537150 * s.y - 0.498535 * s.z,
                  -0.969265 * s.x + 1.875992 * s.y + 0.041556 * s.z,
                  0.055648 * s.x - 0.204043 * s.y + 1.057311 * s.z)
}

pub fn srgb_gamma_encode(linear: Float) -> Float {
    if linear < 0.0031308 {
        12.92 * linear
    } else {
        1.055 * linear.powf(1.0 / 2.4) - 0.055
    }
}
