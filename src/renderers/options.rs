// Copyright @yucwang 2026

use crate::math::constants::Float;

use thiserror::Error;

use std::thread;

/// Everything a render needs besides the camera and the scene.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RenderOptions {
    pub image_rows: usize,
    pub image_cols: usize,
    /// Each pixel is sampled at `supersample_grid_size^2` wavelengths.
    pub supersample_grid_size: usize,
    pub lambda_min_nm: Float,
    pub lambda_max_nm: Float,
    pub max_bounce_depth: usize,
    pub seed: u64,
    pub worker_count: usize,
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("image must have at least one row and one column (got {rows}x{cols})")]
    EmptyImage { rows: usize, cols: usize },
    #[error("supersample grid size must be positive")]
    EmptyGrid,
    #[error("max bounce depth must be positive")]
    ZeroDepth,
    #[error("wavelength bounds must be finite and positive (got {lo} nm .. {hi} nm)")]
    BadWavelength { lo: Float, hi: Float },
    #[error("wavelength range is empty ({lo} nm .. {hi} nm)")]
    EmptyWavelengthRange { lo: Float, hi: Float },
    #[error("at least one worker thread is required")]
    NoWorkers,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            image_rows: 512,
            image_cols: 512,
            supersample_grid_size: 5,
            lambda_min_nm: 390.0,
            lambda_max_nm: 835.0,
            max_bounce_depth: 8,
            seed: 0,
            worker_count: thread::available_parallelism().map(|n| n.get()).unwrap_or(1),
        }
    }
}

impl RenderOptions {
    /// Reports the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.image_rows == 0 || self.image_cols == 0 {
            return Err(ConfigError::EmptyImage { rows: self.image_rows, cols: self.image_cols });
        }
        if self.supersample_grid_size == 0 {
            return Err(ConfigError::EmptyGrid);
        }
        if self.max_bounce_depth == 0 {
            return Err(ConfigError::ZeroDepth);
        }
        let (lo, hi) = (self.lambda_min_nm, self.lambda_max_nm);
        if !(lo.is_finite() && hi.is_finite() && lo > 0.0 && hi > 0.0) {
            return Err(ConfigError::BadWavelength { lo, hi });
        }
        if !(lo < hi) {
            return Err(ConfigError::EmptyWavelengthRange { lo, hi });
        }
        if self.worker_count == 0 {
            return Err(ConfigError::NoWorkers);
        }
        Ok(())
    }

    pub fn wavelength_bins(&self) -> usize {
        self.supersample_grid_size * self.supersample_grid_size
    }

    /// Bounds of wavelength bin `i` out of `wavelength_bins()`.
    pub fn wavelength_bin(&self, i: usize) -> (Float, Float) {
        let width = (self.lambda_max_nm - self.lambda_min_nm) / self.wavelength_bins() as Float;
        let lo = self.lambda_min_nm + width * i as Float;
        (lo, lo + width)
    }

    pub fn total_samples(&self) -> usize {
        self.image_rows * self.image_cols * self.wavelength_bins()
    }
}
