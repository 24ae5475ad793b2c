// Copyright @yucwang 2026

use crate::core::texture::{MaterialCoords, MaterialMap};
use crate::math::constants::Float;
use crate::math::spectrum::DenseSignal;

/// The same value everywhere and at every wavelength.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ConstantScalar {
    value: Float,
}

impl ConstantScalar {
    pub fn new(value: Float) -> Self {
        Self { value }
    }
}

impl MaterialMap for ConstantScalar {
    fn eval(&self, _at: &MaterialCoords) -> Float {
        self.value
    }
}

/// Position independent, wavelength dependent.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstantSpectrum {
    spectrum: DenseSignal,
}

impl ConstantSpectrum {
    pub fn new(spectrum: DenseSignal) -> Self {
        Self { spectrum }
    }
}

impl MaterialMap for ConstantSpectrum {
    fn eval(&self, at: &MaterialCoords) -> Float {
        self.spectrum.interpolate(at.lambda)
    }
}
