// Copyright @yucwang 2023

use crate::core::interaction::Contact;
use crate::math::constants::Float;
use crate::math::ray::Ray;

use rand::RngCore;

/// Outcome of shading one contact at one wavelength.
///
/// `propagation_k` is the fraction of whatever arrives along
/// `incident_ray` that leaves towards the viewer; zero ends the path.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ShadeInfo {
    pub propagation_k: Float,
    pub emitted_power: Float,
    pub incident_ray: Ray,
}

impl ShadeInfo {
    pub fn new(propagation_k: Float, emitted_power: Float, incident_ray: Ray) -> Self {
        Self { propagation_k, emitted_power, incident_ray }
    }

    /// Terminal shading: emits `power` and absorbs everything else.
    pub fn emission(power: Float, at: &Contact) -> Self {
        Self { propagation_k: 0.0, emitted_power: power, incident_ray: at.ray }
    }

    pub fn scatter(propagation_k: Float, incident_ray: Ray) -> Self {
        Self { propagation_k, emitted_power: 0.0, incident_ray }
    }

    pub fn terminates(&self) -> bool {
        !(self.propagation_k > 0.0)
    }
}

/// Surface response of a scene element.
///
/// Implementations keep `propagation_k` within `[0, 1]` and
/// `emitted_power` non-negative whatever their maps evaluate to.
pub trait Material: Send + Sync {
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    fn crush(&mut self, _time: f64) {}

    fn shade(&self, contact: &Contact, lambda: Float, rng: &mut dyn RngCore) -> ShadeInfo;
}

/// Clamps a map value into `[0, 1]`, sending NaN to zero.
pub fn unit_clamp(x: Float) -> Float {
    if x > 1.0 {
        1.0
    } else if x > 0.0 {
        x
    } else {
        0.0
    }
}

/// Clamps a map value into `[0, inf)`, sending NaN to zero.
pub fn non_negative(x: Float) -> Float {
    if x > 0.0 {
        x
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamps() {
        assert_eq!(unit_clamp(1.5), 1.0);
        assert_eq!(unit_clamp(-0.5), 0.0);
        assert_eq!(unit_clamp(Float::NAN), 0.0);
        assert_eq!(unit_clamp(0.25), 0.25);
        assert_eq!(non_negative(Float::NAN), 0.0);
        assert_eq!(non_negative(7.0), 7.0);
        assert_eq!(non_negative(-7.0), 0.0);
    }
}
