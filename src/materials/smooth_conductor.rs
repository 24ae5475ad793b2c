// Copyright @yucwang 2026

use crate::core::bsdf::{unit_clamp, Material, ShadeInfo};
use crate::core::interaction::Contact;
use crate::core::texture::{MaterialCoords, MaterialMap};
use crate::math::constants::Float;
use crate::math::matrix::reflect;
use crate::math::ray::Ray;

use rand::RngCore;

use std::sync::Arc;

/// Perfect mirror with a wavelength dependent reflectance.
pub struct SmoothConductor {
    reflectance: Arc<dyn MaterialMap>,
}

impl SmoothConductor {
    pub fn new(reflectance: Arc<dyn MaterialMap>) -> Self {
        Self { reflectance }
    }
}

impl Material for SmoothConductor {
    fn shade(&self, contact: &Contact, lambda: Float, _rng: &mut dyn RngCore) -> ShadeInfo {
        let k = unit_clamp(self.reflectance.eval(&MaterialCoords::from_contact(contact, lambda)));
        let slope = reflect(&contact.ray.slope, &contact.normal);
        ShadeInfo::scatter(k, Ray::new(contact.point, slope))
    }
}
