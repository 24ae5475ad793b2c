// Copyright @yucwang 2023

use crate::core::bsdf::{unit_clamp, Material, ShadeInfo};
use crate::core::interaction::Contact;
use crate::core::texture::{MaterialCoords, MaterialMap};
use crate::math::constants::Float;
use crate::math::ray::Ray;
use crate::math::warp::sample_hemisphere;

use rand::RngCore;

use std::sync::Arc;

/// Ideal diffuse reflector.
///
/// Incident directions are drawn uniformly over the hemisphere on the side
/// the ray arrived from and weighted by their cosine to the normal.
pub struct LambertianDiffuse {
    reflectance: Arc<dyn MaterialMap>,
}

impl LambertianDiffuse {
    pub fn new(reflectance: Arc<dyn MaterialMap>) -> Self {
        Self { reflectance }
    }
}

impl Material for LambertianDiffuse {
    fn shade(&self, contact: &Contact, lambda: Float, rng: &mut dyn RngCore) -> ShadeInfo {
        let facing = if contact.normal.dot(&contact.ray.slope) > 0.0 {
            -contact.normal
        } else {
            contact.normal
        };
        let dir = sample_hemisphere(rng, &facing);

        let r = unit_clamp(self.reflectance.eval(&MaterialCoords::from_contact(contact, lambda)));
        ShadeInfo::scatter(unit_clamp(facing.dot(&dir)) * r, Ray::new(contact.point, dir))
    }
}
