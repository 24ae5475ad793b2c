// Copyright @yucwang 2026

use crate::core::bsdf::{non_negative, Material, ShadeInfo};
use crate::core::interaction::Contact;
use crate::core::texture::{MaterialCoords, MaterialMap};
use crate::math::constants::{Float, Vector3f};

use rand::RngCore;

use std::sync::Arc;

/// Debug material: glows in proportion to how closely the surface normal
/// follows `highlight_direction`.
pub struct NormalHighlighter {
    highlight_direction: Vector3f,
    emission: Arc<dyn MaterialMap>,
}

impl NormalHighlighter {
    pub fn new(highlight_direction: Vector3f, emission: Arc<dyn MaterialMap>) -> Self {
        Self { highlight_direction: highlight_direction.normalize(), emission }
    }
}

impl Material for NormalHighlighter {
    fn shade(&self, contact: &Contact, lambda: Float, _rng: &mut dyn RngCore) -> ShadeInfo {
        let weight = self.highlight_direction.dot(&contact.normal);
        let power = weight * self.emission.eval(&MaterialCoords::from_contact(contact, lambda));
        ShadeInfo::emission(non_negative(power), contact)
    }
}
