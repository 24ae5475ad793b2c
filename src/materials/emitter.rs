// Copyright @yucwang 2026

use crate::core::bsdf::{non_negative, Material, ShadeInfo};
use crate::core::interaction::Contact;
use crate::core::texture::{MaterialCoords, MaterialMap};
use crate::math::constants::Float;

use rand::RngCore;

use std::sync::Arc;

/// A light source that absorbs everything it is hit by.
pub struct Emitter {
    emissivity: Arc<dyn MaterialMap>,
}

impl Emitter {
    pub fn new(emissivity: Arc<dyn MaterialMap>) -> Self {
        Self { emissivity }
    }
}

impl Material for Emitter {
    fn shade(&self, contact: &Contact, lambda: Float, _rng: &mut dyn RngCore) -> ShadeInfo {
        let power = self.emissivity.eval(&MaterialCoords::from_contact(contact, lambda));
        ShadeInfo::emission(non_negative(power), contact)
    }
}
