// Copyright @yucwang 2026

use crate::core::interaction::Contact;
use crate::math::constants::{Float, Vector2f, Vector3f};

/// Where a material map is evaluated.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct MaterialCoords {
    pub mtl2: Vector2f,
    pub mtl3: Vector3f,
    pub lambda: Float,
}

impl MaterialCoords {
    pub fn new(mtl2: Vector2f, mtl3: Vector3f, lambda: Float) -> Self {
        Self { mtl2, mtl3, lambda }
    }

    pub fn from_contact(contact: &Contact, lambda: Float) -> Self {
        Self { mtl2: contact.mtl2, mtl3: contact.mtl3, lambda }
    }

    /// Surface or volume coordinates, padded to three components.
    pub fn position(&self, volumetric: bool) -> Vector3f {
        if volumetric {
            self.mtl3
        } else {
            Vector3f::new(self.mtl2.x, self.mtl2.y, 0.0)
        }
    }
}

/// A scalar field over material coordinates and wavelength.
pub trait MaterialMap: Send + Sync {
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    fn eval(&self, at: &MaterialCoords) -> Float;
}
