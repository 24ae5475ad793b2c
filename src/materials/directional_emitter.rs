// Copyright @yucwang 2026

use crate::core::bsdf::{non_negative, Material, ShadeInfo};
use crate::core::interaction::Contact;
use crate::core::texture::{MaterialCoords, MaterialMap};
use crate::math::constants::{Float, Vector2f, Vector3f, PI};

use rand::RngCore;

use std::sync::Arc;

/// A window onto an environment: emission depends on where the ray came
/// from, not where it landed.
///
/// Only rays arriving from within `spread` radians of `direction` see any
/// light. The emissivity map is evaluated on the arrival direction, with
/// `mtl3` the ray slope and `mtl2` its spherical angles.
pub struct DirectionalEmitter {
    direction: Vector3f,
    cos_spread: Float,
    emissivity: Arc<dyn MaterialMap>,
}

impl DirectionalEmitter {
    pub fn new(direction: Vector3f, spread: Float, emissivity: Arc<dyn MaterialMap>) -> Self {
        Self { direction: direction.normalize(), cos_spread: spread.min(PI).cos(), emissivity }
    }

    /// Emits towards every direction.
    pub fn omnidirectional(emissivity: Arc<dyn MaterialMap>) -> Self {
        Self::new(Vector3f::z(), PI, emissivity)
    }
}

impl Material for DirectionalEmitter {
    fn shade(&self, contact: &Contact, lambda: Float, _rng: &mut dyn RngCore) -> ShadeInfo {
        let s = contact.ray.slope;
        if (-s).dot(&self.direction) < self.cos_spread {
            return ShadeInfo::emission(0.0, contact);
        }

        let angles = Vector2f::new(s.x.atan2(s.y), s.z.max(-1.0).min(1.0).acos());
        let power = self.emissivity.eval(&MaterialCoords::new(angles, s, lambda));
        ShadeInfo::emission(non_negative(power), contact)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::ray::Ray;
    use crate::textures::constant::ConstantScalar;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn arriving_along(slope: Vector3f) -> Contact {
        let ray = Ray::new(Vector3f::zeros(), slope);
        Contact::new(Float::INFINITY, ray, -slope, Vector2f::zeros(), slope)
    }

    #[test]
    fn test_emits_only_inside_cone() {
        let mut rng = StdRng::seed_from_u64(0);
        let sun = DirectionalEmitter::new(Vector3f::z(), 0.1, Arc::new(ConstantScalar::new(2.0)));

        // A ray heading down -z came from +z.
        let lit = sun.shade(&arriving_along(-Vector3f::z()), 500.0, &mut rng);
        assert_eq!(lit.emitted_power, 2.0);
        assert_eq!(lit.propagation_k, 0.0);

        let slightly_off = Vector3f::new(0.05, 0.0, -1.0).normalize();
        assert_eq!(sun.shade(&arriving_along(slightly_off), 500.0, &mut rng).emitted_power, 2.0);

        let dark = sun.shade(&arriving_along(Vector3f::x()), 500.0, &mut rng);
        assert_eq!(dark.emitted_power, 0.0);
        assert_eq!(dark.propagation_k, 0.0);
    }

    #[test]
    fn test_omnidirectional_sees_everything() {
        let mut rng = StdRng::seed_from_u64(0);
        let sky = DirectionalEmitter::omnidirectional(Arc::new(ConstantScalar::new(1.0)));
        for slope in [Vector3f::x(), -Vector3f::y(), Vector3f::z(), -Vector3f::z()].iter() {
            assert_eq!(sky.shade(&arriving_along(*slope), 500.0, &mut rng).emitted_power, 1.0);
        }
    }
}
