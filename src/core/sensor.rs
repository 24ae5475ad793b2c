// Copyright @yucwang 2026

use crate::math::constants::Vector3f;
use crate::math::ray::Ray;

use rand::RngCore;

/// Maps image plane coordinates to primary rays.
///
/// `coords.x` is always 1; `coords.y` runs from +1 (left edge) to -1
/// (right edge) and `coords.z` from +1 (top) to -1 (bottom).
pub trait Camera: Send + Sync {
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    fn image_to_ray(&self, coords: &Vector3f, rng: &mut dyn RngCore) -> Ray;
}
