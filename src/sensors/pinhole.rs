// Copyright @yucwang 2026

use crate::core::sensor::Camera;
use crate::math::constants::{Float, Matrix3f, Vector3f};
use crate::math::ray::Ray;

use rand::RngCore;

/// Ideal pinhole at `center`.
///
/// The columns of `aperture_to_world` are the forward, left and up
/// directions; `aperture` scales image coordinates before they are turned
/// into a slope, so `aperture.y`/`aperture.z` are the tangents of the half
/// field of view.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PinholeCamera {
    pub center: Vector3f,
    pub aperture_to_world: Matrix3f,
    pub aperture: Vector3f,
}

impl PinholeCamera {
    pub fn new(center: Vector3f, aperture_to_world: Matrix3f, aperture: Vector3f) -> Self {
        Self { center, aperture_to_world, aperture }
    }

    pub fn look_at(center: Vector3f, target: Vector3f, up: Vector3f, aperture: Vector3f) -> Self {
        let forward = (target - center).normalize();
        let left = up.cross(&forward).normalize();
        let up = forward.cross(&left);
        Self { center, aperture_to_world: Matrix3f::from_columns(&[forward, left, up]), aperture }
    }

    /// Camera with horizontal field of view `fov_h` (radians) and the given
    /// width over height aspect ratio.
    pub fn with_fov(center: Vector3f, target: Vector3f, up: Vector3f, fov_h: Float, aspect: Float) -> Self {
        let half = (0.5 * fov_h).tan();
        Self::look_at(center, target, up, Vector3f::new(1.0, half, half / aspect))
    }
}

impl Camera for PinholeCamera {
    fn image_to_ray(&self, coords: &Vector3f, _rng: &mut dyn RngCore) -> Ray {
        let slope = (self.aperture_to_world * coords.component_mul(&self.aperture)).normalize();
        Ray::new(self.center, slope)
    }
}
