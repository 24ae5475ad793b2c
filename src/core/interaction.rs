// Copyright @yucwang 2023

use crate::math::constants::{Float, Matrix3f, Vector2f, Vector3f};
use crate::math::ray::Ray;
use crate::math::transform::AffineTransform;

/// Where a ray meets a surface. `t` is NaN when there is no contact.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Contact {
    pub t: Float,
    pub ray: Ray,
    pub point: Vector3f,
    pub normal: Vector3f,
    pub mtl2: Vector2f,
    pub mtl3: Vector3f,
}

impl Contact {
    pub fn new(t: Float, ray: Ray, normal: Vector3f, mtl2: Vector2f, mtl3: Vector3f) -> Self {
        Self { t, ray, point: ray.eval(t), normal, mtl2, mtl3 }
    }

    pub fn none() -> Self {
        let nan3 = Vector3f::repeat(Float::NAN);
        Self {
            t: Float::NAN,
            ray: Ray::new(nan3, nan3),
            point: nan3,
            normal: nan3,
            mtl2: Vector2f::repeat(Float::NAN),
            mtl3: nan3,
        }
    }

    pub fn is_hit(&self) -> bool {
        !self.t.is_nan()
    }

    pub fn into_option(self) -> Option<Contact> {
        if self.is_hit() {
            Some(self)
        } else {
            None
        }
    }
}

/// Pushes a contact through `transform`.
///
/// `normal_map` must be `transform.normal_linear_map()`. The length the
/// linear part gives to the unit slope is the factor both for renormalizing
/// the slope and for rescaling `t`, so `ray.eval(t)` still lands on `point`.
pub fn contact_transform(contact: &Contact, transform: &AffineTransform, normal_map: &Matrix3f) -> Contact {
    if !contact.is_hit() {
        return *contact;
    }
    let (ray, scale) = transform.apply_ray_scaled(&contact.ray);
    Contact {
        t: contact.t * scale,
        ray,
        point: transform.apply_point(&contact.point),
        normal: (normal_map * contact.normal).normalize(),
        mtl2: contact.mtl2,
        mtl3: contact.mtl3,
    }
}
