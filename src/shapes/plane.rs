// Copyright @yucwang 2026

use crate::core::interaction::Contact;
use crate::core::shape::Geometry;
use crate::math::aabb::AABox;
use crate::math::constants::{Vector2f, Vector3f};
use crate::math::ray::RaySegment;

/// The plane `x = 0` with normal `+X`. Everything with `x < 0` is inside.
#[derive(Debug, Default, Clone)]
pub struct Plane;

impl Plane {
    pub fn new() -> Self {
        Plane
    }

    fn contact(segment: &RaySegment) -> Contact {
        let ray = &segment.ray;
        let t = -ray.point.x / ray.slope.x;
        if !segment.contains(t) {
            return Contact::none();
        }
        let p = ray.eval(t);
        Contact::new(t, *ray, Vector3f::x(), Vector2f::new(p.y, p.z), p)
    }
}

impl Geometry for Plane {
    fn get_aabox(&self) -> AABox {
        AABox::everything()
    }

    fn ray_into(&self, segment: &RaySegment) -> Contact {
        if segment.ray.slope.x < 0.0 {
            Self::contact(segment)
        } else {
            Contact::none()
        }
    }

    fn ray_exit(&self, segment: &RaySegment) -> Contact {
        if segment.ray.slope.x > 0.0 {
            Self::contact(segment)
        } else {
            Contact::none()
        }
    }
}
