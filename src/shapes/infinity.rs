// Copyright @yucwang 2026

use crate::core::interaction::Contact;
use crate::core::shape::Geometry;
use crate::math::aabb::AABox;
use crate::math::constants::{Vector2f, INFINITY};
use crate::math::ray::RaySegment;

/// The environment at infinite distance. A ray escapes into it when its
/// segment is unbounded above, and came out of it when unbounded below.
/// `mtl3` carries the direction of travel.
#[derive(Debug, Default, Clone)]
pub struct Infinity;

impl Infinity {
    pub fn new() -> Self {
        Infinity
    }
}

impl Geometry for Infinity {
    fn get_aabox(&self) -> AABox {
        AABox::everything()
    }

    fn ray_into(&self, segment: &RaySegment) -> Contact {
        if segment.valid.hi != INFINITY {
            return Contact::none();
        }
        let s = segment.ray.slope;
        let mtl2 = Vector2f::new(s.x.atan2(s.y), s.z.max(-1.0).min(1.0).acos());
        Contact::new(INFINITY, segment.ray, -s, mtl2, s)
    }

    fn ray_exit(&self, segment: &RaySegment) -> Contact {
        if segment.valid.lo != -INFINITY {
            return Contact::none();
        }
        let s = segment.ray.slope;
        let mtl2 = Vector2f::new(s.x.atan2(s.y), s.z.max(-1.0).min(1.0).acos());
        Contact::new(-INFINITY, segment.ray, s, mtl2, s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::constants::Vector3f;
    use crate::math::ray::Ray;
    use crate::math::span::Span;

    #[test]
    fn test_infinity_contacts() {
        let inf = Infinity::new();
        let ray = Ray::new(Vector3f::zeros(), Vector3f::y());

        let c = inf.ray_into(&RaySegment::from_ray(ray));
        assert!(c.is_hit());
        assert_eq!(c.t, INFINITY);
        assert_eq!(c.normal, -Vector3f::y());
        assert_eq!(c.mtl3, Vector3f::y());
        assert!(!inf.ray_exit(&RaySegment::from_ray(ray)).is_hit());

        assert!(!inf.ray_into(&RaySegment::new(ray, Span::new(0.0, 10.0))).is_hit());
        let e = inf.ray_exit(&RaySegment::new(ray, Span::everything()));
        assert_eq!(e.t, -INFINITY);
        assert_eq!(e.normal, Vector3f::y());
    }
}
