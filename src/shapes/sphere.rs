// Copyright @yucwang 2026

use crate::core::interaction::Contact;
use crate::core::shape::Geometry;
use crate::math::aabb::AABox;
use crate::math::constants::{Float, Vector2f, Vector3f};
use crate::math::ray::RaySegment;
use crate::math::span::Span;

/// Unit sphere centered on the origin.
#[derive(Debug, Default, Clone)]
pub struct Sphere;

impl Sphere {
    pub fn new() -> Self {
        Sphere
    }

    fn contact(segment: &RaySegment, t: Float) -> Contact {
        // A miss leaves t NaN, which no segment contains.
        if !segment.contains(t) {
            return Contact::none();
        }
        let ray = &segment.ray;
        let p = ray.eval(t);
        let mtl2 = Vector2f::new(p.x.atan2(p.y), p.z.max(-1.0).min(1.0).acos());
        Contact::new(t, *ray, p, mtl2, p)
    }

    fn roots(segment: &RaySegment) -> (Float, Float) {
        let b = segment.ray.slope.dot(&segment.ray.point);
        let c = segment.ray.point.norm_squared() - 1.0;
        let root = (b * b - c).sqrt();
        (-b - root, -b + root)
    }
}

impl Geometry for Sphere {
    fn get_aabox(&self) -> AABox {
        AABox::new(Span::new(-1.0, 1.0), Span::new(-1.0, 1.0), Span::new(-1.0, 1.0))
    }

    fn ray_into(&self, segment: &RaySegment) -> Contact {
        Self::contact(segment, Self::roots(segment).0)
    }

    fn ray_exit(&self, segment: &RaySegment) -> Contact {
        Self::contact(segment, Self::roots(segment).1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::ray::Ray;

    #[test]
    fn test_sphere_contact_exact() {
        let sphere = Sphere::new();
        let seg = RaySegment::from_ray(Ray::new(Vector3f::new(0.0, 0.0, 2.0), Vector3f::new(0.0, 0.0, -1.0)));
        let c = sphere.ray_into(&seg);
        assert_eq!(c.t, 1.0);
        assert_eq!(c.point, Vector3f::new(0.0, 0.0, 1.0));
        assert_eq!(c.normal, Vector3f::new(0.0, 0.0, 1.0));

        let e = sphere.ray_exit(&seg);
        assert_eq!(e.t, 3.0);
        assert_eq!(e.normal, Vector3f::new(0.0, 0.0, -1.0));
        assert!(e.normal.dot(&seg.ray.slope) > 0.0);
    }

    #[test]
    fn test_sphere_miss_and_inside() {
        let sphere = Sphere::new();
        let miss = RaySegment::from_ray(Ray::new(Vector3f::new(0.0, 2.0, 2.0), Vector3f::new(0.0, 0.0, -1.0)));
        assert!(!sphere.ray_into(&miss).is_hit());
        assert!(!sphere.ray_exit(&miss).is_hit());

        let inside = RaySegment::from_ray(Ray::new(Vector3f::zeros(), Vector3f::x()));
        assert!(!sphere.ray_into(&inside).is_hit());
        let e = sphere.ray_exit(&inside);
        assert!((e.t - 1.0).abs() < 1e-12);
        assert!((e.normal - Vector3f::x()).norm() < 1e-12);
    }
}
