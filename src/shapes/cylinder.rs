// Copyright @yucwang 2026

use crate::core::interaction::Contact;
use crate::core::shape::Geometry;
use crate::math::aabb::AABox;
use crate::math::constants::{Float, Vector2f, Vector3f};
use crate::math::matrix::reject;
use crate::math::ray::RaySegment;
use crate::math::span::Span;

/// Infinite cylinder around the line `center + s * axis`.
#[derive(Debug, Clone)]
pub struct Cylinder {
    center: Vector3f,
    axis: Vector3f,
    radius: Float,
    // Orthonormal pair perpendicular to `axis`, for the angular coordinate.
    basis_u: Vector3f,
    basis_v: Vector3f,
}

impl Default for Cylinder {
    fn default() -> Self {
        Self::new(Vector3f::zeros(), Vector3f::z(), 1.0)
    }
}

impl Cylinder {
    pub fn new(center: Vector3f, axis: Vector3f, radius: Float) -> Self {
        let axis = axis.normalize();
        let helper = if axis.x.abs() < 0.9 { Vector3f::x() } else { Vector3f::y() };
        let basis_u = reject(&axis, &helper).normalize();
        let basis_v = axis.cross(&basis_u);
        Self { center, axis, radius, basis_u, basis_v }
    }

    fn roots(&self, segment: &RaySegment) -> (Float, Float) {
        let fa = reject(&self.axis, &segment.ray.slope);
        let fb = reject(&self.axis, &(segment.ray.point - self.center));
        let a = fa.norm_squared();
        let b = fa.dot(&fb);
        let c = fb.norm_squared() - self.radius * self.radius;
        let root = (b * b - a * c).sqrt();
        ((-b - root) / a, (-b + root) / a)
    }

    fn contact(&self, segment: &RaySegment, t: Float) -> Contact {
        if !segment.contains(t) {
            return Contact::none();
        }
        let p = segment.eval(t);
        let radial = reject(&self.axis, &(p - self.center));
        let angle = radial.dot(&self.basis_v).atan2(radial.dot(&self.basis_u));
        let height = self.axis.dot(&(p - self.center));
        Contact::new(t, segment.ray, radial.normalize(), Vector2f::new(angle, height), p)
    }
}

impl Geometry for Cylinder {
    // Bounded only along directions perpendicular to the axis.
    fn get_aabox(&self) -> AABox {
        let mut bounds = AABox::everything();
        for i in 0..3 {
            if self.axis[i] == 0.0 {
                bounds.spans[i] = Span::new(self.center[i] - self.radius, self.center[i] + self.radius);
            }
        }
        bounds
    }

    fn ray_into(&self, segment: &RaySegment) -> Contact {
        self.contact(segment, self.roots(segment).0)
    }

    fn ray_exit(&self, segment: &RaySegment) -> Contact {
        self.contact(segment, self.roots(segment).1)
    }
}
