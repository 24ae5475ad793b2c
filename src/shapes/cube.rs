// Copyright @yucwang 2026

use crate::core::interaction::Contact;
use crate::core::shape::Geometry;
use crate::math::aabb::{slab_span, AABox};
use crate::math::constants::{Float, Vector2f, Vector3f};
use crate::math::ray::RaySegment;
use crate::math::span::Span;

/// Axis-aligned box, `[-1, 1]^3` unless built from explicit bounds.
#[derive(Debug, Clone)]
pub struct Cube {
    bounds: AABox,
}

impl Default for Cube {
    fn default() -> Self {
        Self { bounds: AABox::new(Span::new(-1.0, 1.0), Span::new(-1.0, 1.0), Span::new(-1.0, 1.0)) }
    }
}

struct SlabHit {
    cover: Span,
    near_axis: Option<usize>,
    far_axis: Option<usize>,
}

impl Cube {
    pub fn new(bounds: AABox) -> Self {
        Self { bounds }
    }

    // Slab test that remembers which axis produced the near and far bounds,
    // so the contact can report that face's normal.
    fn slabs(&self, segment: &RaySegment) -> Option<SlabHit> {
        let p = &segment.ray.point;
        let s = &segment.ray.slope;
        let mut hit = SlabHit { cover: Span::everything(), near_axis: None, far_axis: None };

        for axis in 0..3 {
            let axis_span = slab_span(&self.bounds.spans[axis], p[axis], s[axis]);
            if !axis_span.overlaps(&hit.cover) {
                return None;
            }
            let (lo, hi) = (axis_span.lo, axis_span.hi);
            if lo > hit.cover.lo {
                hit.cover.lo = lo;
                hit.near_axis = Some(axis);
            }
            if hi < hit.cover.hi {
                hit.cover.hi = hi;
                hit.far_axis = Some(axis);
            }
        }

        Some(hit)
    }

    fn face_contact(&self, segment: &RaySegment, t: Float, axis: usize, sign: Float) -> Contact {
        if !segment.contains(t) {
            return Contact::none();
        }
        let p = segment.eval(t);
        let mut normal = Vector3f::zeros();
        normal[axis] = sign;
        let (a, b) = ((axis + 1) % 3, (axis + 2) % 3);
        Contact::new(t, segment.ray, normal, Vector2f::new(p[a], p[b]), p)
    }
}

impl Geometry for Cube {
    fn get_aabox(&self) -> AABox {
        self.bounds
    }

    fn ray_into(&self, segment: &RaySegment) -> Contact {
        match self.slabs(segment) {
            Some(SlabHit { cover, near_axis: Some(axis), .. }) => {
                let sign = if segment.ray.slope[axis] < 0.0 { 1.0 } else { -1.0 };
                self.face_contact(segment, cover.lo, axis, sign)
            }
            _ => Contact::none(),
        }
    }

    fn ray_exit(&self, segment: &RaySegment) -> Contact {
        match self.slabs(segment) {
            Some(SlabHit { cover, far_axis: Some(axis), .. }) => {
                let sign = if segment.ray.slope[axis] < 0.0 { -1.0 } else { 1.0 };
                self.face_contact(segment, cover.hi, axis, sign)
            }
            _ => Contact::none(),
        }
    }
}
