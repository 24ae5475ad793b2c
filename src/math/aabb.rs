// Copyright 2020 @TwoCookingMice

use super::constants::{Float, Vector3f};
use super::ray::RaySegment;
use super::span::Span;
use super::transform::AffineTransform;

use std::ops;

/// Axis-aligned box made of one span per axis.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct AABox {
    pub spans: [Span; 3],
}

impl AABox {
    pub fn new(x: Span, y: Span, z: Span) -> Self {
        Self { spans: [x, y, z] }
    }

    /// Fold seed for `min_containing`.
    pub fn accum_zero() -> Self {
        Self { spans: [Span::accum_zero(); 3] }
    }

    /// Marker for "this entity has no geometry"; never a fold seed.
    pub fn nan() -> Self {
        Self { spans: [Span::nan(); 3] }
    }

    pub fn everything() -> Self {
        Self { spans: [Span::everything(); 3] }
    }

    pub fn from_corners(a: &Vector3f, b: &Vector3f) -> Self {
        Self::from_point(a).min_containing_point(b)
    }

    pub fn from_point(p: &Vector3f) -> Self {
        Self::new(Span::point(p.x), Span::point(p.y), Span::point(p.z))
    }

    pub fn min_containing(&self, other: &AABox) -> AABox {
        let mut out = *self;
        for axis in 0..3 {
            out.spans[axis] = self.spans[axis].min_containing(&other.spans[axis]);
        }
        out
    }

    pub fn min_containing_point(&self, p: &Vector3f) -> AABox {
        let mut out = *self;
        for axis in 0..3 {
            out.spans[axis] = self.spans[axis].min_containing_point(p[axis]);
        }
        out
    }

    pub fn contains(&self, other: &AABox) -> bool {
        (0..3).all(|axis| self.spans[axis].contains_span(&other.spans[axis]))
    }

    pub fn contains_point(&self, p: &Vector3f) -> bool {
        (0..3).all(|axis| self.spans[axis].contains(p[axis]))
    }

    pub fn is_empty(&self) -> bool {
        self.spans.iter().any(|s| s.is_empty())
    }

    pub fn is_finite(&self) -> bool {
        self.spans.iter().all(|s| s.is_finite())
    }

    pub fn is_nan(&self) -> bool {
        self.spans.iter().any(|s| s.lo.is_nan() || s.hi.is_nan())
    }

    pub fn center(&self) -> Vector3f {
        Vector3f::new(0.5 * (self.spans[0].lo + self.spans[0].hi),
                      0.5 * (self.spans[1].lo + self.spans[1].hi),
                      0.5 * (self.spans[2].lo + self.spans[2].hi))
    }

    pub fn corner(&self, index: usize) -> Vector3f {
        let pick = |axis: usize| {
            if index & (1 << axis) == 0 {
                self.spans[axis].lo
            } else {
                self.spans[axis].hi
            }
        };
        Vector3f::new(pick(0), pick(1), pick(2))
    }

    pub fn surface_area(&self) -> Float {
        if self.is_empty() {
            return 0.0;
        }
        let a = self.spans[0].measure();
        let b = self.spans[1].measure();
        let c = self.spans[2].measure();

        2.0 * (a * b + a * c + b * c)
    }
}

/// Parameters at which a line through `p` with slope `s` lies inside `span`
/// along one axis. A parallel line is inside everywhere or nowhere, including
/// when it runs exactly along a bounding plane.
pub fn slab_span(span: &Span, p: Float, s: Float) -> Span {
    if s == 0.0 {
        return if span.contains(p) { Span::everything() } else { Span::nan() };
    }
    let (a, b) = ((span.lo - p) / s, (span.hi - p) / s);
    if a > b {
        Span::new(b, a)
    } else {
        Span::new(a, b)
    }
}

/// Parameter span over which `segment` is inside `bounds`, or `Span::nan()`.
pub fn ray_test(segment: &RaySegment, bounds: &AABox) -> Span {
    let p = &segment.ray.point;
    let s = &segment.ray.slope;
    let mut cover = Span::everything();

    for axis in 0..3 {
        let hit = slab_span(&bounds.spans[axis], p[axis], s[axis]);
        if !hit.overlaps(&cover) {
            return Span::nan();
        }
        cover = cover.max_intersecting(&hit);
    }

    cover.max_intersecting(&segment.valid)
}

fn scale_span(k: Float, span: &Span) -> Span {
    if k == 0.0 {
        Span::point(0.0)
    } else {
        *span * k
    }
}

// Boxes can only grow under repeated transformation; a rotated box is
// re-boxed around its corners.
impl ops::Mul<AABox> for AffineTransform {
    type Output = AABox;

    fn mul(self, bounds: AABox) -> AABox {
        if bounds.is_empty() {
            return bounds;
        }

        if bounds.is_finite() {
            return (0..8).fold(AABox::accum_zero(), |acc, i| {
                acc.min_containing_point(&self.apply_point(&bounds.corner(i)))
            });
        }

        // Unbounded axes: interval arithmetic gives the same hull as the
        // corners would, without producing inf * 0.
        let mut out = AABox::accum_zero();
        for row in 0..3 {
            let mut span = Span::point(self.offset[row]);
            for col in 0..3 {
                let term = scale_span(self.linear[(row, col)], &bounds.spans[col]);
                span = Span::new(span.lo + term.lo, span.hi + term.hi);
            }
            out.spans[row] = span;
        }
        out
    }
}

/* Test for AABox */
