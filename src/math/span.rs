// Copyright @yucwang 2026

use super::constants::{Float, INFINITY};

use std::ops;

/// Closed interval `[lo, hi]`.
///
/// A span is empty when `lo > hi` or when either bound is NaN. `Span::nan()`
/// is the canonical empty value and is what every "nothing found" path
/// returns, so consumers only ever need `is_empty()`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Span {
    pub lo: Float,
    pub hi: Float,
}

impl Span {
    pub fn new(lo: Float, hi: Float) -> Self {
        Self { lo, hi }
    }

    pub fn nan() -> Self {
        Self { lo: Float::NAN, hi: Float::NAN }
    }

    /// Seed for `min_containing` folds: contains nothing, absorbs anything.
    pub fn accum_zero() -> Self {
        Self { lo: INFINITY, hi: -INFINITY }
    }

    pub fn point(x: Float) -> Self {
        Self { lo: x, hi: x }
    }

    pub fn everything() -> Self {
        Self { lo: -INFINITY, hi: INFINITY }
    }

    pub fn pos_half() -> Self {
        Self { lo: 0.0, hi: INFINITY }
    }

    pub fn is_empty(&self) -> bool {
        !(self.lo <= self.hi)
    }

    pub fn is_finite(&self) -> bool {
        self.lo.is_finite() && self.hi.is_finite()
    }

    pub fn measure(&self) -> Float {
        if self.is_empty() {
            0.0
        } else {
            self.hi - self.lo
        }
    }

    pub fn contains(&self, x: Float) -> bool {
        self.lo <= x && x <= self.hi
    }

    pub fn contains_span(&self, other: &Span) -> bool {
        !other.is_empty() && self.lo <= other.lo && other.hi <= self.hi
    }

    pub fn overlaps(&self, other: &Span) -> bool {
        !self.is_empty() && !other.is_empty() && self.lo <= other.hi && other.lo <= self.hi
    }

    /// Largest span contained in both, `Span::nan()` when they do not overlap.
    pub fn max_intersecting(&self, other: &Span) -> Span {
        if !self.overlaps(other) {
            return Span::nan();
        }
        Span::new(self.lo.max(other.lo), self.hi.min(other.hi))
    }

    /// Smallest span containing both. Empty operands are ignored.
    pub fn min_containing(&self, other: &Span) -> Span {
        if other.is_empty() {
            return *self;
        }
        if self.is_empty() {
            return *other;
        }
        Span::new(self.lo.min(other.lo), self.hi.max(other.hi))
    }

    pub fn min_containing_point(&self, x: Float) -> Span {
        self.min_containing(&Span::point(x))
    }

    /// Splits at `at` into the parts below and above it.
    pub fn cut(&self, at: Float) -> (Span, Span) {
        let at = at.max(self.lo).min(self.hi);
        (Span::new(self.lo, at), Span::new(at, self.hi))
    }

    pub fn strictly_precedes(&self, other: &Span) -> bool {
        self.hi < other.lo
    }

    pub fn into_option(self) -> Option<Span> {
        if self.is_empty() {
            None
        } else {
            Some(self)
        }
    }
}

impl ops::Mul<Float> for Span {
    type Output = Span;

    fn mul(self, k: Float) -> Span {
        let (a, b) = (self.lo * k, self.hi * k);
        if k < 0.0 {
            Span::new(b, a)
        } else {
            Span::new(a, b)
        }
    }
}
