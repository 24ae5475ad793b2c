// Copyright 2020 @TwoCookingMice

use super::constants::{Float, Vector3f};
use super::span::Span;

/// Parametric ray. `slope` is kept at unit length by every producer.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub point: Vector3f,
    pub slope: Vector3f,
}

impl Ray {
    pub fn new(point: Vector3f, slope: Vector3f) -> Self {
        Self { point, slope }
    }

    pub fn towards(point: Vector3f, direction: Vector3f) -> Self {
        Self { point, slope: direction.normalize() }
    }

    pub fn eval(&self, t: Float) -> Vector3f {
        self.point + self.slope * t
    }
}

/// A ray together with the parameter range in which contacts are admissible.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RaySegment {
    pub ray: Ray,
    pub valid: Span,
}

impl RaySegment {
    pub fn new(ray: Ray, valid: Span) -> Self {
        Self { ray, valid }
    }

    pub fn from_ray(ray: Ray) -> Self {
        Self { ray, valid: Span::pos_half() }
    }

    pub fn eval(&self, t: Float) -> Vector3f {
        self.ray.eval(t)
    }

    pub fn contains(&self, t: Float) -> bool {
        self.valid.contains(t)
    }
}
