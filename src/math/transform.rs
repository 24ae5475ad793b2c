// Copyright 2020 @TwoCookingMice

use super::constants::{Float, Matrix3f, Vector3f};
use super::matrix;
use super::ray::{Ray, RaySegment};

use nalgebra::{Rotation3, Unit};
use std::ops;

/// `x -> linear * x + offset`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct AffineTransform {
    pub linear: Matrix3f,
    pub offset: Vector3f,
}

impl Default for AffineTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl AffineTransform {
    pub fn new(linear: Matrix3f, offset: Vector3f) -> Self {
        Self { linear, offset }
    }

    pub fn identity() -> Self {
        Self { linear: Matrix3f::identity(), offset: Vector3f::zeros() }
    }

    pub fn from_linear(linear: Matrix3f) -> Self {
        Self { linear, offset: Vector3f::zeros() }
    }

    pub fn translation(offset: Vector3f) -> Self {
        Self { linear: Matrix3f::identity(), offset }
    }

    pub fn scaling(s: Float) -> Self {
        Self::from_linear(Matrix3f::from_diagonal_element(s))
    }

    pub fn scaling_xyz(s: Vector3f) -> Self {
        Self::from_linear(Matrix3f::from_diagonal(&s))
    }

    /// Right-handed rotation of `angle` radians around `axis`.
    pub fn rotation(axis: Vector3f, angle: Float) -> Self {
        let rot = Rotation3::from_axis_angle(&Unit::new_normalize(axis), angle);
        Self::from_linear(rot.into_inner())
    }

    pub fn inverse(&self) -> Self {
        let inv_linear = matrix::inverse(&self.linear);
        Self { linear: inv_linear, offset: -(inv_linear * self.offset) }
    }

    // Tangents map through `linear`, so normals have to map through
    // transpose(inverse(linear)) for n^T t = 0 to survive the transform.
    pub fn normal_linear_map(&self) -> Matrix3f {
        matrix::inverse(&self.linear).transpose()
    }

    pub fn apply_point(&self, p: &Vector3f) -> Vector3f {
        self.linear * p + self.offset
    }

    pub fn apply_vector(&self, v: &Vector3f) -> Vector3f {
        self.linear * v
    }

    /// Transformed ray plus the length `linear` gives to its unit slope.
    /// Parameters along the source ray scale by that factor.
    pub fn apply_ray_scaled(&self, ray: &Ray) -> (Ray, Float) {
        let slope = self.linear * ray.slope;
        let scale = slope.norm();
        (Ray::new(self.apply_point(&ray.point), slope / scale), scale)
    }
}

impl ops::Mul<AffineTransform> for AffineTransform {
    type Output = AffineTransform;

    fn mul(self, rhs: AffineTransform) -> AffineTransform {
        AffineTransform {
            linear: self.linear * rhs.linear,
            offset: self.offset + self.linear * rhs.offset,
        }
    }
}

impl ops::Mul<Vector3f> for AffineTransform {
    type Output = Vector3f;

    fn mul(self, p: Vector3f) -> Vector3f {
        self.apply_point(&p)
    }
}

impl ops::Mul<Ray> for AffineTransform {
    type Output = Ray;

    fn mul(self, ray: Ray) -> Ray {
        self.apply_ray_scaled(&ray).0
    }
}

impl ops::Mul<RaySegment> for AffineTransform {
    type Output = RaySegment;

    fn mul(self, segment: RaySegment) -> RaySegment {
        let (ray, scale) = self.apply_ray_scaled(&segment.ray);
        RaySegment::new(ray, segment.valid * scale)
    }
}
