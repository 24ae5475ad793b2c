/* Copyright 2020 @Yuchen Wong */

pub type Float = f64;

pub type Vector2f = nalgebra::Vector2<Float>;
pub type Vector3f = nalgebra::Vector3<Float>;
pub type Matrix3f = nalgebra::Matrix3<Float>;

pub const EPSILON: Float = 1e-9;
pub const PI: Float = std::f64::consts::PI;
pub const INV_PI: Float = std::f64::consts::FRAC_1_PI;
pub const FLOAT_MAX: Float = std::f64::MAX;
pub const INFINITY: Float = std::f64::INFINITY;

// Lower bound of every scene query issued by the path sampler, keeps a
// continuation ray from hitting the surface it just left.
pub const SCENE_EPSILON: Float = 1e-7;
