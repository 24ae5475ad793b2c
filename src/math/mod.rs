// Copyright 2020 @TwoCookingMice

pub mod aabb;
pub mod bitmap;
pub mod constants;
pub mod matrix;
pub mod ray;
pub mod span;
pub mod spectrum;
pub mod transform;
pub mod warp;
