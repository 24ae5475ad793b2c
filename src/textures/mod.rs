// Copyright @yucwang 2026

pub mod combinators;
pub mod constant;
pub mod perlin;
pub mod procedural;
