// Copyright @yucwang 2023

pub mod cube;
pub mod cylinder;
pub mod infinity;
pub mod plane;
pub mod sphere;
pub mod triangle;
pub mod triangle_mesh;
