// Copyright @yucwang 2021

pub mod bsdf;
pub mod crush_cache;
pub mod integrator;
pub mod interaction;
pub mod kdtree;
pub mod scene;
pub mod scene_loader;
pub mod sensor;
pub mod shape;
pub mod texture;
