// Copyright @yucwang 2026

pub mod directional_emitter;
pub mod emitter;
pub mod lambertian_diffuse;
pub mod microfacet;
pub mod normal_highlighter;
pub mod smooth_conductor;
pub mod smooth_dielectric;
