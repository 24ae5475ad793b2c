// Copyright @yucwang 2026

use crate::core::bsdf::{non_negative, unit_clamp, Material, ShadeInfo};
use crate::core::interaction::Contact;
use crate::core::texture::{MaterialCoords, MaterialMap};
use crate::math::constants::{Float, Vector3f, PI};
use crate::math::matrix::reflect;
use crate::math::ray::Ray;
use crate::math::warp::{sample_standard_normal, tangent_frame, uniform_float};

use rand::RngCore;

use std::sync::Arc;

const MAX_FACET_TRIES: usize = 64;
const MAX_FACET_BOUNCES: usize = 32;

/// Rough mirror whose facet normals tilt away from the surface normal by a
/// half-normal angle of variance `variance(coords)` radians squared.
pub struct GaussianMicrofacet {
    variance: Arc<dyn MaterialMap>,
    reflectance: Arc<dyn MaterialMap>,
}

impl GaussianMicrofacet {
    pub fn new(variance: Arc<dyn MaterialMap>, reflectance: Arc<dyn MaterialMap>) -> Self {
        Self { variance, reflectance }
    }
}

/// Draws a facet normal around `facing` that a ray travelling along `slope`
/// strikes from the front. Falls back to `facing` when the try budget runs out.
fn sample_facet(facing: &Vector3f, slope: &Vector3f, sigma: Float, rng: &mut dyn RngCore) -> Vector3f {
    if !(sigma > 0.0) {
        return *facing;
    }

    let (s, t) = tangent_frame(facing);
    for _ in 0..MAX_FACET_TRIES {
        let theta = (sigma * sample_standard_normal(rng)).abs();
        if theta >= 0.5 * PI {
            continue;
        }
        let phi = 2.0 * PI * uniform_float(rng);
        let m = facing * theta.cos() + (s * phi.cos() + t * phi.sin()) * theta.sin();
        if m.dot(slope) < 0.0 {
            return m;
        }
    }
    *facing
}

impl Material for GaussianMicrofacet {
    fn shade(&self, contact: &Contact, lambda: Float, rng: &mut dyn RngCore) -> ShadeInfo {
        let coords = MaterialCoords::from_contact(contact, lambda);
        let sigma = non_negative(self.variance.eval(&coords)).sqrt();

        let slope = contact.ray.slope;
        let facing = if contact.normal.dot(&slope) > 0.0 {
            -contact.normal
        } else {
            contact.normal
        };

        // Bounce among facets until the ray leaves the surface.
        let mut out = slope;
        for _ in 0..MAX_FACET_BOUNCES {
            if out.dot(&facing) > 0.0 {
                break;
            }
            let facet = sample_facet(&facing, &out, sigma, rng);
            out = reflect(&out, &facet);
        }
        if !(out.dot(&facing) > 0.0) {
            out = reflect(&slope, &facing);
        }

        let k = unit_clamp(self.reflectance.eval(&coords));
        ShadeInfo::scatter(k, Ray::new(contact.point, out.normalize()))
    }
}
