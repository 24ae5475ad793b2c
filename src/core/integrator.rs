// Copyright @yucwang 2026

use crate::core::scene::Scene;
use crate::core::sensor::Camera;
use crate::math::constants::{Float, Vector3f, INFINITY, SCENE_EPSILON};
use crate::math::ray::{Ray, RaySegment};
use crate::math::span::Span;
use crate::math::spectrum::spectral_to_xyz;
use crate::math::warp::uniform_float;
use crate::renderers::options::RenderOptions;

use rand::RngCore;

/// Image plane coordinates of the point `(u, v)` inside pixel `(row, col)`.
pub fn scan_plane_to_image(row: usize, col: usize, rows: usize, cols: usize, u: Float, v: Float) -> Vector3f {
    let y = 1.0 - 2.0 * (col as Float + u) / cols as Float;
    let z = 1.0 - 2.0 * (row as Float + v) / rows as Float;
    Vector3f::new(1.0, y, z)
}

/// Power arriving along `ray` at wavelength `lambda`, following at most
/// `depth_limit` surface interactions.
pub fn sample_ray(scene: &Scene, ray: &Ray, lambda: Float, depth_limit: usize, rng: &mut dyn RngCore) -> Float {
    let mut accum = 0.0;
    let mut k = 1.0;
    let mut ray = *ray;

    for _ in 0..depth_limit {
        let query = RaySegment::new(ray, Span::new(SCENE_EPSILON, INFINITY));
        let (contact, element) = match scene.nearest_contact(&query) {
            Some(hit) => hit,
            None => break,
        };

        let shading = element.material.shade(&contact, lambda, rng);
        accum += k * shading.emitted_power;
        k = shading.propagation_k;
        if !(k > 0.0) {
            break;
        }
        ray = shading.incident_ray;
    }

    accum
}

/// CIE XYZ of one pixel: one jittered path per wavelength bin.
pub fn shade_pixel(row: usize,
                   col: usize,
                   options: &RenderOptions,
                   camera: &dyn Camera,
                   scene: &Scene,
                   rng: &mut dyn RngCore) -> Vector3f {
    let mut xyz = Vector3f::zeros();
    for bin in 0..options.wavelength_bins() {
        let (lo, hi) = options.wavelength_bin(bin);
        let lambda = 0.5 * (lo + hi);

        let (u, v) = (uniform_float(rng), uniform_float(rng));
        let coords = scan_plane_to_image(row, col, options.image_rows, options.image_cols, u, v);
        let ray = camera.image_to_ray(&coords, rng);

        let power = sample_ray(scene, &ray, lambda, options.max_bounce_depth, rng);
        xyz += spectral_to_xyz(lo, hi, power);
    }
    xyz
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::bsdf::{Material, ShadeInfo};
    use crate::core::interaction::Contact;
    use crate::core::scene::SceneElement;
    use crate::materials::emitter::Emitter;
    use crate::materials::smooth_conductor::SmoothConductor;
    use crate::math::constants::PI;
    use crate::math::matrix::reflect;
    use crate::math::transform::AffineTransform;
    use crate::shapes::plane::Plane;
    use crate::shapes::sphere::Sphere;
    use crate::textures::constant::ConstantScalar;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct CountingMirror {
        calls: Arc<AtomicUsize>,
        emitted: Float,
    }

    impl Material for CountingMirror {
        fn shade(&self, contact: &Contact, _lambda: Float, _rng: &mut dyn RngCore) -> ShadeInfo {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut info = ShadeInfo::scatter(1.0, Ray::new(contact.point, reflect(&contact.ray.slope, &contact.normal)));
            info.emitted_power = self.emitted;
            info
        }
    }

    fn hall_of_mirrors(calls: &Arc<AtomicUsize>) -> Scene {
        let mut scene = Scene::new();
        let mirror = || Box::new(CountingMirror { calls: Arc::clone(calls), emitted: 0.5 });
        // Half-spaces x < 0 and x > 2 facing each other.
        scene.add_element(SceneElement::new(Box::new(Plane::new()), mirror(), AffineTransform::identity()));
        scene.add_element(SceneElement::new(Box::new(Plane::new()),
                                            mirror(),
                                            AffineTransform::translation(Vector3f::new(2.0, 0.0, 0.0))
                                                * AffineTransform::scaling_xyz(Vector3f::new(-1.0, 1.0, 1.0))));
        scene.crush(0.0);
        scene
    }

    #[test]
    fn test_scan_plane_corners() {
        let top_left = scan_plane_to_image(0, 0, 4, 8, 0.0, 0.0);
        assert_eq!(top_left, Vector3f::new(1.0, 1.0, 1.0));
        let bottom_right = scan_plane_to_image(3, 7, 4, 8, 1.0, 1.0);
        assert_eq!(bottom_right, Vector3f::new(1.0, -1.0, -1.0));
        let center = scan_plane_to_image(2, 4, 4, 8, 0.0, 0.0);
        assert_eq!(center, Vector3f::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_hall_of_mirrors_respects_depth_limit() {
        let calls = Arc::new(AtomicUsize::new(0));
        let scene = hall_of_mirrors(&calls);
        let mut rng = StdRng::seed_from_u64(0);
        let ray = Ray::new(Vector3f::new(1.0, 0.0, 0.0), Vector3f::new(1.0, 0.1, 0.0).normalize());

        for depth in [1usize, 2, 7, 40].iter() {
            calls.store(0, Ordering::SeqCst);
            let power = sample_ray(&scene, &ray, 550.0, *depth, &mut rng);
            assert_eq!(calls.load(Ordering::SeqCst), *depth);
            assert!((power - 0.5 * *depth as Float).abs() < 1e-12);
        }
    }

    #[test]
    fn test_weight_comes_from_last_surface() {
        let mut scene = Scene::new();
        let half_mirror = || Box::new(SmoothConductor::new(Arc::new(ConstantScalar::new(0.5))));
        scene.add_element(SceneElement::new(Box::new(Plane::new()), half_mirror(), AffineTransform::identity()));
        scene.add_element(SceneElement::new(Box::new(Plane::new()),
                                            half_mirror(),
                                            AffineTransform::translation(Vector3f::new(2.0, 0.0, 0.0))
                                                * AffineTransform::scaling_xyz(Vector3f::new(-1.0, 1.0, 1.0))));
        // Ceiling light filling y > 3.
        scene.add_element(SceneElement::new(Box::new(Plane::new()),
                                            Box::new(Emitter::new(Arc::new(ConstantScalar::new(1.0)))),
                                            AffineTransform::translation(Vector3f::new(0.0, 3.0, 0.0))
                                                * AffineTransform::rotation(Vector3f::z(), -0.5 * PI)));
        scene.crush(0.0);
        let mut rng = StdRng::seed_from_u64(0);

        // Bounces off x = 2, x = 0 and x = 2 again before reaching the light.
        let ray = Ray::new(Vector3f::new(1.0, 0.0, 0.0), Vector3f::new(1.0, 0.8, 0.0).normalize());
        let power = sample_ray(&scene, &ray, 550.0, 10, &mut rng);
        assert!((power - 0.5).abs() < 1e-12, "power = {}", power);
    }

    #[test]
    fn test_escaping_ray_carries_nothing() {
        let mut scene = Scene::new();
        scene.add_element(SceneElement::new(Box::new(Sphere::new()),
                                            Box::new(Emitter::new(Arc::new(ConstantScalar::new(2.0)))),
                                            AffineTransform::identity()));
        scene.crush(0.0);
        let mut rng = StdRng::seed_from_u64(0);

        let hit = Ray::new(Vector3f::new(5.0, 0.0, 0.0), -Vector3f::x());
        assert_eq!(sample_ray(&scene, &hit, 500.0, 4, &mut rng), 2.0);
        let miss = Ray::new(Vector3f::new(5.0, 0.0, 0.0), Vector3f::x());
        assert_eq!(sample_ray(&scene, &miss, 500.0, 4, &mut rng), 0.0);
    }
}
