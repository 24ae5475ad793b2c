// Copyright @yucwang 2026

use crate::core::bsdf::Material;
use crate::core::interaction::{contact_transform, Contact};
use crate::core::kdtree::{Bounded, KdTree, KdVisitor, SahConfig};
use crate::core::shape::Geometry;
use crate::math::aabb::{ray_test, AABox};
use crate::math::constants::Matrix3f;
use crate::math::ray::RaySegment;
use crate::math::transform::AffineTransform;

use rand::rngs::StdRng;
use rand::SeedableRng;

const SCENE_TREE_SEED: u64 = 0x0dac_0015;

/// A geometry placed in the world with the material it is made of.
pub struct SceneElement {
    pub geometry: Box<dyn Geometry>,
    pub material: Box<dyn Material>,
    pub model_to_world: AffineTransform,
    pub name: Option<String>,
}

impl SceneElement {
    pub fn new(geometry: Box<dyn Geometry>, material: Box<dyn Material>, model_to_world: AffineTransform) -> Self {
        Self { geometry, material, model_to_world, name: None }
    }

    pub fn with_name(mut self, name: String) -> Self {
        self.name = Some(name);
        self
    }
}

/// Per element data precomputed for one instant of scene time.
#[derive(Debug, Copy, Clone)]
pub struct CrushedSceneElement {
    pub element: usize,
    pub world_to_model: AffineTransform,
    pub model_to_world: AffineTransform,
    pub model_to_world_normals: Matrix3f,
    pub world_aabox: AABox,
}

impl CrushedSceneElement {
    fn new(element: usize, source: &SceneElement) -> Self {
        let model_to_world = source.model_to_world;
        Self {
            element,
            world_to_model: model_to_world.inverse(),
            model_to_world,
            model_to_world_normals: model_to_world.normal_linear_map(),
            world_aabox: model_to_world * source.geometry.get_aabox(),
        }
    }
}

impl Bounded for CrushedSceneElement {
    fn aabox(&self) -> AABox {
        self.world_aabox
    }
}

pub struct Scene {
    elements: Vec<SceneElement>,
    sah: SahConfig,
    crushed: Option<KdTree<CrushedSceneElement>>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    pub fn new() -> Self {
        Self { elements: Vec::new(), sah: SahConfig::default(), crushed: None }
    }

    pub fn with_sah_config(mut self, sah: SahConfig) -> Self {
        self.sah = sah;
        self.crushed = None;
        self
    }

    /// Adds an element and returns its index. The scene must be crushed
    /// again before it can be traced.
    pub fn add_element(&mut self, element: SceneElement) -> usize {
        self.elements.push(element);
        self.crushed = None;
        self.elements.len() - 1
    }

    pub fn elements(&self) -> &[SceneElement] {
        &self.elements
    }

    pub fn element(&self, index: usize) -> Option<&SceneElement> {
        self.elements.get(index)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn is_crushed(&self) -> bool {
        self.crushed.is_some()
    }

    pub fn tree(&self) -> Option<&KdTree<CrushedSceneElement>> {
        self.crushed.as_ref()
    }

    /// Prepares every element for time `time` and rebuilds the world kd-tree.
    pub fn crush(&mut self, time: f64) {
        if self.elements.is_empty() {
            log::warn!("Crushing a scene with no elements.");
        }

        for element in self.elements.iter_mut() {
            element.geometry.crush(time);
            element.material.crush(time);
        }

        let crushed: Vec<CrushedSceneElement> = self.elements
            .iter()
            .enumerate()
            .map(|(i, e)| CrushedSceneElement::new(i, e))
            .collect();
        let mut tree = KdTree::new(crushed);
        tree.refine_sah(&self.sah, &mut StdRng::seed_from_u64(SCENE_TREE_SEED));

        log::info!("Crushed scene at t = {}: {} elements ({} unbounded), {} kd-tree nodes, depth {}.",
                   time, tree.len(), tree.infinite_len(), tree.node_count(), tree.depth());
        self.crushed = Some(tree);
    }

    /// Nearest contact along `segment` and the element it belongs to.
    pub fn nearest_contact(&self, segment: &RaySegment) -> Option<(Contact, &SceneElement)> {
        match scene_ray_intersect(self, segment) {
            (contact, Some(element)) if contact.is_hit() => Some((contact, element)),
            _ => None,
        }
    }
}

pub fn crush(scene: &mut Scene, time: f64) {
    scene.crush(time);
}

struct NearestElement<'a> {
    scene: &'a Scene,
    query: RaySegment,
    best: Contact,
    best_element: Option<usize>,
}

impl<'a> NearestElement<'a> {
    /// Keeps `model_contact` if it beats the current best. Returns true
    /// when the query was shortened.
    fn offer(&mut self, model_contact: &Contact, model_query: &RaySegment, crushed: &CrushedSceneElement) -> bool {
        if !model_contact.is_hit() || !model_query.contains(model_contact.t) {
            return false;
        }
        let world = contact_transform(model_contact, &crushed.model_to_world, &crushed.model_to_world_normals);
        if !self.query.contains(world.t) {
            return false;
        }
        self.query.valid.hi = world.t;
        self.best = world;
        self.best_element = Some(crushed.element);
        true
    }
}

impl<'a> KdVisitor<CrushedSceneElement> for NearestElement<'a> {
    fn select(&mut self, bounds: &AABox) -> bool {
        !ray_test(&self.query, bounds).is_empty()
    }

    fn visit(&mut self, crushed: &CrushedSceneElement) {
        let scene = self.scene;
        let geometry = &scene.elements[crushed.element].geometry;

        let mut model_query = crushed.world_to_model * self.query;
        let into = geometry.ray_into(&model_query);
        if self.offer(&into, &model_query, crushed) {
            model_query = crushed.world_to_model * self.query;
        }
        let exit = geometry.ray_exit(&model_query);
        self.offer(&exit, &model_query, crushed);
    }
}

/// Nearest contact of `query` with any element of a crushed scene. An
/// uncrushed scene has no contacts.
pub fn scene_ray_intersect<'a>(scene: &'a Scene, query: &RaySegment) -> (Contact, Option<&'a SceneElement>) {
    let tree = match scene.crushed.as_ref() {
        Some(tree) => tree,
        None => return (Contact::none(), None),
    };

    let mut search = NearestElement { scene, query: *query, best: Contact::none(), best_element: None };
    tree.query(&mut search);

    let element = search.best_element.and_then(|i| scene.elements.get(i));
    (search.best, element)
}
