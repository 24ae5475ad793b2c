// Copyright @yucwang 2026

use crate::math::aabb::AABox;
use crate::math::constants::Float;
use crate::math::span::Span;
use crate::math::warp::uniform_index;

use rand::RngCore;

const QUERY_STACK_DEPTH: usize = 128;

/// Anything that can be stored in a `KdTree`.
pub trait Bounded {
    fn aabox(&self) -> AABox;
}

/// Callbacks driving a `KdTree::query`.
///
/// `select` is asked again at every node, so a visitor that tightens its
/// own search range inside `visit` prunes the rest of the walk.
pub trait KdVisitor<T> {
    fn select(&mut self, bounds: &AABox) -> bool;
    fn visit(&mut self, element: &T);
}

/// Knobs of the surface area heuristic.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SahConfig {
    pub split_cost: Float,
    pub threshold: Float,
    pub candidates_per_axis: usize,
}

impl Default for SahConfig {
    fn default() -> Self {
        Self { split_cost: 1.0, threshold: 0.9, candidates_per_axis: 5 }
    }
}

#[derive(Debug, Copy, Clone)]
struct KdNode {
    bounds: AABox,
    start: usize,
    end: usize,
    lo_child: Option<usize>,
    hi_child: Option<usize>,
}

impl KdNode {
    fn leaf(bounds: AABox, start: usize, end: usize) -> Self {
        Self { bounds, start, end, lo_child: None, hi_child: None }
    }

    fn is_leaf(&self) -> bool {
        self.lo_child.is_none() && self.hi_child.is_none()
    }
}

struct SplitCandidate {
    axis: usize,
    cut: Float,
    cost: Float,
}

/// Spatial index over boxed elements.
///
/// Elements with an unbounded box sit in a separate bucket that every query
/// visits. The others are kept in one vector; each node owns a contiguous
/// range of it and its bounds contain the box of every element in that range.
pub struct KdTree<T> {
    finite: Vec<T>,
    infinite: Vec<T>,
    nodes: Vec<KdNode>,
}

impl<T: Bounded> KdTree<T> {
    pub fn new(elements: Vec<T>) -> Self {
        let (finite, infinite): (Vec<T>, Vec<T>) =
            elements.into_iter().partition(|e| e.aabox().is_finite());

        let mut nodes = Vec::new();
        if !finite.is_empty() {
            nodes.push(KdNode::leaf(containing_box(&finite), 0, finite.len()));
        }

        Self { finite, infinite, nodes }
    }

    /// Splits leaves while the surface area heuristic says it pays off.
    /// Driven by a work list, so pathological inputs cannot exhaust the stack.
    pub fn refine_sah(&mut self, config: &SahConfig, rng: &mut dyn RngCore) {
        if self.nodes.is_empty() {
            return;
        }
        self.nodes.truncate(1);
        self.nodes[0].lo_child = None;
        self.nodes[0].hi_child = None;

        let mut work = vec![0usize];
        while let Some(index) = work.pop() {
            let node = self.nodes[index];
            let count = node.end - node.start;
            if count < 2 {
                continue;
            }

            let split = match self.best_split(&node, config, rng) {
                Some(split) => split,
                None => continue,
            };
            let parent_cost = (count as Float) * node.bounds.surface_area();
            if split.cost + config.split_cost > config.threshold * parent_cost {
                continue;
            }

            let axis = split.axis;
            let cut = split.cut;
            let mid = node.start + partition_in_place(&mut self.finite[node.start..node.end],
                                                      |e| precedes_cut(&e.aabox(), axis, cut));
            if mid == node.start || mid == node.end {
                continue;
            }

            let lo = self.nodes.len();
            let lo_bounds = containing_box(&self.finite[node.start..mid]);
            let hi_bounds = containing_box(&self.finite[mid..node.end]);
            self.nodes.push(KdNode::leaf(lo_bounds, node.start, mid));
            self.nodes.push(KdNode::leaf(hi_bounds, mid, node.end));
            self.nodes[index].lo_child = Some(lo);
            self.nodes[index].hi_child = Some(lo + 1);
            work.push(lo);
            work.push(lo + 1);
        }

        log::debug!("kd-tree refined: {} finite / {} infinite elements, {} nodes, {} leaves, depth {}.",
                    self.finite.len(), self.infinite.len(), self.nodes.len(),
                    self.leaf_count(), self.depth());
    }

    fn best_split(&self, node: &KdNode, config: &SahConfig, rng: &mut dyn RngCore) -> Option<SplitCandidate> {
        let elements = &self.finite[node.start..node.end];
        let mut best: Option<SplitCandidate> = None;

        for axis in 0..3 {
            for _ in 0..config.candidates_per_axis {
                let pick = uniform_index(rng, elements.len());
                let cut = elements[pick].aabox().spans[axis].hi;

                let mut lo_box = AABox::accum_zero();
                let mut hi_box = AABox::accum_zero();
                let mut n_lo = 0usize;
                let mut n_hi = 0usize;
                for e in elements {
                    let b = e.aabox();
                    if precedes_cut(&b, axis, cut) {
                        lo_box = lo_box.min_containing(&b);
                        n_lo += 1;
                    } else {
                        hi_box = hi_box.min_containing(&b);
                        n_hi += 1;
                    }
                }

                let cost = (n_lo as Float) * lo_box.surface_area()
                    + (n_hi as Float) * hi_box.surface_area();
                if best.as_ref().map_or(true, |b| cost < b.cost) {
                    best = Some(SplitCandidate { axis, cut, cost });
                }
            }
        }

        best
    }

    /// Verifies that every node's bounds contain all boxes below it.
    pub fn check_containment(&self) -> bool {
        self.nodes.iter().all(|node| {
            let elements_inside = self.finite[node.start..node.end]
                .iter()
                .all(|e| node.bounds.contains(&e.aabox()));
            let children_inside = [node.lo_child, node.hi_child]
                .iter()
                .flatten()
                .all(|&c| node.bounds.contains(&self.nodes[c].bounds));
            elements_inside && children_inside
        })
    }
}

impl<T> KdTree<T> {
    /// Visits every unbounded element, then walks the nodes the visitor
    /// selects. When the fixed traversal stack is full the pending node's
    /// whole range is visited directly instead of descending further.
    pub fn query<V: KdVisitor<T> + ?Sized>(&self, visitor: &mut V) {
        for e in self.infinite.iter() {
            visitor.visit(e);
        }
        if self.nodes.is_empty() {
            return;
        }

        let mut stack = [0usize; QUERY_STACK_DEPTH];
        let mut top = 1usize;
        while top > 0 {
            top -= 1;
            let node = &self.nodes[stack[top]];
            if !visitor.select(&node.bounds) {
                continue;
            }

            match (node.lo_child, node.hi_child) {
                (Some(lo), Some(hi)) if top + 2 <= QUERY_STACK_DEPTH => {
                    stack[top] = hi;
                    stack[top + 1] = lo;
                    top += 2;
                }
                _ => {
                    for e in self.finite[node.start..node.end].iter() {
                        visitor.visit(e);
                    }
                }
            }
        }
    }

    /// Closure flavour of `query` for callers whose selector does not depend
    /// on what `visit` finds.
    pub fn query_with<S, F>(&self, select: S, visit: F)
    where
        S: FnMut(&AABox) -> bool,
        F: FnMut(&T),
    {
        let mut visitor = FnVisitor { select, visit };
        self.query(&mut visitor);
    }

    pub fn len(&self) -> usize {
        self.finite.len() + self.infinite.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.infinite.iter().chain(self.finite.iter())
    }

    pub fn bounds(&self) -> Option<AABox> {
        self.nodes.first().map(|n| n.bounds)
    }

    pub fn infinite_len(&self) -> usize {
        self.infinite.len()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf()).count()
    }

    pub fn depth(&self) -> usize {
        if self.nodes.is_empty() {
            return 0;
        }
        let mut deepest = 0;
        let mut work = vec![(0usize, 1usize)];
        while let Some((index, depth)) = work.pop() {
            deepest = deepest.max(depth);
            let node = &self.nodes[index];
            for child in [node.lo_child, node.hi_child].iter().flatten() {
                work.push((*child, depth + 1));
            }
        }
        deepest
    }
}

struct FnVisitor<S, F> {
    select: S,
    visit: F,
}

impl<T, S, F> KdVisitor<T> for FnVisitor<S, F>
where
    S: FnMut(&AABox) -> bool,
    F: FnMut(&T),
{
    fn select(&mut self, bounds: &AABox) -> bool {
        (self.select)(bounds)
    }

    fn visit(&mut self, element: &T) {
        (self.visit)(element)
    }
}

fn precedes_cut(bounds: &AABox, axis: usize, cut: Float) -> bool {
    bounds.spans[axis].strictly_precedes(&Span::point(cut))
}

fn containing_box<T: Bounded>(elements: &[T]) -> AABox {
    elements.iter().fold(AABox::accum_zero(), |acc, e| acc.min_containing(&e.aabox()))
}

// Linear in-place partition; returns the number of elements satisfying `pred`,
// which end up first.
fn partition_in_place<T, F: FnMut(&T) -> bool>(items: &mut [T], mut pred: F) -> usize {
    let mut mid = 0;
    for i in 0..items.len() {
        if pred(&items[i]) {
            items.swap(mid, i);
            mid += 1;
        }
    }
    mid
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::aabb::ray_test;
    use crate::math::constants::Vector3f;
    use crate::math::ray::{Ray, RaySegment};
    use crate::math::span::Span;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[derive(Debug, Clone)]
    struct TestBox {
        bounds: AABox,
        id: usize,
    }

    impl Bounded for TestBox {
        fn aabox(&self) -> AABox {
            self.bounds
        }
    }

    fn random_boxes(rng: &mut StdRng, n: usize) -> Vec<TestBox> {
        (0..n)
            .map(|id| {
                let c = Vector3f::from_fn(|_, _| rng.gen_range(-50.0..50.0));
                let h = Vector3f::from_fn(|_, _| rng.gen_range(0.05..3.0));
                TestBox { bounds: AABox::from_corners(&(c - h), &(c + h)), id }
            })
            .collect()
    }

    struct NearestEntry {
        segment: RaySegment,
        best_t: Float,
        best_id: Option<usize>,
    }

    impl KdVisitor<TestBox> for NearestEntry {
        fn select(&mut self, bounds: &AABox) -> bool {
            !ray_test(&self.segment, bounds).is_empty()
        }

        fn visit(&mut self, element: &TestBox) {
            let span = ray_test(&self.segment, &element.bounds);
            if !span.is_empty() && span.lo < self.best_t {
                self.best_t = span.lo;
                self.best_id = Some(element.id);
                self.segment.valid.hi = span.lo;
            }
        }
    }

    #[test]
    fn test_kdtree_containment_random() {
        let mut rng = StdRng::seed_from_u64(31);
        for round in 0..10 {
            let boxes = random_boxes(&mut rng, 50 + 40 * round);
            let mut tree = KdTree::new(boxes);
            tree.refine_sah(&SahConfig::default(), &mut rng);
            assert!(tree.check_containment());
            assert_eq!(tree.len(), 50 + 40 * round);
        }
    }

    #[test]
    fn test_kdtree_splits_spread_boxes() {
        let mut rng = StdRng::seed_from_u64(32);
        let mut tree = KdTree::new(random_boxes(&mut rng, 400));
        tree.refine_sah(&SahConfig::default(), &mut rng);
        assert!(tree.node_count() > 1);
        assert!(tree.leaf_count() * 2 - 1 == tree.node_count());
        assert!(tree.depth() > 1);
    }

    #[test]
    fn test_kdtree_identical_boxes_stay_one_leaf() {
        let mut rng = StdRng::seed_from_u64(33);
        let b = AABox::from_corners(&Vector3f::zeros(), &Vector3f::repeat(1.0));
        let boxes: Vec<TestBox> = (0..20).map(|id| TestBox { bounds: b, id }).collect();
        let mut tree = KdTree::new(boxes);
        tree.refine_sah(&SahConfig::default(), &mut rng);
        assert_eq!(tree.node_count(), 1);
    }

    #[test]
    fn test_boxes_touching_the_cut_go_high() {
        let b = AABox::from_corners(&Vector3f::zeros(), &Vector3f::new(1.0, 2.0, 3.0));
        assert!(precedes_cut(&b, 0, 1.5));
        assert!(!precedes_cut(&b, 0, 1.0));
        assert!(!precedes_cut(&b, 2, 2.0));
    }

    #[test]
    fn test_kdtree_query_matches_brute_force() {
        let mut rng = StdRng::seed_from_u64(34);
        let mut boxes = random_boxes(&mut rng, 300);
        boxes.push(TestBox { bounds: AABox::new(Span::new(-1.0, 1.0), Span::everything(), Span::everything()),
                             id: 300 });
        let mut tree = KdTree::new(boxes.clone());
        tree.refine_sah(&SahConfig::default(), &mut rng);
        assert_eq!(tree.infinite_len(), 1);

        for _ in 0..500 {
            let origin = Vector3f::from_fn(|_, _| rng.gen_range(-80.0..80.0));
            let slope = Vector3f::from_fn(|_, _| rng.gen_range(-1.0..1.0)).normalize();
            let segment = RaySegment::from_ray(Ray::new(origin, slope));

            let mut brute_t = Float::INFINITY;
            let mut brute_hit = false;
            for b in boxes.iter() {
                let span = ray_test(&segment, &b.bounds);
                if !span.is_empty() {
                    brute_hit = true;
                    brute_t = brute_t.min(span.lo);
                }
            }

            let mut visitor = NearestEntry { segment, best_t: Float::INFINITY, best_id: None };
            tree.query(&mut visitor);
            assert_eq!(visitor.best_id.is_some(), brute_hit);
            if brute_hit {
                assert_eq!(visitor.best_t, brute_t);
            }
        }
    }

    #[test]
    fn test_query_with_visits_infinite_first() {
        let boxes = vec![
            TestBox { bounds: AABox::from_corners(&Vector3f::zeros(), &Vector3f::repeat(1.0)), id: 0 },
            TestBox { bounds: AABox::everything(), id: 1 },
        ];
        let tree = KdTree::new(boxes);
        let mut order = Vec::new();
        tree.query_with(|_| true, |e: &TestBox| order.push(e.id));
        assert_eq!(order, vec![1, 0]);

        let mut seen = Vec::new();
        tree.query_with(|_| false, |e: &TestBox| seen.push(e.id));
        assert_eq!(seen, vec![1]);
    }
}
