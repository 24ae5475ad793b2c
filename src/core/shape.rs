// Copyright @yucwang 2023

use crate::core::interaction::Contact;
use crate::math::aabb::AABox;
use crate::math::ray::RaySegment;

/// A solid in its own model frame.
///
/// Contact normals always point out of the solid: an entry contact has
/// `normal . slope < 0`, an exit contact `normal . slope > 0`. Both queries
/// return `Contact::none()` when nothing qualifies inside `segment.valid`.
pub trait Geometry: Send + Sync {
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    fn get_aabox(&self) -> AABox;

    /// Refreshes state derived for scene time `time`.
    fn crush(&mut self, _time: f64) {}

    fn ray_into(&self, segment: &RaySegment) -> Contact;
    fn ray_exit(&self, segment: &RaySegment) -> Contact;
}
