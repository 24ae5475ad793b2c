// Copyright @yucwang 2023

use crate::core::kdtree::Bounded;
use crate::math::aabb::AABox;
use crate::math::constants::{Float, Vector3f};
use crate::math::ray::RaySegment;

/// Orientation of a ray crossing a face, relative to the face normal.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FaceContactKind {
    Into,
    Exit,
    Skim,
}

/// A mesh face with everything the ray test needs precomputed.
#[derive(Debug, Copy, Clone)]
pub struct TriFace {
    pub v0: Vector3f,
    pub u: Vector3f,
    pub v: Vector3f,
    pub n: Vector3f,
    pub uu: Float,
    pub uv: Float,
    pub vv: Float,
    pub recip_denom: Float,
    /// Index of the face in the source mesh.
    pub face: usize,
}

#[derive(Debug, Copy, Clone)]
pub struct FaceContact {
    pub kind: FaceContactKind,
    pub t: Float,
    /// Barycentric weights of `v1` and `v2`.
    pub s: Float,
    pub r: Float,
    pub point: Vector3f,
    pub normal: Vector3f,
    pub face: usize,
}

impl TriFace {
    pub fn bake(p0: &Vector3f, p1: &Vector3f, p2: &Vector3f, face: usize) -> Self {
        let u = p1 - p0;
        let v = p2 - p0;
        let uu = u.dot(&u);
        let uv = u.dot(&v);
        let vv = v.dot(&v);
        Self {
            v0: *p0,
            u,
            v,
            n: u.cross(&v).normalize(),
            uu,
            uv,
            vv,
            recip_denom: 1.0 / (uu * vv - uv * uv),
            face,
        }
    }

    pub fn vertices(&self) -> [Vector3f; 3] {
        [self.v0, self.v0 + self.u, self.v0 + self.v]
    }
}

impl Bounded for TriFace {
    fn aabox(&self) -> AABox {
        AABox::from_corners(&self.v0, &(self.v0 + self.u)).min_containing_point(&(self.v0 + self.v))
    }
}

/// Crossing of `segment` with `face`, if it lands inside both the segment
/// and the triangle. Rays in the face's plane never report a contact.
pub fn tri_face_contact(segment: &RaySegment, face: &TriFace) -> Option<FaceContact> {
    let ray = &segment.ray;
    let cosine = face.n.dot(&ray.slope);
    let offset = face.n.dot(&(ray.point - face.v0));
    let t = -offset / cosine;
    if !segment.contains(t) {
        return None;
    }

    let kind = if cosine < 0.0 {
        FaceContactKind::Into
    } else if cosine > 0.0 {
        FaceContactKind::Exit
    } else {
        FaceContactKind::Skim
    };
    if kind == FaceContactKind::Skim {
        return None;
    }

    let point = ray.eval(t);
    let w = point - face.v0;
    let wu = w.dot(&face.u);
    let wv = w.dot(&face.v);
    let s = (face.vv * wu - face.uv * wv) * face.recip_denom;
    let r = (face.uu * wv - face.uv * wu) * face.recip_denom;
    if s >= 0.0 && r >= 0.0 && s + r <= 1.0 {
        Some(FaceContact { kind, t, s, r, point, normal: face.n, face: face.face })
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::ray::Ray;
    use crate::math::span::Span;

    fn unit_face() -> TriFace {
        TriFace::bake(&Vector3f::zeros(), &Vector3f::x(), &Vector3f::y(), 0)
    }

    #[test]
    fn test_face_contact_barycentrics() {
        let face = unit_face();
        let seg = RaySegment::from_ray(Ray::new(Vector3f::new(0.25, 0.5, 2.0), -Vector3f::z()));
        let hit = tri_face_contact(&seg, &face).expect("ray should hit the face");
        assert_eq!(hit.kind, FaceContactKind::Into);
        assert!((hit.t - 2.0).abs() < 1e-12);
        assert!((hit.s - 0.25).abs() < 1e-12);
        assert!((hit.r - 0.5).abs() < 1e-12);

        let up = RaySegment::from_ray(Ray::new(Vector3f::new(0.25, 0.25, -1.0), Vector3f::z()));
        assert_eq!(tri_face_contact(&up, &face).map(|h| h.kind), Some(FaceContactKind::Exit));
    }

    #[test]
    fn test_face_contact_rejections() {
        let face = unit_face();
        let outside = RaySegment::from_ray(Ray::new(Vector3f::new(0.75, 0.75, 1.0), -Vector3f::z()));
        assert!(tri_face_contact(&outside, &face).is_none());

        let skim = RaySegment::from_ray(Ray::new(Vector3f::new(-1.0, 0.1, 0.0), Vector3f::x()));
        assert!(tri_face_contact(&skim, &face).is_none());

        let short = RaySegment::new(Ray::new(Vector3f::new(0.1, 0.1, 2.0), -Vector3f::z()), Span::new(0.0, 1.0));
        assert!(tri_face_contact(&short, &face).is_none());
    }

    #[test]
    fn test_face_bounds() {
        let b = unit_face().aabox();
        assert_eq!(b.spans[0], Span::new(0.0, 1.0));
        assert_eq!(b.spans[1], Span::new(0.0, 1.0));
        assert_eq!(b.spans[2], Span::new(0.0, 0.0));
    }
}
