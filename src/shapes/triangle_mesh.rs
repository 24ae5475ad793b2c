// Copyright @yucwang 2023

use super::triangle::{tri_face_contact, FaceContact, FaceContactKind, TriFace};

use crate::core::crush_cache::CrushCache;
use crate::core::interaction::Contact;
use crate::core::kdtree::{KdTree, KdVisitor, SahConfig};
use crate::core::shape::Geometry;
use crate::math::aabb::{ray_test, AABox};
use crate::math::constants::{Vector2f, Vector3f};
use crate::math::ray::RaySegment;

use rand::rngs::StdRng;
use rand::SeedableRng;
use thiserror::Error;

use std::vec::Vec;

// Face trees are refined with a fixed seed so a mesh bakes identically
// every time it is crushed.
const FACE_TREE_SEED: u64 = 0x5eed_f00d;

/// Indices of one corner of a face.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FaceVertex {
    pub vi: usize,
    pub ni: Option<usize>,
    pub mi: Option<usize>,
}

impl FaceVertex {
    pub fn new(vi: usize) -> Self {
        Self { vi, ni: None, mi: None }
    }
}

pub type TriFaceIndex = [FaceVertex; 3];

/// Triangle soup as delivered by a mesh loader.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriMesh {
    pub vertices: Vec<Vector3f>,
    pub normals: Vec<Vector3f>,
    pub texcoords: Vec<Vector2f>,
    pub faces: Vec<TriFaceIndex>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MeshError {
    #[error("face {face}: vertex index {index} out of range ({len} vertices)")]
    VertexIndex { face: usize, index: usize, len: usize },
    #[error("face {face}: normal index {index} out of range ({len} normals)")]
    NormalIndex { face: usize, index: usize, len: usize },
    #[error("face {face}: texture coordinate index {index} out of range ({len} texture coordinates)")]
    TexcoordIndex { face: usize, index: usize, len: usize },
    #[error("face {face}: normal indices must be given on every face corner or on none")]
    InconsistentNormals { face: usize },
    #[error("face {face}: texture coordinate indices must be given on every face corner or on none")]
    InconsistentTexcoords { face: usize },
}

/// Checks index bounds and that optional normal/texcoord indices are either
/// present on every face corner or absent from all of them.
pub fn tri_mesh_sanity_check(mesh: &TriMesh) -> Result<(), MeshError> {
    let first = mesh.faces.first().map(|f| f[0]);
    let has_normals = first.map_or(false, |c| c.ni.is_some());
    let has_texcoords = first.map_or(false, |c| c.mi.is_some());

    for (face, corners) in mesh.faces.iter().enumerate() {
        for corner in corners.iter() {
            if corner.vi >= mesh.vertices.len() {
                return Err(MeshError::VertexIndex { face, index: corner.vi, len: mesh.vertices.len() });
            }
            match corner.ni {
                Some(index) if index >= mesh.normals.len() => {
                    return Err(MeshError::NormalIndex { face, index, len: mesh.normals.len() });
                }
                ni if ni.is_some() != has_normals => return Err(MeshError::InconsistentNormals { face }),
                _ => {}
            }
            match corner.mi {
                Some(index) if index >= mesh.texcoords.len() => {
                    return Err(MeshError::TexcoordIndex { face, index, len: mesh.texcoords.len() });
                }
                mi if mi.is_some() != has_texcoords => return Err(MeshError::InconsistentTexcoords { face }),
                _ => {}
            }
        }
    }

    Ok(())
}

fn bake_faces(mesh: &TriMesh, sah: &SahConfig) -> KdTree<TriFace> {
    let faces: Vec<TriFace> = mesh.faces
        .iter()
        .enumerate()
        .map(|(i, f)| TriFace::bake(&mesh.vertices[f[0].vi], &mesh.vertices[f[1].vi], &mesh.vertices[f[2].vi], i))
        .collect();
    let mut tree = KdTree::new(faces);
    tree.refine_sah(sah, &mut StdRng::seed_from_u64(FACE_TREE_SEED));
    tree
}

struct NearestFace {
    segment: RaySegment,
    want: FaceContactKind,
    best: Option<FaceContact>,
}

impl KdVisitor<TriFace> for NearestFace {
    fn select(&mut self, bounds: &AABox) -> bool {
        !ray_test(&self.segment, bounds).is_empty()
    }

    fn visit(&mut self, face: &TriFace) {
        if let Some(hit) = tri_face_contact(&self.segment, face) {
            if hit.kind == self.want {
                self.segment.valid.hi = hit.t;
                self.best = Some(hit);
            }
        }
    }
}

/// Triangle mesh geometry. Faces are baked into a kd-tree of their own when
/// the mesh is crushed; an uncrushed mesh reports no contacts.
pub struct SurfaceMesh {
    mesh: TriMesh,
    sah: SahConfig,
    crushed: CrushCache<KdTree<TriFace>>,
}

impl SurfaceMesh {
    pub fn new(mesh: TriMesh) -> Result<Self, MeshError> {
        tri_mesh_sanity_check(&mesh)?;
        Ok(Self { mesh, sah: SahConfig::default(), crushed: CrushCache::new() })
    }

    pub fn with_sah_config(mut self, sah: SahConfig) -> Self {
        self.sah = sah;
        self.crushed.invalidate();
        self
    }

    pub fn mesh(&self) -> &TriMesh {
        &self.mesh
    }

    pub fn face_tree(&self) -> Option<&KdTree<TriFace>> {
        self.crushed.get()
    }

    fn nearest(&self, segment: &RaySegment, want: FaceContactKind) -> Contact {
        let tree = match self.crushed.get() {
            Some(tree) => tree,
            None => return Contact::none(),
        };

        let mut search = NearestFace { segment: *segment, want, best: None };
        tree.query(&mut search);

        match search.best {
            Some(hit) => Contact::new(hit.t, segment.ray, hit.normal, self.material_coords(&hit), hit.point),
            None => Contact::none(),
        }
    }

    fn material_coords(&self, hit: &FaceContact) -> Vector2f {
        let corners = &self.mesh.faces[hit.face];
        match (corners[0].mi, corners[1].mi, corners[2].mi) {
            (Some(a), Some(b), Some(c)) => {
                let m = &self.mesh.texcoords;
                m[a] * (1.0 - hit.s - hit.r) + m[b] * hit.s + m[c] * hit.r
            }
            _ => Vector2f::new(hit.s, hit.r),
        }
    }
}

impl Geometry for SurfaceMesh {
    fn get_aabox(&self) -> AABox {
        if let Some(bounds) = self.crushed.get().and_then(|tree| tree.bounds()) {
            return bounds;
        }
        let bounds = self.mesh.faces
            .iter()
            .flat_map(|f| f.iter())
            .fold(AABox::accum_zero(), |acc, c| acc.min_containing_point(&self.mesh.vertices[c.vi]));
        if bounds.is_empty() {
            AABox::nan()
        } else {
            bounds
        }
    }

    fn crush(&mut self, time: f64) {
        let mesh = &self.mesh;
        let sah = self.sah;
        if self.crushed.refresh_with(time, || bake_faces(mesh, &sah)) {
            log::debug!("Baked surface mesh: {} faces, {} kd-tree nodes.",
                        mesh.faces.len(),
                        self.crushed.get().map_or(0, |t| t.node_count()));
        }
    }

    fn ray_into(&self, segment: &RaySegment) -> Contact {
        self.nearest(segment, FaceContactKind::Into)
    }

    fn ray_exit(&self, segment: &RaySegment) -> Contact {
        self.nearest(segment, FaceContactKind::Exit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::ray::Ray;

    fn corner(vi: usize) -> FaceVertex {
        FaceVertex::new(vi)
    }

    /// Closed axis-aligned cube `[0,1]^3` with outward facing triangles.
    fn cube_mesh() -> TriMesh {
        let mut vertices = Vec::new();
        for i in 0..8 {
            vertices.push(Vector3f::new((i & 1) as f64, ((i >> 1) & 1) as f64, ((i >> 2) & 1) as f64));
        }
        let quads = [
            [0, 2, 3, 1], // z = 0
            [4, 5, 7, 6], // z = 1
            [0, 1, 5, 4], // y = 0
            [2, 6, 7, 3], // y = 1
            [0, 4, 6, 2], // x = 0
            [1, 3, 7, 5], // x = 1
        ];
        let mut faces = Vec::new();
        for q in quads.iter() {
            faces.push([corner(q[0]), corner(q[1]), corner(q[2])]);
            faces.push([corner(q[0]), corner(q[2]), corner(q[3])]);
        }
        TriMesh { vertices, normals: Vec::new(), texcoords: Vec::new(), faces }
    }

    #[test]
    fn test_sanity_check() {
        assert_eq!(tri_mesh_sanity_check(&cube_mesh()), Ok(()));

        let mut bad = cube_mesh();
        bad.faces[3][1].vi = 42;
        assert_eq!(tri_mesh_sanity_check(&bad), Err(MeshError::VertexIndex { face: 3, index: 42, len: 8 }));

        let mut mixed = cube_mesh();
        mixed.normals.push(Vector3f::z());
        mixed.faces[2][0].ni = Some(0);
        assert_eq!(tri_mesh_sanity_check(&mixed), Err(MeshError::InconsistentNormals { face: 2 }));

        let mut dangling = cube_mesh();
        for f in dangling.faces.iter_mut() {
            for c in f.iter_mut() {
                c.mi = Some(0);
            }
        }
        assert_eq!(tri_mesh_sanity_check(&dangling), Err(MeshError::TexcoordIndex { face: 0, index: 0, len: 0 }));
        assert!(SurfaceMesh::new(bad).is_err());
    }

    #[test]
    fn test_cube_mesh_contacts() {
        let mut mesh = SurfaceMesh::new(cube_mesh()).expect("valid mesh");
        let seg = RaySegment::from_ray(Ray::new(Vector3f::new(0.3, 0.4, 5.0), -Vector3f::z()));
        assert!(!mesh.ray_into(&seg).is_hit());

        mesh.crush(0.0);
        let c = mesh.ray_into(&seg);
        assert!((c.t - 4.0).abs() < 1e-12);
        assert!((c.normal - Vector3f::z()).norm() < 1e-12);
        let e = mesh.ray_exit(&seg);
        assert!((e.t - 5.0).abs() < 1e-12);
        assert!((e.normal + Vector3f::z()).norm() < 1e-12);

        let inside = RaySegment::from_ray(Ray::new(Vector3f::new(0.5, 0.5, 0.5), Vector3f::x()));
        assert!(!mesh.ray_into(&inside).is_hit());
        assert!((mesh.ray_exit(&inside).t - 0.5).abs() < 1e-12);

        let b = mesh.get_aabox();
        assert_eq!(b, AABox::from_corners(&Vector3f::zeros(), &Vector3f::repeat(1.0)));
    }

    #[test]
    fn test_crush_rebuilds_only_on_new_time() {
        let mut mesh = SurfaceMesh::new(cube_mesh()).expect("valid mesh");
        mesh.crush(1.0);
        let first = mesh.face_tree().map(|t| t as *const KdTree<TriFace>);
        mesh.crush(1.0);
        let second = mesh.face_tree().map(|t| t as *const KdTree<TriFace>);
        assert_eq!(first, second);
        assert!(mesh.crushed.is_valid_for(1.0));
        mesh.crush(2.0);
        assert!(mesh.crushed.is_valid_for(2.0));
        assert!(!mesh.crushed.is_valid_for(1.0));
    }

    #[test]
    fn test_texcoords_interpolated() {
        let mesh = TriMesh {
            vertices: vec![Vector3f::zeros(), Vector3f::x(), Vector3f::y()],
            normals: Vec::new(),
            texcoords: vec![Vector2f::new(0.0, 0.0), Vector2f::new(2.0, 0.0), Vector2f::new(0.0, 4.0)],
            faces: vec![[
                FaceVertex { vi: 0, ni: None, mi: Some(0) },
                FaceVertex { vi: 1, ni: None, mi: Some(1) },
                FaceVertex { vi: 2, ni: None, mi: Some(2) },
            ]],
        };
        let mut mesh = SurfaceMesh::new(mesh).expect("valid mesh");
        mesh.crush(0.0);
        let seg = RaySegment::from_ray(Ray::new(Vector3f::new(0.25, 0.25, 1.0), -Vector3f::z()));
        let c = mesh.ray_into(&seg);
        assert!((c.mtl2 - Vector2f::new(0.5, 1.0)).norm() < 1e-12);
    }
}
