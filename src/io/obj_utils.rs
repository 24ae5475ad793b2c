use std::fs;
use std::path::Path;

use crate::math::constants::{Vector2f, Vector3f};
use crate::shapes::triangle_mesh::{tri_mesh_sanity_check, FaceVertex, MeshError, TriMesh};

use thiserror::Error;
use wavefront_obj::{obj, ParseError};

#[derive(Debug, Error)]
pub enum ObjLoadError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("invalid mesh: {0}")]
    Mesh(#[from] MeshError),
}

impl From<ParseError> for ObjLoadError {
    fn from(err: ParseError) -> Self {
        ObjLoadError::Parse(err.to_string())
    }
}

pub fn load_obj_from_str<S: AsRef<str>>(input: S) -> Result<obj::ObjSet, ParseError> {
    let triangulated = triangulate_faces(input.as_ref());
    obj::parse(triangulated)
}

/// Flattens every object of `obj_set` into one triangle soup. Per-object
/// indices are shifted so they address the merged attribute arrays.
pub fn obj_set_to_tri_mesh(obj_set: &obj::ObjSet) -> Result<TriMesh, MeshError> {
    let mut mesh = TriMesh::default();

    for object in obj_set.objects.iter() {
        let v_base = mesh.vertices.len();
        let n_base = mesh.normals.len();
        let m_base = mesh.texcoords.len();

        mesh.vertices.extend(object.vertices.iter().map(|v| Vector3f::new(v.x, v.y, v.z)));
        mesh.normals.extend(object.normals.iter().map(|n| Vector3f::new(n.x, n.y, n.z)));
        mesh.texcoords.extend(object.tex_vertices.iter().map(|t| Vector2f::new(t.u, t.v)));

        let corner = |idx: &obj::VTNIndex| FaceVertex {
            vi: v_base + idx.0,
            ni: idx.2.map(|i| n_base + i),
            mi: idx.1.map(|i| m_base + i),
        };
        for geom in object.geometry.iter() {
            for shape in geom.shapes.iter() {
                if let obj::Primitive::Triangle(a, b, c) = &shape.primitive {
                    mesh.faces.push([corner(a), corner(b), corner(c)]);
                }
            }
        }
    }

    tri_mesh_sanity_check(&mesh)?;
    Ok(mesh)
}

pub fn load_tri_mesh_from_str<S: AsRef<str>>(input: S) -> Result<TriMesh, ObjLoadError> {
    let obj_set = load_obj_from_str(input)?;
    Ok(obj_set_to_tri_mesh(&obj_set)?)
}

pub fn load_tri_mesh_from_file<P: AsRef<Path>>(path: P) -> Result<TriMesh, ObjLoadError> {
    let data = fs::read_to_string(path.as_ref())?;
    let mesh = load_tri_mesh_from_str(data)?;
    log::info!("Loaded {}: {} vertices, {} faces.",
               path.as_ref().display(), mesh.vertices.len(), mesh.faces.len());
    Ok(mesh)
}

// Fans polygons with more than three corners around their first corner.
fn triangulate_faces(input: &str) -> String {
    let mut out = String::with_capacity(input.len() + input.len() / 4);
    for line in input.lines() {
        let trimmed = line.trim_start();
        if trimmed.starts_with("f ") || trimmed.starts_with("f\t") {
            let parts: Vec<&str> = trimmed.split_whitespace().collect();
            if parts.len() > 4 {
                for i in 2..(parts.len() - 1) {
                    out.push_str(&format!("f {} {} {}\n", parts[1], parts[i], parts[i + 1]));
                }
                continue;
            }
        }
        out.push_str(line);
        out.push('\n');
    }
    out
}
