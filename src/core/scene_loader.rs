// Copyright @yucwang 2026

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use quick_xml::events::Event;
use quick_xml::Reader;
use thiserror::Error;

use crate::core::bsdf::Material;
use crate::core::scene::{Scene, SceneElement};
use crate::core::shape::Geometry;
use crate::core::texture::MaterialMap;
use crate::io::obj_utils::{load_tri_mesh_from_file, ObjLoadError};
use crate::materials::directional_emitter::DirectionalEmitter;
use crate::materials::emitter::Emitter;
use crate::materials::lambertian_diffuse::LambertianDiffuse;
use crate::materials::microfacet::GaussianMicrofacet;
use crate::materials::normal_highlighter::NormalHighlighter;
use crate::materials::smooth_conductor::SmoothConductor;
use crate::materials::smooth_dielectric::SmoothDielectric;
use crate::math::constants::{Float, Vector3f};
use crate::math::spectrum::DenseSignal;
use crate::math::transform::AffineTransform;
use crate::renderers::options::{ConfigError, RenderOptions};
use crate::sensors::pinhole::PinholeCamera;
use crate::shapes::cube::Cube;
use crate::shapes::cylinder::Cylinder;
use crate::shapes::infinity::Infinity;
use crate::shapes::plane::Plane;
use crate::shapes::sphere::Sphere;
use crate::shapes::triangle_mesh::{MeshError, SurfaceMesh};
use crate::textures::combinators::{Clamp, Lerp, Level};
use crate::textures::constant::{ConstantScalar, ConstantSpectrum};
use crate::textures::perlin::PerlinNoise;
use crate::textures::procedural::{Bullseye, Checkerboard};

#[derive(Debug, Error)]
pub enum SceneLoadError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("xml error: {0}")]
    Xml(String),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("<{tag}> is missing attribute `{field}`")]
    MissingField { tag: &'static str, field: &'static str },
    #[error("unknown {tag} type `{kind}`")]
    UnknownType { tag: &'static str, kind: String },
    #[error("unknown {kind} `{id}`")]
    UnknownReference { kind: &'static str, id: String },
    #[error("scene has no camera")]
    MissingCamera,
    #[error("mesh error: {0}")]
    Obj(#[from] ObjLoadError),
    #[error("mesh error: {0}")]
    Mesh(#[from] MeshError),
    #[error("invalid options: {0}")]
    Config(#[from] ConfigError),
}

pub struct SceneLoadResult {
    pub scene: Scene,
    pub camera: PinholeCamera,
    pub options: RenderOptions,
}

// Materials are not clonable, so an id keeps the recipe and every element
// referring to it gets a fresh instance.
#[derive(Clone)]
enum MaterialRecipe {
    Emitter { emissivity: Arc<dyn MaterialMap> },
    DirectionalEmitter { direction: Vector3f, spread: Float, emissivity: Arc<dyn MaterialMap> },
    Lambertian { reflectance: Arc<dyn MaterialMap> },
    Conductor { reflectance: Arc<dyn MaterialMap> },
    Dielectric { n_exterior: Arc<dyn MaterialMap>, n_interior: Arc<dyn MaterialMap> },
    Microfacet { variance: Arc<dyn MaterialMap>, reflectance: Arc<dyn MaterialMap> },
    NormalHighlighter { direction: Vector3f, emission: Arc<dyn MaterialMap> },
}

impl MaterialRecipe {
    fn build(&self) -> Box<dyn Material> {
        match self {
            MaterialRecipe::Emitter { emissivity } => Box::new(Emitter::new(Arc::clone(emissivity))),
            MaterialRecipe::DirectionalEmitter { direction, spread, emissivity } => {
                Box::new(DirectionalEmitter::new(*direction, *spread, Arc::clone(emissivity)))
            }
            MaterialRecipe::Lambertian { reflectance } => Box::new(LambertianDiffuse::new(Arc::clone(reflectance))),
            MaterialRecipe::Conductor { reflectance } => Box::new(SmoothConductor::new(Arc::clone(reflectance))),
            MaterialRecipe::Dielectric { n_exterior, n_interior } => {
                Box::new(SmoothDielectric::new(Arc::clone(n_exterior), Arc::clone(n_interior)))
            }
            MaterialRecipe::Microfacet { variance, reflectance } => {
                Box::new(GaussianMicrofacet::new(Arc::clone(variance), Arc::clone(reflectance)))
            }
            MaterialRecipe::NormalHighlighter { direction, emission } => {
                Box::new(NormalHighlighter::new(*direction, Arc::clone(emission)))
            }
        }
    }
}

type Attributes = HashMap<String, String>;

struct Tag<'a> {
    name: &'static str,
    attrs: &'a Attributes,
}

impl<'a> Tag<'a> {
    fn get(&self, field: &'static str) -> Option<&'a str> {
        self.attrs.get(field).map(|s| s.as_str())
    }

    fn require(&self, field: &'static str) -> Result<&'a str, SceneLoadError> {
        self.get(field).ok_or(SceneLoadError::MissingField { tag: self.name, field })
    }

    fn float_or(&self, field: &'static str, default: Float) -> Result<Float, SceneLoadError> {
        self.get(field).map_or(Ok(default), parse_float)
    }

    fn usize_or(&self, field: &'static str, default: usize) -> Result<usize, SceneLoadError> {
        self.get(field).map_or(Ok(default), parse_usize)
    }

    fn vec3_or(&self, field: &'static str, default: Vector3f) -> Result<Vector3f, SceneLoadError> {
        self.get(field).map_or(Ok(default), parse_vec3)
    }

    fn bool_or(&self, field: &'static str, default: bool) -> Result<bool, SceneLoadError> {
        match self.get(field) {
            None => Ok(default),
            Some("true") | Some("1") => Ok(true),
            Some("false") | Some("0") => Ok(false),
            Some(other) => Err(SceneLoadError::Parse(format!("invalid boolean: {}", other))),
        }
    }
}

struct SceneBuilder<'a> {
    base_dir: &'a Path,
    options: RenderOptions,
    camera: Option<(Vector3f, Vector3f, Vector3f, Float)>,
    maps: HashMap<String, Arc<dyn MaterialMap>>,
    materials: HashMap<String, MaterialRecipe>,
    scene: Scene,
}

impl<'a> SceneBuilder<'a> {
    /// A number becomes a constant map; anything else names a declared map.
    fn map_ref(&self, value: &str) -> Result<Arc<dyn MaterialMap>, SceneLoadError> {
        if let Ok(v) = value.trim().parse::<Float>() {
            return Ok(Arc::new(ConstantScalar::new(v)));
        }
        self.maps
            .get(value)
            .cloned()
            .ok_or_else(|| SceneLoadError::UnknownReference { kind: "map", id: value.to_string() })
    }

    fn map_field(&self, tag: &Tag, field: &'static str) -> Result<Arc<dyn MaterialMap>, SceneLoadError> {
        self.map_ref(tag.require(field)?)
    }

    fn map_field_or(&self, tag: &Tag, field: &'static str, default: Float) -> Result<Arc<dyn MaterialMap>, SceneLoadError> {
        match tag.get(field) {
            Some(value) => self.map_ref(value),
            None => Ok(Arc::new(ConstantScalar::new(default))),
        }
    }

    fn options(&mut self, tag: &Tag) -> Result<(), SceneLoadError> {
        let o = &mut self.options;
        o.image_rows = tag.usize_or("rows", o.image_rows)?;
        o.image_cols = tag.usize_or("cols", o.image_cols)?;
        o.supersample_grid_size = tag.usize_or("grid", o.supersample_grid_size)?;
        o.lambda_min_nm = tag.float_or("lambda_min", o.lambda_min_nm)?;
        o.lambda_max_nm = tag.float_or("lambda_max", o.lambda_max_nm)?;
        o.max_bounce_depth = tag.usize_or("max_depth", o.max_bounce_depth)?;
        o.seed = tag.get("seed").map_or(Ok(o.seed), |s| {
            s.parse::<u64>().map_err(|_| SceneLoadError::Parse(format!("invalid integer: {}", s)))
        })?;
        o.worker_count = tag.usize_or("workers", o.worker_count)?;
        Ok(())
    }

    fn camera(&mut self, tag: &Tag) -> Result<(), SceneLoadError> {
        let kind = tag.get("type").unwrap_or("pinhole");
        if kind != "pinhole" {
            return Err(SceneLoadError::UnknownType { tag: "camera", kind: kind.to_string() });
        }
        let origin = tag.vec3_or("origin", Vector3f::new(0.0, 0.0, 0.0))?;
        let target = tag.vec3_or("target", Vector3f::new(1.0, 0.0, 0.0))?;
        let up = tag.vec3_or("up", Vector3f::z())?;
        let fov = tag.float_or("fov", 90.0)?;
        self.camera = Some((origin, target, up, fov.to_radians()));
        Ok(())
    }

    fn map(&mut self, tag: &Tag) -> Result<(), SceneLoadError> {
        let id = tag.require("id")?.to_string();
        let kind = tag.require("type")?;
        let map: Arc<dyn MaterialMap> = match kind {
            "constant" => Arc::new(ConstantScalar::new(parse_float(tag.require("value")?)?)),
            "spectrum" => {
                let samples = parse_list(tag.require("samples")?)?;
                Arc::new(ConstantSpectrum::new(DenseSignal::new(
                    tag.float_or("lo", self.options.lambda_min_nm)?,
                    tag.float_or("hi", self.options.lambda_max_nm)?,
                    samples,
                )))
            }
            "checkerboard" => Arc::new(Checkerboard::new(tag.float_or("period", 1.0)?, tag.bool_or("volumetric", false)?)),
            "bullseye" => Arc::new(Bullseye::new(tag.float_or("period", 1.0)?, tag.bool_or("volumetric", false)?)),
            "perlin" => Arc::new(PerlinNoise::new(tag.float_or("scale", 1.0)?, tag.usize_or("seed", 0)? as u64)),
            "lerp" => Arc::new(Lerp {
                t: self.map_field(tag, "t")?,
                a: self.map_field(tag, "a")?,
                b: self.map_field(tag, "b")?,
            }),
            "level" => Arc::new(Level {
                t_switch: tag.float_or("t_switch", 0.5)?,
                t: self.map_field(tag, "t")?,
                a: self.map_field(tag, "a")?,
                b: self.map_field(tag, "b")?,
            }),
            "clamp" => Arc::new(Clamp {
                min: tag.float_or("min", 0.0)?,
                max: tag.float_or("max", 1.0)?,
                map: self.map_field(tag, "map")?,
            }),
            other => return Err(SceneLoadError::UnknownType { tag: "map", kind: other.to_string() }),
        };
        self.maps.insert(id, map);
        Ok(())
    }

    fn material(&mut self, tag: &Tag) -> Result<(), SceneLoadError> {
        let id = tag.require("id")?.to_string();
        let kind = tag.require("type")?;
        let recipe = match kind {
            "emitter" => MaterialRecipe::Emitter { emissivity: self.map_field_or(tag, "emissivity", 1.0)? },
            "directional_emitter" => MaterialRecipe::DirectionalEmitter {
                direction: tag.vec3_or("direction", Vector3f::z())?,
                spread: tag.float_or("spread", 180.0)?.to_radians(),
                emissivity: self.map_field_or(tag, "emissivity", 1.0)?,
            },
            "lambertian" => MaterialRecipe::Lambertian { reflectance: self.map_field_or(tag, "reflectance", 0.5)? },
            "conductor" | "mirror" => MaterialRecipe::Conductor { reflectance: self.map_field_or(tag, "reflectance", 1.0)? },
            "dielectric" => MaterialRecipe::Dielectric {
                n_exterior: self.map_field_or(tag, "n_exterior", 1.0)?,
                n_interior: self.map_field_or(tag, "n_interior", 1.5)?,
            },
            "microfacet" => MaterialRecipe::Microfacet {
                variance: self.map_field_or(tag, "variance", 0.01)?,
                reflectance: self.map_field_or(tag, "reflectance", 1.0)?,
            },
            "normal_highlighter" => MaterialRecipe::NormalHighlighter {
                direction: tag.vec3_or("direction", Vector3f::z())?,
                emission: self.map_field_or(tag, "emission", 1.0)?,
            },
            other => return Err(SceneLoadError::UnknownType { tag: "material", kind: other.to_string() }),
        };
        self.materials.insert(id, recipe);
        Ok(())
    }

    fn geometry(&self, tag: &Tag) -> Result<Box<dyn Geometry>, SceneLoadError> {
        let kind = tag.require("geometry")?;
        let geometry: Box<dyn Geometry> = match kind {
            "sphere" => Box::new(Sphere::new()),
            "cube" => Box::new(Cube::default()),
            "cylinder" => Box::new(Cylinder::default()),
            "plane" => Box::new(Plane::new()),
            "infinity" => Box::new(Infinity::new()),
            "mesh" => {
                let path = self.base_dir.join(tag.require("filename")?);
                Box::new(SurfaceMesh::new(load_tri_mesh_from_file(path)?)?)
            }
            other => return Err(SceneLoadError::UnknownType { tag: "geometry", kind: other.to_string() }),
        };
        Ok(geometry)
    }

    fn element(&mut self, tag: &Tag) -> Result<(), SceneLoadError> {
        let geometry = self.geometry(tag)?;
        let material_id = tag.require("material")?;
        let material = self.materials
            .get(material_id)
            .ok_or_else(|| SceneLoadError::UnknownReference { kind: "material", id: material_id.to_string() })?
            .build();

        let translate = tag.vec3_or("translate", Vector3f::zeros())?;
        let scale = match tag.get("scale") {
            None => Vector3f::repeat(1.0),
            Some(s) if s.contains(',') => parse_vec3(s)?,
            Some(s) => Vector3f::repeat(parse_float(s)?),
        };
        let rotate = match tag.get("rotate") {
            None => AffineTransform::identity(),
            Some(r) => {
                let v = parse_list(r)?;
                if v.len() != 4 {
                    return Err(SceneLoadError::Parse(format!("rotate expects axis and degrees: {}", r)));
                }
                AffineTransform::rotation(Vector3f::new(v[0], v[1], v[2]), v[3].to_radians())
            }
        };
        let transform = AffineTransform::translation(translate) * rotate * AffineTransform::scaling_xyz(scale);

        let mut element = SceneElement::new(geometry, material, transform);
        if let Some(name) = tag.get("name") {
            element = element.with_name(name.to_string());
        }
        self.scene.add_element(element);
        Ok(())
    }

    fn finish(self) -> Result<SceneLoadResult, SceneLoadError> {
        self.options.validate()?;
        let (origin, target, up, fov) = self.camera.ok_or(SceneLoadError::MissingCamera)?;
        let aspect = self.options.image_cols as Float / self.options.image_rows as Float;
        Ok(SceneLoadResult {
            scene: self.scene,
            camera: PinholeCamera::with_fov(origin, target, up, fov, aspect),
            options: self.options,
        })
    }
}

pub fn load_scene<P: AsRef<Path>>(path: P) -> Result<SceneLoadResult, SceneLoadError> {
    let path = path.as_ref();
    let xml = fs::read_to_string(path)?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    let result = load_scene_from_str(&xml, base_dir)?;
    log::info!("Loaded scene {}: {} elements.", path.display(), result.scene.len());
    Ok(result)
}

/// Parses a scene description. Relative mesh paths resolve against `base_dir`.
pub fn load_scene_from_str(xml: &str, base_dir: &Path) -> Result<SceneLoadResult, SceneLoadError> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);
    let mut buf = Vec::new();

    let mut defaults: HashMap<String, String> = HashMap::new();
    let mut builder = SceneBuilder {
        base_dir,
        options: RenderOptions::default(),
        camera: None,
        maps: HashMap::new(),
        materials: HashMap::new(),
        scene: Scene::new(),
    };

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Eof) => break,
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                let mut attrs = Attributes::new();
                for attr in e.attributes().flatten() {
                    let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
                    let value = attr.unescape_value().unwrap_or_default();
                    attrs.insert(key, resolve_value(&value, &defaults));
                }

                match e.name().as_ref() {
                    b"default" => {
                        if let (Some(k), Some(v)) = (attrs.get("name"), attrs.get("value")) {
                            defaults.insert(k.clone(), v.clone());
                        }
                    }
                    b"options" => builder.options(&Tag { name: "options", attrs: &attrs })?,
                    b"camera" => builder.camera(&Tag { name: "camera", attrs: &attrs })?,
                    b"map" => builder.map(&Tag { name: "map", attrs: &attrs })?,
                    b"material" => builder.material(&Tag { name: "material", attrs: &attrs })?,
                    b"element" => builder.element(&Tag { name: "element", attrs: &attrs })?,
                    b"scene" => {}
                    other => log::warn!("Ignoring unknown tag <{}>.", String::from_utf8_lossy(other)),
                }
            }
            Ok(_) => {}
            Err(e) => return Err(SceneLoadError::Xml(e.to_string())),
        }
        buf.clear();
    }

    builder.finish()
}

fn resolve_value(raw: &str, defaults: &HashMap<String, String>) -> String {
    let mut out = raw.to_string();
    for (k, v) in defaults {
        out = out.replace(&format!("${}", k), v);
    }
    out
}

fn parse_float(value: &str) -> Result<Float, SceneLoadError> {
    value.trim().parse::<Float>().map_err(|_| SceneLoadError::Parse(format!("invalid float: {}", value)))
}

fn parse_usize(value: &str) -> Result<usize, SceneLoadError> {
    value.trim().parse::<usize>().map_err(|_| SceneLoadError::Parse(format!("invalid integer: {}", value)))
}

fn parse_list(value: &str) -> Result<Vec<Float>, SceneLoadError> {
    value.split(',').map(|s| s.trim()).filter(|s| !s.is_empty()).map(parse_float).collect()
}

fn parse_vec3(value: &str) -> Result<Vector3f, SceneLoadError> {
    match parse_list(value)?.as_slice() {
        [x, y, z] => Ok(Vector3f::new(*x, *y, *z)),
        _ => Err(SceneLoadError::Parse(format!("invalid vec3: {}", value))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::sensor::Camera;
    use crate::math::ray::{Ray, RaySegment};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const SCENE: &str = r#"
<scene>
  <default name="glow" value="2.5"/>
  <options rows="16" cols="32" grid="2" max_depth="4" seed="9" workers="2"/>
  <camera type="pinhole" origin="3,0,0" target="0,0,0" up="0,0,1" fov="60"/>
  <map id="warm" type="spectrum" lo="400" hi="700" samples="0.1, 0.5, 0.9"/>
  <map id="checks" type="checkerboard" period="0.25"/>
  <map id="mix" type="lerp" t="checks" a="0.2" b="warm"/>
  <material id="light" type="emitter" emissivity="$glow"/>
  <material id="paint" type="lambertian" reflectance="mix"/>
  <element geometry="sphere" material="light" name="lamp"/>
  <element geometry="cube" material="paint" translate="0,3,0" scale="0.5" rotate="0,0,1,45"/>
  <element geometry="plane" material="paint" translate="0,0,-1" rotate="0,1,0,-90"/>
</scene>
"#;

    #[test]
    fn test_load_scene_from_str() {
        let mut loaded = load_scene_from_str(SCENE, Path::new(".")).expect("scene loads");
        assert_eq!(loaded.options.image_rows, 16);
        assert_eq!(loaded.options.image_cols, 32);
        assert_eq!(loaded.options.supersample_grid_size, 2);
        assert_eq!(loaded.options.max_bounce_depth, 4);
        assert_eq!(loaded.options.seed, 9);
        assert_eq!(loaded.options.worker_count, 2);
        assert_eq!(loaded.scene.len(), 3);
        assert_eq!(loaded.scene.elements()[0].name.as_deref(), Some("lamp"));

        loaded.scene.crush(0.0);
        let mut rng = StdRng::seed_from_u64(0);
        let ray = loaded.camera.image_to_ray(&Vector3f::new(1.0, 0.0, 0.0), &mut rng);
        assert!((ray.slope + Vector3f::x()).norm() < 1e-12);
        let (contact, element) = loaded.scene.nearest_contact(&RaySegment::from_ray(ray)).expect("hits lamp");
        assert!((contact.t - 2.0).abs() < 1e-9);
        let info = element.material.shade(&contact, 550.0, &mut rng);
        assert_eq!(info.emitted_power, 2.5);

        // The rotated plane is the floor z = -1 with its normal up.
        let down = RaySegment::from_ray(Ray::new(Vector3f::new(0.0, -5.0, 0.0), -Vector3f::z()));
        let (floor, _) = loaded.scene.nearest_contact(&down).expect("hits floor");
        assert!((floor.t - 1.0).abs() < 1e-9);
        assert!((floor.normal - Vector3f::z()).norm() < 1e-9);
    }

    #[test]
    fn test_microfacet_variance_follows_map() {
        let xml = r#"
<scene>
  <camera/>
  <map id="checks" type="checkerboard" period="1"/>
  <material id="brushed" type="microfacet" variance="checks"/>
  <element geometry="plane" material="brushed"/>
</scene>
"#;
        let mut loaded = load_scene_from_str(xml, Path::new(".")).expect("scene loads");
        loaded.scene.crush(0.0);
        let mut rng = StdRng::seed_from_u64(5);

        let shade_at = |y: Float, rng: &mut StdRng| {
            let ray = Ray::new(Vector3f::new(1.0, y, 0.5), -Vector3f::x());
            let (contact, element) = loaded.scene.nearest_contact(&RaySegment::from_ray(ray)).expect("hits plane");
            element.material.shade(&contact, 550.0, rng).incident_ray.slope
        };

        for _ in 0..50 {
            assert_eq!(shade_at(0.5, &mut rng), Vector3f::x());
        }
        let rough = (0..50).filter(|_| (shade_at(1.5, &mut rng) - Vector3f::x()).norm() > 1e-6).count();
        assert!(rough > 40);
    }

    #[test]
    fn test_bad_references_are_reported() {
        let missing_material = r#"<scene><camera/><element geometry="sphere" material="nope"/></scene>"#;
        assert!(matches!(load_scene_from_str(missing_material, Path::new(".")),
                         Err(SceneLoadError::UnknownReference { kind: "material", .. })));

        let missing_map = r#"<scene><camera/><material id="m" type="lambertian" reflectance="ghost"/></scene>"#;
        assert!(matches!(load_scene_from_str(missing_map, Path::new(".")),
                         Err(SceneLoadError::UnknownReference { kind: "map", .. })));

        let bad_geometry = r#"<scene><camera/><material id="m" type="mirror"/><element geometry="torus" material="m"/></scene>"#;
        assert!(matches!(load_scene_from_str(bad_geometry, Path::new(".")),
                         Err(SceneLoadError::UnknownType { tag: "geometry", .. })));

        assert!(matches!(load_scene_from_str("<scene/>", Path::new(".")), Err(SceneLoadError::MissingCamera)));

        let bad_options = r#"<scene><camera/><options max_depth="0"/></scene>"#;
        assert!(matches!(load_scene_from_str(bad_options, Path::new(".")),
                         Err(SceneLoadError::Config(ConfigError::ZeroDepth))));
    }

    #[test]
    fn test_mesh_elements_load_relative_to_scene() {
        let dir = std::env::temp_dir().join(format!("prismatic_loader_test_{}", std::process::id()));
        fs::create_dir_all(&dir).expect("temp dir");
        fs::write(dir.join("tri.obj"), "v 0 -1 -1\nv 0 1 -1\nv 0 0 1\nf 1 2 3\n").expect("write obj");

        let xml = r#"<scene><camera/><material id="m" type="mirror"/><element geometry="mesh" filename="tri.obj" material="m"/></scene>"#;
        let result = load_scene_from_str(xml, &dir);
        let _ = fs::remove_dir_all(&dir);
        let mut loaded = result.expect("scene loads");

        loaded.scene.crush(0.0);
        let ray = Ray::new(Vector3f::new(2.0, 0.0, 0.0), -Vector3f::x());
        let (contact, _) = loaded.scene.nearest_contact(&RaySegment::from_ray(ray)).expect("hits triangle");
        assert!((contact.t - 2.0).abs() < 1e-12);
    }
}
