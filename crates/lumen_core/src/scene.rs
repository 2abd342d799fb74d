//! Scene description loaded from JSON.
//!
//! The description is renderer-agnostic: it names shapes, materials and
//! placements, and the renderer turns it into acceleration structures.
//!
//! ```json
//! {
//!   "camera": { "position": [-10, 1.5, 0], "look_at": [0, 0, 0], "fovy": 45 },
//!   "film": { "width": 784, "height": 432 },
//!   "render": { "spp": 128, "integrator": "path" },
//!   "materials": {
//!     "floor": { "type": "ground", "albedo": [0.19, 0.6, 0.34] },
//!     "light": { "type": "diffuse", "albedo": [0, 0, 0], "emission": [1, 1, 1] }
//!   },
//!   "objects": [
//!     { "shape": { "type": "plane" }, "material": "floor", "position": [0, -0.5, 0] },
//!     { "shape": { "type": "obj", "path": "dragon.obj" }, "material": "floor" }
//!   ]
//! }
//! ```

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use lumen_math::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::mesh::{Mesh, MeshError};

/// Errors that can occur while loading a scene description.
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Mesh error: {0}")]
    Mesh(#[from] MeshError),

    #[error("Unknown material: {0}")]
    UnknownMaterial(String),
}

/// Result type for scene loading.
pub type SceneResult<T> = Result<T, SceneError>;

/// Pinhole camera placement.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraDesc {
    pub position: Vec3,
    pub look_at: Vec3,
    /// Vertical field of view in degrees
    pub fovy: f32,
}

impl Default for CameraDesc {
    fn default() -> Self {
        Self {
            position: Vec3::new(-10.0, 1.5, 0.0),
            look_at: Vec3::ZERO,
            fovy: 45.0,
        }
    }
}

/// Output image size in pixels.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilmDesc {
    pub width: usize,
    pub height: usize,
}

impl Default for FilmDesc {
    fn default() -> Self {
        Self {
            width: 784,
            height: 432,
        }
    }
}

/// Which estimator fills the film.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntegratorKind {
    /// Unidirectional path tracing
    #[default]
    Path,
    /// Shading normals mapped to colour
    Normal,
    /// Heat map of bounding box tests per ray
    Bounds,
    /// Heat map of triangle tests per ray
    Triangles,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderDesc {
    /// Samples per pixel
    pub spp: usize,
    pub integrator: IntegratorKind,
}

impl Default for RenderDesc {
    fn default() -> Self {
        Self {
            spp: 128,
            integrator: IntegratorKind::Path,
        }
    }
}

fn white() -> Vec3 {
    Vec3::ONE
}

fn one() -> f32 {
    1.0
}

fn up() -> Vec3 {
    Vec3::Y
}

/// Scattering parameters of a material. Colours are linear RGB.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MaterialKindDesc {
    Diffuse {
        albedo: Vec3,
    },
    Mirror {
        #[serde(default = "white")]
        albedo: Vec3,
    },
    Dielectric {
        ior: f32,
        #[serde(default = "white")]
        albedo_r: Vec3,
        #[serde(default = "white")]
        albedo_t: Vec3,
        #[serde(default)]
        roughness_x: f32,
        #[serde(default)]
        roughness_z: f32,
    },
    Conductor {
        ior: Vec3,
        k: Vec3,
        #[serde(default)]
        roughness_x: f32,
        #[serde(default)]
        roughness_z: f32,
    },
    /// Diffuse with a darkened grid pattern
    Ground {
        albedo: Vec3,
    },
}

/// A named material: scattering plus optional emitted radiance.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MaterialDesc {
    #[serde(flatten)]
    pub kind: MaterialKindDesc,
    #[serde(default)]
    pub emission: Vec3,
}

impl MaterialDesc {
    pub fn new(kind: MaterialKindDesc) -> Self {
        Self {
            kind,
            emission: Vec3::ZERO,
        }
    }

    pub fn with_emission(mut self, emission: Vec3) -> Self {
        self.emission = emission;
        self
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ShapeDesc {
    Sphere {
        #[serde(default)]
        center: Vec3,
        #[serde(default = "one")]
        radius: f32,
    },
    /// Infinite plane through `point`
    Plane {
        #[serde(default)]
        point: Vec3,
        #[serde(default = "up")]
        normal: Vec3,
    },
    /// Triangle mesh from a Wavefront OBJ file
    Obj { path: PathBuf },
}

/// One placed shape. The transform is `T * Rz * Ry * Rx * S`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ObjectDesc {
    pub shape: ShapeDesc,
    pub material: String,
    #[serde(default)]
    pub position: Vec3,
    #[serde(default = "white")]
    pub scale: Vec3,
    /// Euler angles in degrees
    #[serde(default)]
    pub rotation: Vec3,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneDescription {
    #[serde(default)]
    pub camera: CameraDesc,
    #[serde(default)]
    pub film: FilmDesc,
    #[serde(default)]
    pub render: RenderDesc,
    #[serde(default)]
    pub materials: BTreeMap<String, MaterialDesc>,
    #[serde(default)]
    pub objects: Vec<ObjectDesc>,
}

impl SceneDescription {
    /// Parse a description from a JSON string.
    ///
    /// Relative OBJ paths are left untouched.
    pub fn from_json_str(json: &str) -> SceneResult<Self> {
        let description: SceneDescription = serde_json::from_str(json)?;
        description.validate()?;
        Ok(description)
    }

    /// Load a description from a JSON file.
    ///
    /// Relative OBJ paths are resolved against the file's directory.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> SceneResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let mut description = Self::from_json_str(&json)?;

        if let Some(dir) = path.parent() {
            description.resolve_paths(dir);
        }

        log::info!(
            "Loaded scene {}: {} materials, {} objects",
            path.display(),
            description.materials.len(),
            description.objects.len()
        );
        Ok(description)
    }

    /// Check that every object refers to a declared material.
    pub fn validate(&self) -> SceneResult<()> {
        for object in &self.objects {
            if !self.materials.contains_key(&object.material) {
                return Err(SceneError::UnknownMaterial(object.material.clone()));
            }
        }
        Ok(())
    }

    fn resolve_paths(&mut self, dir: &Path) {
        for object in &mut self.objects {
            if let ShapeDesc::Obj { path } = &mut object.shape {
                if path.is_relative() {
                    *path = dir.join(&*path);
                }
            }
        }
    }

    /// Load every distinct OBJ file the description references, once.
    pub fn load_meshes(&self) -> SceneResult<HashMap<PathBuf, Mesh>> {
        let mut meshes = HashMap::new();
        for object in &self.objects {
            if let ShapeDesc::Obj { path } = &object.shape {
                if !meshes.contains_key(path) {
                    let mesh = Mesh::load_obj(path)?;
                    meshes.insert(path.clone(), mesh);
                }
            }
        }
        Ok(meshes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENE: &str = r#"{
        "camera": { "position": [0, 1, -5], "look_at": [0, 1, 0], "fovy": 40 },
        "film": { "width": 64, "height": 32 },
        "render": { "spp": 8, "integrator": "normal" },
        "materials": {
            "glass": { "type": "dielectric", "ior": 1.5, "roughness_x": 0.2 },
            "gold": { "type": "conductor", "ior": [0.14, 0.37, 1.44], "k": [3.98, 2.38, 1.6] },
            "light": { "type": "diffuse", "albedo": [0, 0, 0], "emission": [2, 2, 2] }
        },
        "objects": [
            { "shape": { "type": "sphere" }, "material": "glass", "scale": [0.5, 0.5, 0.5] },
            { "shape": { "type": "plane", "point": [0, 10, 0] }, "material": "light" },
            { "shape": { "type": "obj", "path": "bunny.obj" }, "material": "gold", "rotation": [0, 90, 0] }
        ]
    }"#;

    #[test]
    fn test_parse_scene() {
        let scene = SceneDescription::from_json_str(SCENE).unwrap();

        assert_eq!(scene.film.width, 64);
        assert_eq!(scene.render.spp, 8);
        assert_eq!(scene.render.integrator, IntegratorKind::Normal);
        assert!((scene.camera.fovy - 40.0).abs() < 1e-6);
        assert_eq!(scene.objects.len(), 3);

        match &scene.materials["glass"].kind {
            MaterialKindDesc::Dielectric {
                ior,
                albedo_t,
                roughness_x,
                roughness_z,
                ..
            } => {
                assert!((ior - 1.5).abs() < 1e-6);
                assert_eq!(*albedo_t, Vec3::ONE);
                assert!((roughness_x - 0.2).abs() < 1e-6);
                assert_eq!(*roughness_z, 0.0);
            }
            other => panic!("unexpected material {other:?}"),
        }
        assert_eq!(scene.materials["light"].emission, Vec3::splat(2.0));
        assert_eq!(scene.materials["gold"].emission, Vec3::ZERO);

        let sphere = &scene.objects[0];
        assert_eq!(
            sphere.shape,
            ShapeDesc::Sphere {
                center: Vec3::ZERO,
                radius: 1.0
            }
        );
        assert_eq!(sphere.position, Vec3::ZERO);
        assert_eq!(sphere.scale, Vec3::splat(0.5));

        match &scene.objects[1].shape {
            ShapeDesc::Plane { point, normal } => {
                assert_eq!(*point, Vec3::new(0.0, 10.0, 0.0));
                assert_eq!(*normal, Vec3::Y);
            }
            other => panic!("unexpected shape {other:?}"),
        }
        assert_eq!(scene.objects[2].rotation, Vec3::new(0.0, 90.0, 0.0));
    }

    #[test]
    fn test_defaults_for_empty_scene() {
        let scene = SceneDescription::from_json_str("{}").unwrap();
        assert_eq!(scene.film, FilmDesc::default());
        assert_eq!(scene.render.integrator, IntegratorKind::Path);
        assert!(scene.objects.is_empty());
    }

    #[test]
    fn test_unknown_material_is_rejected() {
        let json = r#"{ "objects": [ { "shape": { "type": "sphere" }, "material": "nope" } ] }"#;
        let result = SceneDescription::from_json_str(json);
        assert!(matches!(result, Err(SceneError::UnknownMaterial(name)) if name == "nope"));
    }

    #[test]
    fn test_bad_json_is_error() {
        let result = SceneDescription::from_json_str("{ \"film\": ");
        assert!(matches!(result, Err(SceneError::Json(_))));
    }

    #[test]
    fn test_relative_obj_paths_resolve_against_file() {
        let dir = std::env::temp_dir().join(format!("lumen_scene_test_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let file = dir.join("scene.json");
        std::fs::write(&file, SCENE).unwrap();

        let scene = SceneDescription::from_json_file(&file).unwrap();
        std::fs::remove_dir_all(&dir).ok();

        match &scene.objects[2].shape {
            ShapeDesc::Obj { path } => assert_eq!(*path, dir.join("bunny.obj")),
            other => panic!("unexpected shape {other:?}"),
        }
    }

    #[test]
    fn test_load_meshes_reports_missing_file() {
        let scene = SceneDescription::from_json_str(SCENE).unwrap();
        assert!(matches!(scene.load_meshes(), Err(SceneError::Mesh(_))));
    }

    #[test]
    fn test_serialize_round_trip_keeps_emission() {
        let mut scene = SceneDescription::default();
        scene.materials.insert(
            "lamp".to_string(),
            MaterialDesc::new(MaterialKindDesc::Diffuse { albedo: Vec3::ZERO })
                .with_emission(Vec3::new(0.95, 0.95, 1.0)),
        );

        let json = serde_json::to_string(&scene).unwrap();
        let parsed = SceneDescription::from_json_str(&json).unwrap();
        assert_eq!(parsed, scene);
    }
}
