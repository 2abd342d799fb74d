//! The world: instances accelerated by a BVH, plus unbounded instances.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use crate::bvh::Bvh;
use crate::hittable::{HitInfo, Hittable, TraversalStats};
use crate::{Material, Model, Plane, Shape, ShapeInstance, Sphere};
use lumen_core::{MeshError, SceneDescription, SceneError, SceneResult, ShapeDesc};
use lumen_math::{world_from_object, Bounds, Interval, Mat4, Ray, Vec3};

/// A collection of shape instances.
///
/// Instances with a finite world box go into a BVH. Infinite ones (planes)
/// are kept in a list and tested after the tree.
pub struct Scene {
    bvh: Bvh<ShapeInstance>,
    infinite: Vec<ShapeInstance>,
}

impl Scene {
    /// Ray interval used for camera and bounce rays.
    pub const DEFAULT_RAY_T: Interval = Interval {
        min: 1e-4,
        max: f32::INFINITY,
    };

    pub fn builder() -> SceneBuilder {
        SceneBuilder::default()
    }

    /// Nearest hit over [`Self::DEFAULT_RAY_T`].
    pub fn closest_hit(&self, ray: &Ray, stats: &mut TraversalStats) -> Option<HitInfo<'_>> {
        self.intersect(ray, Self::DEFAULT_RAY_T, stats)
    }

    /// Total number of instances, bounded or not.
    pub fn instance_count(&self) -> usize {
        self.bvh.len() + self.infinite.len()
    }

    pub fn infinite_count(&self) -> usize {
        self.infinite.len()
    }

    /// Build the renderable scene for a description.
    ///
    /// Every OBJ file is loaded and turned into a BVH once, then shared by
    /// all the objects that reference it.
    pub fn from_description(description: &SceneDescription) -> SceneResult<Self> {
        description.validate()?;

        let materials: HashMap<&str, Arc<Material>> = description
            .materials
            .iter()
            .map(|(name, desc)| (name.as_str(), Arc::new(Material::from_desc(desc))))
            .collect();

        let meshes: HashMap<PathBuf, Arc<Shape>> = description
            .load_meshes()?
            .into_iter()
            .map(|(path, mesh)| (path, Arc::new(Shape::from(Model::from_mesh(&mesh)))))
            .collect();

        let mut builder = Scene::builder();
        for object in &description.objects {
            let material = materials
                .get(object.material.as_str())
                .cloned()
                .ok_or_else(|| SceneError::UnknownMaterial(object.material.clone()))?;

            let shape = match &object.shape {
                ShapeDesc::Sphere { center, radius } => {
                    Arc::new(Shape::from(Sphere::new(*center, *radius)))
                }
                ShapeDesc::Plane { point, normal } => {
                    Arc::new(Shape::from(Plane::new(*point, *normal)))
                }
                ShapeDesc::Obj { path } => meshes
                    .get(path)
                    .cloned()
                    .ok_or_else(|| MeshError::NoGeometry(path.clone()))?,
            };

            builder.add_shape(shape, material, object.position, object.scale, object.rotation);
        }

        Ok(builder.build())
    }
}

impl Hittable for Scene {
    fn intersect<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        stats: &mut TraversalStats,
    ) -> Option<HitInfo<'a>> {
        let mut closest = self.bvh.intersect(ray, ray_t, stats);
        let mut closest_t = closest.as_ref().map_or(ray_t.max, |hit| hit.t);

        for instance in &self.infinite {
            if let Some(hit) = instance.intersect(ray, ray_t.with_max(closest_t), stats) {
                closest_t = hit.t;
                closest = Some(hit);
            }
        }

        closest
    }

    fn bounds(&self) -> Bounds {
        if self.infinite.is_empty() {
            self.bvh.bounds()
        } else {
            Bounds::EMPTY
        }
    }
}

/// Accumulates instances and builds a [`Scene`].
#[derive(Default)]
pub struct SceneBuilder {
    instances: Vec<ShapeInstance>,
}

impl SceneBuilder {
    /// Place `shape` with a position, per-axis scale and Euler rotation in degrees.
    pub fn add_shape(
        &mut self,
        shape: Arc<Shape>,
        material: Arc<Material>,
        position: Vec3,
        scale: Vec3,
        rotation: Vec3,
    ) -> &mut Self {
        self.add_instance(
            shape,
            Some(material),
            world_from_object(position, scale, rotation),
        )
    }

    /// Place a nested scene. Its instances keep their own materials.
    pub fn add_group(
        &mut self,
        scene: Scene,
        position: Vec3,
        scale: Vec3,
        rotation: Vec3,
    ) -> &mut Self {
        self.add_instance(
            Arc::new(Shape::Group(scene)),
            None,
            world_from_object(position, scale, rotation),
        )
    }

    pub fn add_instance(
        &mut self,
        shape: Arc<Shape>,
        material: Option<Arc<Material>>,
        world_from_object: Mat4,
    ) -> &mut Self {
        self.instances
            .push(ShapeInstance::new(shape, material, world_from_object));
        self
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    pub fn build(self) -> Scene {
        let (bounded, infinite): (Vec<_>, Vec<_>) = self
            .instances
            .into_iter()
            .partition(ShapeInstance::is_bounded);

        log::info!(
            "Building scene: {} bounded instances, {} unbounded",
            bounded.len(),
            infinite.len()
        );

        Scene {
            bvh: Bvh::new(bounded),
            infinite,
        }
    }
}
