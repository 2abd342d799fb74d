//! Placement of a shared shape in world space.

use std::sync::Arc;

use crate::hittable::{HitInfo, Hittable, Primitive, TraversalStats};
use crate::{Material, Shape};
use lumen_math::{Bounds, Interval, Mat4, Mat4Ext, Ray, Vec3};

/// A shape placed in the world with a transform and a material.
///
/// Rays are moved into object space instead of moving the geometry, so one
/// mesh and its BVH can be referenced by any number of instances.
pub struct ShapeInstance {
    shape: Arc<Shape>,
    material: Option<Arc<Material>>,
    world_from_object: Mat4,
    object_from_world: Mat4,
    bounds: Bounds,
    centroid: Vec3,
}

impl ShapeInstance {
    pub fn new(shape: Arc<Shape>, material: Option<Arc<Material>>, world_from_object: Mat4) -> Self {
        let object_from_world = world_from_object.inverse();
        let bounds = world_from_object.transform_bounds(&shape.bounds());
        let centroid = bounds.centroid();

        Self {
            shape,
            material,
            world_from_object,
            object_from_world,
            bounds,
            centroid,
        }
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn material(&self) -> Option<&Material> {
        self.material.as_deref()
    }

    pub fn world_from_object(&self) -> Mat4 {
        self.world_from_object
    }

    /// Whether the instance has a finite world-space box and can go in a BVH.
    pub fn is_bounded(&self) -> bool {
        self.bounds.is_valid() && self.bounds.is_finite()
    }
}

impl Hittable for ShapeInstance {
    fn intersect<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        stats: &mut TraversalStats,
    ) -> Option<HitInfo<'a>> {
        // Unnormalized, so t is the same in both spaces
        let local_ray = ray.object_from_world(&self.object_from_world);
        let mut hit = self.shape.intersect(&local_ray, ray_t, stats)?;

        hit.point = self.world_from_object.transform_point3(hit.point);
        hit.normal = self.object_from_world.transform_normal(hit.normal);
        // Materials assigned deeper in a group take precedence
        if hit.material.is_none() {
            hit.material = self.material.as_deref();
        }
        Some(hit)
    }

    fn bounds(&self) -> Bounds {
        self.bounds
    }
}

impl Primitive for ShapeInstance {
    fn centroid(&self) -> Vec3 {
        self.centroid
    }
}
