//! Hittable trait and HitInfo for ray-object intersection.

use crate::Material;
use lumen_math::{Bounds, Interval, Ray, Vec3};

/// Record of a ray-object intersection.
#[derive(Clone, Copy, Debug)]
pub struct HitInfo<'a> {
    /// Parameter t where the intersection occurs
    pub t: f32,
    /// Point of intersection
    pub point: Vec3,
    /// Unit geometric or interpolated normal, as authored (not flipped toward the ray)
    pub normal: Vec3,
    /// Material at the intersection point. Bare shapes report `None`; the
    /// owning instance fills it in.
    pub material: Option<&'a Material>,
}

impl<'a> HitInfo<'a> {
    pub fn new(t: f32, point: Vec3, normal: Vec3) -> Self {
        Self {
            t,
            point,
            normal,
            material: None,
        }
    }
}

/// Intersection work counters, used by the debug heat-map integrators.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TraversalStats {
    /// Number of ray/box slab tests
    pub bounds_tests: usize,
    /// Number of ray/triangle tests
    pub triangle_tests: usize,
}

/// Trait for objects that can be hit by rays.
pub trait Hittable: Send + Sync {
    /// Find the closest hit with `t` strictly inside `ray_t`.
    fn intersect<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        stats: &mut TraversalStats,
    ) -> Option<HitInfo<'a>>;

    /// Get the axis-aligned bounding box of this object.
    ///
    /// Unbounded objects return [`Bounds::EMPTY`].
    fn bounds(&self) -> Bounds;
}

/// Anything a [`crate::Bvh`] can be built over.
pub trait Primitive: Hittable {
    /// Point used to bin the primitive during the SAH build.
    fn centroid(&self) -> Vec3 {
        self.bounds().centroid()
    }
}
