use crate::hittable::{HitInfo, Hittable, TraversalStats};
use crate::{Model, Plane, Scene, Sphere};
use lumen_math::{Bounds, Interval, Ray};

/// Geometry that can be placed in a scene.
///
/// Shapes live in object space and carry no material; a
/// [`crate::ShapeInstance`] positions them and assigns one.
pub enum Shape {
    Mesh(Model),
    Sphere(Sphere),
    Plane(Plane),
    /// A nested scene whose own instances already carry materials
    Group(Scene),
}

impl Hittable for Shape {
    fn intersect<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        stats: &mut TraversalStats,
    ) -> Option<HitInfo<'a>> {
        match self {
            Shape::Mesh(model) => model.intersect(ray, ray_t, stats),
            Shape::Sphere(sphere) => sphere.intersect(ray, ray_t, stats),
            Shape::Plane(plane) => plane.intersect(ray, ray_t, stats),
            Shape::Group(scene) => scene.intersect(ray, ray_t, stats),
        }
    }

    fn bounds(&self) -> Bounds {
        match self {
            Shape::Mesh(model) => model.bounds(),
            Shape::Sphere(sphere) => sphere.bounds(),
            Shape::Plane(plane) => plane.bounds(),
            Shape::Group(scene) => scene.bounds(),
        }
    }
}

impl From<Model> for Shape {
    fn from(model: Model) -> Self {
        Shape::Mesh(model)
    }
}

impl From<Sphere> for Shape {
    fn from(sphere: Sphere) -> Self {
        Shape::Sphere(sphere)
    }
}

impl From<Plane> for Shape {
    fn from(plane: Plane) -> Self {
        Shape::Plane(plane)
    }
}

impl From<Scene> for Shape {
    fn from(scene: Scene) -> Self {
        Shape::Group(scene)
    }
}
