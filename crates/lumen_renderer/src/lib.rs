//! Lumen Renderer - CPU Path Tracing
//!
//! A Monte Carlo path tracer with microfacet materials. Geometry is held in
//! two levels of SAH bounding volume hierarchies: one over the triangles of
//! each mesh, one over the instances that place shapes in the world.

mod bvh;
mod camera;
pub mod color;
mod film;
pub mod fresnel;
mod hittable;
mod instance;
mod integrator;
mod material;
mod microfacet;
mod model;
mod plane;
mod renderer;
pub mod sampling;
mod scene;
mod shape;
mod sphere;
mod triangle;

pub use bvh::{Bvh, BvhStats, FlatNode, MAX_DEPTH};
pub use camera::Camera;
pub use color::Color;
pub use film::{Film, FilmError, Pixel};
pub use hittable::{HitInfo, Hittable, Primitive, TraversalStats};
pub use instance::ShapeInstance;
pub use integrator::Integrator;
pub use material::{BsdfSample, Material, MaterialKind};
pub use microfacet::Microfacet;
pub use model::Model;
pub use plane::Plane;
pub use renderer::{RenderError, Renderer};
pub use scene::{Scene, SceneBuilder};
pub use shape::Shape;
pub use sphere::Sphere;
pub use triangle::Triangle;

/// Re-export math types from lumen_math
pub use lumen_math::{Bounds, Interval, Ray, Vec2, Vec3};
