//! Triangle meshes behind their own BVH.

use std::path::Path;

use crate::bvh::Bvh;
use crate::hittable::{HitInfo, Hittable, TraversalStats};
use crate::triangle::Triangle;
use lumen_core::{Mesh, MeshResult};
use lumen_math::{Bounds, Interval, Ray};

/// A triangle mesh ready for intersection.
///
/// Instances share one `Model` through `Arc<Shape>`, so the hierarchy is
/// built once per mesh no matter how often it is placed.
pub struct Model {
    bvh: Bvh<Triangle>,
}

impl Model {
    pub fn new(triangles: Vec<Triangle>) -> Self {
        Self {
            bvh: Bvh::new(triangles),
        }
    }

    pub fn from_mesh(mesh: &Mesh) -> Self {
        let triangles = mesh
            .triangles()
            .into_iter()
            .map(|tri| {
                let [p0, p1, p2] = tri.positions;
                match tri.normals {
                    Some([n0, n1, n2]) => Triangle::with_normals(p0, p1, p2, n0, n1, n2),
                    None => Triangle::new(p0, p1, p2),
                }
            })
            .collect();
        Self::new(triangles)
    }

    pub fn load_obj<P: AsRef<Path>>(path: P) -> MeshResult<Self> {
        let mesh = Mesh::load_obj(path)?;
        Ok(Self::from_mesh(&mesh))
    }

    pub fn triangle_count(&self) -> usize {
        self.bvh.len()
    }

    pub fn bvh(&self) -> &Bvh<Triangle> {
        &self.bvh
    }
}

impl Hittable for Model {
    fn intersect<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        stats: &mut TraversalStats,
    ) -> Option<HitInfo<'a>> {
        self.bvh.intersect(ray, ray_t, stats)
    }

    fn bounds(&self) -> Bounds {
        self.bvh.bounds()
    }
}
