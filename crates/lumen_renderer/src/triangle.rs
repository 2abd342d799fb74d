//! Triangle primitive for ray tracing.
//!
//! Uses the Möller-Trumbore algorithm for ray-triangle intersection.

use crate::hittable::{HitInfo, Hittable, Primitive, TraversalStats};
use lumen_math::{Bounds, Interval, Ray, Vec3};

/// A triangle with per-vertex normals.
#[derive(Clone, Copy, Debug)]
pub struct Triangle {
    p0: Vec3,
    p1: Vec3,
    p2: Vec3,
    n0: Vec3,
    n1: Vec3,
    n2: Vec3,
}

impl Triangle {
    /// Create a triangle with the face normal on every vertex.
    pub fn new(p0: Vec3, p1: Vec3, p2: Vec3) -> Self {
        let normal = (p1 - p0).cross(p2 - p0).normalize();
        Self::with_normals(p0, p1, p2, normal, normal, normal)
    }

    /// Create a triangle with vertex normals for smooth shading.
    pub fn with_normals(p0: Vec3, p1: Vec3, p2: Vec3, n0: Vec3, n1: Vec3, n2: Vec3) -> Self {
        Self {
            p0,
            p1,
            p2,
            n0,
            n1,
            n2,
        }
    }

    pub fn vertices(&self) -> [Vec3; 3] {
        [self.p0, self.p1, self.p2]
    }
}

impl Hittable for Triangle {
    fn intersect<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        stats: &mut TraversalStats,
    ) -> Option<HitInfo<'a>> {
        stats.triangle_tests += 1;

        // Solve o + t d = (1 - u - v) p0 + u p1 + v p2 by Cramer's rule
        let e0 = self.p1 - self.p0;
        let e1 = self.p2 - self.p0;
        let s1 = ray.direction.cross(e1);
        let inv_det = 1.0 / s1.dot(e0);

        let s = ray.origin - self.p0;
        let u = s1.dot(s) * inv_det;
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let s2 = s.cross(e0);
        let v = s2.dot(ray.direction) * inv_det;
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = s2.dot(e1) * inv_det;
        if !ray_t.surrounds(t) {
            return None;
        }

        let normal = ((1.0 - u - v) * self.n0 + u * self.n1 + v * self.n2).normalize();
        Some(HitInfo::new(t, ray.at(t), normal))
    }

    fn bounds(&self) -> Bounds {
        let mut bounds = Bounds::from_points(self.p0, self.p1);
        bounds.expand(self.p2);
        bounds
    }
}

impl Primitive for Triangle {
    fn centroid(&self) -> Vec3 {
        (self.p0 + self.p1 + self.p2) / 3.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_triangle() -> Triangle {
        // Triangle in XY plane at z=-1
        Triangle::new(
            Vec3::new(-1.0, -1.0, -1.0),
            Vec3::new(1.0, -1.0, -1.0),
            Vec3::new(0.0, 1.0, -1.0),
        )
    }

    #[test]
    fn test_triangle_hit() {
        let tri = unit_triangle();
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let mut stats = TraversalStats::default();

        let hit = tri
            .intersect(&ray, Interval::new(0.001, f32::INFINITY), &mut stats)
            .unwrap();
        assert!((hit.t - 1.0).abs() < 0.001);
        assert!((hit.normal - Vec3::Z).length() < 1e-5);
        assert!(hit.material.is_none());
        assert_eq!(stats.triangle_tests, 1);
    }

    #[test]
    fn test_triangle_miss() {
        let tri = unit_triangle();
        let mut stats = TraversalStats::default();

        // Ray pointing away
        let away = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0));
        assert!(tri.intersect(&away, Interval::new(0.001, f32::INFINITY), &mut stats).is_none());

        // Outside the edges
        let beside = Ray::new(Vec3::new(2.0, 0.0, 0.0), Vec3::new(0.0, 0.0, -1.0));
        assert!(tri.intersect(&beside, Interval::new(0.001, f32::INFINITY), &mut stats).is_none());

        // Beyond t_max
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        assert!(tri.intersect(&ray, Interval::new(0.001, 0.5), &mut stats).is_none());
        assert_eq!(stats.triangle_tests, 3);
    }

    #[test]
    fn test_interpolated_normal() {
        let tri = Triangle::with_normals(
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::Z,
            Vec3::X,
            Vec3::Z,
        );
        let ray = Ray::new(Vec3::new(0.5, 0.0, 1.0), Vec3::new(0.0, 0.0, -1.0));
        let hit = tri
            .intersect(&ray, Interval::new(0.0, f32::INFINITY), &mut TraversalStats::default())
            .unwrap();

        // Halfway along the p0-p1 edge
        let expected = Vec3::new(1.0, 0.0, 1.0).normalize();
        assert!((hit.normal - expected).length() < 1e-5);
    }

    #[test]
    fn test_parallel_ray_misses() {
        let tri = unit_triangle();
        let ray = Ray::new(Vec3::new(0.0, 0.0, -1.0), Vec3::X);
        let hit = tri.intersect(&ray, Interval::new(0.0, f32::INFINITY), &mut TraversalStats::default());
        assert!(hit.is_none());
    }

    #[test]
    fn test_centroid_and_bounds() {
        let tri = unit_triangle();
        assert!((tri.centroid() - Vec3::new(0.0, -1.0 / 3.0, -1.0)).length() < 1e-6);
        let bounds = tri.bounds();
        assert_eq!(bounds.min, Vec3::new(-1.0, -1.0, -1.0));
        assert_eq!(bounds.max, Vec3::new(1.0, 1.0, -1.0));
    }
}
