use crate::hittable::{HitInfo, Hittable, TraversalStats};
use lumen_math::{Bounds, Interval, Ray, Vec3};

/// An infinite plane through `point` with unit `normal`.
///
/// Its bounds are empty, so scenes keep it out of the instance BVH and
/// test it separately.
#[derive(Clone, Copy, Debug)]
pub struct Plane {
    point: Vec3,
    normal: Vec3,
}

impl Plane {
    pub fn new(point: Vec3, normal: Vec3) -> Self {
        Self {
            point,
            normal: normal.normalize(),
        }
    }
}

impl Default for Plane {
    /// The y = 0 plane facing +Y.
    fn default() -> Self {
        Self::new(Vec3::ZERO, Vec3::Y)
    }
}

impl Hittable for Plane {
    fn intersect<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        _stats: &mut TraversalStats,
    ) -> Option<HitInfo<'a>> {
        // (o + t d - p) . n = 0
        let t = (self.point - ray.origin).dot(self.normal) / ray.direction.dot(self.normal);
        if !ray_t.surrounds(t) {
            return None;
        }
        Some(HitInfo::new(t, ray.at(t), self.normal))
    }

    fn bounds(&self) -> Bounds {
        Bounds::EMPTY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plane_hit_from_both_sides() {
        let plane = Plane::default();
        let range = Interval::new(1e-4, f32::INFINITY);
        let mut stats = TraversalStats::default();

        let above = Ray::new(Vec3::new(1.0, 2.0, 3.0), Vec3::new(0.0, -1.0, 0.0));
        let hit = plane.intersect(&above, range, &mut stats).unwrap();
        assert!((hit.t - 2.0).abs() < 1e-6);
        assert_eq!(hit.normal, Vec3::Y);

        let below = Ray::new(Vec3::new(0.0, -3.0, 0.0), Vec3::new(0.0, 1.0, 1.0));
        let hit = plane.intersect(&below, range, &mut stats).unwrap();
        assert!((hit.t - 3.0).abs() < 1e-6);
        assert!(hit.point.y.abs() < 1e-6);
    }

    #[test]
    fn test_parallel_and_receding_rays_miss() {
        let plane = Plane::new(Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, 2.0, 0.0));
        let range = Interval::new(1e-4, f32::INFINITY);
        let mut stats = TraversalStats::default();

        let parallel = Ray::new(Vec3::ZERO, Vec3::X);
        assert!(plane.intersect(&parallel, range, &mut stats).is_none());

        let receding = Ray::new(Vec3::ZERO, -Vec3::Y);
        assert!(plane.intersect(&receding, range, &mut stats).is_none());
    }

    #[test]
    fn test_plane_is_unbounded() {
        assert!(!Plane::default().bounds().is_valid());
    }
}
