//! Sphere primitive for ray tracing.

use crate::hittable::{HitInfo, Hittable, TraversalStats};
use lumen_math::{Bounds, Interval, Ray, Vec3};

/// A sphere.
#[derive(Clone, Copy, Debug)]
pub struct Sphere {
    center: Vec3,
    radius: f32,
}

impl Sphere {
    /// Create a new sphere.
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self {
            center,
            radius: radius.max(0.0),
        }
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }
}

impl Default for Sphere {
    /// Unit sphere at the origin.
    fn default() -> Self {
        Self::new(Vec3::ZERO, 1.0)
    }
}

impl Hittable for Sphere {
    fn intersect<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        _stats: &mut TraversalStats,
    ) -> Option<HitInfo<'a>> {
        let oc = self.center - ray.origin;
        let a = ray.direction.length_squared();
        let h = ray.direction.dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = h * h - a * c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrtd = discriminant.sqrt();

        // Find the nearest root in the acceptable range
        let mut root = (h - sqrtd) / a;
        if !ray_t.surrounds(root) {
            root = (h + sqrtd) / a;
            if !ray_t.surrounds(root) {
                return None;
            }
        }

        let point = ray.at(root);
        let normal = (point - self.center) / self.radius;
        Some(HitInfo::new(root, point, normal))
    }

    fn bounds(&self) -> Bounds {
        let rvec = Vec3::splat(self.radius);
        Bounds::from_points(self.center - rvec, self.center + rvec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(sphere: &Sphere, ray: &Ray) -> Option<f32> {
        sphere
            .intersect(ray, Interval::new(0.001, f32::INFINITY), &mut TraversalStats::default())
            .map(|h| h.t)
    }

    #[test]
    fn test_sphere_hit() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5);
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let t = hit(&sphere, &ray).unwrap();
        assert!((t - 0.5).abs() < 0.001); // Should hit at t=0.5
    }

    #[test]
    fn test_sphere_miss() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5);

        // Ray pointing away from sphere
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 1.0, 0.0));
        assert!(hit(&sphere, &ray).is_none());
    }

    #[test]
    fn test_hit_from_inside_uses_far_root() {
        let sphere = Sphere::default();
        let ray = Ray::new(Vec3::ZERO, Vec3::X);
        let info = sphere
            .intersect(&ray, Interval::new(0.001, f32::INFINITY), &mut TraversalStats::default())
            .unwrap();
        assert!((info.t - 1.0).abs() < 1e-5);
        // Outward normal, not flipped toward the ray
        assert!((info.normal - Vec3::X).length() < 1e-5);
    }

    #[test]
    fn test_unnormalized_direction_scales_t() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -4.0), 1.0);
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -2.0));
        let t = hit(&sphere, &ray).unwrap();
        assert!((t - 1.5).abs() < 1e-5);
    }
}
