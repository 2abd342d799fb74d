use crate::{Interval, Ray, Vec3};

/// Axis-aligned bounding box used by the BVH builders and traversal.
///
/// An empty box has `min = +inf` and `max = -inf`, so expanding it by any
/// point yields that point. Boxes only ever grow.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Bounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl Default for Bounds {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Bounds {
    /// The empty box.
    pub const EMPTY: Bounds = Bounds {
        min: Vec3::INFINITY,
        max: Vec3::NEG_INFINITY,
    };

    /// Create a box from two arbitrary corner points.
    pub fn from_points(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Create a box that surrounds two other boxes.
    pub fn surrounding(a: &Bounds, b: &Bounds) -> Self {
        Self {
            min: a.min.min(b.min),
            max: a.max.max(b.max),
        }
    }

    /// Grow the box to contain `point`.
    #[inline]
    pub fn expand(&mut self, point: Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    /// Grow the box to contain `other`.
    #[inline]
    pub fn expand_bounds(&mut self, other: &Bounds) {
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
    }

    /// Slab test against a ray within `ray_t`.
    pub fn hit(&self, ray: &Ray, ray_t: Interval) -> bool {
        self.hit_with_inv_dir(ray.origin, ray.direction.recip(), ray_t)
    }

    /// Slab test with a precomputed `1 / direction`.
    ///
    /// Zero direction components produce signed infinities here; the
    /// comparisons below handle them without a special case.
    #[inline]
    pub fn hit_with_inv_dir(&self, origin: Vec3, inv_dir: Vec3, ray_t: Interval) -> bool {
        let t1 = (self.min - origin) * inv_dir;
        let t2 = (self.max - origin) * inv_dir;
        let near = t1.min(t2).max_element();
        let far = t1.max(t2).min_element();
        near.max(ray_t.min) <= far.min(ray_t.max)
    }

    /// Extent vector (max - min).
    #[inline]
    pub fn diagonal(&self) -> Vec3 {
        self.max - self.min
    }

    /// Surface area, the SAH cost proxy.
    #[inline]
    pub fn area(&self) -> f32 {
        let d = self.diagonal();
        2.0 * (d.x * (d.y + d.z) + d.y * d.z)
    }

    /// One of the eight corners; bit 0 picks x, bit 1 picks y, bit 2 picks z.
    /// A set bit selects the max side.
    pub fn corner(&self, index: usize) -> Vec3 {
        Vec3::new(
            if index & 1 != 0 { self.max.x } else { self.min.x },
            if index & 2 != 0 { self.max.y } else { self.min.y },
            if index & 4 != 0 { self.max.z } else { self.min.z },
        )
    }

    /// Returns the center point of the bounding box.
    #[inline]
    pub fn centroid(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// True when min <= max on every axis.
    pub fn is_valid(&self) -> bool {
        self.max.cmpge(self.min).all()
    }

    /// Valid and without any infinite or NaN component.
    pub fn is_finite(&self) -> bool {
        self.is_valid() && self.min.is_finite() && self.max.is_finite()
    }
}
