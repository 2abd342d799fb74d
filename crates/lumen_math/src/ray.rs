use crate::{Mat4, Vec3};

/// A ray in 3D space with an origin and a direction.
///
/// The direction is not required to be unit length. Instance transforms
/// rely on this: a ray moved into object space keeps its scale, so hit
/// distances stay comparable between spaces.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Create a new ray.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + t * direction
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Transform this ray by `object_from_world`.
    ///
    /// The origin is treated as a point and the direction as a vector.
    /// The direction is intentionally left unnormalized.
    pub fn object_from_world(&self, object_from_world: &Mat4) -> Ray {
        Ray {
            origin: object_from_world.transform_point3(self.origin),
            direction: object_from_world.transform_vector3(self.direction),
        }
    }
}
