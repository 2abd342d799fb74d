// Transform utilities for Mat4
//
// glam::Mat4 already provides transform_point3(), transform_vector3() and
// inverse(); this adds the pieces instancing needs on top.

use crate::Bounds;
use glam::{Mat4, Vec3};

/// Extension trait for Mat4 used by scene instancing.
pub trait Mat4Ext {
    /// Transform a surface normal given the *inverse* of the transform that
    /// moves the surface, i.e. multiply by the transpose of `self`.
    fn transform_normal(&self, normal: Vec3) -> Vec3;

    /// Transform an axis-aligned box.
    /// Computes the box of all 8 transformed corners.
    fn transform_bounds(&self, bounds: &Bounds) -> Bounds;
}

impl Mat4Ext for Mat4 {
    fn transform_normal(&self, normal: Vec3) -> Vec3 {
        self.transpose().transform_vector3(normal).normalize()
    }

    fn transform_bounds(&self, bounds: &Bounds) -> Bounds {
        if !bounds.is_valid() {
            return Bounds::EMPTY;
        }

        let mut result = Bounds::EMPTY;
        for i in 0..8 {
            result.expand(self.transform_point3(bounds.corner(i)));
        }
        result
    }
}

/// Build `T * Rz * Ry * Rx * S` from a position, per-axis scale and
/// rotation angles in degrees.
pub fn world_from_object(position: Vec3, scale: Vec3, rotation_degrees: Vec3) -> Mat4 {
    Mat4::from_translation(position)
        * Mat4::from_rotation_z(rotation_degrees.z.to_radians())
        * Mat4::from_rotation_y(rotation_degrees.y.to_radians())
        * Mat4::from_rotation_x(rotation_degrees.x.to_radians())
        * Mat4::from_scale(scale)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_bounds_translation() {
        let mat = Mat4::from_translation(Vec3::new(5.0, 5.0, 5.0));
        let bounds = Bounds::from_points(Vec3::ZERO, Vec3::ONE);
        let moved = mat.transform_bounds(&bounds);

        assert!((moved.min - Vec3::splat(5.0)).length() < 0.001);
        assert!((moved.max - Vec3::splat(6.0)).length() < 0.001);
    }

    #[test]
    fn test_transform_bounds_rotation_grows_box() {
        let mat = Mat4::from_rotation_y(std::f32::consts::FRAC_PI_4);
        let bounds = Bounds::from_points(Vec3::splat(-1.0), Vec3::splat(1.0));
        let rotated = mat.transform_bounds(&bounds);

        let half_diag = 2.0_f32.sqrt();
        assert!((rotated.max.x - half_diag).abs() < 0.001);
        assert!((rotated.max.z - half_diag).abs() < 0.001);
        assert!((rotated.max.y - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_transform_bounds_keeps_empty_invalid() {
        let mat = Mat4::from_scale(Vec3::splat(3.0));
        assert!(!mat.transform_bounds(&Bounds::EMPTY).is_valid());
    }

    #[test]
    fn test_transform_normal_under_non_uniform_scale() {
        // A plane x + y = 0 scaled by 2 along x keeps its normal perpendicular
        let world_from_object = Mat4::from_scale(Vec3::new(2.0, 1.0, 1.0));
        let object_from_world = world_from_object.inverse();

        let normal = Vec3::new(1.0, 1.0, 0.0).normalize();
        let world_normal = object_from_world.transform_normal(normal);

        let tangent = world_from_object.transform_vector3(Vec3::new(1.0, -1.0, 0.0));
        assert!(world_normal.dot(tangent).abs() < 1e-5);
        assert!((world_normal.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_world_from_object_order() {
        let m = world_from_object(
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::splat(2.0),
            Vec3::new(0.0, 0.0, 90.0),
        );
        // Scale, then rotate +X onto +Y, then translate
        let p = m.transform_point3(Vec3::X);
        assert!((p - Vec3::new(1.0, 2.0, 0.0)).length() < 1e-5);
    }
}
