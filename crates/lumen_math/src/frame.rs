use crate::Vec3;

/// Orthonormal shading frame whose local +Y axis is a given normal.
///
/// Every BSDF works in this local space: the macro surface normal is
/// `(0, 1, 0)` and the tangent plane is XZ.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub x_axis: Vec3,
    pub y_axis: Vec3,
    pub z_axis: Vec3,
}

impl Frame {
    pub fn new(normal: Vec3) -> Self {
        let y_axis = normal.normalize();
        // World up is unusable when the normal is (anti)parallel to it
        let up = if y_axis.y.abs() < 0.99999 { Vec3::Y } else { Vec3::Z };
        let x_axis = up.cross(y_axis).normalize();
        let z_axis = x_axis.cross(y_axis).normalize();
        Self {
            x_axis,
            y_axis,
            z_axis,
        }
    }

    /// Express a world direction in this frame.
    #[inline]
    pub fn local_from_world(&self, world: Vec3) -> Vec3 {
        Vec3::new(
            world.dot(self.x_axis),
            world.dot(self.y_axis),
            world.dot(self.z_axis),
        )
        .normalize()
    }

    /// Map a local direction back to world space.
    #[inline]
    pub fn world_from_local(&self, local: Vec3) -> Vec3 {
        (local.x * self.x_axis + local.y * self.y_axis + local.z * self.z_axis).normalize()
    }
}
