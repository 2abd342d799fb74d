//! Lumen math - vector types and small geometric utilities shared by every
//! other crate in the workspace.

// Re-export glam for convenience
pub use glam::*;

mod bounds;
mod complex;
mod frame;
mod interval;
mod ray;
mod transform;

pub use bounds::Bounds;
pub use complex::Complex;
pub use frame::Frame;
pub use interval::Interval;
pub use ray::Ray;
pub use transform::{world_from_object, Mat4Ext};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec3_reexport() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 5.0, 6.0);
        assert_eq!(a + b, Vec3::new(5.0, 7.0, 9.0));
    }
}
