//! Pinhole camera for ray generation.

use lumen_core::{CameraDesc, FilmDesc};
use lumen_math::{Mat4, Ray, Vec2, Vec3};

/// Perspective pinhole camera.
///
/// Pixel `(0, 0)` is the top-left corner of the image; `y` grows downward.
#[derive(Clone, Debug)]
pub struct Camera {
    width: usize,
    height: usize,
    position: Vec3,
    world_from_clip: Mat4,
}

impl Camera {
    /// Create a camera at `position` looking at `look_at`, with a vertical
    /// field of view of `fovy` degrees.
    pub fn new(width: usize, height: usize, position: Vec3, look_at: Vec3, fovy: f32) -> Self {
        let aspect = width.max(1) as f32 / height.max(1) as f32;
        let clip_from_view = Mat4::perspective_rh_gl(fovy.to_radians(), aspect, 1.0, 2.0);
        let forward = (look_at - position).normalize();
        // World up is unusable when looking straight up or down
        let up = if forward.y.abs() < 0.99999 { Vec3::Y } else { Vec3::Z };
        let view_from_world = Mat4::look_at_rh(position, look_at, up);

        Self {
            width,
            height,
            position,
            world_from_clip: view_from_world.inverse() * clip_from_view.inverse(),
        }
    }

    pub fn from_desc(camera: &CameraDesc, film: &FilmDesc) -> Self {
        Self::new(
            film.width,
            film.height,
            camera.position,
            camera.look_at,
            camera.fovy,
        )
    }

    /// Set image resolution, keeping the view.
    pub fn with_resolution(self, width: usize, height: usize) -> Self {
        let look_at = self.position + self.forward();
        let fovy = self.fovy();
        Self::new(width, height, self.position, look_at, fovy)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Unit view direction.
    pub fn forward(&self) -> Vec3 {
        self.world_point(Vec2::ZERO) - self.position
    }

    /// Vertical field of view in degrees.
    fn fovy(&self) -> f32 {
        let forward = self.forward();
        let top = (self.world_point(Vec2::Y) - self.position).normalize();
        2.0 * forward.dot(top).clamp(-1.0, 1.0).acos().to_degrees()
    }

    fn world_point(&self, ndc: Vec2) -> Vec3 {
        let p = self
            .world_from_clip
            .project_point3(Vec3::new(ndc.x, ndc.y, 0.0));
        self.position + (p - self.position).normalize()
    }

    /// Ray through pixel `(x, y)` at subpixel `offset` in `[0, 1)²`.
    pub fn generate_ray(&self, x: usize, y: usize, offset: Vec2) -> Ray {
        let ndc = Vec2::new(
            2.0 * (x as f32 + offset.x) / self.width as f32 - 1.0,
            1.0 - 2.0 * (y as f32 + offset.y) / self.height as f32,
        );
        let direction = self.world_point(ndc) - self.position;
        Ray::new(self.position, direction)
    }

    /// Ray through the centre of pixel `(x, y)`.
    pub fn center_ray(&self, x: usize, y: usize) -> Ray {
        self.generate_ray(x, y, Vec2::splat(0.5))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_ray_points_forward() {
        let camera = Camera::new(64, 32, Vec3::new(-10.0, 1.5, 0.0), Vec3::ZERO, 45.0);
        let ray = camera.generate_ray(32, 16, Vec2::ZERO);

        let expected = (Vec3::ZERO - Vec3::new(-10.0, 1.5, 0.0)).normalize();
        assert_eq!(ray.origin, Vec3::new(-10.0, 1.5, 0.0));
        assert!((ray.direction - expected).length() < 1e-4);
        assert!((camera.forward() - expected).length() < 1e-4);
    }

    #[test]
    fn test_corners_and_field_of_view() {
        let camera = Camera::new(100, 100, Vec3::ZERO, Vec3::NEG_Z, 90.0);

        // Top-left corner goes up and to the left
        let ray = camera.generate_ray(0, 0, Vec2::ZERO);
        assert!(ray.direction.x < 0.0 && ray.direction.y > 0.0 && ray.direction.z < 0.0);

        // Top edge centre is half the field of view above the axis
        let ray = camera.generate_ray(50, 0, Vec2::ZERO);
        let d = ray.direction;
        assert!(d.x.abs() < 1e-4);
        assert!((d.y / -d.z - 1.0).abs() < 1e-3);

        // Bottom-right
        let ray = camera.generate_ray(100, 100, Vec2::ZERO);
        assert!(ray.direction.x > 0.0 && ray.direction.y < 0.0);
    }

    #[test]
    fn test_aspect_ratio_widens_horizontally() {
        let camera = Camera::new(200, 100, Vec3::ZERO, Vec3::NEG_Z, 90.0);
        let d = camera.generate_ray(200, 50, Vec2::ZERO).direction;
        assert!((d.x / -d.z - 2.0).abs() < 1e-3);
    }

    #[test]
    fn test_looking_straight_down_or_up() {
        let camera = Camera::new(3, 3, Vec3::Y, Vec3::ZERO, 45.0);
        let d = camera.center_ray(1, 1).direction;
        assert!((d - Vec3::NEG_Y).length() < 1e-4, "{d:?}");

        let corner = camera.generate_ray(0, 0, Vec2::ZERO).direction;
        assert!(corner.is_finite() && corner.y < 0.0);

        let camera = Camera::new(3, 3, Vec3::ZERO, Vec3::Y, 45.0);
        let d = camera.center_ray(1, 1).direction;
        assert!((d - Vec3::Y).length() < 1e-4, "{d:?}");
        let resized = camera.with_resolution(5, 5);
        assert!((resized.center_ray(2, 2).direction - Vec3::Y).length() < 1e-4);
    }

    #[test]
    fn test_with_resolution_keeps_view() {
        let camera = Camera::new(64, 64, Vec3::new(1.0, 2.0, 3.0), Vec3::ZERO, 60.0);
        let resized = camera.clone().with_resolution(128, 128);

        assert_eq!(resized.width(), 128);
        let a = camera.generate_ray(0, 0, Vec2::ZERO).direction;
        let b = resized.generate_ray(0, 0, Vec2::ZERO).direction;
        assert!((a - b).length() < 1e-3);
    }
}
