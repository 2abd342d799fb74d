//! Radiance estimators.

use crate::color::{heat_map, Color};
use crate::hittable::TraversalStats;
use crate::sampling::{gen_f32, gen_vec2};
use crate::{Camera, Scene};
use lumen_core::IntegratorKind;
use lumen_math::{Frame, Ray};
use rand::RngCore;

/// Bounds tests per ray that saturate the heat map.
const BOUNDS_TESTS_SCALE: f32 = 150.0;
/// Triangle tests per ray that saturate the heat map.
const TRIANGLE_TESTS_SCALE: f32 = 7.0;

/// How a pixel sample is turned into a colour.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Integrator {
    /// Unidirectional path tracing with Russian roulette. A path survives
    /// each bounce with probability `continuation`.
    PathTracing { continuation: f32 },
    /// Shading normal remapped to `[0, 1]`
    Normal,
    /// Heat map of ray/box tests
    BoundsTests,
    /// Heat map of ray/triangle tests
    TriangleTests,
}

impl Default for Integrator {
    fn default() -> Self {
        Self::path_tracing()
    }
}

impl From<IntegratorKind> for Integrator {
    fn from(kind: IntegratorKind) -> Self {
        match kind {
            IntegratorKind::Path => Self::path_tracing(),
            IntegratorKind::Normal => Self::Normal,
            IntegratorKind::Bounds => Self::BoundsTests,
            IntegratorKind::Triangles => Self::TriangleTests,
        }
    }
}

impl Integrator {
    pub fn path_tracing() -> Self {
        Self::PathTracing { continuation: 0.9 }
    }

    /// Estimate the colour of one sample in pixel `(x, y)`.
    pub fn render_sample(
        &self,
        camera: &Camera,
        scene: &Scene,
        x: usize,
        y: usize,
        rng: &mut dyn RngCore,
    ) -> Color {
        match *self {
            Integrator::PathTracing { continuation } => {
                let ray = camera.generate_ray(x, y, gen_vec2(rng));
                path_trace(scene, ray, continuation, rng)
            }
            Integrator::Normal => {
                let mut stats = TraversalStats::default();
                scene
                    .closest_hit(&camera.center_ray(x, y), &mut stats)
                    .map_or(Color::ZERO, |hit| hit.normal * 0.5 + 0.5)
            }
            Integrator::BoundsTests => {
                let stats = trace_stats(scene, &camera.center_ray(x, y));
                heat_map(stats.bounds_tests as f32 / BOUNDS_TESTS_SCALE)
            }
            Integrator::TriangleTests => {
                let stats = trace_stats(scene, &camera.center_ray(x, y));
                heat_map(stats.triangle_tests as f32 / TRIANGLE_TESTS_SCALE)
            }
        }
    }
}

fn trace_stats(scene: &Scene, ray: &Ray) -> TraversalStats {
    let mut stats = TraversalStats::default();
    scene.closest_hit(ray, &mut stats);
    stats
}

fn path_trace(scene: &Scene, mut ray: Ray, continuation: f32, rng: &mut dyn RngCore) -> Color {
    let mut stats = TraversalStats::default();
    let mut radiance = Color::ZERO;
    let mut beta = Color::ONE;

    while let Some(hit) = scene.closest_hit(&ray, &mut stats) {
        // Shapes outside any instance have nothing to scatter with
        let Some(material) = hit.material else {
            break;
        };
        radiance += beta * material.emission();

        if gen_f32(rng) >= continuation {
            break;
        }
        beta /= continuation;

        let frame = Frame::new(hit.normal);
        let wo = frame.local_from_world(-ray.direction);
        let Some(sample) = material.sample(hit.point, wo, rng) else {
            break;
        };

        beta *= sample.weight();
        if beta == Color::ZERO {
            break;
        }
        ray = Ray::new(hit.point, frame.world_from_local(sample.wi));
    }

    radiance
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::rgb8;
    use crate::{Material, Plane, Shape, Sphere};
    use lumen_math::Vec3;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::Arc;

    /// Floor at y = 0 under an emitting plane at y = 1.
    fn lit_floor(floor: Material, emission: Color) -> Scene {
        let plane = Arc::new(Shape::from(Plane::default()));
        let light = Material::diffuse(Color::ZERO).with_emission(emission);

        let mut builder = Scene::builder();
        builder
            .add_shape(plane.clone(), Arc::new(floor), Vec3::ZERO, Vec3::ONE, Vec3::ZERO)
            .add_shape(plane, Arc::new(light), Vec3::Y, Vec3::ONE, Vec3::ZERO);
        builder.build()
    }

    /// Looks straight down at the floor from between the two planes.
    fn floor_camera() -> Camera {
        Camera::new(1, 1, Vec3::new(0.0, 0.5, 0.0), Vec3::ZERO, 45.0)
    }

    fn mean_radiance(integrator: Integrator, camera: &Camera, scene: &Scene, n: usize) -> Color {
        mean_pixel_radiance(integrator, camera, scene, (0, 0), n)
    }

    fn mean_pixel_radiance(
        integrator: Integrator,
        camera: &Camera,
        scene: &Scene,
        (x, y): (usize, usize),
        n: usize,
    ) -> Color {
        let mut rng = StdRng::seed_from_u64(42);
        let mut sum = Color::ZERO;
        for _ in 0..n {
            sum += integrator.render_sample(camera, scene, x, y, &mut rng);
        }
        sum / n as f32
    }

    #[test]
    fn test_centre_pixel_looking_down_at_lambertian_floor() {
        let scene = lit_floor(Material::diffuse(Color::splat(0.5)), Color::ONE);
        let camera = Camera::new(3, 3, Vec3::new(0.0, 0.9, 0.0), Vec3::ZERO, 45.0);

        let mean = mean_pixel_radiance(Integrator::path_tracing(), &camera, &scene, (1, 1), 10000);
        for i in 0..3 {
            assert!((mean[i] - 0.5).abs() < 0.05 * 0.5, "{mean:?}");
        }
    }

    #[test]
    fn test_diffuse_floor_under_uniform_light() {
        let emission = Color::new(1.0, 2.0, 0.5);
        let albedo = Color::new(0.5, 0.25, 0.8);
        let scene = lit_floor(Material::diffuse(albedo), emission);

        let mean = mean_radiance(Integrator::path_tracing(), &floor_camera(), &scene, 20000);
        let expected = albedo * emission;
        for i in 0..3 {
            assert!(
                (mean[i] - expected[i]).abs() < 0.05 * expected[i],
                "{mean:?} vs {expected:?}"
            );
        }
    }

    #[test]
    fn test_mirror_floor_reflects_light() {
        let emission = Color::splat(2.0);
        let scene = lit_floor(Material::mirror(Color::splat(0.8)), emission);

        let mean = mean_radiance(Integrator::path_tracing(), &floor_camera(), &scene, 5000);
        assert!((mean - Color::splat(1.6)).length() < 0.08, "{mean:?}");
    }

    #[test]
    fn test_low_continuation_stays_unbiased() {
        let emission = Color::splat(2.0);
        let integrator = Integrator::PathTracing { continuation: 0.3 };

        let scene = lit_floor(Material::mirror(Color::splat(0.8)), emission);
        let mean = mean_radiance(integrator, &floor_camera(), &scene, 40000);
        assert!((mean.x - 1.6).abs() < 0.08, "{mean:?}");

        let scene = lit_floor(Material::diffuse(Color::splat(0.5)), emission);
        let mean = mean_radiance(integrator, &floor_camera(), &scene, 40000);
        assert!((mean.x - 1.0).abs() < 0.05, "{mean:?}");
    }

    #[test]
    fn test_light_seen_inside_emitting_sphere() {
        let light = Material::diffuse(Color::ZERO).with_emission(Color::splat(3.0));
        let inner = Material::diffuse(Color::splat(0.6));

        let sphere = Arc::new(Shape::from(Sphere::default()));
        let mut builder = Scene::builder();
        builder
            .add_shape(sphere.clone(), Arc::new(inner), Vec3::ZERO, Vec3::ONE, Vec3::ZERO)
            .add_shape(sphere, Arc::new(light), Vec3::ZERO, Vec3::splat(10.0), Vec3::ZERO);
        let scene = builder.build();

        let camera = Camera::new(1, 1, Vec3::new(0.0, 0.0, -5.0), Vec3::ZERO, 10.0);
        let mean = mean_radiance(Integrator::path_tracing(), &camera, &scene, 20000);
        assert!((mean.x - 1.8).abs() < 0.09, "{mean:?}");
    }

    #[test]
    fn test_miss_is_black() {
        let scene = Scene::builder().build();
        let mean = mean_radiance(Integrator::path_tracing(), &floor_camera(), &scene, 10);
        assert_eq!(mean, Color::ZERO);
    }

    #[test]
    fn test_normal_integrator() {
        let scene = lit_floor(Material::diffuse(Color::ONE), Color::ZERO);
        let camera = Camera::new(1, 1, Vec3::new(0.0, 0.5, 0.0), Vec3::new(0.0, -1.0, 1.0), 45.0);
        let color = mean_radiance(Integrator::Normal, &camera, &scene, 1);
        assert!((color - Color::new(0.5, 1.0, 0.5)).length() < 1e-4);
    }

    #[test]
    fn test_heat_maps_on_empty_scene() {
        let scene = Scene::builder().build();
        let camera = floor_camera();
        let cold = rgb8(68, 1, 84);

        let color = mean_radiance(Integrator::BoundsTests, &camera, &scene, 1);
        assert!((color - cold).length() < 1e-6);
        let color = mean_radiance(Integrator::TriangleTests, &camera, &scene, 1);
        assert!((color - cold).length() < 1e-6);
    }

    #[test]
    fn test_from_kind() {
        assert_eq!(
            Integrator::from(IntegratorKind::Path),
            Integrator::PathTracing { continuation: 0.9 }
        );
        assert_eq!(Integrator::from(IntegratorKind::Bounds), Integrator::BoundsTests);
        assert_eq!(Integrator::default(), Integrator::path_tracing());
    }
}
