//! Built-in showcase scene: two rows of spheres sweeping roughness and
//! index of refraction, over a checkered ground under an area light.

use lumen_core::{
    MaterialDesc, MaterialKindDesc, ObjectDesc, SceneDescription, ShapeDesc,
};
use lumen_math::Vec3;
use lumen_renderer::color::{heat_map, rgb8};

fn unit_sphere() -> ShapeDesc {
    ShapeDesc::Sphere {
        center: Vec3::ZERO,
        radius: 1.0,
    }
}

fn up_plane() -> ShapeDesc {
    ShapeDesc::Plane {
        point: Vec3::ZERO,
        normal: Vec3::Y,
    }
}

fn object(shape: ShapeDesc, material: &str, position: Vec3, scale: f32) -> ObjectDesc {
    ObjectDesc {
        shape,
        material: material.to_string(),
        position,
        scale: Vec3::splat(scale),
        rotation: Vec3::ZERO,
    }
}

pub fn demo_scene() -> SceneDescription {
    let mut scene = SceneDescription::default();

    for i in -3i32..=3 {
        let step = (3 - i) as f32;
        let z = 2.0 * i as f32;

        // Bottom row: glass from ior 1.0 to 2.2, roughest on the left
        let name = format!("dielectric_{}", i + 3);
        scene.materials.insert(
            name.clone(),
            MaterialDesc::new(MaterialKindDesc::Dielectric {
                ior: 1.0 + 0.2 * (i + 3) as f32,
                albedo_r: Vec3::ONE,
                albedo_t: Vec3::ONE,
                roughness_x: step / 18.0,
                roughness_z: step / 6.0,
            }),
        );
        scene
            .objects
            .push(object(unit_sphere(), &name, Vec3::new(0.0, 0.5, z), 0.8));

        // Top row: metals tinted along the heat map
        let tint = heat_map((i + 3) as f32 / 6.0);
        let name = format!("conductor_{}", i + 3);
        scene.materials.insert(
            name.clone(),
            MaterialDesc::new(MaterialKindDesc::Conductor {
                ior: Vec3::splat(2.0) - 2.0 * tint,
                k: Vec3::splat(2.0) + 3.0 * tint,
                roughness_x: step / 6.0,
                roughness_z: step / 18.0,
            }),
        );
        scene
            .objects
            .push(object(unit_sphere(), &name, Vec3::new(0.0, 2.5, z), 0.8));
    }

    scene.materials.insert(
        "ground".to_string(),
        MaterialDesc::new(MaterialKindDesc::Ground {
            albedo: rgb8(120, 204, 157),
        }),
    );
    scene
        .objects
        .push(object(up_plane(), "ground", Vec3::new(0.0, -0.5, 0.0), 1.0));

    scene.materials.insert(
        "light".to_string(),
        MaterialDesc::new(MaterialKindDesc::Diffuse { albedo: Vec3::ONE })
            .with_emission(Vec3::new(0.95, 0.95, 1.0)),
    );
    scene
        .objects
        .push(object(up_plane(), "light", Vec3::new(0.0, 10.0, 0.0), 1.0));

    scene
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_renderer::Scene;

    #[test]
    fn test_demo_scene_is_valid() {
        let description = demo_scene();
        assert_eq!(description.materials.len(), 16);
        assert_eq!(description.objects.len(), 16);
        description.validate().unwrap();

        let json = serde_json::to_string(&description).unwrap();
        let parsed = SceneDescription::from_json_str(&json).unwrap();
        assert_eq!(parsed, description);
    }

    #[test]
    fn test_demo_scene_builds() {
        let scene = Scene::from_description(&demo_scene()).unwrap();
        assert_eq!(scene.instance_count(), 16);
        assert_eq!(scene.infinite_count(), 2);
    }
}
