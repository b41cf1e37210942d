#![allow(dead_code)]

use lumen_renderer::{
    clamped_uniform_knots, Camera, Color, ControlPoint, Light, Mat4, Material, NurbsStrategy,
    NurbsSurface, Plane, Primitive, RenderConfig, Scene, Sphere, Triangle, Vec3,
};

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// One red sphere, one light, sky-blue background.
pub fn red_sphere_scene() -> (Scene, Camera) {
    let mut scene = Scene::new(Color::new(0.5, 0.7, 1.0));
    scene.add(Sphere::new(
        Vec3::new(0.0, 0.0, -1.0),
        0.5,
        Material::new(Color::new(0.8, 0.2, 0.2)),
    ));
    scene.add_light(Light::white(Vec3::new(2.0, 2.0, 0.0)));
    (scene, Camera::default())
}

/// Biquadratic dome patch centered at `center`.
pub fn dome(center: Vec3, strategy: NurbsStrategy, material: Material) -> NurbsSurface {
    let grid = (0..3)
        .map(|i| {
            (0..3)
                .map(|j| {
                    let lift = if i == 1 && j == 1 { 1.5 } else { 0.0 };
                    let weight = if i == 1 && j == 1 { 2.0 } else { 1.0 };
                    ControlPoint::new(
                        center + Vec3::new((i as f64 - 1.0) * 0.6, lift, (j as f64 - 1.0) * 0.6),
                        weight,
                    )
                })
                .collect()
        })
        .collect();
    NurbsSurface::new(
        grid,
        clamped_uniform_knots(3, 2),
        clamped_uniform_knots(3, 2),
        2,
        2,
        material,
    )
    .expect("valid dome patch")
    .with_strategy(strategy)
}

/// Every primitive kind, a reflective surface and two lights.
pub fn showcase_scene() -> (Scene, Camera) {
    let mut scene = Scene::new(Color::new(0.2, 0.25, 0.35));

    scene.add(Plane::new(
        Vec3::new(0.0, -0.5, 0.0),
        Vec3::Y,
        Material::new(Color::gray(0.6)).with_reflectivity(0.3),
    ));
    scene.add(Sphere::new(
        Vec3::new(-0.6, 0.0, -2.0),
        0.5,
        Material::new(Color::new(0.9, 0.3, 0.2)).with_specular(0.6, 64.0),
    ));
    scene.add(Triangle::new(
        Vec3::new(0.2, -0.5, -2.5),
        Vec3::new(1.2, -0.5, -2.5),
        Vec3::new(0.7, 0.6, -2.5),
        Material::new(Color::new(0.2, 0.4, 0.9)),
    ));
    scene.add(dome(
        Vec3::new(0.8, -0.5, -1.6),
        NurbsStrategy::Tessellation,
        Material::new(Color::new(0.3, 0.8, 0.3)),
    ));
    scene.add(dome(
        Vec3::new(-0.3, -0.5, -1.2),
        NurbsStrategy::Newton,
        Material::new(Color::new(0.9, 0.8, 0.2)).with_reflectivity(0.5),
    ));

    scene.add_light(Light::white(Vec3::new(3.0, 4.0, 1.0)));
    scene.add_light(Light::new(Vec3::new(-3.0, 2.0, 0.0), Color::new(0.4, 0.4, 0.6), 0.8));

    let camera = Camera::look_at(
        Vec3::new(0.0, 0.6, 1.0),
        Vec3::new(0.0, 0.0, -2.0),
        Vec3::Y,
        55.0,
        4.0 / 3.0,
    );
    (scene, camera)
}

/// Tilted reflective floor, a tilted back wall and primitives placed by
/// rotation and non-uniform scale, so no surface normal is axis aligned.
pub fn oblique_scene() -> (Scene, Camera) {
    let mut scene = Scene::new(Color::new(0.1, 0.15, 0.2));

    scene.add(Plane::new(
        Vec3::new(0.0, -0.6, 0.0),
        Vec3::new(0.13, 1.0, 0.29),
        Material::new(Color::gray(0.7)).with_reflectivity(0.4),
    ));
    scene.add(Plane::from_normal_offset(
        Vec3::new(-0.21, 0.17, 0.93),
        -3.7,
        Material::new(Color::new(0.6, 0.5, 0.4)),
    ));

    let place = Mat4::from_translation(Vec3::new(0.1, -0.1, -2.2))
        * Mat4::from_rotation_y(0.7)
        * Mat4::from_rotation_x(-0.4)
        * Mat4::from_scale(Vec3::new(1.3, 0.8, 1.1));
    let objects: [Primitive; 3] = [
        Sphere::new(
            Vec3::new(-0.5, 0.2, 0.0),
            0.35,
            Material::new(Color::new(0.9, 0.3, 0.2)).with_reflectivity(0.25),
        )
        .into(),
        Triangle::new(
            Vec3::new(0.2, -0.4, 0.1),
            Vec3::new(0.9, -0.3, -0.2),
            Vec3::new(0.5, 0.6, 0.0),
            Material::new(Color::new(0.2, 0.4, 0.9)),
        )
        .into(),
        dome(
            Vec3::new(0.0, -0.5, 0.5),
            NurbsStrategy::Newton,
            Material::new(Color::new(0.3, 0.8, 0.3)),
        )
        .into(),
    ];
    for object in &objects {
        scene.add(object.transformed(&place));
    }

    scene.add_light(Light::white(Vec3::new(2.5, 3.0, 1.5)));
    scene.add_light(Light::new(Vec3::new(-2.0, 1.5, 0.5), Color::new(0.5, 0.4, 0.6), 0.7));

    let camera = Camera::look_at(
        Vec3::new(0.4, 0.5, 1.2),
        Vec3::new(0.0, -0.2, -2.0),
        Vec3::new(0.05, 1.0, 0.0),
        60.0,
        4.0 / 3.0,
    );
    (scene, camera)
}

pub fn config(width: u32, height: u32) -> RenderConfig {
    RenderConfig {
        width,
        height,
        ..RenderConfig::default()
    }
}
