//! Simple ray tracer example.
//!
//! Renders a small scene with every primitive kind on all cores and saves it
//! to PPM format.

use lumen_renderer::{
    clamped_uniform_knots, render_parallel, save_ppm, AntialiasQuality, Camera, Color,
    ControlPoint, Light, Material, NurbsSurface, Plane, RenderConfig, Scene, Sphere, Triangle,
    Vec3,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    println!("Lumen Ray Tracer - Simple Example");
    println!("=================================");

    let start = std::time::Instant::now();
    let scene = build_scene()?;
    println!("Scene built in {:?} ({} objects)", start.elapsed(), scene.len());

    let config = RenderConfig {
        width: 640,
        height: 360,
        antialiasing: Some(AntialiasQuality::Medium),
        ..RenderConfig::default()
    };

    let camera = Camera::look_at(
        Vec3::new(0.0, 1.2, 3.0),
        Vec3::new(0.0, 0.2, -1.5),
        Vec3::Y,
        50.0,
        config.aspect_ratio(),
    );

    println!(
        "Rendering {}x{} @ {} spp on {} threads...",
        config.width,
        config.height,
        config.samples_traced(),
        config.thread_count()
    );

    let start = std::time::Instant::now();
    let image = render_parallel(&scene, &camera, &config)?;
    println!("Rendered in {:?}", start.elapsed());

    let filename = "output.ppm";
    save_ppm(&image, filename)?;
    println!("Saved to {}", filename);
    Ok(())
}

fn build_scene() -> Result<Scene, lumen_renderer::NurbsError> {
    let mut scene = Scene::new(Color::new(0.5, 0.7, 1.0));

    // Ground
    scene.add(Plane::new(
        Vec3::ZERO,
        Vec3::Y,
        Material::new(Color::gray(0.5)).with_reflectivity(0.2),
    ));

    scene.add(Sphere::new(
        Vec3::new(-1.2, 0.6, -1.5),
        0.6,
        Material::new(Color::new(0.8, 0.2, 0.2)).with_specular(0.5, 64.0),
    ));
    scene.add(Sphere::new(
        Vec3::new(1.3, 0.5, -2.0),
        0.5,
        Material::new(Color::gray(0.9)).with_reflectivity(0.8),
    ));
    scene.add(Triangle::new(
        Vec3::new(-2.5, 0.0, -4.0),
        Vec3::new(2.5, 0.0, -4.0),
        Vec3::new(0.0, 2.5, -4.0),
        Material::new(Color::new(0.2, 0.3, 0.8)),
    ));

    // Rational dome in the middle
    let grid = (0..3)
        .map(|i| {
            (0..3)
                .map(|j| {
                    let center = i == 1 && j == 1;
                    ControlPoint::new(
                        Vec3::new(
                            (i as f64 - 1.0) * 0.7,
                            if center { 1.6 } else { 0.0 },
                            -1.4 + (j as f64 - 1.0) * 0.7,
                        ),
                        if center { 2.0 } else { 1.0 },
                    )
                })
                .collect()
        })
        .collect();
    scene.add(NurbsSurface::new(
        grid,
        clamped_uniform_knots(3, 2),
        clamped_uniform_knots(3, 2),
        2,
        2,
        Material::new(Color::new(0.3, 0.8, 0.3)),
    )?);

    scene.add_light(Light::white(Vec3::new(4.0, 5.0, 2.0)));
    scene.add_light(Light::new(Vec3::new(-4.0, 3.0, 1.0), Color::new(0.6, 0.6, 0.8), 0.6));

    Ok(scene)
}
