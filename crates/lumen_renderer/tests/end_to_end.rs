//! Reference scene and failure behavior of the parallel renderer.

mod common;

use common::{config, init_logging, red_sphere_scene};
use lumen_renderer::{
    partition_rows, render_parallel, render_payload, write_ppm, Color, RenderConfig, RenderError,
};

fn red_sphere_config(threads: usize) -> RenderConfig {
    RenderConfig {
        samples: 1,
        seed: 42,
        threads: Some(threads),
        ..config(10, 10)
    }
}

fn ppm_bytes(image: &lumen_renderer::Image) -> Vec<u8> {
    let mut bytes = Vec::new();
    write_ppm(image, &mut bytes).unwrap();
    bytes
}

/// Checked-in 10x10 render of the red sphere scene (seed 42, one sample).
const RED_SPHERE_PPM: &str = include_str!("data/red_sphere_10x10.ppm");

#[test]
fn red_sphere_matches_reference() {
    init_logging();
    let (scene, camera) = red_sphere_scene();

    for threads in [1, 3, 4] {
        let image = render_parallel(&scene, &camera, &red_sphere_config(threads)).unwrap();
        let text = String::from_utf8(ppm_bytes(&image)).unwrap();
        assert_eq!(text, RED_SPHERE_PPM, "{threads} threads");
    }

    let rerun = render_parallel(&scene, &camera, &red_sphere_config(4)).unwrap();
    assert_eq!(ppm_bytes(&rerun), RED_SPHERE_PPM.as_bytes());
}

#[test]
fn red_sphere_reference_pixels() {
    // Spot checks so a regenerated reference cannot drift unnoticed
    let lines: Vec<&str> = RED_SPHERE_PPM.lines().collect();
    assert_eq!(&lines[..3], ["P3", "10 10", "255"]);
    assert_eq!(lines.len(), 3 + 100);

    let pixel = |x: usize, row: usize| lines[3 + row * 10 + x];
    assert_eq!(pixel(0, 0), "186 216 255");
    assert_eq!(pixel(5, 5), "115 61 61");
    assert_eq!(pixel(3, 6), "80 43 43");
    assert_eq!(pixel(6, 3), "222 169 169");
}

#[test]
fn red_sphere_pixels() {
    init_logging();
    let (scene, camera) = red_sphere_scene();
    let image = render_parallel(&scene, &camera, &red_sphere_config(2)).unwrap();

    // Corners look past the sphere at the background
    let background = Color::new(0.5, 0.7, 1.0).gamma_correct(2.2);
    for (x, row) in [(0, 0), (9, 0), (0, 9), (9, 9)] {
        assert_eq!(image.get(x, row), background, "corner ({x}, {row})");
    }

    // The center sees the red sphere
    let center = image.get(5, 5);
    assert!(center.r() > center.g() && center.r() > center.b(), "{center:?}");
    assert_ne!(center, background);
}

#[test]
fn invalid_config_is_rejected_before_rendering() {
    let (scene, camera) = red_sphere_scene();
    let config = RenderConfig {
        width: 0,
        ..red_sphere_config(2)
    };
    assert!(matches!(
        render_parallel(&scene, &camera, &config),
        Err(RenderError::Config(_))
    ));
}

#[test]
fn worker_failure_aborts_render() {
    init_logging();
    // NURBS patch with a short v knot vector: every worker fails to rebuild it
    let payload = br#"{
        "scene": {
            "objects": [{
                "type": "nurbs",
                "control_points": [[{"position": [0, 0, 0]}, {"position": [0, 1, 0]}],
                                   [{"position": [1, 0, 0]}, {"position": [1, 1, 0]}]],
                "u_knots": [0, 0, 1, 1],
                "v_knots": [0, 1, 1],
                "u_degree": 1,
                "v_degree": 1
            }],
            "lights": [],
            "background": [0, 0, 0]
        },
        "camera": {},
        "config": {"width": 4, "height": 4}
    }"#;

    let tiles = partition_rows(4, 4, 2, 42);
    match render_payload(payload, &tiles, 2) {
        Err(RenderError::Worker { message, .. }) => {
            assert!(message.contains("knot"), "unexpected message: {message}");
        }
        other => panic!("expected worker failure, got {other:?}"),
    }
}

#[test]
fn mismatched_job_and_tiles_fail() {
    init_logging();
    let (scene, camera) = red_sphere_scene();
    let job = lumen_renderer::RenderJob::new(scene, camera, red_sphere_config(1));
    let payload = job.to_payload().unwrap();

    let tiles = partition_rows(8, 8, 2, 42);
    assert!(matches!(
        render_payload(&payload, &tiles, 2),
        Err(RenderError::Worker { .. })
    ));
}
