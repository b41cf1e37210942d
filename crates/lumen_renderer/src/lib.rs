//! Lumen renderer - deterministic CPU ray tracing.
//!
//! A Whitted-style ray tracer (Phong shading, hard shadows, mirror
//! reflection) with stochastic antialiasing. Images are split into
//! horizontal strips and rendered on a worker pool; every pixel derives its
//! own RNG seed from its coordinates, so the output is byte-identical for
//! any thread count.

mod camera;
mod config;
mod hittable;
mod light;
mod material;
mod nurbs;
mod plane;
mod ppm;
mod primitive;
mod renderer;
mod rng;
mod scene;
mod scheduler;
mod sphere;
mod tile;
mod triangle;

pub use camera::{Camera, CameraSettings};
pub use config::{AntialiasQuality, ConfigError, RenderConfig, DEFAULT_SEED};
pub use hittable::{HitRecord, Hittable};
pub use light::Light;
pub use material::Material;
pub use nurbs::{
    clamped_uniform_knots, compute_basis_functions, find_knot_span, ControlPoint, NurbsError,
    NurbsPatch, NurbsStrategy, NurbsSurface, TESSELLATION_SEGMENTS,
};
pub use plane::{Plane, PlaneSettings};
pub use ppm::{save_ppm, write_ppm};
pub use primitive::Primitive;
pub use renderer::{Image, Raytracer, RAY_EPSILON};
pub use rng::{derive_pixel_seed, Lcg};
pub use scene::Scene;
pub use scheduler::{
    render_parallel, render_payload, render_with_partition, RenderError, RenderJob,
};
pub use sphere::Sphere;
pub use tile::{partition_rows, render_tile, Tile, TileResult};
pub use triangle::Triangle;

/// Re-export the math kernel types the public API is written in.
pub use lumen_math::{Aabb, Color, Interval, Mat4, Mat4Ext, Ray, Vec3, Vec3Ext};
