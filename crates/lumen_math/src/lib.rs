//! Lumen math kernel.
//!
//! Double-precision vectors and transforms (re-exported from glam), plus the
//! ray-tracing specific types: [`Ray`], [`Interval`], [`Aabb`] and the
//! channel-clamped [`Color`].

// Re-export glam for convenience
pub use glam::{DMat4, DVec3};

/// 3D vector / point type used throughout the renderer.
///
/// Double precision: NURBS finite differences step by `1e-6`, which single
/// precision cannot resolve.
pub type Vec3 = DVec3;

/// 4x4 affine transform.
pub type Mat4 = DMat4;

mod aabb;
mod color;
mod interval;
mod ray;
mod transform;
mod vec;

pub use aabb::Aabb;
pub use color::Color;
pub use interval::Interval;
pub use ray::Ray;
pub use transform::Mat4Ext;
pub use vec::Vec3Ext;
