// Affine transform helpers on DMat4.
//
// glam already provides transform_point3 (w=1), transform_vector3 (w=0) and
// inverse(); this adds what placing primitives in a scene needs on top.

use crate::{Mat4, Vec3, Vec3Ext};

/// Extension trait for [`Mat4`] used when placing primitives in the world.
pub trait Mat4Ext {
    /// Transform a surface normal (inverse-transpose), renormalized.
    fn transform_normal(&self, normal: Vec3) -> Vec3;

    /// Largest axis scale factor of the linear part.
    ///
    /// A sphere under a non-uniform scale stays a sphere with this radius
    /// factor (conservative, not exact).
    fn max_scale(&self) -> f64;
}

impl Mat4Ext for Mat4 {
    fn transform_normal(&self, normal: Vec3) -> Vec3 {
        let normal_matrix = self.inverse().transpose();
        normal_matrix.transform_vector3(normal).safe_normalize()
    }

    fn max_scale(&self) -> f64 {
        let sx = self.transform_vector3(Vec3::X).length();
        let sy = self.transform_vector3(Vec3::Y).length();
        let sz = self.transform_vector3(Vec3::Z).length();
        sx.max(sy).max(sz)
    }
}
