use crate::Vec3;

/// Vector operations the renderer needs beyond what glam provides.
pub trait Vec3Ext {
    /// Mirror `self` about the normal `n` (`v - 2(v·n)n`).
    ///
    /// `n` is expected to be unit length.
    fn reflect_about(self, n: Vec3) -> Vec3;

    /// Normalize, leaving a zero (or non-finite) vector at zero.
    fn safe_normalize(self) -> Vec3;
}

impl Vec3Ext for Vec3 {
    #[inline]
    fn reflect_about(self, n: Vec3) -> Vec3 {
        self - 2.0 * self.dot(n) * n
    }

    #[inline]
    fn safe_normalize(self) -> Vec3 {
        self.normalize_or_zero()
    }
}
