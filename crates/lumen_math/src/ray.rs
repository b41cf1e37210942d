use crate::{Vec3, Vec3Ext};

/// A half-line with an origin and a unit direction.
///
/// Rays are cheap `Copy` values built fresh for every use. The valid
/// parametric range is supplied separately (see [`crate::Interval`]) at each
/// intersection query.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Create a ray; `direction` is normalized (a zero direction stays zero).
    #[inline]
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.safe_normalize(),
        }
    }

    /// Ray from `from` towards `to`.
    pub fn between(from: Vec3, to: Vec3) -> Self {
        Self::new(from, to - from)
    }

    /// `origin + t * direction`
    #[inline]
    pub fn at(&self, t: f64) -> Vec3 {
        self.origin + self.direction * t
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ray_direction_is_normalized() {
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -5.0));
        assert_eq!(ray.direction, Vec3::new(0.0, 0.0, -1.0));
    }

    #[test]
    fn test_ray_at() {
        let ray = Ray::new(Vec3::new(1.0, 0.0, 0.0), Vec3::Y);
        assert_eq!(ray.at(0.0), Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(ray.at(2.0), Vec3::new(1.0, 2.0, 0.0));
        assert_eq!(ray.at(-1.0), Vec3::new(1.0, -1.0, 0.0));
    }

    #[test]
    fn test_ray_between() {
        let ray = Ray::between(Vec3::ZERO, Vec3::new(0.0, 3.0, 4.0));
        assert!((ray.direction.length() - 1.0).abs() < 1e-12);
        assert!((ray.at(5.0) - Vec3::new(0.0, 3.0, 4.0)).length() < 1e-12);
    }

    #[test]
    fn test_zero_direction_stays_zero() {
        let ray = Ray::new(Vec3::ONE, Vec3::ZERO);
        assert_eq!(ray.direction, Vec3::ZERO);
        assert_eq!(ray.at(10.0), Vec3::ONE);
    }
}
