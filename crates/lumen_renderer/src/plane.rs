//! Infinite plane `normal . p = offset`.

use crate::{HitRecord, Hittable, Material};
use lumen_math::{Aabb, Interval, Mat4, Mat4Ext, Ray, Vec3};
use serde::{Deserialize, Serialize};

/// Rays this close to parallel never hit.
const PARALLEL_EPSILON: f64 = 1e-8;

/// Plane as given by the user: `normal . p = offset` with a normal of any
/// non-zero length.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlaneSettings {
    pub normal: Vec3,
    pub offset: f64,
    #[serde(default)]
    pub material: Material,
}

/// Plane with its unit normal derived from the settings.
///
/// Serializes as its settings, so a deserialized copy derives the same bits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "PlaneSettings", into = "PlaneSettings")]
pub struct Plane {
    settings: PlaneSettings,
    normal: Vec3,
    offset: f64,
}

impl Plane {
    /// Plane through `point` with the given (not necessarily unit) normal.
    pub fn new(point: Vec3, normal: Vec3, material: Material) -> Self {
        Self::from_normal_offset(normal, normal.dot(point), material)
    }

    pub fn from_normal_offset(normal: Vec3, offset: f64, material: Material) -> Self {
        Self::from(PlaneSettings {
            normal,
            offset,
            material,
        })
    }

    pub fn settings(&self) -> &PlaneSettings {
        &self.settings
    }

    /// Unit normal (zero for a degenerate plane).
    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    /// Signed distance from the origin along [`Plane::normal`].
    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn material(&self) -> &Material {
        &self.settings.material
    }

    pub fn transformed(&self, transform: &Mat4) -> Self {
        let point = transform.transform_point3(self.normal * self.offset);
        Self::new(
            point,
            transform.transform_normal(self.normal),
            self.settings.material,
        )
    }
}

impl From<PlaneSettings> for Plane {
    fn from(settings: PlaneSettings) -> Self {
        let length = settings.normal.length();
        let (normal, offset) = if length == 0.0 {
            (settings.normal, settings.offset)
        } else {
            (settings.normal / length, settings.offset / length)
        };
        Self {
            settings,
            normal,
            offset,
        }
    }
}

impl From<Plane> for PlaneSettings {
    fn from(plane: Plane) -> Self {
        plane.settings
    }
}

impl Hittable for Plane {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        let denom = self.normal.dot(ray.direction);
        if denom.abs() < PARALLEL_EPSILON {
            return None;
        }

        let t = (self.offset - self.normal.dot(ray.origin)) / denom;
        if !ray_t.contains(t) {
            return None;
        }

        Some(HitRecord::new(
            ray,
            t,
            self.normal,
            &self.settings.material,
            (0.0, 0.0),
        ))
    }

    fn bounding_box(&self) -> Aabb {
        Aabb::UNIVERSE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ground() -> Plane {
        Plane::new(Vec3::new(0.0, -1.0, 0.0), Vec3::Y, Material::default())
    }

    #[test]
    fn test_hit_from_above() {
        let ray = Ray::new(Vec3::new(3.0, 4.0, 0.0), -Vec3::Y);
        let obj = ground();
        let rec = obj.hit(&ray, Interval::from_min(0.001)).unwrap();
        assert!((rec.t - 5.0).abs() < 1e-12);
        assert_eq!(rec.normal, Vec3::Y);
        assert!(rec.front_face);
    }

    #[test]
    fn test_hit_from_below_flips_normal() {
        let ray = Ray::new(Vec3::new(0.0, -3.0, 0.0), Vec3::Y);
        let obj = ground();
        let rec = obj.hit(&ray, Interval::from_min(0.001)).unwrap();
        assert!((rec.t - 2.0).abs() < 1e-12);
        assert_eq!(rec.normal, -Vec3::Y);
        assert!(!rec.front_face);
    }

    #[test]
    fn test_deserialize_normalizes() {
        let plane: Plane = serde_json::from_str(r#"{"normal": [0, 2, 0], "offset": 4}"#).unwrap();
        assert_eq!(plane.normal(), Vec3::Y);
        assert_eq!(plane.offset(), 2.0);
        assert_eq!(plane.material(), &Material::default());
    }

    #[test]
    fn test_serde_round_trip_is_bit_exact() {
        // Oblique normals whose length is 1 +- ulp after normalizing
        for i in 1..200 {
            let a = i as f64 * 0.37;
            let normal = Vec3::new(a.sin(), (a * 1.7).cos(), 0.3 + (a * 0.5).sin().abs());
            let point = Vec3::new(a.cos(), -0.5, -(a * 0.3).sin());
            let plane = Plane::new(point, normal, Material::default());

            let json = serde_json::to_string(&plane).unwrap();
            let back: Plane = serde_json::from_str(&json).unwrap();
            assert_eq!(back, plane, "normal {normal:?}");
            assert_eq!(back.normal().to_array(), plane.normal().to_array());
            assert_eq!(back.offset().to_bits(), plane.offset().to_bits());
        }
    }

    #[test]
    fn test_parallel_ray_misses() {
        let ray = Ray::new(Vec3::ZERO, Vec3::X);
        assert!(ground().hit(&ray, Interval::UNIVERSE).is_none());
    }

    #[test]
    fn test_behind_origin_misses() {
        let ray = Ray::new(Vec3::ZERO, Vec3::Y);
        assert!(ground().hit(&ray, Interval::from_min(0.001)).is_none());
    }

    #[test]
    fn test_from_normal_offset_normalizes() {
        let plane = Plane::from_normal_offset(Vec3::new(0.0, 2.0, 0.0), -2.0, Material::default());
        assert_eq!(plane.normal(), ground().normal());
        assert_eq!(plane.offset(), ground().offset());
        assert_eq!(plane.settings().normal, Vec3::new(0.0, 2.0, 0.0));
    }

    #[test]
    fn test_degenerate_normal_never_hits() {
        let plane = Plane::from_normal_offset(Vec3::ZERO, 1.0, Material::default());
        let ray = Ray::new(Vec3::ZERO, Vec3::Y);
        assert!(plane.hit(&ray, Interval::UNIVERSE).is_none());
    }

    #[test]
    fn test_transformed() {
        let moved = ground().transformed(&Mat4::from_translation(Vec3::new(0.0, 3.0, 0.0)));
        assert!((moved.offset() - 2.0).abs() < 1e-12);
        assert!((moved.normal() - Vec3::Y).length() < 1e-12);
    }
}
