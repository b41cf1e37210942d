//! Sphere primitive.

use crate::{HitRecord, Hittable, Material};
use lumen_math::{Aabb, Interval, Mat4, Mat4Ext, Ray, Vec3};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f64,
    #[serde(default)]
    pub material: Material,
}

impl Sphere {
    pub fn new(center: Vec3, radius: f64, material: Material) -> Self {
        Self {
            center,
            radius: radius.max(0.0),
            material,
        }
    }

    /// Spherical `(u, v)` of a point on the unit sphere. `u` wraps around
    /// the Y axis starting at -X; `v` runs from 0 at -Y to 1 at +Y.
    fn sphere_uv(p: Vec3) -> (f64, f64) {
        let theta = (-p.y).clamp(-1.0, 1.0).acos();
        let phi = (-p.z).atan2(p.x) + PI;
        (phi / (2.0 * PI), theta / PI)
    }

    /// Place the sphere under `transform`. The radius scales by the largest
    /// axis scale factor.
    pub fn transformed(&self, transform: &Mat4) -> Self {
        Self::new(
            transform.transform_point3(self.center),
            self.radius * transform.max_scale(),
            self.material,
        )
    }
}

impl Hittable for Sphere {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        let oc = self.center - ray.origin;
        let a = ray.direction.length_squared();
        if a == 0.0 || self.radius <= 0.0 {
            return None;
        }
        let h = ray.direction.dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = h * h - a * c;
        if discriminant < 0.0 {
            return None;
        }
        let sqrtd = discriminant.sqrt();

        // Nearest root first, the far one only if the near one is out of range
        let mut root = (h - sqrtd) / a;
        if !ray_t.contains(root) {
            root = (h + sqrtd) / a;
            if !ray_t.contains(root) {
                return None;
            }
        }

        let outward_normal = (ray.at(root) - self.center) / self.radius;
        Some(HitRecord::new(
            ray,
            root,
            outward_normal,
            &self.material,
            Self::sphere_uv(outward_normal),
        ))
    }

    fn bounding_box(&self) -> Aabb {
        let r = Vec3::splat(self.radius);
        Aabb::from_points(self.center - r, self.center + r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_sphere() -> Sphere {
        Sphere::new(Vec3::ZERO, 1.0, Material::default())
    }

    #[test]
    fn test_hit_from_outside() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 2.0), -Vec3::Z);
        let obj = unit_sphere();
        let rec = obj.hit(&ray, Interval::from_min(0.001)).unwrap();
        assert!((rec.t - 1.0).abs() < 1e-12);
        assert!((rec.normal - Vec3::Z).length() < 1e-12);
        assert!(rec.front_face);
    }

    #[test]
    fn test_hit_from_inside_uses_far_root() {
        let ray = Ray::new(Vec3::ZERO, Vec3::X);
        let obj = unit_sphere();
        let rec = obj.hit(&ray, Interval::from_min(0.001)).unwrap();
        assert!((rec.t - 1.0).abs() < 1e-12);
        assert!(!rec.front_face);
        assert!((rec.normal + Vec3::X).length() < 1e-12);
    }

    #[test]
    fn test_miss() {
        let ray = Ray::new(Vec3::new(0.0, 2.0, 2.0), -Vec3::Z);
        assert!(unit_sphere().hit(&ray, Interval::from_min(0.001)).is_none());
    }

    #[test]
    fn test_interval_bounds_are_inclusive() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 2.0), -Vec3::Z);
        assert!(unit_sphere().hit(&ray, Interval::new(0.0, 1.0)).is_some());
        // Both roots (1 and 3) outside
        assert!(unit_sphere().hit(&ray, Interval::new(1.5, 2.5)).is_none());
    }

    #[test]
    fn test_transformed() {
        let mat =
            Mat4::from_translation(Vec3::new(0.0, 0.0, -5.0)) * Mat4::from_scale(Vec3::splat(2.0));
        let moved = unit_sphere().transformed(&mat);
        assert_eq!(moved.center, Vec3::new(0.0, 0.0, -5.0));
        assert!((moved.radius - 2.0).abs() < 1e-12);

        let ray = Ray::new(Vec3::ZERO, -Vec3::Z);
        let rec = moved.hit(&ray, Interval::from_min(0.001)).unwrap();
        assert!((rec.t - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_uv_poles_and_equator() {
        assert_eq!(Sphere::sphere_uv(-Vec3::Y).1, 0.0);
        assert_eq!(Sphere::sphere_uv(Vec3::Y).1, 1.0);
        let (u, v) = Sphere::sphere_uv(Vec3::X);
        assert!((u - 0.5).abs() < 1e-12);
        assert!((v - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_bounding_box() {
        let sphere = Sphere::new(Vec3::new(1.0, 2.0, 3.0), 0.5, Material::default());
        let bbox = sphere.bounding_box();
        assert_eq!(bbox.min_point(), Vec3::new(0.5, 1.5, 2.5));
        assert_eq!(bbox.max_point(), Vec3::new(1.5, 2.5, 3.5));
    }
}
