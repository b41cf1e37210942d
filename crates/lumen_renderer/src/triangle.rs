//! Triangle primitive.
//!
//! Uses the Möller-Trumbore algorithm for ray-triangle intersection.

use crate::{HitRecord, Hittable, Material};
use lumen_math::{Aabb, Interval, Mat4, Ray, Vec3, Vec3Ext};
use serde::{Deserialize, Serialize};

/// Determinants below this mean the ray is parallel to the triangle.
const DETERMINANT_EPSILON: f64 = 1e-8;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Triangle {
    pub v0: Vec3,
    pub v1: Vec3,
    pub v2: Vec3,
    #[serde(default)]
    pub material: Material,
}

impl Triangle {
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3, material: Material) -> Self {
        Self {
            v0,
            v1,
            v2,
            material,
        }
    }

    /// Geometric normal `(v1 - v0) x (v2 - v0)`, unit length (zero if degenerate).
    pub fn normal(&self) -> Vec3 {
        (self.v1 - self.v0).cross(self.v2 - self.v0).safe_normalize()
    }

    pub fn transformed(&self, transform: &Mat4) -> Self {
        Self::new(
            transform.transform_point3(self.v0),
            transform.transform_point3(self.v1),
            transform.transform_point3(self.v2),
            self.material,
        )
    }
}

impl Hittable for Triangle {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        let edge1 = self.v1 - self.v0;
        let edge2 = self.v2 - self.v0;

        let h = ray.direction.cross(edge2);
        let det = edge1.dot(h);
        if det.abs() < DETERMINANT_EPSILON {
            return None;
        }

        let f = 1.0 / det;
        let s = ray.origin - self.v0;
        let u = f * s.dot(h);
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let q = s.cross(edge1);
        let v = f * ray.direction.dot(q);
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = f * edge2.dot(q);
        if !ray_t.contains(t) {
            return None;
        }

        Some(HitRecord::new(ray, t, self.normal(), &self.material, (u, v)))
    }

    fn bounding_box(&self) -> Aabb {
        Aabb::enclosing([self.v0, self.v1, self.v2])
    }
}
