//! Hittable trait and HitRecord for ray-object intersection.

use crate::Material;
use lumen_math::{Aabb, Interval, Ray, Vec3};

/// Record of a ray-surface intersection.
#[derive(Debug, Clone, Copy)]
pub struct HitRecord<'a> {
    /// Ray parameter of the hit
    pub t: f64,
    pub point: Vec3,
    /// Unit normal, always facing against the incoming ray
    pub normal: Vec3,
    pub material: &'a Material,
    /// Whether the ray arrived on the side the outward normal points to
    pub front_face: bool,
    /// Surface parameters (barycentric for triangles, patch `(u, v)` for NURBS)
    pub u: f64,
    pub v: f64,
}

impl<'a> HitRecord<'a> {
    /// Build a record at `ray.at(t)`, orienting `outward_normal` against the ray.
    pub fn new(
        ray: &Ray,
        t: f64,
        outward_normal: Vec3,
        material: &'a Material,
        (u, v): (f64, f64),
    ) -> Self {
        let mut rec = Self {
            t,
            point: ray.at(t),
            normal: outward_normal,
            material,
            front_face: true,
            u,
            v,
        };
        rec.set_face_normal(ray, outward_normal);
        rec
    }

    /// Store `outward_normal` flipped to face the ray if needed.
    pub fn set_face_normal(&mut self, ray: &Ray, outward_normal: Vec3) {
        self.front_face = ray.direction.dot(outward_normal) < 0.0;
        self.normal = if self.front_face {
            outward_normal
        } else {
            -outward_normal
        };
    }
}

/// Anything a ray can be intersected with.
pub trait Hittable: Send + Sync {
    /// Nearest intersection with parameter inside `ray_t` (bounds inclusive).
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>>;

    fn bounding_box(&self) -> Aabb;
}
