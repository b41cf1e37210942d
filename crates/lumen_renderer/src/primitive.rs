//! Closed set of scene primitives.

use crate::{HitRecord, Hittable, Material, NurbsSurface, Plane, Sphere, Triangle};
use lumen_math::{Aabb, Interval, Mat4, Ray};
use serde::{Deserialize, Serialize};

/// Any object a scene can hold.
///
/// Serialized with an internal `"type"` tag, e.g.
/// `{"type": "sphere", "center": [0, 0, -1], "radius": 0.5}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Primitive {
    Sphere(Sphere),
    Plane(Plane),
    Triangle(Triangle),
    Nurbs(NurbsSurface),
}

macro_rules! impl_primitive_from {
    ($($variant:ident),*) => {
        $(
            impl From<$variant> for Primitive {
                fn from(value: $variant) -> Self {
                    Primitive::$variant(value)
                }
            }
        )*
    };
}

impl_primitive_from!(Sphere, Plane, Triangle);

impl From<NurbsSurface> for Primitive {
    fn from(value: NurbsSurface) -> Self {
        Primitive::Nurbs(value)
    }
}

impl Primitive {
    /// Nearest hit with `t_min <= t <= t_max`.
    pub fn intersect(&self, ray: &Ray, t_min: f64, t_max: f64) -> Option<HitRecord<'_>> {
        self.hit(ray, Interval::new(t_min, t_max))
    }

    pub fn material(&self) -> &Material {
        match self {
            Primitive::Sphere(s) => &s.material,
            Primitive::Plane(p) => p.material(),
            Primitive::Triangle(t) => &t.material,
            Primitive::Nurbs(n) => n.material(),
        }
    }

    /// Copy of this primitive placed under an affine `transform`.
    pub fn transformed(&self, transform: &Mat4) -> Self {
        match self {
            Primitive::Sphere(s) => s.transformed(transform).into(),
            Primitive::Plane(p) => p.transformed(transform).into(),
            Primitive::Triangle(t) => t.transformed(transform).into(),
            Primitive::Nurbs(n) => n.transformed(transform).into(),
        }
    }
}

impl Hittable for Primitive {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        match self {
            Primitive::Sphere(s) => s.hit(ray, ray_t),
            Primitive::Plane(p) => p.hit(ray, ray_t),
            Primitive::Triangle(t) => t.hit(ray, ray_t),
            Primitive::Nurbs(n) => n.hit(ray, ray_t),
        }
    }

    fn bounding_box(&self) -> Aabb {
        match self {
            Primitive::Sphere(s) => s.bounding_box(),
            Primitive::Plane(p) => p.bounding_box(),
            Primitive::Triangle(t) => t.bounding_box(),
            Primitive::Nurbs(n) => n.bounding_box(),
        }
    }
}
