//! Scene container: objects, lights and the background color.

use crate::{HitRecord, Hittable, Light, Primitive};
use lumen_math::{Aabb, Color, Interval, Ray, Vec3};
use serde::{Deserialize, Serialize};

/// Objects are intersected by linear scan in insertion order; no
/// acceleration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scene {
    #[serde(default)]
    objects: Vec<Primitive>,
    #[serde(default)]
    lights: Vec<Light>,
    #[serde(default)]
    background: Color,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(Color::BLACK)
    }
}

impl Scene {
    pub fn new(background: Color) -> Self {
        Self {
            objects: Vec::new(),
            lights: Vec::new(),
            background,
        }
    }

    pub fn add(&mut self, object: impl Into<Primitive>) {
        self.objects.push(object.into());
    }

    pub fn add_light(&mut self, light: Light) {
        self.lights.push(light);
    }

    pub fn set_background(&mut self, background: Color) {
        self.background = background;
    }

    pub fn objects(&self) -> &[Primitive] {
        &self.objects
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    pub fn background(&self) -> Color {
        self.background
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Nearest hit over all objects with `t_min <= t <= t_max`.
    pub fn intersect(&self, ray: &Ray, t_min: f64, t_max: f64) -> Option<HitRecord<'_>> {
        self.hit(ray, Interval::new(t_min, t_max))
    }

    /// Whether anything lies strictly between `point` and `target`, leaving
    /// `epsilon` of slack at both ends.
    pub fn is_occluded(&self, point: Vec3, target: Vec3, epsilon: f64) -> bool {
        let distance = (target - point).length();
        let ray = Ray::between(point, target);
        self.intersect(&ray, epsilon, distance - epsilon).is_some()
    }
}

impl Hittable for Scene {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        let mut closest = None;
        let mut range = ray_t;
        for object in &self.objects {
            if let Some(rec) = object.hit(ray, range) {
                range = range.with_max(rec.t);
                closest = Some(rec);
            }
        }
        closest
    }

    fn bounding_box(&self) -> Aabb {
        self.objects.iter().fold(Aabb::EMPTY, |acc, object| {
            Aabb::surrounding(&acc, &object.bounding_box())
        })
    }
}
