//! Ray intersection strategies for NURBS surfaces.

use super::{NurbsStrategy, NurbsSurface};
use crate::{HitRecord, Hittable};
use lumen_math::{Aabb, Interval, Ray, Vec3};

const NEWTON_MAX_ITERATIONS: usize = 20;
const NEWTON_TOLERANCE: f64 = 1e-6;
/// Jacobians with a smaller determinant are treated as singular.
const JACOBIAN_EPSILON: f64 = 1e-12;

/// Grid points per parameter direction for the sampling search, minus one.
const SAMPLING_RESOLUTION: usize = 32;

/// Surface sample closest to a ray.
#[derive(Debug, Clone, Copy)]
struct Sample {
    u: f64,
    v: f64,
    t: f64,
    distance: f64,
}

/// Determinant of the 3x3 matrix with columns `a`, `b`, `c`.
#[inline]
fn det3(a: Vec3, b: Vec3, c: Vec3) -> f64 {
    a.dot(b.cross(c))
}

impl NurbsSurface {
    /// Nearest hit on the tessellated mesh, reported in patch parameters.
    fn hit_mesh(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        let mut closest = None;
        let mut range = ray_t;
        for (index, triangle) in self.mesh().iter().enumerate() {
            if let Some(rec) = triangle.hit(ray, range) {
                range = range.with_max(rec.t);
                closest = Some((index, rec));
            }
        }

        let (index, mut rec) = closest?;
        (rec.u, rec.v) = self.mesh_parameters(index, rec.u, rec.v);
        rec.material = self.material();
        Some(rec)
    }

    /// Grid sample whose point lies closest to the ray, among samples whose
    /// projection onto the ray falls inside `ray_t`.
    fn closest_sample(&self, ray: &Ray, ray_t: Interval) -> Option<Sample> {
        let n = SAMPLING_RESOLUTION as f64;
        let mut best: Option<Sample> = None;

        for i in 0..=SAMPLING_RESOLUTION {
            let u = i as f64 / n;
            for j in 0..=SAMPLING_RESOLUTION {
                let v = j as f64 / n;
                let point = self.evaluate_point(u, v);
                let t = (point - ray.origin).dot(ray.direction);
                if !ray_t.contains(t) {
                    continue;
                }
                let distance = (point - ray.at(t)).length();
                if best.map_or(true, |b| distance < b.distance) {
                    best = Some(Sample { u, v, t, distance });
                }
            }
        }
        best
    }

    /// Samples farther than this from the ray do not count as hits: one grid
    /// step measured along the bounding box diagonal.
    fn sampling_threshold(&self) -> f64 {
        let bbox = self.bbox();
        (bbox.max_point() - bbox.min_point()).length() / SAMPLING_RESOLUTION as f64
    }

    fn hit_sampling(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        let sample = self.closest_sample(ray, ray_t)?;
        if sample.distance > self.sampling_threshold() {
            return None;
        }
        Some(self.record(ray, sample.t, sample.u, sample.v))
    }

    /// Solve `S(u, v) - (O + tD) = 0` for `(u, v, t)` by Newton-Raphson.
    ///
    /// The Jacobian has columns `dS/du`, `dS/dv` and `-D`; each step solves
    /// the 3x3 system with Cramer's rule. Parameters stay clamped to the
    /// patch.
    fn hit_newton(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        let seed = self.closest_sample(ray, ray_t)?;
        let (mut u, mut v, mut t) = (seed.u, seed.v, seed.t);
        let neg_d = -ray.direction;

        for iteration in 0..=NEWTON_MAX_ITERATIONS {
            let residual = self.evaluate_point(u, v) - ray.at(t);
            if residual.length() < NEWTON_TOLERANCE {
                return ray_t.contains(t).then(|| self.record(ray, t, u, v));
            }
            if iteration == NEWTON_MAX_ITERATIONS {
                break;
            }

            let (su, sv) = self.partial_derivatives(u, v);
            let det = det3(su, sv, neg_d);
            if det.abs() < JACOBIAN_EPSILON {
                return None;
            }

            let rhs = -residual;
            u = (u + det3(rhs, sv, neg_d) / det).clamp(0.0, 1.0);
            v = (v + det3(su, rhs, neg_d) / det).clamp(0.0, 1.0);
            t += det3(su, sv, rhs) / det;
        }

        None
    }

    fn record(&self, ray: &Ray, t: f64, u: f64, v: f64) -> HitRecord<'_> {
        HitRecord::new(ray, t, self.compute_normal(u, v), self.material(), (u, v))
    }
}

impl Hittable for NurbsSurface {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        if !self.bbox().hit(ray, ray_t) {
            return None;
        }
        match self.strategy() {
            NurbsStrategy::Tessellation => self.hit_mesh(ray, ray_t),
            NurbsStrategy::Newton => self.hit_newton(ray, ray_t),
            NurbsStrategy::Sampling => self.hit_sampling(ray, ray_t),
        }
    }

    fn bounding_box(&self) -> Aabb {
        *self.bbox()
    }
}
