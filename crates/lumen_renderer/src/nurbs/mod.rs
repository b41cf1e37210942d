//! Rational B-spline (NURBS) surface patches.
//!
//! A surface is a rectangular grid of weighted control points with one knot
//! vector and degree per parameter direction. Points are evaluated with the
//! rational sum `sum(N_i(u) N_j(v) w_ij P_ij) / sum(N_i(u) N_j(v) w_ij)` and
//! normals come from finite differences of that evaluation.
//!
//! Ray intersection has three strategies (see [`NurbsStrategy`]). The default
//! tessellates the patch once at construction into a fixed triangle mesh and
//! intersects that.

mod basis;
mod intersect;

pub use basis::{clamped_uniform_knots, compute_basis_functions, find_knot_span};

use crate::{Material, Triangle};
use lumen_math::{Aabb, Mat4, Vec3};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Segments per parameter direction in the tessellated mesh.
pub const TESSELLATION_SEGMENTS: usize = 15;

/// Parameter step for finite-difference derivatives.
const DERIVATIVE_STEP: f64 = 1e-6;

/// Weight sums below this evaluate to the origin.
const WEIGHT_EPSILON: f64 = 1e-10;

/// Cross products shorter than this have no usable normal.
const NORMAL_EPSILON: f64 = 1e-12;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum NurbsError {
    #[error("control point grid is empty")]
    EmptyGrid,

    #[error("control point row {row} has {actual} points, expected {expected}")]
    RaggedGrid {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error(
        "{axis} knot vector has {actual} knots, expected {expected} \
         ({points} control points, degree {degree})"
    )]
    KnotCount {
        axis: &'static str,
        expected: usize,
        actual: usize,
        points: usize,
        degree: usize,
    },

    #[error("{axis} degree {degree} needs more than {points} control points")]
    DegreeTooHigh {
        axis: &'static str,
        degree: usize,
        points: usize,
    },

    #[error("{axis} knot vector decreases at index {index}")]
    DecreasingKnots { axis: &'static str, index: usize },

    #[error("{axis} knot vector contains a non-finite value at index {index}")]
    NonFiniteKnot { axis: &'static str, index: usize },

    #[error("control point ({u}, {v}) has non-positive weight {weight}")]
    InvalidWeight { u: usize, v: usize, weight: f64 },
}

/// Control point position with its rational weight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlPoint {
    pub position: Vec3,
    #[serde(default = "unit_weight")]
    pub weight: f64,
}

fn unit_weight() -> f64 {
    1.0
}

impl ControlPoint {
    pub fn new(position: Vec3, weight: f64) -> Self {
        Self { position, weight }
    }
}

impl From<Vec3> for ControlPoint {
    fn from(position: Vec3) -> Self {
        Self::new(position, 1.0)
    }
}

/// How rays are intersected with a [`NurbsSurface`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NurbsStrategy {
    /// Precomputed triangle mesh, intersected with Möller-Trumbore.
    #[default]
    Tessellation,
    /// Newton-Raphson on `S(u, v) = O + tD`, seeded by a sampling search.
    Newton,
    /// Nearest point of a uniform parameter grid, accepted within a
    /// distance threshold.
    Sampling,
}

/// Raw patch description: what a scene file stores for a NURBS surface.
///
/// `control_points[i][j]` is indexed `i` along u and `j` along v.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NurbsPatch {
    pub control_points: Vec<Vec<ControlPoint>>,
    pub u_knots: Vec<f64>,
    pub v_knots: Vec<f64>,
    pub u_degree: usize,
    pub v_degree: usize,
    #[serde(default)]
    pub material: Material,
    #[serde(default)]
    pub strategy: NurbsStrategy,
}

impl NurbsPatch {
    /// Check grid shape, knot vector lengths and ordering, and weights.
    pub fn validate(&self) -> Result<(), NurbsError> {
        let u_count = self.control_points.len();
        let v_count = self.control_points.first().map_or(0, Vec::len);
        if u_count == 0 || v_count == 0 {
            return Err(NurbsError::EmptyGrid);
        }

        for (row, points) in self.control_points.iter().enumerate() {
            if points.len() != v_count {
                return Err(NurbsError::RaggedGrid {
                    row,
                    expected: v_count,
                    actual: points.len(),
                });
            }
        }

        validate_knots("u", &self.u_knots, u_count, self.u_degree)?;
        validate_knots("v", &self.v_knots, v_count, self.v_degree)?;

        for (u, points) in self.control_points.iter().enumerate() {
            for (v, point) in points.iter().enumerate() {
                if point.weight.is_nan() || point.weight <= 0.0 {
                    return Err(NurbsError::InvalidWeight {
                        u,
                        v,
                        weight: point.weight,
                    });
                }
            }
        }

        Ok(())
    }
}

fn validate_knots(
    axis: &'static str,
    knots: &[f64],
    points: usize,
    degree: usize,
) -> Result<(), NurbsError> {
    if degree >= points {
        return Err(NurbsError::DegreeTooHigh {
            axis,
            degree,
            points,
        });
    }
    let expected = points + degree + 1;
    if knots.len() != expected {
        return Err(NurbsError::KnotCount {
            axis,
            expected,
            actual: knots.len(),
            points,
            degree,
        });
    }
    if let Some(index) = knots.iter().position(|k| !k.is_finite()) {
        return Err(NurbsError::NonFiniteKnot { axis, index });
    }
    if let Some(index) = (1..knots.len()).find(|&i| knots[i] < knots[i - 1]) {
        return Err(NurbsError::DecreasingKnots { axis, index });
    }
    Ok(())
}

/// A validated NURBS patch with its bounding box and tessellated mesh.
///
/// Serializes as its [`NurbsPatch`]; deserializing validates again and
/// rebuilds the mesh, which is a pure function of the patch.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "NurbsPatch", into = "NurbsPatch")]
pub struct NurbsSurface {
    patch: NurbsPatch,
    bbox: Aabb,
    mesh: Vec<Triangle>,
}

impl NurbsSurface {
    /// Build a surface using the default intersection strategy.
    pub fn new(
        control_points: Vec<Vec<ControlPoint>>,
        u_knots: Vec<f64>,
        v_knots: Vec<f64>,
        u_degree: usize,
        v_degree: usize,
        material: Material,
    ) -> Result<Self, NurbsError> {
        Self::from_patch(NurbsPatch {
            control_points,
            u_knots,
            v_knots,
            u_degree,
            v_degree,
            material,
            strategy: NurbsStrategy::default(),
        })
    }

    pub fn from_patch(patch: NurbsPatch) -> Result<Self, NurbsError> {
        patch.validate()?;
        Ok(Self::assemble(patch))
    }

    /// Bounding box and mesh for an already validated patch.
    fn assemble(patch: NurbsPatch) -> Self {
        let mut surface = Self {
            bbox: Aabb::enclosing(patch.control_points.iter().flatten().map(|cp| cp.position)),
            patch,
            mesh: Vec::new(),
        };
        surface.mesh = surface.tessellate();
        log::trace!(
            "NURBS patch {}x{} (degree {}x{}) tessellated into {} triangles",
            surface.u_count(),
            surface.v_count(),
            surface.patch.u_degree,
            surface.patch.v_degree,
            surface.mesh.len()
        );
        surface
    }

    pub fn with_strategy(mut self, strategy: NurbsStrategy) -> Self {
        self.patch.strategy = strategy;
        self
    }

    pub fn strategy(&self) -> NurbsStrategy {
        self.patch.strategy
    }

    pub fn material(&self) -> &Material {
        &self.patch.material
    }

    pub fn patch(&self) -> &NurbsPatch {
        &self.patch
    }

    /// Control points along u.
    pub fn u_count(&self) -> usize {
        self.patch.control_points.len()
    }

    /// Control points along v.
    pub fn v_count(&self) -> usize {
        self.patch.control_points[0].len()
    }

    /// The tessellated mesh, `2 * TESSELLATION_SEGMENTS^2` triangles.
    pub fn mesh(&self) -> &[Triangle] {
        &self.mesh
    }

    pub(crate) fn bbox(&self) -> &Aabb {
        &self.bbox
    }

    /// Surface point at `(u, v)`. Both parameters are clamped to `[0, 1]`.
    pub fn evaluate_point(&self, u: f64, v: f64) -> Vec3 {
        let patch = &self.patch;
        let u = u.clamp(0.0, 1.0);
        let v = v.clamp(0.0, 1.0);

        let u_span = find_knot_span(&patch.u_knots, self.u_count(), patch.u_degree, u);
        let v_span = find_knot_span(&patch.v_knots, self.v_count(), patch.v_degree, v);
        let u_basis = compute_basis_functions(&patch.u_knots, u_span, patch.u_degree, u);
        let v_basis = compute_basis_functions(&patch.v_knots, v_span, patch.v_degree, v);

        let mut numerator = Vec3::ZERO;
        let mut denominator = 0.0;
        for (i, nu) in u_basis.iter().enumerate() {
            let row = &patch.control_points[u_span - patch.u_degree + i];
            for (j, nv) in v_basis.iter().enumerate() {
                let cp = &row[v_span - patch.v_degree + j];
                let w = nu * nv * cp.weight;
                numerator += cp.position * w;
                denominator += w;
            }
        }

        if denominator.abs() < WEIGHT_EPSILON {
            return Vec3::ZERO;
        }
        numerator / denominator
    }

    /// Finite-difference partial derivatives `(dS/du, dS/dv)`.
    ///
    /// Central differences in the interior, one-sided within
    /// `DERIVATIVE_STEP` of a parameter boundary.
    pub fn partial_derivatives(&self, u: f64, v: f64) -> (Vec3, Vec3) {
        let u = u.clamp(0.0, 1.0);
        let v = v.clamp(0.0, 1.0);
        let du = difference(u, |s| self.evaluate_point(s, v));
        let dv = difference(v, |s| self.evaluate_point(u, s));
        (du, dv)
    }

    /// Unit surface normal `dS/du x dS/dv`, or `+Y` where the derivatives
    /// are degenerate.
    pub fn compute_normal(&self, u: f64, v: f64) -> Vec3 {
        let (du, dv) = self.partial_derivatives(u, v);
        let n = du.cross(dv);
        let length = n.length();
        if length.is_nan() || length <= NORMAL_EPSILON {
            return Vec3::Y;
        }
        n / length
    }

    /// Place the patch under `transform` by moving its control points.
    ///
    /// Affine maps commute with the rational sum, so this is exact.
    pub fn transformed(&self, transform: &Mat4) -> Self {
        let mut patch = self.patch.clone();
        for cp in patch.control_points.iter_mut().flatten() {
            cp.position = transform.transform_point3(cp.position);
        }
        Self::assemble(patch)
    }

    /// Sample the patch on a `(SEGMENTS + 1)^2` grid and split every cell
    /// into two triangles, `(p00, p10, p11)` and `(p00, p11, p01)`.
    fn tessellate(&self) -> Vec<Triangle> {
        let n = TESSELLATION_SEGMENTS;
        let step = 1.0 / n as f64;
        let grid: Vec<Vec<Vec3>> = (0..=n)
            .map(|i| {
                (0..=n)
                    .map(|j| self.evaluate_point(i as f64 * step, j as f64 * step))
                    .collect()
            })
            .collect();

        let material = self.patch.material;
        let mut mesh = Vec::with_capacity(2 * n * n);
        for i in 0..n {
            for j in 0..n {
                let p00 = grid[i][j];
                let p10 = grid[i + 1][j];
                let p11 = grid[i + 1][j + 1];
                let p01 = grid[i][j + 1];
                mesh.push(Triangle::new(p00, p10, p11, material));
                mesh.push(Triangle::new(p00, p11, p01, material));
            }
        }
        mesh
    }

    /// Patch parameters of a point on mesh triangle `index` with
    /// barycentric coordinates `(b1, b2)`.
    pub(crate) fn mesh_parameters(&self, index: usize, b1: f64, b2: f64) -> (f64, f64) {
        let n = TESSELLATION_SEGMENTS;
        let cell = index / 2;
        let (i, j) = ((cell / n) as f64, (cell % n) as f64);
        let corners = if index % 2 == 0 {
            [(i, j), (i + 1.0, j), (i + 1.0, j + 1.0)]
        } else {
            [(i, j), (i + 1.0, j + 1.0), (i, j + 1.0)]
        };
        let b0 = 1.0 - b1 - b2;
        let u = b0 * corners[0].0 + b1 * corners[1].0 + b2 * corners[2].0;
        let v = b0 * corners[0].1 + b1 * corners[1].1 + b2 * corners[2].1;
        (u / n as f64, v / n as f64)
    }
}

/// Derivative of `f` at `s` on `[0, 1]`.
fn difference(s: f64, f: impl Fn(f64) -> Vec3) -> Vec3 {
    let h = DERIVATIVE_STEP;
    if s - h >= 0.0 && s + h <= 1.0 {
        (f(s + h) - f(s - h)) / (2.0 * h)
    } else if s + h <= 1.0 {
        (f(s + h) - f(s)) / h
    } else {
        (f(s) - f(s - h)) / h
    }
}

impl TryFrom<NurbsPatch> for NurbsSurface {
    type Error = NurbsError;

    fn try_from(patch: NurbsPatch) -> Result<Self, Self::Error> {
        Self::from_patch(patch)
    }
}

impl From<NurbsSurface> for NurbsPatch {
    fn from(surface: NurbsSurface) -> Self {
        surface.patch
    }
}
