//! B-spline basis evaluation over a knot vector.

/// Knot span containing `t`.
///
/// Returns `i` with `knots[i] <= t < knots[i + 1]`, restricted to
/// `degree..=count - 1` so the `degree + 1` control points touched by the
/// span always exist. `t` at or past the end of the domain maps to the last
/// span.
pub fn find_knot_span(knots: &[f64], count: usize, degree: usize, t: f64) -> usize {
    let last = count - 1;
    if t >= knots[last + 1] {
        return last;
    }
    if t <= knots[degree] {
        return degree;
    }

    let mut low = degree;
    let mut high = last + 1;
    let mut mid = (low + high) / 2;
    while t < knots[mid] || t >= knots[mid + 1] {
        if t < knots[mid] {
            high = mid;
        } else {
            low = mid;
        }
        mid = (low + high) / 2;
    }
    mid
}

/// The `degree + 1` basis functions that are non-zero on `span`, evaluated
/// at `t` with the Cox-de Boor recurrence.
///
/// Element `k` is `N[span - degree + k, degree](t)`. Zero-length knot
/// intervals contribute zero instead of dividing by zero.
pub fn compute_basis_functions(knots: &[f64], span: usize, degree: usize, t: f64) -> Vec<f64> {
    let mut basis = vec![0.0; degree + 1];
    let mut left = vec![0.0; degree + 1];
    let mut right = vec![0.0; degree + 1];
    basis[0] = 1.0;

    for j in 1..=degree {
        left[j] = t - knots[span + 1 - j];
        right[j] = knots[span + j] - t;

        let mut saved = 0.0;
        for r in 0..j {
            let denom = right[r + 1] + left[j - r];
            let temp = if denom == 0.0 { 0.0 } else { basis[r] / denom };
            basis[r] = saved + right[r + 1] * temp;
            saved = left[j - r] * temp;
        }
        basis[j] = saved;
    }

    basis
}

/// Clamped knot vector with uniformly spaced interior knots on `[0, 1]`.
///
/// `count` must exceed `degree`.
pub fn clamped_uniform_knots(count: usize, degree: usize) -> Vec<f64> {
    let interior = count - degree;
    let mut knots = vec![0.0; degree + 1];
    knots.extend((1..interior).map(|i| i as f64 / interior as f64));
    knots.extend(std::iter::repeat(1.0).take(degree + 1));
    knots
}
