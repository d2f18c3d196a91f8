//! Second-order minimization of smooth convex objectives.
//!
//! [`minimize`] runs damped Newton iterations: the Newton direction is solved with a Cholesky
//! factorization (adding diagonal jitter when the Hessian is close to singular), then scaled
//! back until the Armijo condition holds. Each accepted step strictly lowers the objective, so
//! the returned point is always the best one visited.

/// A twice-differentiable objective over `dim()` parameters.
pub trait Objective {
    fn dim(&self) -> usize;

    fn value(&self, point: &[f64]) -> f64;

    /// Write the gradient at `point` into `grad` (length `dim()`).
    fn gradient(&self, point: &[f64], grad: &mut [f64]);

    /// Write the row-major Hessian at `point` into `hess` (length `dim()^2`).
    fn hessian(&self, point: &[f64], hess: &mut [f64]);
}

/// Stopping rules for [`minimize`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinimizeOptions {
    /// Stop once an iteration lowers the objective by less than this fraction.
    pub tolerance: f64,
    pub max_iterations: usize,
}

impl Default for MinimizeOptions {
    fn default() -> Self {
        Self {
            tolerance: 1e-4,
            max_iterations: 100,
        }
    }
}

/// Result of a minimization run.
#[derive(Debug, Clone, PartialEq)]
pub struct Minimum {
    pub point: Vec<f64>,
    pub value: f64,
    pub iterations: usize,
    /// False when the iteration cap or a stalled line search ended the run.
    pub converged: bool,
}

const ARMIJO_SLOPE: f64 = 1e-4;
const MAX_BACKTRACKS: usize = 40;
const GRADIENT_FLOOR: f64 = 1e-12;
const MAX_JITTER_ATTEMPTS: usize = 8;

/// Minimize `objective` starting from `initial`.
pub fn minimize<O: Objective + ?Sized>(
    objective: &O,
    initial: Vec<f64>,
    options: &MinimizeOptions,
) -> Minimum {
    let n = objective.dim();
    debug_assert_eq!(initial.len(), n);
    let mut point = initial;
    let mut value = objective.value(&point);
    let mut grad = vec![0.0f64; n];
    let mut hess = vec![0.0f64; n * n];
    let mut iterations = 0usize;
    let mut converged = false;

    while iterations < options.max_iterations {
        objective.gradient(&point, &mut grad);
        if max_abs(&grad) <= GRADIENT_FLOOR {
            converged = true;
            break;
        }
        objective.hessian(&point, &mut hess);
        let mut direction = newton_direction(&hess, &grad, n)
            .unwrap_or_else(|| grad.iter().map(|g| -g).collect());
        let mut slope = dot(&grad, &direction);
        if !slope.is_finite() || slope >= 0.0 {
            direction = grad.iter().map(|g| -g).collect();
            slope = -dot(&grad, &grad);
        }

        let Some((candidate, candidate_value)) =
            backtrack(objective, &point, value, &direction, slope)
        else {
            tracing::debug!(iterations, value, "Line search stalled");
            break;
        };

        iterations += 1;
        let decrease = value - candidate_value;
        let scale = value.abs().max(candidate_value.abs()).max(1.0);
        point = candidate;
        value = candidate_value;
        tracing::trace!(iteration = iterations, value, decrease, "Newton step");
        if decrease <= options.tolerance * scale {
            converged = true;
            break;
        }
    }

    Minimum {
        point,
        value,
        iterations,
        converged,
    }
}

fn backtrack<O: Objective + ?Sized>(
    objective: &O,
    point: &[f64],
    value: f64,
    direction: &[f64],
    slope: f64,
) -> Option<(Vec<f64>, f64)> {
    let mut step = 1.0f64;
    for _ in 0..MAX_BACKTRACKS {
        let candidate: Vec<f64> = point
            .iter()
            .zip(direction)
            .map(|(x, d)| x + step * d)
            .collect();
        let candidate_value = objective.value(&candidate);
        if candidate_value.is_finite() && candidate_value <= value + ARMIJO_SLOPE * step * slope {
            return Some((candidate, candidate_value));
        }
        step *= 0.5;
    }
    None
}

/// Solve `hess * d = -grad`, regularizing the diagonal until the factorization succeeds.
fn newton_direction(hess: &[f64], grad: &[f64], n: usize) -> Option<Vec<f64>> {
    let diag_scale = (0..n)
        .map(|i| hess[i * n + i].abs())
        .fold(0.0f64, f64::max)
        .max(1.0);
    let mut jitter = 0.0f64;
    for _ in 0..MAX_JITTER_ATTEMPTS {
        if let Some(factor) = cholesky(hess, n, jitter) {
            let rhs: Vec<f64> = grad.iter().map(|g| -g).collect();
            let solution = cholesky_solve(&factor, n, &rhs);
            if solution.iter().all(|v| v.is_finite()) {
                return Some(solution);
            }
        }
        jitter = if jitter == 0.0 {
            diag_scale * 1e-10
        } else {
            jitter * 100.0
        };
    }
    None
}

/// Lower-triangular factor of `a + jitter * I`, or `None` if it is not positive definite.
fn cholesky(a: &[f64], n: usize, jitter: f64) -> Option<Vec<f64>> {
    let mut l = vec![0.0f64; n * n];
    for i in 0..n {
        for j in 0..=i {
            let mut sum = a[i * n + j];
            if i == j {
                sum += jitter;
            }
            for k in 0..j {
                sum -= l[i * n + k] * l[j * n + k];
            }
            if i == j {
                if sum <= 0.0 || !sum.is_finite() {
                    return None;
                }
                l[i * n + i] = sum.sqrt();
            } else {
                l[i * n + j] = sum / l[j * n + j];
            }
        }
    }
    Some(l)
}

fn cholesky_solve(l: &[f64], n: usize, rhs: &[f64]) -> Vec<f64> {
    let mut y = vec![0.0f64; n];
    for i in 0..n {
        let mut sum = rhs[i];
        for k in 0..i {
            sum -= l[i * n + k] * y[k];
        }
        y[i] = sum / l[i * n + i];
    }
    let mut x = vec![0.0f64; n];
    for i in (0..n).rev() {
        let mut sum = y[i];
        for k in (i + 1)..n {
            sum -= l[k * n + i] * x[k];
        }
        x[i] = sum / l[i * n + i];
    }
    x
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

fn max_abs(values: &[f64]) -> f64 {
    values.iter().fold(0.0f64, |acc, v| acc.max(v.abs()))
}
