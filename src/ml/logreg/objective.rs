use crate::ml::optim::Objective;

use super::sigmoid;

/// L2-penalized negative log-likelihood of a binary logistic model.
///
/// Parameters are laid out as `[w_0, .., w_{d-1}, b]`; the bias is not penalized.
pub(super) struct BinaryLogLoss<'a> {
    rows: &'a [&'a [f64]],
    targets: &'a [f64],
    feature_dim: usize,
    lambda: f64,
}

impl<'a> BinaryLogLoss<'a> {
    pub(super) fn new(
        rows: &'a [&'a [f64]],
        targets: &'a [f64],
        feature_dim: usize,
        lambda: f64,
    ) -> Self {
        Self {
            rows,
            targets,
            feature_dim,
            lambda,
        }
    }

    fn score(&self, point: &[f64], row: &[f64]) -> f64 {
        let d = self.feature_dim;
        row.iter()
            .zip(&point[..d])
            .map(|(x, w)| x * w)
            .sum::<f64>()
            + point[d]
    }
}

impl Objective for BinaryLogLoss<'_> {
    fn dim(&self) -> usize {
        self.feature_dim + 1
    }

    fn value(&self, point: &[f64]) -> f64 {
        let d = self.feature_dim;
        let mut loss = 0.0f64;
        for (row, &y) in self.rows.iter().zip(self.targets) {
            let z = self.score(point, row);
            loss += softplus(z) - y * z;
        }
        let penalty: f64 = point[..d].iter().map(|w| w * w).sum();
        loss + self.lambda * penalty
    }

    fn gradient(&self, point: &[f64], grad: &mut [f64]) {
        let d = self.feature_dim;
        grad.fill(0.0);
        for (row, &y) in self.rows.iter().zip(self.targets) {
            let residual = sigmoid(self.score(point, row)) - y;
            for (g, x) in grad[..d].iter_mut().zip(row.iter()) {
                *g += residual * x;
            }
            grad[d] += residual;
        }
        for (g, w) in grad[..d].iter_mut().zip(&point[..d]) {
            *g += 2.0 * self.lambda * w;
        }
    }

    fn hessian(&self, point: &[f64], hess: &mut [f64]) {
        let d = self.feature_dim;
        let n = d + 1;
        hess.fill(0.0);
        for row in self.rows {
            let p = sigmoid(self.score(point, row));
            let s = p * (1.0 - p);
            if s == 0.0 {
                continue;
            }
            for i in 0..n {
                let xi = if i < d { row[i] } else { 1.0 };
                for j in 0..=i {
                    let xj = if j < d { row[j] } else { 1.0 };
                    hess[i * n + j] += s * xi * xj;
                }
            }
        }
        for i in 0..n {
            for j in 0..i {
                hess[j * n + i] = hess[i * n + j];
            }
        }
        for i in 0..d {
            hess[i * n + i] += 2.0 * self.lambda;
        }
    }
}

/// `ln(1 + e^z)` without overflow.
fn softplus(z: f64) -> f64 {
    if z > 0.0 {
        z + (-z).exp().ln_1p()
    } else {
        z.exp().ln_1p()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> (Vec<Vec<f64>>, Vec<f64>) {
        (
            vec![vec![0.5, -1.0], vec![1.5, 2.0], vec![-0.3, 0.1]],
            vec![0.0, 1.0, 1.0],
        )
    }

    #[test]
    fn gradient_matches_finite_differences() {
        let (data, targets) = fixture();
        let rows: Vec<&[f64]> = data.iter().map(|row| row.as_slice()).collect();
        let loss = BinaryLogLoss::new(&rows, &targets, 2, 0.3);
        let point = [0.2, -0.4, 0.1];
        let mut grad = [0.0; 3];
        loss.gradient(&point, &mut grad);
        let h = 1e-6;
        for i in 0..3 {
            let mut up = point;
            let mut down = point;
            up[i] += h;
            down[i] -= h;
            let numeric = (loss.value(&up) - loss.value(&down)) / (2.0 * h);
            assert!((numeric - grad[i]).abs() < 1e-6, "coord {i}");
        }
    }

    #[test]
    fn hessian_is_symmetric_and_matches_gradient_differences() {
        let (data, targets) = fixture();
        let rows: Vec<&[f64]> = data.iter().map(|row| row.as_slice()).collect();
        let loss = BinaryLogLoss::new(&rows, &targets, 2, 0.3);
        let point = [0.2, -0.4, 0.1];
        let mut hess = [0.0; 9];
        loss.hessian(&point, &mut hess);
        let h = 1e-6;
        for j in 0..3 {
            let mut up = point;
            let mut down = point;
            up[j] += h;
            down[j] -= h;
            let mut g_up = [0.0; 3];
            let mut g_down = [0.0; 3];
            loss.gradient(&up, &mut g_up);
            loss.gradient(&down, &mut g_down);
            for i in 0..3 {
                let numeric = (g_up[i] - g_down[i]) / (2.0 * h);
                assert!((numeric - hess[i * 3 + j]).abs() < 1e-5);
                assert_eq!(hess[i * 3 + j], hess[j * 3 + i]);
            }
        }
    }

    #[test]
    fn softplus_handles_large_inputs() {
        assert!((softplus(1000.0) - 1000.0).abs() < 1e-9);
        assert!(softplus(-1000.0) >= 0.0);
        assert!((softplus(0.0) - 2.0f64.ln()).abs() < 1e-12);
    }
}
