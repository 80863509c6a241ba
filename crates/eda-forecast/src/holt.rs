//! Holt's linear (additive trend) exponential smoothing
//!
//! ```text
//! level_t = α·y_t + (1 − α)(level_{t−1} + trend_{t−1})
//! trend_t = β(level_t − level_{t−1}) + (1 − β)·trend_{t−1}
//! ŷ_{t+h}  = level_t + h·trend_t
//! ```
//!
//! The smoothing weights are chosen to minimise the sum of squared one-step
//! errors. For each candidate pair the initial level and trend are solved
//! exactly by least squares: every one-step forecast is affine in the
//! initial state, so the errors are `r − l0·u − b0·v` for vectors obtained
//! from three runs of the recursion.

use eda_core::{Error, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Fitted model state
#[derive(Debug, Clone, PartialEq)]
pub struct HoltFit {
    pub alpha: f64,
    pub beta: f64,
    pub initial_level: f64,
    pub initial_trend: f64,
    /// State after the last observation
    pub level: f64,
    pub trend: f64,
    /// Sum of squared one-step errors
    pub sse: f64,
}

impl HoltFit {
    /// `level + h·trend` for `h = 1..=horizon`
    pub fn forecast(&self, horizon: usize) -> Vec<f64> {
        (1..=horizon)
            .map(|h| self.level + h as f64 * self.trend)
            .collect()
    }
}

/// Parameter search settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HoltLinear {
    /// Spacing of the initial α/β grid over `[0, 1]`
    pub grid_step: f64,
    /// The pattern search stops once its step falls below this
    pub tolerance: f64,
}

impl Default for HoltLinear {
    fn default() -> Self {
        Self {
            grid_step: 0.05,
            tolerance: 1e-6,
        }
    }
}

/// One pass of the recursion from `(level, trend)`, returning the one-step
/// forecasts and the final state
fn run(y: &[f64], alpha: f64, beta: f64, mut level: f64, mut trend: f64) -> (Vec<f64>, f64, f64) {
    let mut fitted = Vec::with_capacity(y.len());
    for &obs in y {
        let prediction = level + trend;
        fitted.push(prediction);
        let next = alpha * obs + (1.0 - alpha) * prediction;
        trend = beta * (next - level) + (1.0 - beta) * trend;
        level = next;
    }
    (fitted, level, trend)
}

impl HoltLinear {
    /// Least-squares initial state and its SSE for fixed weights
    fn initial_state(y: &[f64], alpha: f64, beta: f64) -> (f64, f64, f64) {
        let zeros = vec![0.0; y.len()];
        let (f, _, _) = run(y, alpha, beta, 0.0, 0.0);
        let (u, _, _) = run(&zeros, alpha, beta, 1.0, 0.0);
        let (v, _, _) = run(&zeros, alpha, beta, 0.0, 1.0);

        let (mut uu, mut uv, mut vv, mut ur, mut vr) = (0.0, 0.0, 0.0, 0.0, 0.0);
        for i in 0..y.len() {
            let r = y[i] - f[i];
            uu += u[i] * u[i];
            uv += u[i] * v[i];
            vv += v[i] * v[i];
            ur += u[i] * r;
            vr += v[i] * r;
        }
        let det = uu * vv - uv * uv;
        let (l0, b0) = if det.abs() > 1e-12 * (uu * vv).max(f64::MIN_POSITIVE) {
            ((ur * vv - vr * uv) / det, (vr * uu - ur * uv) / det)
        } else {
            (y[0], y[1] - y[0])
        };

        let sse = (0..y.len())
            .map(|i| {
                let e = y[i] - f[i] - l0 * u[i] - b0 * v[i];
                e * e
            })
            .sum();
        (l0, b0, sse)
    }

    fn sse(y: &[f64], alpha: f64, beta: f64) -> f64 {
        Self::initial_state(y, alpha, beta).2
    }

    /// Fit α, β and the initial state to `y`
    pub fn fit(&self, y: &[f64]) -> Result<HoltFit> {
        if y.len() < 2 {
            return Err(Error::InsufficientData {
                expected: 2,
                actual: y.len(),
            });
        }
        if !eda_core::utils::all_finite(y) {
            return Err(Error::non_finite("series"));
        }
        if !(self.grid_step > 0.0 && self.grid_step <= 1.0) {
            return Err(Error::InvalidParameter(format!(
                "grid_step must be in (0, 1], got {}",
                self.grid_step
            )));
        }

        let steps = (1.0 / self.grid_step).round() as usize;
        let mut best = (f64::INFINITY, 0.0, 0.0);
        for i in 0..=steps {
            for j in 0..=steps {
                let alpha = (i as f64 * self.grid_step).min(1.0);
                let beta = (j as f64 * self.grid_step).min(1.0);
                let sse = Self::sse(y, alpha, beta);
                if sse < best.0 {
                    best = (sse, alpha, beta);
                }
            }
        }

        let (mut sse, mut alpha, mut beta) = best;
        let mut step = self.grid_step / 2.0;
        while step >= self.tolerance {
            let mut improved = false;
            for (da, db) in [(step, 0.0), (-step, 0.0), (0.0, step), (0.0, -step)] {
                let a = (alpha + da).clamp(0.0, 1.0);
                let b = (beta + db).clamp(0.0, 1.0);
                let candidate = Self::sse(y, a, b);
                if candidate < sse {
                    (sse, alpha, beta) = (candidate, a, b);
                    improved = true;
                }
            }
            if !improved {
                step /= 2.0;
            }
        }

        if !sse.is_finite() {
            return Err(Error::Computation("smoothing error is not finite".to_string()));
        }
        let (initial_level, initial_trend, sse) = Self::initial_state(y, alpha, beta);
        let (_, level, trend) = run(y, alpha, beta, initial_level, initial_trend);
        if !level.is_finite() || !trend.is_finite() {
            return Err(Error::non_finite("fitted state"));
        }
        debug!(alpha, beta, sse, "fitted holt model");
        Ok(HoltFit {
            alpha,
            beta,
            initial_level,
            initial_trend,
            level,
            trend,
            sse,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::SeedableRng;
    use rand_distr::{Distribution, Normal};

    #[test]
    fn test_run_recursion() {
        let (fitted, level, trend) = run(&[2.0, 4.0], 0.5, 0.5, 0.0, 1.0);
        assert_eq!(fitted, vec![1.0, 2.75]);
        // step 1: level = 0.5·2 + 0.5·1 = 1.5, trend = 0.5·1.5 + 0.5·1 = 1.25
        // step 2: level = 0.5·4 + 0.5·2.75 = 3.375, trend = 0.5·1.875 + 0.5·1.25
        assert_abs_diff_eq!(level, 3.375, epsilon = 1e-12);
        assert_abs_diff_eq!(trend, 1.5625, epsilon = 1e-12);
    }

    #[test]
    fn test_linear_series_is_fitted_exactly() {
        let y: Vec<f64> = (0..30).map(|t| 3.0 + 2.0 * t as f64).collect();
        let fit = HoltLinear::default().fit(&y).unwrap();
        assert!(fit.sse < 1e-9);
        let f = fit.forecast(3);
        assert_abs_diff_eq!(f[0], 63.0, epsilon = 1e-6);
        assert_abs_diff_eq!(f[2], 67.0, epsilon = 1e-6);
    }

    #[test]
    fn test_constant_series_forecasts_flat() {
        let fit = HoltLinear::default().fit(&[7.0; 12]).unwrap();
        for v in fit.forecast(5) {
            assert_abs_diff_eq!(v, 7.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_noisy_trend() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(42);
        let noise = Normal::new(0.0, 5.0).unwrap();
        let y: Vec<f64> = (0..200)
            .map(|t| 100.0 + 3.0 * t as f64 + noise.sample(&mut rng))
            .collect();
        let fit = HoltLinear::default().fit(&y).unwrap();
        assert!((0.0..=1.0).contains(&fit.alpha));
        assert!((0.0..=1.0).contains(&fit.beta));
        assert!(fit.sse.is_finite());
        assert!((fit.trend - 3.0).abs() < 1.5, "trend = {}", fit.trend);
    }

    #[test]
    fn test_grid_optimum_not_worse_after_search() {
        let y = [1.0, 3.0, 2.0, 5.0, 4.0, 7.0, 6.0, 9.0];
        let model = HoltLinear::default();
        let fit = model.fit(&y).unwrap();
        for i in 0..=20 {
            for j in 0..=20 {
                let grid = HoltLinear::sse(&y, i as f64 * 0.05, j as f64 * 0.05);
                assert!(fit.sse <= grid + 1e-9);
            }
        }
    }

    #[test]
    fn test_errors() {
        let model = HoltLinear::default();
        assert!(model.fit(&[1.0]).is_err());
        assert!(model.fit(&[1.0, f64::NAN, 2.0]).is_err());
        let bad = HoltLinear {
            grid_step: 0.0,
            tolerance: 1e-6,
        };
        assert!(bad.fit(&[1.0, 2.0, 3.0]).is_err());
    }
}
