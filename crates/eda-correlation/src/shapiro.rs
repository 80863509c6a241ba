//! Shapiro-Wilk W test
//!
//! Coefficients and p-values follow Royston's approximation (Applied
//! Statistics algorithm AS R94, 1995), valid for 3 ≤ n ≤ 5000.

use crate::traits::{check_sample, NormalityTest};
use crate::types::{NormalityResult, NormalityTestKind};
use eda_core::utils::sorted;
use eda_core::{Error, Result};
use statrs::distribution::{ContinuousCDF, Normal};
use std::f64::consts::PI;

const SMALL: f64 = 1e-19;

const C1: [f64; 6] = [0.0, 0.221157, -0.147981, -2.07119, 4.434685, -2.706056];
const C2: [f64; 6] = [0.0, 0.042981, -0.293762, -1.752461, 5.682633, -3.582633];
const G: [f64; 2] = [-2.273, 0.459];
const C3: [f64; 4] = [0.544, -0.39978, 0.025054, -6.714e-4];
const C4: [f64; 4] = [1.3822, -0.77857, 0.062767, -0.0020322];
const C5: [f64; 4] = [-1.5861, -0.31082, -0.083751, 0.0038915];
const C6: [f64; 3] = [-0.4803, -0.082676, 0.0030302];

/// `c[0] + c[1]·x + c[2]·x² + …`
fn poly(c: &[f64], x: f64) -> f64 {
    c.iter().rev().fold(0.0, |acc, &ci| acc * x + ci)
}

fn standard_normal() -> Result<Normal> {
    Normal::new(0.0, 1.0).map_err(|e| Error::Computation(e.to_string()))
}

/// Shapiro-Wilk test for samples of 3 to 5000 points
#[derive(Debug, Clone, Copy, Default)]
pub struct ShapiroWilk;

impl ShapiroWilk {
    pub fn new() -> Self {
        Self
    }

    /// Half of the antisymmetric weight vector: `a[0] ≥ a[1] ≥ … > 0`,
    /// one weight per pair of order statistics
    pub fn coefficients(n: usize) -> Result<Vec<f64>> {
        if n < 3 {
            return Err(Error::InsufficientData {
                expected: 3,
                actual: n,
            });
        }
        if n == 3 {
            return Ok(vec![0.5f64.sqrt()]);
        }
        let normal = standard_normal()?;
        let half = n / 2;
        let an = n as f64;
        let m: Vec<f64> = (1..=half)
            .map(|i| normal.inverse_cdf((i as f64 - 0.375) / (an + 0.25)))
            .collect();
        let summ2 = 2.0 * m.iter().map(|v| v * v).sum::<f64>();
        let ssumm2 = summ2.sqrt();
        let rsn = 1.0 / an.sqrt();

        let mut a = vec![0.0; half];
        a[0] = poly(&C1, rsn) - m[0] / ssumm2;
        let (start, fac) = if n > 5 {
            a[1] = -m[1] / ssumm2 + poly(&C2, rsn);
            let fac = ((summ2 - 2.0 * m[0] * m[0] - 2.0 * m[1] * m[1])
                / (1.0 - 2.0 * a[0] * a[0] - 2.0 * a[1] * a[1]))
                .sqrt();
            (2, fac)
        } else {
            let fac = ((summ2 - 2.0 * m[0] * m[0]) / (1.0 - 2.0 * a[0] * a[0])).sqrt();
            (1, fac)
        };
        for i in start..half {
            a[i] = -m[i] / fac;
        }
        Ok(a)
    }

    /// W statistic and `1 - W`, the latter computed without cancellation
    fn statistic(x: &[f64], half_coefficients: &[f64]) -> Result<(f64, f64)> {
        let n = x.len();
        let range = x[n - 1] - x[0];
        if range < SMALL {
            return Err(Error::Computation("data range is zero".to_string()));
        }
        // weights for the sorted sample: -a[i] for the lower half, +a[i]
        // mirrored on the upper half, 0 at the middle of an odd sample
        let mut weights = vec![0.0; n];
        for (i, &ai) in half_coefficients.iter().enumerate() {
            weights[i] = -ai;
            weights[n - 1 - i] = ai;
        }
        let scaled: Vec<f64> = x.iter().map(|v| v / range).collect();
        let wbar = weights.iter().sum::<f64>() / n as f64;
        let xbar = scaled.iter().sum::<f64>() / n as f64;
        let (mut ssa, mut ssx, mut sax) = (0.0, 0.0, 0.0);
        for (w, v) in weights.iter().zip(&scaled) {
            let da = w - wbar;
            let dx = v - xbar;
            ssa += da * da;
            ssx += dx * dx;
            sax += da * dx;
        }
        let ssassx = (ssa * ssx).sqrt();
        let w1 = ((ssassx - sax) * (ssassx + sax) / (ssa * ssx)).max(0.0);
        Ok((1.0 - w1, w1))
    }

    fn p_value(n: usize, w: f64, w1: f64) -> Result<f64> {
        if n == 3 {
            let p = 6.0 / PI * (w.sqrt().asin() - PI / 3.0);
            return Ok(p.max(0.0));
        }
        let an = n as f64;
        let mut y = w1.ln();
        let (m, s) = if n <= 11 {
            let gamma = poly(&G, an);
            if y >= gamma {
                return Ok(1e-99);
            }
            y = -(gamma - y).ln();
            (poly(&C3, an), poly(&C4, an).exp())
        } else {
            let ln_n = an.ln();
            (poly(&C5, ln_n), poly(&C6, ln_n).exp())
        };
        let z = (y - m) / s;
        Ok(standard_normal()?.sf(z))
    }
}

impl NormalityTest for ShapiroWilk {
    fn kind(&self) -> NormalityTestKind {
        NormalityTestKind::ShapiroWilk
    }

    fn min_samples(&self) -> usize {
        3
    }

    fn test(&self, data: &[f64]) -> Result<NormalityResult> {
        check_sample(data, self.min_samples())?;
        let x = sorted(data);
        let a = Self::coefficients(x.len())?;
        let (w, w1) = Self::statistic(&x, &a)?;
        let p_value = Self::p_value(x.len(), w, w1)?;
        Ok(NormalityResult {
            test: self.kind(),
            statistic: w,
            p_value,
            n: x.len(),
        })
    }
}
