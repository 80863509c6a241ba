//! D'Agostino-Pearson K² omnibus test
//!
//! Combines a skewness z-score (D'Agostino, 1970) and a kurtosis z-score
//! (Anscombe & Glynn, 1983) into `K² = Zs² + Zk²`, which is χ² with two
//! degrees of freedom under normality.

use crate::traits::{check_sample, NormalityTest};
use crate::types::{NormalityResult, NormalityTestKind};
use eda_core::utils::central_moment;
use eda_core::{Error, Result};
use statrs::distribution::{ChiSquared, ContinuousCDF};

/// Omnibus normality test for samples of at least 8 points
#[derive(Debug, Clone, Copy, Default)]
pub struct DagostinoPearson;

/// Sample skewness `m3 / m2^1.5` and Pearson kurtosis `m4 / m2²`
pub fn moments(data: &[f64]) -> Result<(f64, f64)> {
    let m2 = central_moment(data, 2);
    if m2.is_nan() || m2 <= 0.0 {
        return Err(Error::Computation("sample variance is zero".to_string()));
    }
    let skew = central_moment(data, 3) / m2.powf(1.5);
    let kurt = central_moment(data, 4) / (m2 * m2);
    Ok((skew, kurt))
}

/// z-score of the sample skewness
pub fn skew_z(skew: f64, n: usize) -> f64 {
    let n = n as f64;
    let mut y = skew * ((n + 1.0) * (n + 3.0) / (6.0 * (n - 2.0))).sqrt();
    let beta2 = 3.0 * (n * n + 27.0 * n - 70.0) * (n + 1.0) * (n + 3.0)
        / ((n - 2.0) * (n + 5.0) * (n + 7.0) * (n + 9.0));
    let w2 = -1.0 + (2.0 * (beta2 - 1.0)).sqrt();
    let delta = 1.0 / (0.5 * w2.ln()).sqrt();
    let alpha = (2.0 / (w2 - 1.0)).sqrt();
    if y == 0.0 {
        y = 1.0;
    }
    let ya = y / alpha;
    delta * (ya + (ya * ya + 1.0).sqrt()).ln()
}

/// z-score of the sample kurtosis
pub fn kurtosis_z(kurt: f64, n: usize) -> f64 {
    let n = n as f64;
    let expected = 3.0 * (n - 1.0) / (n + 1.0);
    let var_b2 = 24.0 * n * (n - 2.0) * (n - 3.0) / ((n + 1.0) * (n + 1.0) * (n + 3.0) * (n + 5.0));
    let x = (kurt - expected) / var_b2.sqrt();
    let sqrt_beta1 = 6.0 * (n * n - 5.0 * n + 2.0) / ((n + 7.0) * (n + 9.0))
        * (6.0 * (n + 3.0) * (n + 5.0) / (n * (n - 2.0) * (n - 3.0))).sqrt();
    let a = 6.0
        + 8.0 / sqrt_beta1 * (2.0 / sqrt_beta1 + (1.0 + 4.0 / (sqrt_beta1 * sqrt_beta1)).sqrt());
    let term1 = 1.0 - 2.0 / (9.0 * a);
    let denom = 1.0 + x * (2.0 / (a - 4.0)).sqrt();
    let term2 = if denom == 0.0 {
        f64::NAN
    } else {
        denom.signum() * ((1.0 - 2.0 / a) / denom.abs()).powf(1.0 / 3.0)
    };
    (term1 - term2) / (2.0 / (9.0 * a)).sqrt()
}

impl NormalityTest for DagostinoPearson {
    fn kind(&self) -> NormalityTestKind {
        NormalityTestKind::DagostinoPearson
    }

    fn min_samples(&self) -> usize {
        8
    }

    fn test(&self, data: &[f64]) -> Result<NormalityResult> {
        check_sample(data, self.min_samples())?;
        let n = data.len();
        let (skew, kurt) = moments(data)?;
        let k2 = skew_z(skew, n).powi(2) + kurtosis_z(kurt, n).powi(2);
        if !k2.is_finite() {
            return Err(Error::non_finite("K² statistic"));
        }
        let chi2 = ChiSquared::new(2.0).map_err(|e| Error::Computation(e.to_string()))?;
        Ok(NormalityResult {
            test: self.kind(),
            statistic: k2,
            p_value: chi2.sf(k2),
            n,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use statrs::distribution::Normal;

    fn normal_scores(n: usize) -> Vec<f64> {
        let normal = Normal::new(0.0, 1.0).unwrap();
        (1..=n)
            .map(|i| normal.inverse_cdf((i as f64 - 0.5) / n as f64))
            .collect()
    }

    #[test]
    fn test_moments() {
        let (skew, kurt) = moments(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_abs_diff_eq!(skew, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(kurt, 1.64, epsilon = 1e-12);
        assert!(moments(&[2.0, 2.0, 2.0]).is_err());
    }

    #[test]
    fn test_skew_score_is_odd() {
        for n in [8, 50, 1000] {
            let z = skew_z(0.8, n);
            assert!(z > 0.0);
            assert_abs_diff_eq!(skew_z(-0.8, n), -z, epsilon = 1e-12);
        }
        // exactly zero skewness is scored as if it were one unit of y
        assert!(skew_z(0.0, 100).is_finite());
    }

    #[test]
    fn test_kurtosis_score_sign() {
        assert!(kurtosis_z(6.0, 100) > 0.0);
        assert!(kurtosis_z(1.8, 100) < 0.0);
    }

    #[test]
    fn test_normal_shape_accepted() {
        let r = DagostinoPearson.test(&normal_scores(200)).unwrap();
        assert!(r.p_value > 0.05, "p = {}", r.p_value);
        assert!(r.statistic >= 0.0);
    }

    #[test]
    fn test_skewed_rejected() {
        let data: Vec<f64> = (1..=200)
            .map(|i| -(1.0 - (i as f64 - 0.5) / 200.0).ln())
            .collect();
        let r = DagostinoPearson.test(&data).unwrap();
        assert!(r.p_value < 0.001);
    }

    #[test]
    fn test_matches_reference_values() {
        // scipy.stats.normaltest
        let weights = [148.0, 154.0, 158.0, 160.0, 161.0, 162.0, 166.0, 170.0, 182.0, 195.0, 236.0];
        let r = DagostinoPearson.test(&weights).unwrap();
        assert_abs_diff_eq!(r.statistic, 13.034263, epsilon = 1e-5);
        assert_abs_diff_eq!(r.p_value, 0.001478, epsilon = 1e-6);

        let x = [
            2.1, 3.4, 1.9, 5.6, 4.4, 3.3, 2.8, 4.1, 3.9, 3.0, 2.5, 4.8, 3.6, 3.2, 2.7, 4.0, 3.1, 3.8, 2.9, 3.5,
        ];
        let (skew, kurt) = moments(&x).unwrap();
        assert_abs_diff_eq!(skew_z(skew, x.len()), 1.103483, epsilon = 1e-5);
        assert_abs_diff_eq!(kurtosis_z(kurt, x.len()), 0.807546, epsilon = 1e-5);
        let r = DagostinoPearson.test(&x).unwrap();
        assert_abs_diff_eq!(r.statistic, 1.869806, epsilon = 1e-5);
        assert_abs_diff_eq!(r.p_value, 0.392624, epsilon = 1e-5);
    }

    #[test]
    fn test_failures() {
        assert!(matches!(
            DagostinoPearson.test(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]),
            Err(Error::InsufficientData { expected: 8, actual: 7 })
        ));
        assert!(DagostinoPearson.test(&[1.0; 20]).is_err());
    }
}
