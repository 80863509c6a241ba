//! Pearson and Spearman correlation with two-sided p-values

use crate::types::{Correlation, CorrelationMethod};
use eda_core::utils::nan_last_cmp;
use eda_core::{Error, Result};
use statrs::distribution::{ContinuousCDF, StudentsT};

fn check_pair(x: &[f64], y: &[f64]) -> Result<()> {
    if x.len() != y.len() {
        return Err(Error::size_mismatch(x.len(), y.len(), "correlation inputs"));
    }
    if x.len() < 3 {
        return Err(Error::InsufficientData {
            expected: 3,
            actual: x.len(),
        });
    }
    if !eda_core::utils::all_finite(x) || !eda_core::utils::all_finite(y) {
        return Err(Error::non_finite("correlation input"));
    }
    Ok(())
}

/// Product-moment coefficient; errors when either series is constant
fn coefficient(x: &[f64], y: &[f64]) -> Result<f64> {
    let n = x.len() as f64;
    let mx = x.iter().sum::<f64>() / n;
    let my = y.iter().sum::<f64>() / n;
    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (a, b) in x.iter().zip(y) {
        let dx = a - mx;
        let dy = b - my;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    let denominator = (sxx * syy).sqrt();
    if denominator == 0.0 {
        return Err(Error::Computation(
            "Cannot compute correlation: zero variance".to_string(),
        ));
    }
    Ok((sxy / denominator).clamp(-1.0, 1.0))
}

/// Two-sided p-value of `r` from Student's t with `n - 2` degrees of freedom
pub fn p_value(r: f64, n: usize) -> Result<f64> {
    if n < 3 {
        return Err(Error::InsufficientData {
            expected: 3,
            actual: n,
        });
    }
    if r.abs() >= 1.0 {
        return Ok(0.0);
    }
    let df = (n - 2) as f64;
    let t = r * (df / (1.0 - r * r)).sqrt();
    let dist = StudentsT::new(0.0, 1.0, df).map_err(|e| Error::Computation(e.to_string()))?;
    Ok((2.0 * dist.sf(t.abs())).min(1.0))
}

/// Ranks starting at 1, ties sharing the average of their positions
pub fn average_ranks(data: &[f64]) -> Vec<f64> {
    let mut order: Vec<usize> = (0..data.len()).collect();
    order.sort_by(|&a, &b| nan_last_cmp(&data[a], &data[b]));
    let mut ranks = vec![0.0; data.len()];
    let mut start = 0;
    while start < order.len() {
        let mut end = start + 1;
        while end < order.len() && data[order[end]] == data[order[start]] {
            end += 1;
        }
        // positions start..end hold ranks start+1 ..= end
        let rank = (start + end + 1) as f64 / 2.0;
        for &i in &order[start..end] {
            ranks[i] = rank;
        }
        start = end;
    }
    ranks
}

/// Pearson correlation of two aligned series
pub fn pearson(x: &[f64], y: &[f64]) -> Result<Correlation> {
    check_pair(x, y)?;
    let r = coefficient(x, y)?;
    Ok(Correlation {
        method: CorrelationMethod::Pearson,
        coefficient: r,
        p_value: p_value(r, x.len())?,
        n: x.len(),
    })
}

/// Spearman rank correlation of two aligned series
pub fn spearman(x: &[f64], y: &[f64]) -> Result<Correlation> {
    check_pair(x, y)?;
    let r = coefficient(&average_ranks(x), &average_ranks(y))?;
    Ok(Correlation {
        method: CorrelationMethod::Spearman,
        coefficient: r,
        p_value: p_value(r, x.len())?,
        n: x.len(),
    })
}

/// Dispatch on `method`
pub fn correlate(method: CorrelationMethod, x: &[f64], y: &[f64]) -> Result<Correlation> {
    match method {
        CorrelationMethod::Pearson => pearson(x, y),
        CorrelationMethod::Spearman => spearman(x, y),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_average_ranks() {
        assert_eq!(average_ranks(&[10.0, 30.0, 20.0]), vec![1.0, 3.0, 2.0]);
        assert_eq!(average_ranks(&[1.0, 2.0, 2.0, 3.0]), vec![1.0, 2.5, 2.5, 4.0]);
        assert_eq!(average_ranks(&[5.0, 5.0, 5.0]), vec![2.0, 2.0, 2.0]);
    }

    #[test]
    fn test_perfect_correlation() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let c = pearson(&x, &x).unwrap();
        assert_abs_diff_eq!(c.coefficient, 1.0, epsilon = 1e-12);
        assert_eq!(c.p_value, 0.0);

        let y = [10.0, 8.0, 6.0, 4.0, 2.0];
        let c = pearson(&x, &y).unwrap();
        assert_abs_diff_eq!(c.coefficient, -1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_spearman_monotone() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let y = [1.0, 4.0, 9.0, 16.0, 25.0, 36.0];
        let c = spearman(&x, &y).unwrap();
        assert_abs_diff_eq!(c.coefficient, 1.0, epsilon = 1e-12);
        assert_eq!(c.method, CorrelationMethod::Spearman);
        assert!(pearson(&x, &y).unwrap().coefficient < 1.0);
    }

    #[test]
    fn test_known_p_value() {
        // r = 0.5 with n = 10: t = 1.633 on 8 df, two-sided p = 0.1411
        let p = p_value(0.5, 10).unwrap();
        assert_abs_diff_eq!(p, 0.1411, epsilon = 1e-3);
        assert_abs_diff_eq!(p_value(0.0, 10).unwrap(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_errors() {
        assert!(pearson(&[1.0, 2.0, 3.0], &[1.0, 2.0]).is_err());
        assert!(pearson(&[1.0, 2.0], &[1.0, 2.0]).is_err());
        assert!(pearson(&[1.0, 1.0, 1.0], &[1.0, 2.0, 3.0]).is_err());
        assert!(spearman(&[4.0, 4.0, 4.0], &[1.0, 2.0, 3.0]).is_err());
        assert!(pearson(&[1.0, f64::INFINITY, 3.0], &[1.0, 2.0, 3.0]).is_err());
    }
}
