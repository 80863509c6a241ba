//! Choosing between Pearson and Spearman from normality tests

use crate::correlation::correlate;
use crate::dagostino::DagostinoPearson;
use crate::shapiro::ShapiroWilk;
use crate::traits::NormalityTest;
use crate::types::{Comparison, CorrelationMethod, NormalityAssessment};
use eda_core::{Error, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Thresholds for the method choice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComparatorPolicy {
    /// Largest series tested with Shapiro-Wilk; longer ones use
    /// D'Agostino-Pearson
    pub shapiro_max_n: usize,
    /// Significance level; both series need p above it for Pearson
    pub alpha: f64,
}

impl Default for ComparatorPolicy {
    fn default() -> Self {
        Self {
            shapiro_max_n: 5000,
            alpha: 0.05,
        }
    }
}

/// Correlates two aligned series with the method their normality allows
#[derive(Debug, Clone, Default)]
pub struct StatisticalComparator {
    policy: ComparatorPolicy,
}

impl StatisticalComparator {
    pub fn new(policy: ComparatorPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &ComparatorPolicy {
        &self.policy
    }

    fn assess_pair(&self, x: &[f64], y: &[f64]) -> (NormalityAssessment, NormalityAssessment) {
        if x.len() <= self.policy.shapiro_max_n && y.len() <= self.policy.shapiro_max_n {
            (ShapiroWilk.assess(x), ShapiroWilk.assess(y))
        } else {
            (DagostinoPearson.assess(x), DagostinoPearson.assess(y))
        }
    }

    /// Method the normality verdicts call for
    pub fn choose_method(&self, left: &NormalityAssessment, right: &NormalityAssessment) -> CorrelationMethod {
        if left.is_normal(self.policy.alpha) && right.is_normal(self.policy.alpha) {
            CorrelationMethod::Pearson
        } else {
            CorrelationMethod::Spearman
        }
    }

    /// Test both series for normality, then correlate
    ///
    /// Normality failures fall through to Spearman; a correlation that
    /// cannot be computed (constant series, mismatched lengths) is an error.
    pub fn compare(&self, x: &[f64], y: &[f64]) -> Result<Comparison> {
        if x.len() != y.len() {
            return Err(Error::size_mismatch(x.len(), y.len(), "compared series"));
        }
        let (left, right) = self.assess_pair(x, y);
        let method = self.choose_method(&left, &right);
        debug!(%left, %right, %method, "normality assessed");
        let correlation = correlate(method, x, y)?;
        Ok(Comparison {
            correlation,
            left,
            right,
        })
    }
}
