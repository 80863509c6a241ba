//! Result types for normality tests and correlations

use std::fmt;

/// Which normality test produced a result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormalityTestKind {
    ShapiroWilk,
    DagostinoPearson,
}

impl NormalityTestKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::ShapiroWilk => "Shapiro-Wilk",
            Self::DagostinoPearson => "D'Agostino-Pearson",
        }
    }
}

impl fmt::Display for NormalityTestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Outcome of a normality test that ran to completion
#[derive(Debug, Clone, PartialEq)]
pub struct NormalityResult {
    pub test: NormalityTestKind,
    /// W for Shapiro-Wilk, K² for D'Agostino-Pearson
    pub statistic: f64,
    pub p_value: f64,
    pub n: usize,
}

/// Normality verdict for one series
///
/// A test that could not run (too few points, constant data) is kept as
/// `Failed` with its reason and counts as "not normal".
#[derive(Debug, Clone, PartialEq)]
pub enum NormalityAssessment {
    Tested(NormalityResult),
    Failed {
        test: NormalityTestKind,
        reason: String,
    },
}

impl NormalityAssessment {
    /// True when the test ran and did not reject normality at `alpha`
    pub fn is_normal(&self, alpha: f64) -> bool {
        match self {
            Self::Tested(r) => r.p_value > alpha,
            Self::Failed { .. } => false,
        }
    }

    pub fn p_value(&self) -> Option<f64> {
        match self {
            Self::Tested(r) => Some(r.p_value),
            Self::Failed { .. } => None,
        }
    }
}

impl fmt::Display for NormalityAssessment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tested(r) => write!(f, "{} p={:.4e} (n={})", r.test, r.p_value, r.n),
            Self::Failed { test, reason } => write!(f, "{test} failed: {reason}"),
        }
    }
}

/// Correlation coefficient family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorrelationMethod {
    Pearson,
    Spearman,
}

impl fmt::Display for CorrelationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pearson => f.write_str("Pearson"),
            Self::Spearman => f.write_str("Spearman"),
        }
    }
}

/// A correlation coefficient with its two-sided p-value
#[derive(Debug, Clone, PartialEq)]
pub struct Correlation {
    pub method: CorrelationMethod,
    pub coefficient: f64,
    pub p_value: f64,
    pub n: usize,
}

/// Result of comparing two aligned series
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub correlation: Correlation,
    pub left: NormalityAssessment,
    pub right: NormalityAssessment,
}

impl Comparison {
    pub fn method(&self) -> CorrelationMethod {
        self.correlation.method
    }
}
