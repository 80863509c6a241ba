//! Normality test interface

use crate::types::{NormalityAssessment, NormalityResult, NormalityTestKind};
use eda_core::{Error, Result};
use tracing::warn;

/// A goodness-of-fit test against the normal distribution
pub trait NormalityTest {
    fn kind(&self) -> NormalityTestKind;

    /// Smallest sample the test accepts
    fn min_samples(&self) -> usize;

    /// Run the test on unsorted data
    fn test(&self, data: &[f64]) -> Result<NormalityResult>;

    /// Run the test, turning any failure into [`NormalityAssessment::Failed`]
    fn assess(&self, data: &[f64]) -> NormalityAssessment {
        match self.test(data) {
            Ok(result) => NormalityAssessment::Tested(result),
            Err(e) => {
                warn!(test = %self.kind(), error = %e, "normality test failed");
                NormalityAssessment::Failed {
                    test: self.kind(),
                    reason: e.to_string(),
                }
            }
        }
    }
}

/// Shared input checks: enough points, all finite
pub(crate) fn check_sample(data: &[f64], min: usize) -> Result<()> {
    if data.len() < min {
        return Err(Error::InsufficientData {
            expected: min,
            actual: data.len(),
        });
    }
    if !eda_core::utils::all_finite(data) {
        return Err(Error::non_finite("sample"));
    }
    Ok(())
}
