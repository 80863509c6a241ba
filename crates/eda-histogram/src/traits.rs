//! Binning strategy seam

use crate::types::Histogram;
use eda_core::Result;

/// Turns a finite sample into a [`Histogram`]
pub trait HistogramBuilder {
    fn build(&self, sample: &[f64]) -> Result<Histogram>;

    /// Same as [`build`](Self::build) for a sample known to be ascending
    fn build_sorted(&self, sorted_sample: &[f64]) -> Result<Histogram> {
        self.build(sorted_sample)
    }

    /// Bin count, for builders that fix it up front
    fn target_bins(&self) -> Option<usize> {
        None
    }
}
