//! Equal-width binning

use crate::traits::HistogramBuilder;
use crate::types::{Histogram, HistogramBin};
use eda_core::utils::nan_last_cmp;
use eda_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// Fixed-width histogram builder
///
/// Splits `[min, max]` of the sample into `num_bins` equal-width bins. Every
/// bin is half-open except the last, which also holds `max`. A sample whose
/// values are all equal is binned over `[v - 0.5, v + 0.5]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FixedWidthBuilder {
    num_bins: usize,
}

impl Default for FixedWidthBuilder {
    fn default() -> Self {
        Self { num_bins: 15 }
    }
}

impl FixedWidthBuilder {
    pub fn new(num_bins: usize) -> Self {
        Self {
            num_bins: num_bins.max(1),
        }
    }

    pub fn num_bins(&self) -> usize {
        self.num_bins.max(1)
    }
}

impl HistogramBuilder for FixedWidthBuilder {
    fn build(&self, sample: &[f64]) -> Result<Histogram> {
        let mut sorted = sample.to_vec();
        sorted.sort_by(nan_last_cmp);
        self.build_sorted(&sorted)
    }

    fn build_sorted(&self, sorted_sample: &[f64]) -> Result<Histogram> {
        let (Some(&min), Some(&max)) = (sorted_sample.first(), sorted_sample.last()) else {
            return Ok(Histogram::empty());
        };
        if !min.is_finite() || !max.is_finite() {
            return Err(Error::non_finite("histogram sample"));
        }

        let num_bins = self.num_bins();
        let (low, high) = if max > min { (min, max) } else { (min - 0.5, max + 0.5) };
        let width = (high - low) / num_bins as f64;
        let edge = |i: usize| if i == num_bins { high } else { low + i as f64 * width };

        let mut counts = vec![0usize; num_bins];
        let mut current = 0;
        for &value in sorted_sample {
            while current < num_bins - 1 && value >= edge(current + 1) {
                current += 1;
            }
            counts[current] += 1;
        }

        let total = sorted_sample.len();
        let bins = counts
            .into_iter()
            .enumerate()
            .map(|(i, count)| HistogramBin::new(edge(i), edge(i + 1), count, total))
            .collect();
        Ok(Histogram::new(bins, total, min, max))
    }

    fn target_bins(&self) -> Option<usize> {
        Some(self.num_bins())
    }
}
