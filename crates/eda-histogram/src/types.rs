//! Bins and binned samples

use std::fmt;

/// Interval `[left, right)` with its count
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramBin {
    pub left: f64,
    /// Closed only for the last bin of a histogram
    pub right: f64,
    pub count: usize,
    /// count / (total_count * width)
    pub density: f64,
}

impl HistogramBin {
    pub fn new(left: f64, right: f64, count: usize, total_count: usize) -> Self {
        let width = right - left;
        let density = if width > 0.0 && total_count > 0 {
            count as f64 / (total_count as f64 * width)
        } else {
            0.0
        };
        Self {
            left,
            right,
            count,
            density,
        }
    }

    pub fn center(&self) -> f64 {
        (self.left + self.right) / 2.0
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    /// Half-open membership test; the histogram handles the closed last bin
    pub fn contains(&self, value: f64) -> bool {
        value >= self.left && value < self.right
    }

    /// Relative frequency (count / total_count)
    pub fn frequency(&self, total_count: usize) -> f64 {
        if total_count > 0 {
            self.count as f64 / total_count as f64
        } else {
            0.0
        }
    }
}

impl fmt::Display for HistogramBin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.2}..{:.2}: {} (density {:.4})",
            self.left, self.right, self.count, self.density
        )
    }
}

/// A histogram of one sample
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    bins: Vec<HistogramBin>,
    total_count: usize,
    min: f64,
    max: f64,
}

impl Histogram {
    pub fn new(bins: Vec<HistogramBin>, total_count: usize, min: f64, max: f64) -> Self {
        Self {
            bins,
            total_count,
            min,
            max,
        }
    }

    /// Histogram of an empty sample
    pub fn empty() -> Self {
        Self::new(Vec::new(), 0, 0.0, 0.0)
    }

    pub fn bins(&self) -> &[HistogramBin] {
        &self.bins
    }

    pub fn len(&self) -> usize {
        self.bins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    pub fn total_count(&self) -> usize {
        self.total_count
    }

    /// Smallest observed value
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Largest observed value
    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn max_count(&self) -> usize {
        self.bins.iter().map(|bin| bin.count).max().unwrap_or(0)
    }

    /// Index of the bin holding `value`; the last bin includes its right edge
    pub fn find_bin(&self, value: f64) -> Option<usize> {
        if let Some(last) = self.bins.last() {
            if value == last.right {
                return Some(self.bins.len() - 1);
            }
        }
        self.bins.iter().position(|bin| bin.contains(value))
    }

    pub fn counts(&self) -> Vec<usize> {
        self.bins.iter().map(|bin| bin.count).collect()
    }

    pub fn frequencies(&self) -> Vec<f64> {
        self.bins
            .iter()
            .map(|bin| bin.frequency(self.total_count))
            .collect()
    }

    /// Bin edges including the rightmost one
    pub fn edges(&self) -> Vec<f64> {
        let mut edges: Vec<f64> = self.bins.iter().map(|bin| bin.left).collect();
        if let Some(last) = self.bins.last() {
            edges.push(last.right);
        }
        edges
    }
}

impl fmt::Display for Histogram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Histogram({} bins, n={}, range=[{:.3}, {:.3}])",
            self.len(),
            self.total_count,
            self.min,
            self.max
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temperatures() -> Histogram {
        // 36.0..37.5 in three half-degree bins, 20 readings
        Histogram::new(
            vec![
                HistogramBin::new(36.0, 36.5, 4, 20),
                HistogramBin::new(36.5, 37.0, 12, 20),
                HistogramBin::new(37.0, 37.5, 4, 20),
            ],
            20,
            36.0,
            37.5,
        )
    }

    #[test]
    fn test_bin_geometry() {
        let bin = HistogramBin::new(36.5, 37.0, 12, 20);
        assert_eq!(bin.center(), 36.75);
        assert_eq!(bin.width(), 0.5);
        assert!(bin.contains(36.5));
        assert!(!bin.contains(37.0));
        assert_eq!(bin.frequency(20), 0.6);
        // 12 / (20 * 0.5)
        assert_eq!(bin.density, 1.2);
        assert_eq!(bin.frequency(0), 0.0);
    }

    #[test]
    fn test_last_bin_is_closed() {
        let hist = temperatures();
        assert_eq!(hist.find_bin(36.0), Some(0));
        assert_eq!(hist.find_bin(37.0), Some(2));
        assert_eq!(hist.find_bin(37.5), Some(2));
        assert_eq!(hist.find_bin(35.9), None);
        assert_eq!(hist.find_bin(37.6), None);
    }

    #[test]
    fn test_summaries() {
        let hist = temperatures();
        assert_eq!(hist.len(), 3);
        assert_eq!(hist.total_count(), 20);
        assert_eq!(hist.max_count(), 12);
        assert_eq!(hist.counts(), vec![4, 12, 4]);
        assert_eq!(hist.frequencies(), vec![0.2, 0.6, 0.2]);
        assert_eq!(hist.edges(), vec![36.0, 36.5, 37.0, 37.5]);
        assert_eq!(hist.bins()[1].to_string(), "36.50..37.00: 12 (density 1.2000)");
    }

    #[test]
    fn test_empty() {
        let hist = Histogram::empty();
        assert!(hist.is_empty());
        assert!(hist.edges().is_empty());
        assert!(hist.frequencies().is_empty());
        assert_eq!(hist.max_count(), 0);
    }
}
