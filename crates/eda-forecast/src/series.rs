//! Gap-free daily series

use chrono::{Duration, NaiveDate};
use eda_core::{Error, Result};

/// Values on consecutive days starting at `start`
#[derive(Debug, Clone, PartialEq)]
pub struct DailySeries {
    start: NaiveDate,
    values: Vec<f64>,
}

impl DailySeries {
    pub fn new(start: NaiveDate, values: Vec<f64>) -> Self {
        Self { start, values }
    }

    /// Resample dated observations to one value per day
    ///
    /// Observations may arrive in any order; for a repeated date the last
    /// one wins. Days without an observation, and observations whose value
    /// is missing or not finite, take the previous day's value. Anything
    /// still unset after that (a leading missing value) becomes 0.
    pub fn resample(observations: &[(NaiveDate, Option<f64>)]) -> Result<Self> {
        let first = observations.iter().map(|(d, _)| *d).min();
        let last = observations.iter().map(|(d, _)| *d).max();
        let (Some(start), Some(end)) = (first, last) else {
            return Err(Error::InsufficientData {
                expected: 1,
                actual: 0,
            });
        };
        let days = (end - start).num_days() as usize + 1;
        let mut slots: Vec<Option<f64>> = vec![None; days];
        for (date, value) in observations {
            let i = (*date - start).num_days() as usize;
            slots[i] = value.filter(|v| v.is_finite());
        }

        let mut carried: Option<f64> = None;
        let values = slots
            .into_iter()
            .map(|slot| {
                if slot.is_some() {
                    carried = slot;
                }
                carried.unwrap_or(0.0)
            })
            .collect();
        Ok(Self { start, values })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        if self.values.is_empty() {
            None
        } else {
            Some(self.start + Duration::days(self.values.len() as i64 - 1))
        }
    }

    pub fn last_value(&self) -> Option<f64> {
        self.values.last().copied()
    }

    /// The last `n` values (fewer if the series is shorter)
    pub fn tail(&self, n: usize) -> &[f64] {
        &self.values[self.values.len().saturating_sub(n)..]
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        (0..self.values.len()).map(move |i| self.start + Duration::days(i as i64))
    }

    /// The `horizon` days following the last one
    pub fn following_days(&self, horizon: usize) -> Vec<NaiveDate> {
        match self.last_date() {
            Some(last) => (1..=horizon as i64).map(|h| last + Duration::days(h)).collect(),
            None => Vec::new(),
        }
    }
}
