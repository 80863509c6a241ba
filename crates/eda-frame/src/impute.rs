//! Median imputation, per group then overall

use crate::aggregate::median_by_group;
use crate::coerce::coerce_numeric;
use eda_core::{Result, Table};
use polars::prelude::*;
use std::collections::HashMap;
use tracing::info;

/// Counts and medians from one imputation run
#[derive(Debug, Clone, PartialEq)]
pub struct ImputationReport {
    pub missing_before: usize,
    /// Missing count after group fill; equals `missing_before` without a group
    pub missing_after_group: usize,
    pub group_medians: Vec<(String, f64)>,
    pub overall_median: f64,
    pub missing_after: usize,
}

/// Fill missing values of `value` with the median of its `group`, then with
/// the overall median
///
/// The value column is coerced to numeric first. Groups whose values are all
/// missing are left for the overall pass. If the whole column is missing the
/// overall median is NaN and nothing is filled.
pub fn impute_median(table: &mut Table, value: &str, group: Option<&str>) -> Result<ImputationReport> {
    coerce_numeric(table, value)?;
    let mut values = table.floats(value)?;
    let missing_before = values.iter().filter(|v| v.is_none()).count();

    let mut group_medians = Vec::new();
    if let Some(group) = group {
        group_medians = median_by_group(table, group, value)?;
        let lookup: HashMap<&str, f64> = group_medians
            .iter()
            .filter(|(_, m)| !m.is_nan())
            .map(|(g, m)| (g.as_str(), *m))
            .collect();
        for (v, label) in values.iter_mut().zip(table.labels(group)?) {
            if v.is_none() {
                *v = label.and_then(|g| lookup.get(g.as_str()).copied());
            }
        }
    }

    let grouped = Series::new(value.into(), values);
    let missing_after_group = grouped.null_count();
    let ca = grouped.f64()?;
    let overall_median = ca.median().unwrap_or(f64::NAN);
    let filled = if overall_median.is_nan() {
        ca.clone()
    } else {
        ca.fill_null_with_values(overall_median)?
    };
    let missing_after = filled.null_count();
    table.upsert(filled.into_series())?;

    info!(column = value, missing_before, missing_after_group, missing_after, "imputed medians");
    Ok(ImputationReport {
        missing_before,
        missing_after_group,
        group_medians,
        overall_median,
        missing_after,
    })
}
