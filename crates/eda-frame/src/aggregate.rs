//! Frequency tables and grouped aggregates

use eda_core::{ColumnKind, Error, Result, Table};
use polars::prelude::*;
use std::fmt;

/// Count of one distinct value; `label == None` counts missing cells
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueCount {
    pub label: Option<String>,
    pub count: usize,
}

impl fmt::Display for ValueCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.label {
            Some(l) => write!(f, "{l}: {}", self.count),
            None => write!(f, "NaN: {}", self.count),
        }
    }
}

/// Frequency of each distinct value, most frequent first
///
/// Ties keep first-appearance order. With `include_missing` the missing
/// cells are counted under a `None` label.
pub fn value_counts(table: &Table, column: &str, include_missing: bool) -> Result<Vec<ValueCount>> {
    Ok(table
        .frequencies(column, include_missing)?
        .into_iter()
        .map(|(label, count)| ValueCount { label, count })
        .collect())
}

/// Sum of a metric for one category
#[derive(Debug, Clone, PartialEq)]
pub struct CategorySum {
    pub category: String,
    pub total: f64,
}

/// Sum of `metric` per value of `group`, largest first
///
/// Categorical groups list every declared category, including those with
/// no rows (total 0). Missing metric values are skipped; rows with a
/// missing group are dropped.
pub fn sum_by_category(table: &Table, group: &str, metric: &str) -> Result<Vec<CategorySum>> {
    require_numeric(table, metric)?;
    let grouped = grouped(table, group, col(metric).sum().alias("total"))?;
    let (labels, totals) = read_groups(&grouped, group, "total")?;

    let mut out: Vec<CategorySum> = labels
        .into_iter()
        .zip(totals)
        .map(|(category, total)| CategorySum {
            category,
            total: total.unwrap_or(0.0),
        })
        .collect();
    if table.kind(group)? == ColumnKind::Category {
        for category in table.categories(group)? {
            if !out.iter().any(|s| s.category == category) {
                out.push(CategorySum { category, total: 0.0 });
            }
        }
    }
    out.sort_by(|a, b| b.total.total_cmp(&a.total));
    Ok(out)
}

/// Median of `value` per label of `group`, in first-appearance order
///
/// Groups whose values are all missing get a NaN median.
pub fn median_by_group(table: &Table, group: &str, value: &str) -> Result<Vec<(String, f64)>> {
    require_numeric(table, value)?;
    let grouped = grouped(table, group, col(value).median().alias("median"))?;
    let (labels, medians) = read_groups(&grouped, group, "median")?;
    Ok(labels
        .into_iter()
        .zip(medians)
        .map(|(label, m)| (label, m.unwrap_or(f64::NAN)))
        .collect())
}

fn require_numeric(table: &Table, name: &str) -> Result<()> {
    let kind = table.kind(name)?;
    if !kind.is_numeric() {
        return Err(Error::type_mismatch(name, ColumnKind::Float.name(), kind));
    }
    Ok(())
}

/// One aggregate per present group label, groups in first-appearance order
fn grouped(table: &Table, group: &str, agg: Expr) -> Result<DataFrame> {
    let mut frame = table.frame().clone();
    frame.with_column(Series::new(group.into(), table.labels(group)?))?;
    let frame = frame
        .lazy()
        .filter(col(group).is_not_null())
        .group_by_stable([col(group)])
        .agg([agg.cast(DataType::Float64)])
        .collect()?;
    Ok(frame)
}

fn read_groups(grouped: &DataFrame, group: &str, agg: &str) -> Result<(Vec<String>, Vec<Option<f64>>)> {
    let labels = grouped
        .column(group)?
        .as_materialized_series()
        .str()?
        .into_iter()
        .map(|l| l.unwrap_or_default().to_string())
        .collect();
    let values = grouped.column(agg)?.as_materialized_series().f64()?.into_iter().collect();
    Ok((labels, values))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::categorical::to_category;
    use eda_core::{float_series, text_series};

    fn sample() -> Table {
        Table::new(vec![
            text_series("continent", &["Europe", "Asia", "Europe", "", "Europe"]),
            float_series("total_cases", &[10.0, 5.0, f64::NAN, 7.0, 1.0]),
        ])
        .unwrap()
    }

    #[test]
    fn test_value_counts_with_missing() {
        let vc = value_counts(&sample(), "continent", true).unwrap();
        assert_eq!(vc[0], ValueCount { label: Some("Europe".into()), count: 3 });
        assert_eq!(vc.len(), 3);
        assert!(vc.iter().any(|v| v.label.is_none() && v.count == 1));
    }

    #[test]
    fn test_value_counts_without_missing() {
        let vc = value_counts(&sample(), "continent", false).unwrap();
        assert_eq!(vc.len(), 2);
        assert_eq!(vc.iter().map(|v| v.count).sum::<usize>(), 4);
    }

    #[test]
    fn test_sum_by_category_sorted() {
        let sums = sum_by_category(&sample(), "continent", "total_cases").unwrap();
        assert_eq!(sums[0], CategorySum { category: "Europe".into(), total: 11.0 });
        assert_eq!(sums[1], CategorySum { category: "Asia".into(), total: 5.0 });
        assert_eq!(sums.len(), 2);
    }

    #[test]
    fn test_sum_by_category_lists_empty_categories() {
        let mut t = sample();
        to_category(&mut t, "continent").unwrap();
        let keep = BooleanChunked::from_slice("keep".into(), &[true, false, true, true, true]);
        let filtered = t.filter(&keep).unwrap();
        let sums = sum_by_category(&filtered, "continent", "total_cases").unwrap();
        assert_eq!(sums[0], CategorySum { category: "Europe".into(), total: 11.0 });
        assert!(sums.contains(&CategorySum { category: "Asia".into(), total: 0.0 }));
    }

    #[test]
    fn test_median_by_group() {
        let t = sample();
        let medians = median_by_group(&t, "continent", "total_cases").unwrap();
        assert_eq!(medians[0], ("Europe".to_string(), 5.5));
        assert_eq!(medians[1], ("Asia".to_string(), 5.0));
        assert_eq!(medians.len(), 2);
    }

    #[test]
    fn test_median_of_all_missing_group_is_nan() {
        let t = Table::new(vec![
            text_series("g", &["a", "b"]),
            float_series("v", &[1.0, f64::NAN]),
        ])
        .unwrap();
        let medians = median_by_group(&t, "g", "v").unwrap();
        assert!(medians[1].1.is_nan());
    }

    #[test]
    fn test_non_numeric_metric_is_error() {
        assert!(sum_by_category(&sample(), "continent", "continent").is_err());
    }
}
