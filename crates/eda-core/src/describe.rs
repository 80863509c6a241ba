//! Descriptive summaries of a table: info, describe, missing and duplicates

use crate::table::Table;
use crate::value::{ColumnKind, Value};
use crate::Result;
use polars::prelude::*;

/// Which columns `describe` covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Include {
    /// Numeric columns only
    #[default]
    Numeric,
    /// Every column
    All,
}

/// Per-column structural information
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnInfo {
    pub name: String,
    pub non_null: usize,
    pub dtype: ColumnKind,
}

/// Summary statistics for one column
///
/// Numeric fields are `None` for non-numeric columns; `unique`, `top` and
/// `freq` are `None` for numeric columns.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ColumnSummary {
    pub name: String,
    pub count: usize,
    pub unique: Option<usize>,
    pub top: Option<String>,
    pub freq: Option<usize>,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub q25: Option<f64>,
    pub q50: Option<f64>,
    pub q75: Option<f64>,
    pub max: Option<f64>,
    /// Earliest/latest timestamps for date columns
    pub first: Option<String>,
    pub last: Option<String>,
}

/// Structural information for every column
pub fn info(table: &Table) -> Vec<ColumnInfo> {
    table
        .frame()
        .get_columns()
        .iter()
        .map(|c| ColumnInfo {
            name: c.name().to_string(),
            non_null: c.len() - c.null_count(),
            dtype: ColumnKind::of(c.dtype()),
        })
        .collect()
}

/// Summary statistics per column
pub fn describe(table: &Table, include: Include) -> Result<Vec<ColumnSummary>> {
    let mut summaries = Vec::new();
    for name in table.column_names() {
        let kind = table.kind(&name)?;
        if include == Include::Numeric && !kind.is_numeric() {
            continue;
        }
        let mut summary = ColumnSummary {
            count: table.non_null_count(&name)?,
            name,
            ..Default::default()
        };
        match kind {
            ColumnKind::Float => numeric_summary(table, &mut summary)?,
            ColumnKind::Date => {
                let present: Vec<_> = table.datetimes(&summary.name)?.into_iter().flatten().collect();
                summary.unique = Some(table.n_unique(&summary.name)?);
                summary.first = present.iter().min().map(|d| Value::Date(*d).to_string());
                summary.last = present.iter().max().map(|d| Value::Date(*d).to_string());
            }
            _ => {
                let frequencies = table.frequencies(&summary.name, false)?;
                summary.unique = Some(frequencies.len());
                if let Some((top, freq)) = frequencies.into_iter().next() {
                    summary.top = top;
                    summary.freq = Some(freq);
                }
            }
        }
        summaries.push(summary);
    }
    Ok(summaries)
}

fn numeric_summary(table: &Table, summary: &mut ColumnSummary) -> Result<()> {
    if summary.count == 0 {
        return Ok(());
    }
    let series = table.series(&summary.name)?.cast(&DataType::Float64)?;
    let ca = series.f64()?;
    summary.mean = ca.mean();
    summary.std = ca.std(1).or(Some(f64::NAN));
    summary.min = ca.min();
    summary.q25 = ca.quantile(0.25, QuantileMethod::Linear)?;
    summary.q50 = ca.quantile(0.5, QuantileMethod::Linear)?;
    summary.q75 = ca.quantile(0.75, QuantileMethod::Linear)?;
    summary.max = ca.max();
    Ok(())
}

/// Missing-value count per column, in column order
pub fn missing_counts(table: &Table) -> Vec<(String, usize)> {
    table
        .frame()
        .get_columns()
        .iter()
        .map(|c| (c.name().to_string(), c.null_count()))
        .collect()
}

/// Number of rows identical to an earlier row; missing cells compare equal
pub fn duplicate_count(table: &Table) -> Result<usize> {
    if table.n_cols() == 0 {
        return Ok(0);
    }
    let distinct = table
        .frame()
        .clone()
        .lazy()
        .unique_stable(None, UniqueKeepStrategy::First)
        .collect()?;
    Ok(table.n_rows() - distinct.height())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{float_series, text_series};
    use approx::assert_abs_diff_eq;

    fn sample() -> Table {
        Table::new(vec![
            text_series("coffee_name", &["Latte", "Latte", "Americano", "Latte"]),
            float_series("money", &[38.7, 38.7, 28.9, f64::NAN]),
        ])
        .unwrap()
    }

    #[test]
    fn test_info() {
        let i = info(&sample());
        assert_eq!(i[0].dtype, ColumnKind::Text);
        assert_eq!(i[1].non_null, 3);
    }

    #[test]
    fn test_describe_numeric_only() {
        let d = describe(&sample(), Include::Numeric).unwrap();
        assert_eq!(d.len(), 1);
        let money = &d[0];
        assert_eq!(money.count, 3);
        assert_abs_diff_eq!(money.mean.unwrap(), (38.7 * 2.0 + 28.9) / 3.0, epsilon = 1e-9);
        assert_eq!(money.min, Some(28.9));
        assert_eq!(money.max, Some(38.7));
        assert_abs_diff_eq!(money.q50.unwrap(), 38.7, epsilon = 1e-12);
        assert_abs_diff_eq!(money.q25.unwrap(), 33.8, epsilon = 1e-9);
        assert_abs_diff_eq!(money.std.unwrap(), 5.658032, epsilon = 1e-6);
    }

    #[test]
    fn test_describe_all() {
        let d = describe(&sample(), Include::All).unwrap();
        assert_eq!(d.len(), 2);
        let name = &d[0];
        assert_eq!(name.unique, Some(2));
        assert_eq!(name.top.as_deref(), Some("Latte"));
        assert_eq!(name.freq, Some(3));
        assert!(name.mean.is_none());
    }

    #[test]
    fn test_describe_all_missing_numeric() {
        let t = Table::new(vec![float_series("empty", &[f64::NAN, f64::NAN])]).unwrap();
        let d = describe(&t, Include::Numeric).unwrap();
        assert_eq!(d[0].count, 0);
        assert!(d[0].mean.is_none());
    }

    #[test]
    fn test_missing_and_duplicates() {
        let t = sample();
        assert_eq!(missing_counts(&t), vec![("coffee_name".to_string(), 0), ("money".to_string(), 1)]);
        assert_eq!(duplicate_count(&t).unwrap(), 1);

        let with_missing = Table::new(vec![
            text_series("a", &["", "", "x"]),
            float_series("b", &[f64::NAN, f64::NAN, 1.0]),
        ])
        .unwrap();
        assert_eq!(duplicate_count(&with_missing).unwrap(), 1);
    }
}
