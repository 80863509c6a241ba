//! Column-oriented table backed by a polars [`DataFrame`]
//!
//! [`Table`] owns the frame. Stages that transform whole columns go through
//! polars; stages that need per-row access read a column back as a typed
//! view (floats, labels, timestamps, [`Value`]s).

use crate::value::{ColumnKind, Value};
use crate::{Error, Result};
use chrono::{DateTime, NaiveDateTime};
use polars::prelude::*;
use std::cmp::Reverse;
use std::collections::HashMap;

/// Unit of every timestamp column
pub const TIME_UNIT: TimeUnit = TimeUnit::Microseconds;

/// Text column; empty strings become missing
pub fn text_series(name: &str, values: &[&str]) -> Series {
    let values: Vec<Option<&str>> = values
        .iter()
        .map(|v| (!v.is_empty()).then_some(*v))
        .collect();
    Series::new(name.into(), values)
}

/// Float column; NaN becomes missing
pub fn float_series(name: &str, values: &[f64]) -> Series {
    let values: Vec<Option<f64>> = values
        .iter()
        .map(|v| (!v.is_nan()).then_some(*v))
        .collect();
    Series::new(name.into(), values)
}

pub fn bool_series(name: &str, values: &[Option<bool>]) -> Series {
    Series::new(name.into(), values)
}

/// Timestamp column without timezone
pub fn datetime_series(name: &str, values: &[Option<NaiveDateTime>]) -> Result<Series> {
    let micros: Vec<Option<i64>> = values
        .iter()
        .map(|d| d.map(|d| d.and_utc().timestamp_micros()))
        .collect();
    Ok(Series::new(name.into(), micros).cast(&DataType::Datetime(TIME_UNIT, None))?)
}

/// An owned frame with named, unique columns
#[derive(Debug, Clone)]
pub struct Table {
    df: DataFrame,
}

impl From<DataFrame> for Table {
    fn from(df: DataFrame) -> Self {
        Self { df }
    }
}

impl Table {
    /// Build from columns of equal length with unique names
    pub fn new(columns: Vec<Series>) -> Result<Self> {
        let df = DataFrame::new(columns.into_iter().map(Column::from).collect())?;
        Ok(Self { df })
    }

    pub fn frame(&self) -> &DataFrame {
        &self.df
    }

    pub fn into_frame(self) -> DataFrame {
        self.df
    }

    pub fn n_rows(&self) -> usize {
        self.df.height()
    }

    pub fn n_cols(&self) -> usize {
        self.df.width()
    }

    /// `(rows, columns)`
    pub fn shape(&self) -> (usize, usize) {
        (self.n_rows(), self.n_cols())
    }

    pub fn is_empty(&self) -> bool {
        self.n_rows() == 0
    }

    pub fn column_names(&self) -> Vec<String> {
        self.df
            .get_column_names()
            .into_iter()
            .map(|n| n.to_string())
            .collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.df.get_column_index(name).is_some()
    }

    /// First candidate that names a column of the table
    pub fn first_present<'a>(&self, candidates: &'a [String]) -> Option<&'a str> {
        candidates
            .iter()
            .map(String::as_str)
            .find(|c| self.has_column(c))
    }

    pub fn series(&self, name: &str) -> Result<&Series> {
        self.df
            .column(name)
            .map(Column::as_materialized_series)
            .map_err(|_| Error::ColumnNotFound(name.to_string()))
    }

    pub fn kind(&self, name: &str) -> Result<ColumnKind> {
        Ok(ColumnKind::of(self.series(name)?.dtype()))
    }

    /// Names of the columns of one kind, in table order
    pub fn columns_of_kind(&self, kind: ColumnKind) -> Vec<String> {
        self.df
            .get_columns()
            .iter()
            .filter(|c| ColumnKind::of(c.dtype()) == kind)
            .map(|c| c.name().to_string())
            .collect()
    }

    pub fn null_count(&self, name: &str) -> Result<usize> {
        Ok(self.series(name)?.null_count())
    }

    pub fn non_null_count(&self, name: &str) -> Result<usize> {
        let series = self.series(name)?;
        Ok(series.len() - series.null_count())
    }

    /// Distinct present values
    pub fn n_unique(&self, name: &str) -> Result<usize> {
        Ok(self.series(name)?.drop_nulls().n_unique()?)
    }

    fn expect_kind(&self, name: &str, expected: ColumnKind) -> Result<&Series> {
        let series = self.series(name)?;
        let kind = ColumnKind::of(series.dtype());
        if kind != expected {
            return Err(Error::type_mismatch(name, expected.name(), kind));
        }
        Ok(series)
    }

    /// Cells of a `Float` column; NaN reads as missing
    pub fn floats(&self, name: &str) -> Result<Vec<Option<f64>>> {
        let cast = self.expect_kind(name, ColumnKind::Float)?.cast(&DataType::Float64)?;
        Ok(cast
            .f64()?
            .into_iter()
            .map(|v| v.filter(|x| !x.is_nan()))
            .collect())
    }

    /// Present values of a `Float` column, in row order
    pub fn present_floats(&self, name: &str) -> Result<Vec<f64>> {
        Ok(self.floats(name)?.into_iter().flatten().collect())
    }

    /// Cells of a `Date` column
    pub fn datetimes(&self, name: &str) -> Result<Vec<Option<NaiveDateTime>>> {
        let micros = self
            .expect_kind(name, ColumnKind::Date)?
            .cast(&DataType::Datetime(TIME_UNIT, None))?
            .cast(&DataType::Int64)?;
        Ok(micros
            .i64()?
            .into_iter()
            .map(|v| v.and_then(DateTime::from_timestamp_micros).map(|d| d.naive_utc()))
            .collect())
    }

    /// Sorted categories of a `Category` column, including those no row
    /// uses any more
    pub fn categories(&self, name: &str) -> Result<Vec<String>> {
        let series = self.expect_kind(name, ColumnKind::Category)?;
        let mut categories: Vec<String> = series
            .categorical()?
            .get_rev_map()
            .get_categories()
            .values_iter()
            .map(str::to_string)
            .collect();
        categories.sort();
        Ok(categories)
    }

    /// Owned cells of any column
    pub fn values(&self, name: &str) -> Result<Vec<Value>> {
        let series = self.series(name)?;
        let values: Vec<Value> = match ColumnKind::of(series.dtype()) {
            ColumnKind::Float => self
                .floats(name)?
                .into_iter()
                .map(|v| v.map_or(Value::Missing, Value::Float))
                .collect(),
            ColumnKind::Bool => series
                .bool()?
                .into_iter()
                .map(|v| v.map_or(Value::Missing, Value::Bool))
                .collect(),
            ColumnKind::Date => self
                .datetimes(name)?
                .into_iter()
                .map(|v| v.map_or(Value::Missing, Value::Date))
                .collect(),
            ColumnKind::Text | ColumnKind::Category => {
                let text = series.cast(&DataType::String)?;
                let cells: Vec<Value> = text
                    .str()?
                    .into_iter()
                    .map(|v| v.map_or(Value::Missing, |s| Value::Text(s.to_string())))
                    .collect();
                cells
            }
        };
        Ok(values)
    }

    /// Display label of every cell; missing cells have none
    pub fn labels(&self, name: &str) -> Result<Vec<Option<String>>> {
        Ok(self.values(name)?.iter().map(Value::label).collect())
    }

    /// Count of each distinct label, most frequent first
    ///
    /// Ties keep first-appearance order. With `include_missing` the
    /// missing cells are counted under `None`.
    pub fn frequencies(&self, name: &str, include_missing: bool) -> Result<Vec<(Option<String>, usize)>> {
        let labels = self.labels(name)?;
        let mut first_seen: HashMap<Option<&str>, usize> = HashMap::new();
        for (i, label) in labels.iter().enumerate() {
            first_seen.entry(label.as_deref()).or_insert(i);
        }

        let counted = Series::new("value".into(), &labels).value_counts(false, false, "count".into(), false)?;
        let keys = counted.column("value")?.as_materialized_series().str()?;
        let counts = counted
            .column("count")?
            .as_materialized_series()
            .cast(&DataType::UInt64)?;
        let mut out: Vec<(Option<String>, usize)> = keys
            .into_iter()
            .zip(counts.u64()?.into_iter())
            .filter(|(key, _)| include_missing || key.is_some())
            .map(|(key, n)| (key.map(str::to_string), n.unwrap_or(0) as usize))
            .collect();
        out.sort_by_key(|(key, n)| {
            let seen = first_seen.get(&key.as_deref()).copied().unwrap_or(usize::MAX);
            (Reverse(*n), seen)
        });
        Ok(out)
    }

    /// Add a column, or replace the one with the same name in place
    pub fn upsert(&mut self, series: Series) -> Result<()> {
        self.df.with_column(series)?;
        Ok(())
    }

    pub fn head(&self, n: usize) -> Table {
        Table::from(self.df.head(Some(n)))
    }

    /// Rows where `mask` is true
    pub fn filter(&self, mask: &BooleanChunked) -> Result<Table> {
        Ok(Table::from(self.df.filter(mask)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample() -> Table {
        Table::new(vec![
            text_series("location", &["Poland", "Hungary", "", "Poland"]),
            float_series("total_cases", &[1.0, f64::NAN, 3.0, 4.0]),
            bool_series("flag", &[Some(true), None, Some(false), Some(true)]),
        ])
        .unwrap()
    }

    #[test]
    fn test_shape_and_lookup() {
        let t = sample();
        assert_eq!(t.shape(), (4, 3));
        assert_eq!(t.column_names(), vec!["location", "total_cases", "flag"]);
        assert!(t.has_column("flag"));
        assert!(t.series("nope").unwrap_err().is_missing_column());
        let candidates = vec!["country".to_string(), "location".to_string()];
        assert_eq!(t.first_present(&candidates), Some("location"));
    }

    #[test]
    fn test_kinds_and_counts() {
        let t = sample();
        assert_eq!(t.kind("location").unwrap(), ColumnKind::Text);
        assert_eq!(t.kind("total_cases").unwrap(), ColumnKind::Float);
        assert_eq!(t.columns_of_kind(ColumnKind::Bool), vec!["flag"]);
        assert_eq!(t.null_count("location").unwrap(), 1);
        assert_eq!(t.non_null_count("total_cases").unwrap(), 3);
        assert_eq!(t.n_unique("location").unwrap(), 2);
    }

    #[test]
    fn test_typed_views() {
        let t = sample();
        assert_eq!(t.floats("total_cases").unwrap(), vec![Some(1.0), None, Some(3.0), Some(4.0)]);
        assert_eq!(t.present_floats("total_cases").unwrap(), vec![1.0, 3.0, 4.0]);
        assert!(t.floats("location").is_err());
        assert_eq!(t.values("flag").unwrap()[1], Value::Missing);
        assert_eq!(
            t.labels("total_cases").unwrap(),
            vec![Some("1.0".to_string()), None, Some("3.0".to_string()), Some("4.0".to_string())]
        );
    }

    #[test]
    fn test_datetime_round_trip() {
        let d = NaiveDate::from_ymd_opt(2021, 3, 5).unwrap().and_hms_opt(14, 20, 0).unwrap();
        let mut t = sample();
        t.upsert(datetime_series("when", &[Some(d), None, None, Some(d)]).unwrap())
            .unwrap();
        assert_eq!(t.kind("when").unwrap(), ColumnKind::Date);
        assert_eq!(t.datetimes("when").unwrap()[0], Some(d));
        assert_eq!(t.labels("when").unwrap()[3].as_deref(), Some("2021-03-05 14:20:00"));
    }

    #[test]
    fn test_frequencies_order() {
        let t = Table::new(vec![text_series("c", &["b", "a", "", "a", "b", "c"])]).unwrap();
        let freq = t.frequencies("c", true).unwrap();
        assert_eq!(freq[0], (Some("b".to_string()), 2));
        assert_eq!(freq[1], (Some("a".to_string()), 2));
        assert_eq!(freq[2], (None, 1));
        assert_eq!(freq[3], (Some("c".to_string()), 1));
        assert_eq!(t.frequencies("c", false).unwrap().len(), 3);
    }

    #[test]
    fn test_upsert_replaces_in_place() {
        let mut t = sample();
        t.upsert(float_series("location", &[1.0, 2.0, 3.0, 4.0])).unwrap();
        assert_eq!(t.column_names()[0], "location");
        assert_eq!(t.kind("location").unwrap(), ColumnKind::Float);
        assert!(t.upsert(float_series("short", &[1.0, 2.0])).is_err());
    }

    #[test]
    fn test_new_rejects_duplicates() {
        let dup = Table::new(vec![float_series("a", &[1.0]), float_series("a", &[2.0])]);
        assert!(dup.is_err());
    }
}
