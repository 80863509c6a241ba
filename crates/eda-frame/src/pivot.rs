//! Date × entity pivot of a numeric metric

use chrono::{DateTime, NaiveDateTime};
use eda_core::display::render_grid;
use eda_core::{format_float, Error, Result, Table, Value};
use polars::prelude::*;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Wide table: one row per date, one column per entity
///
/// Cells hold the sum of the source values that fell in the
/// `(date, entity)` cell; a cell with no present source value is `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct Pivot {
    index: Vec<NaiveDateTime>,
    columns: Vec<String>,
    /// Row-major cells, `index.len()` rows of `columns.len()` values
    cells: Vec<Vec<Option<f64>>>,
}

impl Pivot {
    pub fn new(
        index: Vec<NaiveDateTime>,
        columns: Vec<String>,
        cells: Vec<Vec<Option<f64>>>,
    ) -> Result<Self> {
        if cells.len() != index.len() {
            return Err(Error::size_mismatch(index.len(), cells.len(), "pivot rows"));
        }
        if let Some(row) = cells.iter().find(|r| r.len() != columns.len()) {
            return Err(Error::size_mismatch(columns.len(), row.len(), "pivot row width"));
        }
        Ok(Self {
            index,
            columns,
            cells,
        })
    }

    pub fn index(&self) -> &[NaiveDateTime] {
        &self.index
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn n_rows(&self) -> usize {
        self.index.len()
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn column_position(&self, label: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == label)
    }

    /// Cells of one entity column, in date order
    pub fn column(&self, label: &str) -> Result<Vec<Option<f64>>> {
        let j = self
            .column_position(label)
            .ok_or_else(|| Error::ColumnNotFound(label.to_string()))?;
        Ok(self.cells.iter().map(|row| row[j]).collect())
    }

    /// Present values of one entity column, in date order
    pub fn column_values(&self, label: &str) -> Result<Vec<f64>> {
        Ok(self.column(label)?.into_iter().flatten().collect())
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<f64> {
        self.cells.get(row).and_then(|r| r.get(col)).copied().flatten()
    }

    /// Per-date sum over the given columns, missing cells counting as 0
    ///
    /// Column positions may repeat; a repeated column is added once per
    /// occurrence.
    pub fn row_sums(&self, positions: &[usize]) -> Vec<f64> {
        self.cells
            .iter()
            .map(|row| positions.iter().map(|&j| row[j].unwrap_or(0.0)).sum())
            .collect()
    }

    /// True when no cell is missing
    pub fn is_dense(&self) -> bool {
        self.cells.iter().all(|row| row.iter().all(Option::is_some))
    }

    /// Copy without the rows that contain any missing cell
    pub fn drop_incomplete_rows(&self) -> Pivot {
        let (index, cells): (Vec<_>, Vec<_>) = self
            .index
            .iter()
            .zip(&self.cells)
            .filter(|(_, row)| row.iter().all(Option::is_some))
            .map(|(d, row)| (*d, row.clone()))
            .unzip();
        debug!(before = self.n_rows(), after = index.len(), "dropped incomplete pivot rows");
        Pivot {
            index,
            columns: self.columns.clone(),
            cells,
        }
    }

    /// Text rendering of the first `max_rows` rows
    pub fn render(&self, max_rows: usize) -> String {
        let mut headers = vec!["date".to_string()];
        headers.extend(self.columns.iter().cloned());
        let rows: Vec<Vec<String>> = self
            .index
            .iter()
            .zip(&self.cells)
            .take(max_rows)
            .map(|(d, row)| {
                let mut out = vec![Value::Date(*d).to_string()];
                out.extend(row.iter().map(|v| v.map(format_float).unwrap_or_else(|| "NaN".into())));
                out
            })
            .collect();
        let mut out = render_grid(&headers, &rows);
        if self.n_rows() > max_rows {
            out.push_str(&format!("... ({} rows x {} columns)\n", self.n_rows(), self.n_cols()));
        }
        out
    }
}

/// Pivot `value_col` summed by (`index_col`, `column_col`)
///
/// `index_col` must hold dates and `value_col` floats. Rows with a missing
/// date or entity are ignored. Dates and entity labels come out sorted.
pub fn pivot_sum(table: &Table, index_col: &str, column_col: &str, value_col: &str) -> Result<Pivot> {
    let micros: Vec<Option<i64>> = table
        .datetimes(index_col)?
        .iter()
        .map(|d| d.map(|d| d.and_utc().timestamp_micros()))
        .collect();
    let long = df!(
        "date" => micros,
        "entity" => table.labels(column_col)?,
        "value" => table.floats(value_col)?,
    )?;
    let cells = long
        .lazy()
        .filter(col("date").is_not_null().and(col("entity").is_not_null()))
        .group_by([col("date"), col("entity")])
        .agg([
            col("value").sum().alias("sum"),
            col("value").count().cast(DataType::UInt64).alias("present"),
        ])
        .collect()?;

    let dates = cells.column("date")?.as_materialized_series().i64()?;
    let entities = cells.column("entity")?.as_materialized_series().str()?;
    let totals = cells.column("sum")?.as_materialized_series().f64()?;
    let present = cells.column("present")?.as_materialized_series().u64()?;

    let mut sums: BTreeMap<(i64, &str), f64> = BTreeMap::new();
    let mut index: BTreeSet<i64> = BTreeSet::new();
    let mut columns: BTreeSet<&str> = BTreeSet::new();
    for (((date, entity), total), n) in dates.into_iter().zip(entities).zip(totals).zip(present) {
        let (Some(date), Some(entity)) = (date, entity) else {
            continue;
        };
        index.insert(date);
        columns.insert(entity);
        if n.unwrap_or(0) > 0 {
            sums.insert((date, entity), total.unwrap_or(0.0));
        }
    }

    let cells = index
        .iter()
        .map(|d| columns.iter().map(|c| sums.get(&(*d, *c)).copied()).collect())
        .collect();
    let index = index
        .into_iter()
        .map(|micros| {
            DateTime::from_timestamp_micros(micros)
                .map(|d| d.naive_utc())
                .ok_or_else(|| Error::InvalidInput(format!("timestamp out of range: {micros}")))
        })
        .collect::<Result<Vec<_>>>()?;
    let columns: Vec<String> = columns.into_iter().map(str::to_string).collect();
    debug!(rows = index.len(), cols = columns.len(), "built pivot");
    Pivot::new(index, columns, cells)
}
