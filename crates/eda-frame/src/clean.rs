//! Row removal and multi-key sorting

use eda_core::{Result, Table};
use polars::prelude::*;

/// Remove rows whose every cell is missing, returning how many were removed
pub fn drop_empty_rows(table: &mut Table) -> Result<usize> {
    let before = table.n_rows();
    let mut keep = BooleanChunked::full("keep".into(), false, before);
    for column in table.frame().get_columns() {
        keep = &keep | &column.as_materialized_series().is_not_null();
    }
    *table = table.filter(&keep)?;
    Ok(before - table.n_rows())
}

/// One sort key; missing values always sort last regardless of direction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub column: String,
    pub descending: bool,
}

impl SortKey {
    pub fn ascending(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            descending: false,
        }
    }

    pub fn descending(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            descending: true,
        }
    }
}

/// Stable sort of the rows by the given keys, in priority order
pub fn sort_by(table: &Table, keys: &[SortKey]) -> Result<Table> {
    for key in keys {
        table.series(&key.column)?;
    }
    if keys.is_empty() {
        return Ok(table.clone());
    }
    let by: Vec<PlSmallStr> = keys.iter().map(|k| k.column.as_str().into()).collect();
    let options = SortMultipleOptions::default()
        .with_order_descending_multi(keys.iter().map(|k| k.descending))
        .with_nulls_last(true)
        .with_maintain_order(true);
    Ok(Table::from(table.frame().sort(by, options)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use eda_core::{bool_series, float_series, text_series, Value};

    fn sample() -> Table {
        Table::new(vec![
            float_series("Age", &[30.0, 20.0, f64::NAN, 20.0, 30.0]),
            bool_series(
                "Do you smoke?",
                &[Some(false), Some(false), Some(true), Some(true), None],
            ),
        ])
        .unwrap()
    }

    #[test]
    fn test_sort_mixed_directions_missing_last() {
        let sorted = sort_by(
            &sample(),
            &[SortKey::ascending("Age"), SortKey::descending("Do you smoke?")],
        )
        .unwrap();
        let ages = sorted.values("Age").unwrap();
        assert_eq!(ages[0], Value::Float(20.0));
        assert_eq!(ages[4], Value::Missing);
        let smoke = sorted.values("Do you smoke?").unwrap();
        assert_eq!(smoke[0], Value::Bool(true));
        assert_eq!(smoke[1], Value::Bool(false));
        assert_eq!(smoke[2], Value::Bool(false));
        assert_eq!(smoke[3], Value::Missing);
    }

    #[test]
    fn test_sort_unknown_column_is_error() {
        let err = sort_by(&sample(), &[SortKey::ascending("Height")]).unwrap_err();
        assert!(err.is_missing_column());
    }

    #[test]
    fn test_drop_empty_rows() {
        let mut t = Table::new(vec![
            float_series("a", &[1.0, f64::NAN, f64::NAN]),
            text_series("b", &["x", "", "y"]),
        ])
        .unwrap();
        assert_eq!(drop_empty_rows(&mut t).unwrap(), 1);
        assert_eq!(t.n_rows(), 2);
        assert_eq!(drop_empty_rows(&mut t).unwrap(), 0);
    }
}
