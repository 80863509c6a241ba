//! Coercion of columns to numeric and date types
//!
//! Values that cannot be converted become missing rather than failing the
//! whole column.

use chrono::{NaiveDate, NaiveDateTime};
use eda_core::loader::parse_number;
use eda_core::{datetime_series, ColumnKind, Result, Table};
use polars::prelude::*;
use tracing::debug;

/// Field order assumed for ambiguous dates such as `01/02/2021`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateOrder {
    /// ISO year-month-day first, then month/day/year
    #[default]
    YearFirst,
    /// Day before month (`31.12.2020`, `31/12/2020`)
    DayFirst,
}

const ISO_DATETIME: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];
const ISO_DATE: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];
const DAY_FIRST_DATETIME: &[&str] = &[
    "%d.%m.%Y %H:%M:%S",
    "%d.%m.%Y %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%d-%m-%Y %H:%M:%S",
    "%d-%m-%Y %H:%M",
];
const DAY_FIRST_DATE: &[&str] = &["%d.%m.%Y", "%d/%m/%Y", "%d-%m-%Y"];
const MONTH_FIRST_DATETIME: &[&str] = &["%m/%d/%Y %H:%M:%S", "%m/%d/%Y %H:%M"];
const MONTH_FIRST_DATE: &[&str] = &["%m/%d/%Y"];

/// Parse a timestamp or a plain date
pub fn parse_datetime(raw: &str, order: DateOrder) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    let (first_dt, first_d, second_dt, second_d) = match order {
        DateOrder::YearFirst => (MONTH_FIRST_DATETIME, MONTH_FIRST_DATE, DAY_FIRST_DATETIME, DAY_FIRST_DATE),
        DateOrder::DayFirst => (DAY_FIRST_DATETIME, DAY_FIRST_DATE, MONTH_FIRST_DATETIME, MONTH_FIRST_DATE),
    };
    let datetime_formats = ISO_DATETIME.iter().chain(first_dt).chain(second_dt);
    for fmt in datetime_formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    let date_formats = ISO_DATE.iter().chain(first_d).chain(second_d);
    for fmt in date_formats {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }
    None
}

/// Convert a column to `Float`, returning how many present values were lost
pub fn coerce_numeric(table: &mut Table, name: &str) -> Result<usize> {
    let before = table.non_null_count(name)?;
    let series = match table.kind(name)? {
        ColumnKind::Float => return Ok(0),
        ColumnKind::Bool => table.series(name)?.cast(&DataType::Float64)?,
        _ => {
            let parsed: Vec<Option<f64>> = table
                .labels(name)?
                .iter()
                .map(|label| label.as_deref().and_then(parse_number))
                .collect();
            Series::new(name.into(), parsed)
        }
    };
    let lost = before - (series.len() - series.null_count());
    table.upsert(series)?;
    debug!(column = name, lost, "coerced to numeric");
    Ok(lost)
}

/// Convert a column to `Date`, returning how many present values were lost
pub fn coerce_dates(table: &mut Table, name: &str, order: DateOrder) -> Result<usize> {
    if table.kind(name)? == ColumnKind::Date {
        return Ok(0);
    }
    let before = table.non_null_count(name)?;
    let parsed: Vec<Option<NaiveDateTime>> = table
        .labels(name)?
        .iter()
        .map(|label| label.as_deref().and_then(|s| parse_datetime(s, order)))
        .collect();
    let after = parsed.iter().flatten().count();
    table.upsert(datetime_series(name, &parsed)?)?;
    let lost = before - after;
    debug!(column = name, lost, "coerced to dates");
    Ok(lost)
}

/// Coerce every present column among `names`; absent ones are skipped
pub fn coerce_numeric_columns(table: &mut Table, names: &[String]) -> Result<Vec<String>> {
    let mut converted = Vec::new();
    for name in names {
        if table.has_column(name) {
            coerce_numeric(table, name)?;
            converted.push(name.clone());
        }
    }
    Ok(converted)
}
