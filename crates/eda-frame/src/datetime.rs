//! Splitting a timestamp column into calendar parts

use crate::coerce::{coerce_dates, DateOrder};
use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};
use eda_core::{Result, Table};
use polars::prelude::*;

/// Calendar columns added by [`expand_datetime`]
pub const PART_COLUMNS: [&str; 5] = ["year", "month", "day", "hour", "weekday"];

fn weekday_name(d: Weekday) -> &'static str {
    match d {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Parse `source` into a new date column `target` and add `year`, `month`,
/// `day`, `hour` and `weekday` columns
///
/// Returns how many present values of `source` failed to parse. Existing
/// columns with the same names are replaced.
pub fn expand_datetime(table: &mut Table, source: &str, target: &str, order: DateOrder) -> Result<usize> {
    let mut copied = table.series(source)?.clone();
    copied.rename(target.into());
    table.upsert(copied)?;
    let lost = coerce_dates(table, target, order)?;

    let dates = table.datetimes(target)?;
    let part = |name: &str, f: fn(&NaiveDateTime) -> f64| -> Series {
        let values: Vec<Option<f64>> = dates.iter().map(|d| d.as_ref().map(f)).collect();
        Series::new(name.into(), values)
    };
    let weekdays: Vec<Option<&str>> = dates
        .iter()
        .map(|d| d.map(|d| weekday_name(d.weekday())))
        .collect();
    let parts = [
        part(PART_COLUMNS[0], |d| d.year() as f64),
        part(PART_COLUMNS[1], |d| d.month() as f64),
        part(PART_COLUMNS[2], |d| d.day() as f64),
        part(PART_COLUMNS[3], |d| d.hour() as f64),
        Series::new(PART_COLUMNS[4].into(), weekdays),
    ];
    for series in parts {
        table.upsert(series)?;
    }
    Ok(lost)
}
