//! OWID COVID-19 pipeline: load, reduce, aggregate, pivot, match, correlate
//! and forecast
//!
//! Each stage writes its part of the report to `out` and returns what it
//! computed, so later stages and tests can work with typed results.

use crate::config::{EntityGroup, OwidConfig};
use crate::report::{float_list, name_list, thousands};
use eda_core::display::{render_counts, render_grid};
use eda_core::{format_float, loader, ColumnKind, Error, Result, Table};
use eda_correlation::{Comparison, StatisticalComparator};
use eda_forecast::{DailySeries, Forecast, Forecaster};
use eda_frame::coerce::{coerce_dates, coerce_numeric_columns};
use eda_frame::{pivot_sum, reduce_schema, sum_by_category, value_counts, DateOrder, Pivot};
use eda_match::EntityMatcher;
use std::io::Write;
use std::path::Path;
use tracing::{info, warn};

/// Columns the later stages rely on
#[derive(Debug, Clone, PartialEq)]
pub struct Prepared {
    pub date_column: Option<String>,
    pub numeric_columns: Vec<String>,
}

/// Outcome of comparing the base entity with one other entity
#[derive(Debug, Clone, PartialEq)]
pub enum ComparisonOutcome {
    Compared {
        base: String,
        other: String,
        comparison: Comparison,
    },
    /// Correlation was undefined, e.g. a constant series
    Failed {
        base: String,
        other: String,
        reason: String,
    },
    NotFound {
        name: String,
    },
}

/// Forecast of one entity group
#[derive(Debug, Clone, PartialEq)]
pub struct GroupForecast {
    pub name: String,
    /// Matched pivot columns, duplicates kept
    pub present: Vec<String>,
    pub history_tail: Vec<f64>,
    /// `None` when no member matched
    pub forecast: Option<Forecast>,
}

/// Everything the pipeline computed
#[derive(Debug, Clone)]
pub struct OwidReport {
    pub categorical: Vec<String>,
    pub metric: String,
    pub entity: String,
    pub pivot: Pivot,
    pub dense: Pivot,
    /// `None` when the base entity has no match
    pub base_match: Option<String>,
    pub comparisons: Vec<ComparisonOutcome>,
    pub forecasts: Vec<GroupForecast>,
}

/// Stage 1: coerce the date column and the numeric columns
pub fn prepare<W: Write>(table: &mut Table, config: &OwidConfig, out: &mut W) -> Result<Prepared> {
    writeln!(out, "Columns: {}", name_list(&table.column_names()))?;
    let date_column = table.first_present(&config.date_columns).map(str::to_string);
    match &date_column {
        Some(date) => {
            let lost = coerce_dates(table, date, DateOrder::YearFirst)?;
            if lost > 0 {
                warn!(column = %date, lost, "unparseable dates set to missing");
            }
        }
        None => warn!(candidates = ?config.date_columns, "no date column found"),
    }
    let numeric_columns = coerce_numeric_columns(table, &config.numeric_columns)?;
    Ok(Prepared {
        date_column,
        numeric_columns,
    })
}

/// Stage 2: convert low-cardinality text columns to categorical
pub fn reduce<W: Write>(table: &mut Table, config: &OwidConfig, out: &mut W) -> Result<Vec<String>> {
    let converted = reduce_schema(table, &config.categories)?;
    writeln!(out, "\n[2] Converted to category: {}", name_list(&converted))?;
    Ok(converted)
}

/// Stage 3: frequency tables, then per-category sums of the metric
///
/// Fails when no metric column is present.
pub fn aggregate<W: Write>(table: &Table, config: &OwidConfig, out: &mut W) -> Result<String> {
    writeln!(out, "\n[3] Value counts:")?;
    for key in &config.frequency_columns {
        if !table.has_column(key) {
            writeln!(out, "\n{key}: not present")?;
            continue;
        }
        let counts: Vec<(String, usize)> = value_counts(table, key, true)?
            .into_iter()
            .map(|vc| (vc.label.unwrap_or_else(|| "NaN".to_string()), vc.count))
            .collect();
        writeln!(out, "\n{key}:")?;
        write!(out, "{}", render_counts("count", &counts))?;
    }

    let metric = table
        .first_present(&config.metric_columns)
        .ok_or_else(|| Error::ColumnNotFound(config.metric_columns.join("/")))?
        .to_string();
    writeln!(out, "\n[4] Aggregation using '{metric}':")?;
    for group in table.columns_of_kind(ColumnKind::Category) {
        let sums = sum_by_category(table, &group, &metric)?;
        let rows: Vec<Vec<String>> = sums
            .iter()
            .take(config.top_n)
            .map(|s| vec![s.category.clone(), thousands(s.total)])
            .collect();
        writeln!(out, "\n- {group} (top {}):", config.top_n)?;
        write!(
            out,
            "{}",
            render_grid(&[group.clone(), format!("total_{metric}")], &rows)
        )?;
    }
    Ok(metric)
}

/// Stage 4: date × entity pivot of the metric and its dense version
///
/// Fails when no entity column or no date column is present.
pub fn reshape<W: Write>(
    table: &Table,
    config: &OwidConfig,
    prepared: &Prepared,
    metric: &str,
    out: &mut W,
) -> Result<(String, Pivot, Pivot)> {
    let entity = table
        .first_present(&config.entity_columns)
        .ok_or_else(|| Error::ColumnNotFound(config.entity_columns.join("/")))?
        .to_string();
    let date = prepared
        .date_column
        .as_deref()
        .ok_or_else(|| Error::ColumnNotFound(config.date_columns.join("/")))?;

    writeln!(out, "\n[5] Pivot by date x {entity} using '{metric}' (show head).")?;
    let pivot = pivot_sum(table, date, &entity, metric)?;
    writeln!(out, "Pivot shape: ({}, {})", pivot.n_rows(), pivot.n_cols())?;
    write!(out, "{}", pivot.render(config.preview_rows))?;

    let dense = pivot.drop_incomplete_rows();
    writeln!(
        out,
        "\n[6] After dropping incomplete rows shape: ({}, {}) -> ({}, {})",
        pivot.n_rows(),
        pivot.n_cols(),
        dense.n_rows(),
        dense.n_cols()
    )?;
    writeln!(out, "Dense pivot head:")?;
    write!(out, "{}", dense.render(config.preview_rows.saturating_sub(1)))?;
    info!(rows = pivot.n_rows(), dense_rows = dense.n_rows(), entities = pivot.n_cols(), "pivot built");
    Ok((entity, pivot, dense))
}

fn write_pairs<W: Write>(dense: &Pivot, base: &str, other: &str, n: usize, out: &mut W) -> Result<()> {
    let left = dense.column(base)?;
    let right = dense.column(other)?;
    let cell = |v: Option<f64>| v.map(format_float).unwrap_or_else(|| "NaN".to_string());
    let rows: Vec<Vec<String>> = dense
        .index()
        .iter()
        .zip(left.into_iter().zip(right))
        .take(n)
        .map(|(d, (l, r))| vec![d.date().to_string(), cell(l), cell(r)])
        .collect();
    let headers = vec!["date".to_string(), base.to_string(), other.to_string()];
    write!(out, "{}", render_grid(&headers, &rows))?;
    Ok(())
}

/// Stage 5: correlate the base entity with each compared entity on the
/// dense pivot
pub fn compare<W: Write>(
    dense: &Pivot,
    config: &OwidConfig,
    matcher: &EntityMatcher,
    out: &mut W,
) -> Result<(Option<String>, Vec<ComparisonOutcome>)> {
    let labels = dense.columns();
    let base = matcher.find(&config.base_entity, labels).map(|m| m.label);
    writeln!(
        out,
        "\n[7] Correlation tests: base={} -> matched: {}",
        config.base_entity,
        base.as_deref().unwrap_or("None")
    )?;
    let Some(base) = base else {
        writeln!(out, " Base entity not found in dataset")?;
        return Ok((None, Vec::new()));
    };

    let comparator = StatisticalComparator::new(config.comparator.clone());
    let base_values = dense.column_values(&base)?;
    let mut outcomes = Vec::new();
    for name in &config.compared_entities {
        let Some(found) = matcher.find(name, labels) else {
            writeln!(out, " Compare {name} -> not found")?;
            outcomes.push(ComparisonOutcome::NotFound { name: name.clone() });
            continue;
        };
        let other = found.label;
        let values = dense.column_values(&other)?;
        match comparator.compare(&base_values, &values) {
            Ok(comparison) => {
                let c = &comparison.correlation;
                writeln!(
                    out,
                    " {base} vs {other} -> method={}, r={:.4}, p={:.4e}",
                    c.method, c.coefficient, c.p_value
                )?;
                writeln!(out, "  normality: {base}: {}; {other}: {}", comparison.left, comparison.right)?;
                writeln!(out, "  sample pairs (first {}):", config.sample_pairs)?;
                write_pairs(dense, &base, &other, config.sample_pairs, out)?;
                outcomes.push(ComparisonOutcome::Compared {
                    base: base.clone(),
                    other,
                    comparison,
                });
            }
            Err(e) => {
                warn!(%base, %other, error = %e, "correlation failed");
                writeln!(out, " {base} vs {other} -> cannot correlate: {e}")?;
                outcomes.push(ComparisonOutcome::Failed {
                    base: base.clone(),
                    other,
                    reason: e.to_string(),
                });
            }
        }
    }
    Ok((Some(base), outcomes))
}

/// Summed daily series of the matched members of a group
///
/// Members keep their order and duplicates; each duplicate adds its column
/// again. Returns `None` when nothing matched.
pub fn group_series(
    pivot: &Pivot,
    group: &EntityGroup,
    matcher: &EntityMatcher,
) -> Result<Option<(Vec<String>, DailySeries)>> {
    let present: Vec<String> = group
        .members
        .iter()
        .filter_map(|m| matcher.find(m, pivot.columns()).map(|found| found.label))
        .collect();
    if present.is_empty() || pivot.is_empty() {
        return Ok(None);
    }
    let positions: Vec<usize> = present
        .iter()
        .filter_map(|label| pivot.column_position(label))
        .collect();
    let observations: Vec<_> = pivot
        .index()
        .iter()
        .zip(pivot.row_sums(&positions))
        .map(|(d, v)| (d.date(), Some(v)))
        .collect();
    Ok(Some((present, DailySeries::resample(&observations)?)))
}

/// Stage 6: forecast every entity group from the full pivot
pub fn forecast_groups<W: Write>(
    pivot: &Pivot,
    config: &OwidConfig,
    matcher: &EntityMatcher,
    out: &mut W,
) -> Result<Vec<GroupForecast>> {
    let forecaster = Forecaster::new(config.forecast.clone());
    writeln!(
        out,
        "\n[8] Forecasting ({} days) for groups: history tail ({}) + forecast head ({})",
        config.forecast.horizon, config.history_tail, config.forecast_head
    )?;

    let mut results = Vec::with_capacity(config.groups.len());
    for group in &config.groups {
        let Some((present, series)) = group_series(pivot, group, matcher)? else {
            writeln!(out, "\n{}: no entities found in dataset", group.name)?;
            results.push(GroupForecast {
                name: group.name.clone(),
                present: Vec::new(),
                history_tail: Vec::new(),
                forecast: None,
            });
            continue;
        };
        let history_tail = series.tail(config.history_tail).to_vec();
        writeln!(out, "\nGroup {} -> present: {}", group.name, name_list(&present))?;
        writeln!(out, " History last {}: {}", config.history_tail, float_list(&history_tail))?;

        let forecast = forecaster.forecast(&series)?;
        writeln!(
            out,
            " Forecast next {}: {}",
            config.forecast_head,
            float_list(forecast.head(config.forecast_head))
        )?;
        writeln!(out, " Model: {}", forecast.outcome)?;
        results.push(GroupForecast {
            name: group.name.clone(),
            present,
            history_tail,
            forecast: Some(forecast),
        });
    }
    Ok(results)
}

/// Run every stage on an already loaded table
pub fn run_table<W: Write>(mut table: Table, config: &OwidConfig, out: &mut W) -> Result<OwidReport> {
    let matcher = EntityMatcher::new(config.fuzzy_cutoff)?;
    let prepared = prepare(&mut table, config, out)?;
    let categorical = reduce(&mut table, config, out)?;
    let metric = aggregate(&table, config, out)?;
    let (entity, pivot, dense) = reshape(&table, config, &prepared, &metric, out)?;
    let (base_match, comparisons) = compare(&dense, config, &matcher, out)?;
    let forecasts = forecast_groups(&pivot, config, &matcher, out)?;
    writeln!(out, "\n--- DONE ---")?;
    Ok(OwidReport {
        categorical,
        metric,
        entity,
        pivot,
        dense,
        base_match,
        comparisons,
        forecasts,
    })
}

/// Load `path` and run the pipeline
pub fn run<P: AsRef<Path>, W: Write>(path: P, config: &OwidConfig, out: &mut W) -> Result<OwidReport> {
    writeln!(out, "Loading: {}", path.as_ref().display())?;
    let table = loader::read_csv(path)?;
    run_table(table, config, out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use eda_core::text_series;

    fn owid_table() -> Table {
        let mut dates = Vec::new();
        let mut locations = Vec::new();
        let mut cases = Vec::new();
        let mut continents = Vec::new();
        for day in 1..=20 {
            for (loc, scale) in [("Poland", 10.0), ("Hungary", 4.0), ("Czechia", 6.0)] {
                dates.push(format!("2021-03-{day:02}"));
                locations.push(loc);
                continents.push("Europe");
                cases.push(scale * (day * day) as f64 + if loc == "Hungary" { (day % 3) as f64 } else { 0.0 });
            }
        }
        let date_refs: Vec<&str> = dates.iter().map(String::as_str).collect();
        let case_strs: Vec<String> = cases.iter().map(|c| c.to_string()).collect();
        let case_refs: Vec<&str> = case_strs.iter().map(String::as_str).collect();
        Table::new(vec![
            text_series("date", &date_refs),
            text_series("location", &locations),
            text_series("continent", &continents),
            text_series("total_cases", &case_refs),
        ])
        .unwrap()
    }

    #[test]
    fn test_pipeline_stages() {
        let mut out = Vec::new();
        let report = run_table(owid_table(), &OwidConfig::default(), &mut out).unwrap();
        assert_eq!(report.metric, "total_cases");
        assert_eq!(report.entity, "location");
        assert_eq!(report.pivot.columns(), &["Czechia", "Hungary", "Poland"]);
        assert_eq!(report.pivot.n_rows(), 20);
        assert!(report.dense.is_dense());
        assert_eq!(report.base_match.as_deref(), Some("Poland"));

        let compared: Vec<&str> = report
            .comparisons
            .iter()
            .filter_map(|c| match c {
                ComparisonOutcome::Compared { other, .. } => Some(other.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(compared, vec!["Hungary", "Czechia"]);
        assert!(report
            .comparisons
            .contains(&ComparisonOutcome::NotFound { name: "Slovakia".into() }));

        let eu4 = report.forecasts.iter().find(|g| g.name == "eu4").unwrap();
        assert_eq!(eu4.present, vec!["Poland", "Hungary", "Czechia"]);
        assert_eq!(eu4.forecast.as_ref().unwrap().values.len(), 14);
        let nafta = report.forecasts.iter().find(|g| g.name == "nafta").unwrap();
        assert!(nafta.forecast.is_none());

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("test_units: not present"));
        assert!(text.contains("Poland vs Hungary -> method="));
        assert!(text.contains("nafta: no entities found in dataset"));
    }

    #[test]
    fn test_missing_metric_is_error() {
        let table = Table::new(vec![
            text_series("date", &["2021-01-01"]),
            text_series("location", &["Poland"]),
        ])
        .unwrap();
        let err = run_table(table, &OwidConfig::default(), &mut Vec::new()).unwrap_err();
        assert!(err.is_missing_column());
    }

    #[test]
    fn test_missing_entity_is_error() {
        let table = Table::new(vec![
            text_series("date", &["2021-01-01"]),
            text_series("total_cases", &["5"]),
        ])
        .unwrap();
        let err = run_table(table, &OwidConfig::default(), &mut Vec::new()).unwrap_err();
        assert!(err.is_missing_column());
    }

    #[test]
    fn test_group_series_counts_duplicates() {
        let mut table = owid_table();
        let config = OwidConfig::default();
        let prepared = prepare(&mut table, &config, &mut Vec::new()).unwrap();
        let (_, pivot, _) = reshape(&table, &config, &prepared, "total_cases", &mut Vec::new()).unwrap();
        let matcher = EntityMatcher::default();
        let twice = EntityGroup::new("twice", &["Poland", "Poland"]);
        let (present, series) = group_series(&pivot, &twice, &matcher).unwrap().unwrap();
        assert_eq!(present, vec!["Poland", "Poland"]);
        assert_eq!(series.values()[0], 20.0);
        assert_eq!(series.len(), 20);
    }
}
