//! SVG charts of grouped histograms
//!
//! One row of panels per [`GroupedHistograms`], one panel per group, each
//! drawn as bars over the group's own bin range.

use crate::grouped::GroupedHistograms;
use crate::types::Histogram;
use eda_core::{Error, Result};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;
use tracing::info;

const PANEL_WIDTH: u32 = 420;
const PANEL_HEIGHT: u32 = 300;

/// Write every grouping to one SVG file at `path`
pub fn plot_grouped<P: AsRef<Path>>(grouped: &[GroupedHistograms], path: P) -> Result<()> {
    let path = path.as_ref();
    let n_rows = grouped.len().max(1);
    let n_cols = grouped.iter().map(|g| g.groups.len()).max().unwrap_or(0).max(1);
    let size = (PANEL_WIDTH * n_cols as u32, PANEL_HEIGHT * n_rows as u32);

    let root = SVGBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE).map_err(plot_error)?;
    let panels = root.split_evenly((n_rows, n_cols));
    for (row, g) in grouped.iter().enumerate() {
        for (col, (label, histogram)) in g.groups.iter().enumerate() {
            let caption = format!("{} = {label} (n={})", g.group, histogram.total_count());
            draw_panel(&panels[row * n_cols + col], &caption, &g.value, histogram)?;
        }
    }
    root.present().map_err(plot_error)?;
    info!(path = %path.display(), panels = grouped.iter().map(|g| g.groups.len()).sum::<usize>(), "wrote histogram chart");
    Ok(())
}

fn draw_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    caption: &str,
    value: &str,
    histogram: &Histogram,
) -> Result<()> {
    let (low, high) = x_range(histogram);
    let top = histogram.max_count().max(1) as f64 * 1.1;
    let mut chart = ChartBuilder::on(area)
        .caption(caption, ("sans-serif", 16))
        .margin(8)
        .x_label_area_size(30)
        .y_label_area_size(40)
        .build_cartesian_2d(low..high, 0.0..top)
        .map_err(plot_error)?;
    chart
        .configure_mesh()
        .x_desc(value)
        .y_desc("count")
        .draw()
        .map_err(plot_error)?;
    chart
        .draw_series(histogram.bins().iter().map(|bin| {
            Rectangle::new([(bin.left, 0.0), (bin.right, bin.count as f64)], BLUE.mix(0.6).filled())
        }))
        .map_err(plot_error)?;
    Ok(())
}

/// Horizontal extent of the bins; a unit range when there are none
fn x_range(histogram: &Histogram) -> (f64, f64) {
    match (histogram.bins().first(), histogram.bins().last()) {
        (Some(first), Some(last)) if last.right > first.left => (first.left, last.right),
        _ => (0.0, 1.0),
    }
}

fn plot_error<E: std::error::Error + Send + Sync>(e: DrawingAreaErrorKind<E>) -> Error {
    Error::Computation(format!("plotting failed: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::FixedWidthBuilder;
    use crate::grouped::histograms_by_group;
    use eda_core::{bool_series, float_series, Table};

    #[test]
    fn test_plot_writes_one_panel_per_group() {
        let table = Table::new(vec![
            float_series("temp", &[36.6, 38.0, 37.1, 39.0, 36.9]),
            bool_series("smoker", &[Some(true), Some(false), Some(true), None, Some(false)]),
        ])
        .unwrap();
        let grouped = histograms_by_group(&table, "temp", "smoker", &FixedWidthBuilder::new(4)).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("temperature_histograms.svg");
        plot_grouped(&[grouped], &path).unwrap();

        let svg = std::fs::read_to_string(&path).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("smoker = False (n=2)"));
        assert!(svg.contains("smoker = True (n=2)"));
    }

    #[test]
    fn test_empty_histogram_gets_unit_range() {
        assert_eq!(x_range(&Histogram::empty()), (0.0, 1.0));
    }

    #[test]
    fn test_unwritable_path_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("chart.svg");
        assert!(plot_grouped(&[], &path).is_err());
    }
}
