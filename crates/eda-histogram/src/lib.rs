//! Fixed-width histograms with text output
//!
//! [`FixedWidthBuilder`] bins a sample into equal-width bins (15 by
//! default) and [`histograms_by_group`] applies it to every group of a
//! table column. Results render as text bars, and [`plot_grouped`] draws
//! grouped histograms to an SVG chart.
//!
//! ```rust
//! use eda_histogram::{FixedWidthBuilder, HistogramBuilder};
//!
//! let data = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0];
//! let histogram = FixedWidthBuilder::new(5).build(&data).unwrap();
//! assert_eq!(histogram.counts(), vec![2, 2, 2, 2, 2]);
//! print!("{}", eda_histogram::render_histogram(&histogram, 20));
//! ```

pub mod builders;
pub mod grouped;
pub mod plot;
pub mod render;
pub mod traits;
pub mod types;

pub use builders::FixedWidthBuilder;
pub use grouped::{histograms_by_group, GroupedHistograms};
pub use plot::plot_grouped;
pub use render::{render_grouped, render_histogram};
pub use traits::HistogramBuilder;
pub use types::{Histogram, HistogramBin};
