//! Table transformations used by the analysis pipelines
//!
//! - [`coerce`]: numeric and date coercion where bad values become missing
//! - [`categorical`]: schema reduction to categorical columns
//! - [`aggregate`]: value counts, per-category sums and group medians
//! - [`pivot`]: date × entity pivots and removal of incomplete rows
//! - [`impute`], [`boolean`], [`clean`], [`datetime`]: survey cleaning steps

pub mod aggregate;
pub mod boolean;
pub mod categorical;
pub mod clean;
pub mod coerce;
pub mod datetime;
pub mod impute;
pub mod pivot;

pub use aggregate::{sum_by_category, value_counts, CategorySum, ValueCount};
pub use categorical::{reduce_schema, CategoryPolicy};
pub use clean::{drop_empty_rows, sort_by, SortKey};
pub use coerce::DateOrder;
pub use pivot::{pivot_sum, Pivot};
