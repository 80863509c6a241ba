//! Core table model for exploratory data analysis
//!
//! This crate provides the pieces every analysis stage shares:
//!
//! - [`Table`]: a polars `DataFrame` with typed views over its columns,
//!   plus the series builders used to assemble one
//! - [`ColumnKind`] and [`Value`]: the logical column kinds and owned cells
//! - [`loader`]: CSV reading with numeric type inference
//! - [`describe`]: `info`/`describe`-style summaries, missing counts and
//!   duplicate detection
//! - [`display`]: plain-text rendering for reports
//! - [`Error`]/[`Result`]: the error type used across the workspace
//!
//! # Example
//!
//! ```rust
//! use eda_core::{loader, describe::{describe, Include}};
//!
//! let csv = "location,total_cases\nPoland,10\nHungary,4\n";
//! let table = loader::read_csv_from_reader(csv.as_bytes(), &Default::default()).unwrap();
//! let summary = describe(&table, Include::Numeric).unwrap();
//! assert_eq!(summary[0].count, 2);
//! ```

pub mod describe;
pub mod display;
pub mod error;
pub mod loader;
pub mod table;
pub mod utils;
pub mod value;

pub use error::{Error, Result};
pub use table::{bool_series, datetime_series, float_series, text_series, Table};
pub use value::{format_float, ColumnKind, Value};
