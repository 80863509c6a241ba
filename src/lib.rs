//! Exploratory analysis programs over fixed tabular datasets
//!
//! - [`owid`]: the OWID COVID-19 pipeline from loading to group forecasts
//! - [`survey`]: the interactive COVID survey session
//! - [`coffee`]: the coffee sales overview
//!
//! The building blocks live in the `eda-*` crates; this crate wires them
//! together, holds the [`config`] and writes the reports.

pub mod cli;
pub mod coffee;
pub mod config;
pub mod owid;
pub mod report;
pub mod survey;
pub mod telemetry;

pub use config::{EntityGroup, OwidConfig, SurveyConfig};
pub use owid::OwidReport;
pub use survey::{run_menu, Action, SurveySession};
