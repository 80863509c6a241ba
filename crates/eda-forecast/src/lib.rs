//! Short-horizon forecasting of daily totals
//!
//! A [`DailySeries`] is built by resampling dated observations to one value
//! per day. The [`Forecaster`] then fits Holt's additive-trend smoothing
//! when the history is long enough and falls back to repeating the last
//! value otherwise. The outcome always says which path was taken and why.
//!
//! ```rust
//! use chrono::NaiveDate;
//! use eda_forecast::{DailySeries, Forecaster};
//!
//! let start = NaiveDate::from_ymd_opt(2021, 1, 1).unwrap();
//! let series = DailySeries::new(start, vec![5.0, 6.0, 7.0, 8.0, 9.0, 10.0, 11.0]);
//! let forecast = Forecaster::default().forecast(&series).unwrap();
//! assert_eq!(forecast.values.len(), 14);
//! assert!(!forecast.is_fallback());
//! ```

pub mod forecaster;
pub mod holt;
pub mod series;

pub use forecaster::{FallbackReason, Forecast, ForecastOutcome, ForecastPolicy, Forecaster};
pub use holt::{HoltFit, HoltLinear};
pub use series::DailySeries;
