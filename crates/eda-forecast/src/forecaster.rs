//! Forecasting policy: smoothing when possible, flat continuation otherwise

use crate::holt::HoltLinear;
use crate::series::DailySeries;
use chrono::NaiveDate;
use eda_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

/// When and how far to forecast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastPolicy {
    pub horizon: usize,
    /// Smoothing needs strictly more observations than this
    pub min_observations: usize,
    /// Fit the smoothing model at all; when false every forecast is flat
    pub smoothing: bool,
    pub model: HoltLinear,
}

impl Default for ForecastPolicy {
    fn default() -> Self {
        Self {
            horizon: 14,
            min_observations: 5,
            smoothing: true,
            model: HoltLinear::default(),
        }
    }
}

/// Why a forecast repeats the last value
#[derive(Debug, Clone, PartialEq)]
pub enum FallbackReason {
    Disabled,
    InsufficientHistory { observed: usize, required: usize },
    FitFailed(String),
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disabled => f.write_str("smoothing disabled"),
            Self::InsufficientHistory { observed, required } => {
                write!(f, "{observed} observations, more than {required} required")
            }
            Self::FitFailed(e) => write!(f, "fit failed: {e}"),
        }
    }
}

/// How the forecast values were produced
#[derive(Debug, Clone, PartialEq)]
pub enum ForecastOutcome {
    Smoothed { alpha: f64, beta: f64, sse: f64 },
    Fallback { reason: FallbackReason },
}

impl fmt::Display for ForecastOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Smoothed { alpha, beta, sse } => {
                write!(f, "Holt additive trend (alpha={alpha:.3}, beta={beta:.3}, sse={sse:.4e})")
            }
            Self::Fallback { reason } => write!(f, "flat continuation ({reason})"),
        }
    }
}

/// Forecast values for the days after a series
#[derive(Debug, Clone, PartialEq)]
pub struct Forecast {
    pub dates: Vec<NaiveDate>,
    pub values: Vec<f64>,
    pub outcome: ForecastOutcome,
}

impl Forecast {
    pub fn is_fallback(&self) -> bool {
        matches!(self.outcome, ForecastOutcome::Fallback { .. })
    }

    /// The first `n` values
    pub fn head(&self, n: usize) -> &[f64] {
        &self.values[..n.min(self.values.len())]
    }
}

/// Applies a [`ForecastPolicy`] to daily series
#[derive(Debug, Clone, Default)]
pub struct Forecaster {
    policy: ForecastPolicy,
}

impl Forecaster {
    pub fn new(policy: ForecastPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &ForecastPolicy {
        &self.policy
    }

    /// Forecast `policy.horizon` days past the end of `series`
    ///
    /// Only an empty series is an error; a smoothing failure becomes a flat
    /// forecast with the reason attached.
    pub fn forecast(&self, series: &DailySeries) -> Result<Forecast> {
        let last = series.last_value().ok_or(Error::InsufficientData {
            expected: 1,
            actual: 0,
        })?;
        let horizon = self.policy.horizon;
        let dates = series.following_days(horizon);

        let reason = if !self.policy.smoothing {
            FallbackReason::Disabled
        } else if series.len() <= self.policy.min_observations {
            FallbackReason::InsufficientHistory {
                observed: series.len(),
                required: self.policy.min_observations,
            }
        } else {
            match self.policy.model.fit(series.values()) {
                Ok(fit) => {
                    let values = fit.forecast(horizon);
                    if values.iter().all(|v| v.is_finite()) {
                        return Ok(Forecast {
                            dates,
                            values,
                            outcome: ForecastOutcome::Smoothed {
                                alpha: fit.alpha,
                                beta: fit.beta,
                                sse: fit.sse,
                            },
                        });
                    }
                    FallbackReason::FitFailed("forecast is not finite".to_string())
                }
                Err(e) => FallbackReason::FitFailed(e.to_string()),
            }
        };

        match &reason {
            FallbackReason::FitFailed(e) => warn!(error = %e, "smoothing failed, using flat forecast"),
            other => debug!(reason = %other, "using flat forecast"),
        }
        Ok(Forecast {
            dates,
            values: vec![last; horizon],
            outcome: ForecastOutcome::Fallback { reason },
        })
    }
}
