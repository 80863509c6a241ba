use approx::assert_abs_diff_eq;
use chrono::NaiveDate;
use eda_forecast::{DailySeries, FallbackReason, ForecastOutcome, ForecastPolicy, Forecaster};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

fn day(offset: i64) -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 3, 1).unwrap() + chrono::Duration::days(offset)
}

#[test]
fn test_sparse_observations_resample_then_forecast() {
    let obs: Vec<(NaiveDate, Option<f64>)> = (0..30)
        .filter(|i| i % 3 != 1)
        .map(|i| (day(i), Some(100.0 + 4.0 * i as f64)))
        .collect();
    let series = DailySeries::resample(&obs).unwrap();
    assert_eq!(series.len(), 30);
    let forecast = Forecaster::default().forecast(&series).unwrap();
    assert_eq!(forecast.dates[0], day(30));
    assert_eq!(forecast.dates[13], day(43));
    assert!(!forecast.is_fallback());
    assert!(forecast.values[13] > forecast.values[0]);
}

#[test]
fn test_noisy_growth_continues_upwards() {
    let mut rng = rand::rngs::StdRng::seed_from_u64(42);
    let noise = Normal::new(0.0, 2.0).unwrap();
    let values: Vec<f64> = (0..120)
        .map(|t| 1_000.0 + 12.0 * t as f64 + noise.sample(&mut rng))
        .collect();
    let series = DailySeries::new(day(0), values);
    let forecast = Forecaster::default().forecast(&series).unwrap();
    match forecast.outcome {
        ForecastOutcome::Smoothed { alpha, beta, sse } => {
            assert!((0.0..=1.0).contains(&alpha));
            assert!((0.0..=1.0).contains(&beta));
            assert!(sse.is_finite());
        }
        other => panic!("expected smoothing, got {other}"),
    }
    let slope = (forecast.values[13] - forecast.values[0]) / 13.0;
    assert!((slope - 12.0).abs() < 4.0, "slope = {slope}");
}

#[test]
fn test_policy_from_json() {
    let policy: ForecastPolicy = serde_json::from_str(r#"{"horizon": 7, "smoothing": false}"#).unwrap();
    assert_eq!(policy.min_observations, 5);
    let series = DailySeries::new(day(0), vec![3.0, 4.0, 2.5]);
    let forecast = Forecaster::new(policy).forecast(&series).unwrap();
    assert_eq!(forecast.values, vec![2.5; 7]);
    assert_eq!(
        forecast.outcome,
        ForecastOutcome::Fallback {
            reason: FallbackReason::Disabled
        }
    );
}

proptest! {
    #[test]
    fn prop_constant_series_forecasts_constant(level in 0.0f64..1e6, len in 6usize..40) {
        let series = DailySeries::new(day(0), vec![level; len]);
        let forecast = Forecaster::default().forecast(&series).unwrap();
        prop_assert_eq!(forecast.values.len(), 14);
        for v in forecast.values {
            assert_abs_diff_eq!(v, level, epsilon = 1e-6 * level.max(1.0));
        }
    }
}
