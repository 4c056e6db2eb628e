//! Gaussian rolling-window smoothing of timeseries channels.
//!
//! Responsibilities:
//!
//! - build the Gaussian kernel for a `SmoothingWindow`
//! - apply the centered, renormalized rolling mean to every channel
//! - optionally shift the time index and drop rows that leave the sampled range

use chrono::Duration;

use crate::domain::{Channel, SmoothingWindow, Timeseries};

pub mod kernel;
pub mod rolling;

pub use kernel::*;
pub use rolling::*;

/// Smooth every channel of `series` with the same Gaussian window.
///
/// The time index is copied unchanged; the input is not modified.
pub fn smooth(series: &Timeseries, window: &SmoothingWindow) -> Timeseries {
    let weights = gaussian_kernel(window.length(), window.std());
    let channels = series
        .channels
        .iter()
        .map(|ch| Channel {
            name: ch.name.clone(),
            values: rolling_weighted_mean(&ch.values, &weights, window.min_support()),
        })
        .collect();

    Timeseries {
        index: series.index.clone(),
        channels,
    }
}

/// Shift the time index by `seconds`, keeping only rows whose shifted time
/// still falls inside the original `[first, last]` span.
///
/// A zero or non-finite shift returns the series unchanged.
pub fn shift_index(series: &Timeseries, seconds: f64) -> Timeseries {
    if seconds == 0.0 || !seconds.is_finite() || series.is_empty() {
        return series.clone();
    }

    let delta = Duration::nanoseconds((seconds * 1e9).round() as i64);
    let (Some(&first), Some(&last)) = (series.index.iter().min(), series.index.iter().max()) else {
        return series.clone();
    };

    let keep: Vec<bool> = series
        .index
        .iter()
        .map(|&t| {
            let shifted = t + delta;
            shifted >= first && shifted <= last
        })
        .collect();

    let index = series
        .index
        .iter()
        .zip(&keep)
        .filter(|(_, k)| **k)
        .map(|(&t, _)| t + delta)
        .collect();

    let channels = series
        .channels
        .iter()
        .map(|ch| Channel {
            name: ch.name.clone(),
            values: ch
                .values
                .iter()
                .zip(&keep)
                .filter(|(_, k)| **k)
                .map(|(&v, _)| v)
                .collect(),
        })
        .collect();

    Timeseries { index, channels }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{epoch_to_datetime, RawTable, DEFAULT_EPOCH_COLUMN};
    use rand::prelude::*;
    use rand::rngs::StdRng;
    use rand_distr::Normal;

    const T0: f64 = 1_690_000_000.0;

    fn series_1hz(channels: Vec<(&str, Vec<f64>)>) -> Timeseries {
        let n = channels[0].1.len();
        let index = (0..n)
            .map(|i| epoch_to_datetime(T0 + i as f64).unwrap())
            .collect();
        let channels = channels
            .into_iter()
            .map(|(name, values)| Channel {
                name: name.to_string(),
                values,
            })
            .collect();
        Timeseries { index, channels }
    }

    fn variance(values: &[f64]) -> f64 {
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n
    }

    #[test]
    fn channel_set_is_preserved_plus_epoch() {
        let table = RawTable::new(
            vec!["tau_kPa".to_string(), DEFAULT_EPOCH_COLUMN.to_string(), "N_kPa".to_string()],
            vec![
                (0..50).map(|i| i as f64).collect(),
                (0..50).map(|i| T0 + i as f64).collect(),
                vec![350.0; 50],
            ],
        );
        let series = Timeseries::from_table(&table, DEFAULT_EPOCH_COLUMN).unwrap();
        let window = SmoothingWindow::new(11, 3.0).unwrap();
        let out = smooth(&series, &window).into_table(DEFAULT_EPOCH_COLUMN);

        assert_eq!(out.headers, vec!["tau_kPa", "N_kPa", DEFAULT_EPOCH_COLUMN]);
        assert_eq!(out.n_rows(), 50);
        let epoch = out.column(DEFAULT_EPOCH_COLUMN).unwrap();
        for (i, e) in epoch.iter().enumerate() {
            assert!((e - (T0 + i as f64)).abs() < 1e-6);
        }
    }

    #[test]
    fn constant_channel_stays_constant() {
        let mut values = vec![4.2; 200];
        values[17] = f64::NAN;
        let series = series_1hz(vec![("c", values)]);
        let window = SmoothingWindow::new(600, 75.0).unwrap();
        let out = smooth(&series, &window);
        for (i, v) in out.channels[0].values.iter().enumerate() {
            assert!((v - 4.2).abs() < 1e-12, "row {i}: {v}");
        }
    }

    #[test]
    fn unit_window_returns_input_when_support_allows() {
        let values: Vec<f64> = (0..20).map(|i| (i as f64 * 0.7).sin()).collect();
        let series = series_1hz(vec![("x", values.clone())]);

        let window = SmoothingWindow::new(1, 1.0).unwrap().with_min_support(1);
        let out = smooth(&series, &window);
        for (a, b) in out.channels[0].values.iter().zip(&values) {
            assert!((a - b).abs() < 1e-15);
        }

        // With the default support of 3 a single-sample window never qualifies.
        let strict = SmoothingWindow::new(1, 1.0).unwrap();
        let out = smooth(&series, &strict);
        assert!(out.channels[0].values.iter().all(|v| v.is_nan()));
        assert_eq!(out.len(), 20);
    }

    #[test]
    fn linear_ramp_is_reproduced_in_the_interior() {
        let n = 2000;
        let ramp: Vec<f64> = (1..=n).map(|i| i as f64).collect();
        let series = series_1hz(vec![("ramp", ramp.clone())]);

        // Odd window: exact symmetry.
        let odd = smooth(&series, &SmoothingWindow::new(601, 75.0).unwrap());
        for i in 300..(n - 300) {
            let v = odd.channels[0].values[i];
            assert!((v - ramp[i]).abs() < 1e-8, "row {i}: {v} vs {}", ramp[i]);
        }

        // Even window (the default W=600): kernel center sits half a sample early.
        let even = smooth(&series, &SmoothingWindow::new(600, 75.0).unwrap());
        for i in 300..(n - 300) {
            let v = even.channels[0].values[i];
            assert!((v - (ramp[i] - 0.5)).abs() < 1e-8, "row {i}: {v}");
        }
    }

    #[test]
    fn wider_kernel_reduces_noise_variance() {
        let mut rng = StdRng::seed_from_u64(42);
        let noise = Normal::new(0.0, 0.5).unwrap();
        let values: Vec<f64> = (0..3000)
            .map(|i| (i as f64 * 2.0 * std::f64::consts::PI / 500.0).sin() + noise.sample(&mut rng))
            .collect();
        let series = series_1hz(vec![("noisy", values.clone())]);

        let mut last = variance(&values);
        for std in [2.0, 8.0, 32.0, 128.0] {
            let out = smooth(&series, &SmoothingWindow::new(600, std).unwrap());
            let var = variance(&out.channels[0].values);
            assert!(var < last, "std={std}: variance {var} did not drop below {last}");
            last = var;
        }
    }

    #[test]
    fn smoothing_does_not_touch_input() {
        let values = vec![1.0, 5.0, 2.0, 8.0, 3.0];
        let series = series_1hz(vec![("x", values.clone())]);
        let _ = smooth(&series, &SmoothingWindow::new(3, 1.0).unwrap());
        assert_eq!(series.channels[0].values, values);
    }

    #[test]
    fn shift_drops_rows_leaving_the_span() {
        let series = series_1hz(vec![("x", (0..10).map(|i| i as f64).collect())]);
        let shifted = shift_index(&series, -3.0);
        assert_eq!(shifted.len(), 7);
        assert_eq!(shifted.channels[0].values, vec![3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0]);
        assert_eq!(shifted.index[0], series.index[0]);

        let same = shift_index(&series, 0.0);
        assert_eq!(same.len(), 10);
    }
}
