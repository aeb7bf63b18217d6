//! Bollinger Bands indicator.
//!
//! Bollinger Bands consist of:
//! - Middle: Simple Moving Average (SMA) over n periods
//! - Upper: Middle + (multiplier × StdDev)
//! - Lower: Middle - (multiplier × StdDev)
//!
//! Where StdDev is the *sample* standard deviation over the same trailing
//! window (divides by n−1, not n). Warmup rows — and every row when the
//! window is too short for a sample deviation — carry `None`, never zero.
//!
//! Default parameters: window=20, multiplier=2.

use std::ops::RangeInclusive;

use chrono::NaiveDate;

use crate::domain::error::BandviewError;
use crate::domain::series::{PriceBar, RawSeries};

/// Window slider bounds exposed by the query form.
pub const WINDOW_RANGE: RangeInclusive<u32> = 5..=60;
/// Multiplier slider bounds exposed by the query form (integer steps).
pub const MULTIPLIER_RANGE: RangeInclusive<u32> = 1..=3;

pub const DEFAULT_WINDOW: u32 = 20;
pub const DEFAULT_MULTIPLIER: u32 = 2;

/// One trading day augmented with indicator values.
#[derive(Debug, Clone, PartialEq)]
pub struct BandPoint {
    pub bar: PriceBar,
    pub ma: Option<f64>,
    pub stddev: Option<f64>,
    pub upper: Option<f64>,
    pub lower: Option<f64>,
}

/// A price series augmented with Bollinger Band columns.
#[derive(Debug, Clone, PartialEq)]
pub struct BandSeries {
    pub symbol: String,
    pub window: usize,
    pub multiplier: f64,
    pub points: Vec<BandPoint>,
}

/// Last-row values shown as the text summary under the chart.
#[derive(Debug, Clone, PartialEq)]
pub struct LatestSummary {
    pub date: NaiveDate,
    pub close: f64,
    pub ma: f64,
    pub upper: f64,
    pub lower: f64,
}

impl BandSeries {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// The last `n` points, fewer if the series is shorter.
    pub fn tail(&self, n: usize) -> &[BandPoint] {
        let start = self.points.len().saturating_sub(n);
        &self.points[start..]
    }

    /// Summary of the most recent row. `None` when the series is empty or
    /// the last row's indicator fields are still in warmup.
    pub fn latest(&self) -> Option<LatestSummary> {
        let last = self.points.last()?;
        Some(LatestSummary {
            date: last.bar.date,
            close: last.bar.close,
            ma: last.ma?,
            upper: last.upper?,
            lower: last.lower?,
        })
    }
}

/// Validate the raw table, coerce it to bars, and augment with band columns.
///
/// Fails with `SchemaMismatch` before any computation when a required field
/// is absent. Rows with un-coercible cells are dropped whole by
/// [`RawSeries::coerce_bars`].
pub fn compute_bollinger(
    raw: &RawSeries,
    window: usize,
    multiplier: f64,
) -> Result<BandSeries, BandviewError> {
    raw.validate_schema()?;
    let bars = raw.coerce_bars();
    Ok(compute_bollinger_bars(&raw.symbol, bars, window, multiplier))
}

/// Band computation over already-validated bars.
pub fn compute_bollinger_bars(
    symbol: &str,
    bars: Vec<PriceBar>,
    window: usize,
    multiplier: f64,
) -> BandSeries {
    let warmup = window.saturating_sub(1);
    let mut points = Vec::with_capacity(bars.len());

    for i in 0..bars.len() {
        let ma = if window >= 1 && i >= warmup {
            Some(window_mean(&bars[i + 1 - window..=i]))
        } else {
            None
        };

        // Sample deviation needs at least two points in the window.
        let stddev = match ma {
            Some(mean) if window >= 2 => {
                Some(window_sample_stddev(&bars[i + 1 - window..=i], mean))
            }
            _ => None,
        };

        let upper = ma.zip(stddev).map(|(m, s)| m + multiplier * s);
        let lower = ma.zip(stddev).map(|(m, s)| m - multiplier * s);

        points.push(BandPoint {
            bar: bars[i].clone(),
            ma,
            stddev,
            upper,
            lower,
        });
    }

    BandSeries {
        symbol: symbol.to_string(),
        window,
        multiplier,
        points,
    }
}

fn window_mean(window: &[PriceBar]) -> f64 {
    window.iter().map(|b| b.close).sum::<f64>() / window.len() as f64
}

fn window_sample_stddev(window: &[PriceBar], mean: f64) -> f64 {
    let sum_sq: f64 = window
        .iter()
        .map(|b| {
            let diff = b.close - mean;
            diff * diff
        })
        .sum();
    (sum_sq / (window.len() - 1) as f64).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn make_bars(prices: &[f64]) -> Vec<PriceBar> {
        prices
            .iter()
            .enumerate()
            .map(|(i, &close)| PriceBar {
                date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
                    + chrono::Duration::days(i as i64),
                open: close,
                high: close,
                low: close,
                close,
                volume: 1000,
            })
            .collect()
    }

    fn compute(prices: &[f64], window: usize, multiplier: f64) -> BandSeries {
        compute_bollinger_bars("TEST", make_bars(prices), window, multiplier)
    }

    #[test]
    fn warmup_rows_are_absent() {
        let series = compute(&[10.0, 20.0, 30.0, 40.0, 50.0], 3, 2.0);

        assert!(series.points[0].ma.is_none());
        assert!(series.points[1].ma.is_none());
        assert!(series.points[2].ma.is_some());
        assert!(series.points[4].ma.is_some());
        assert!(series.points[1].upper.is_none());
        assert!(series.points[2].upper.is_some());
    }

    #[test]
    fn moving_average_is_window_mean() {
        let series = compute(&[10.0, 20.0, 30.0, 40.0], 3, 2.0);

        assert_relative_eq!(series.points[2].ma.unwrap(), 20.0);
        assert_relative_eq!(series.points[3].ma.unwrap(), 30.0);
    }

    #[test]
    fn stddev_uses_sample_divisor() {
        // closes 10, 20, 30: mean 20, sample variance (100+0+100)/2 = 100
        let series = compute(&[10.0, 20.0, 30.0], 3, 1.0);

        assert_relative_eq!(series.points[2].stddev.unwrap(), 10.0);
        assert_relative_eq!(series.points[2].upper.unwrap(), 30.0);
        assert_relative_eq!(series.points[2].lower.unwrap(), 10.0);
    }

    #[test]
    fn constant_closes_collapse_bands_onto_mean() {
        let series = compute(&[100.0; 25], 20, 2.0);

        for point in &series.points[..19] {
            assert!(point.ma.is_none());
            assert!(point.stddev.is_none());
        }
        for point in &series.points[19..] {
            assert_relative_eq!(point.stddev.unwrap(), 0.0);
            assert_relative_eq!(point.ma.unwrap(), 100.0);
            assert_relative_eq!(point.upper.unwrap(), 100.0);
            assert_relative_eq!(point.lower.unwrap(), 100.0);
        }
    }

    #[test]
    fn band_width_is_twice_multiplier_times_stddev() {
        let series = compute(&[10.0, 14.0, 9.0, 21.0, 17.0, 12.0, 25.0], 4, 3.0);

        for point in &series.points {
            if let (Some(upper), Some(lower), Some(sd)) = (point.upper, point.lower, point.stddev)
            {
                assert_relative_eq!(upper - lower, 2.0 * 3.0 * sd, max_relative = 1e-12);
            }
        }
    }

    #[test]
    fn series_shorter_than_window_has_no_indicator_rows() {
        let series = compute(&[10.0, 20.0, 30.0], 5, 2.0);

        assert_eq!(series.len(), 3);
        for point in &series.points {
            assert!(point.ma.is_none());
            assert!(point.stddev.is_none());
            assert!(point.upper.is_none());
            assert!(point.lower.is_none());
        }
    }

    #[test]
    fn window_of_one_yields_mean_but_no_deviation() {
        let series = compute(&[10.0, 20.0], 1, 2.0);

        assert_relative_eq!(series.points[0].ma.unwrap(), 10.0);
        assert_relative_eq!(series.points[1].ma.unwrap(), 20.0);
        assert!(series.points[0].stddev.is_none());
        assert!(series.points[1].upper.is_none());
    }

    #[test]
    fn recomputation_is_identical() {
        let prices = [10.0, 12.5, 11.0, 14.0, 13.0, 15.5, 16.0];
        let first = compute(&prices, 3, 2.0);
        let second = compute(&prices, 3, 2.0);
        assert_eq!(first, second);
    }

    #[test]
    fn latest_summary_from_last_row() {
        let series = compute(&[10.0, 20.0, 30.0, 40.0], 3, 2.0);
        let latest = series.latest().unwrap();

        assert_eq!(latest.date, series.points[3].bar.date);
        assert_relative_eq!(latest.close, 40.0);
        assert_relative_eq!(latest.ma, 30.0);
        assert_relative_eq!(latest.upper, series.points[3].upper.unwrap());
        assert_relative_eq!(latest.lower, series.points[3].lower.unwrap());
    }

    #[test]
    fn latest_summary_absent_during_warmup() {
        let series = compute(&[10.0, 20.0], 5, 2.0);
        assert!(series.latest().is_none());

        let empty = compute(&[], 5, 2.0);
        assert!(empty.latest().is_none());
    }

    #[test]
    fn tail_returns_last_rows() {
        let series = compute(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0], 3, 2.0);

        let tail = series.tail(5);
        assert_eq!(tail.len(), 5);
        assert_relative_eq!(tail[0].bar.close, 3.0);
        assert_relative_eq!(tail[4].bar.close, 7.0);

        assert_eq!(series.tail(100).len(), 7);
    }
}
