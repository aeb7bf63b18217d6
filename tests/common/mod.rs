#![allow(dead_code)]

use chrono::NaiveDate;
use std::collections::HashMap;

use bandview::domain::error::BandviewError;
pub use bandview::domain::series::{PriceBar, RawSeries, RawSeriesBuilder};
use bandview::ports::data_port::MarketDataPort;

pub struct MockDataPort {
    pub data: HashMap<String, RawSeries>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_series(mut self, symbol: &str, series: RawSeries) -> Self {
        self.data.insert(symbol.to_string(), series);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl MarketDataPort for MockDataPort {
    fn fetch_daily(
        &self,
        symbol: &str,
        _start: NaiveDate,
        _end: NaiveDate,
    ) -> Result<RawSeries, BandviewError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(BandviewError::Fetch {
                symbol: symbol.to_string(),
                reason: reason.clone(),
            });
        }
        Ok(self
            .data
            .get(symbol)
            .cloned()
            .unwrap_or_else(|| RawSeries::empty(symbol)))
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn sequential_dates(count: usize) -> Vec<NaiveDate> {
    (0..count)
        .map(|i| date(2024, 1, 1) + chrono::Duration::days(i as i64))
        .collect()
}

/// A complete OHLCV raw table derived from a close series.
pub fn raw_series(symbol: &str, closes: &[f64]) -> RawSeries {
    let cells = |f: fn(f64) -> f64| -> Vec<Option<f64>> {
        closes.iter().map(|&c| Some(f(c))).collect()
    };

    RawSeriesBuilder::new(symbol, sequential_dates(closes.len()))
        .column("open", cells(|c| c - 0.5))
        .column("high", cells(|c| c + 1.0))
        .column("low", cells(|c| c - 1.0))
        .column("close", cells(|c| c))
        .column("volume", vec![Some(1_000_000.0); closes.len()])
        .build()
}

/// Same table with one column left out, for schema-error paths.
pub fn raw_series_without(symbol: &str, closes: &[f64], drop: &str) -> RawSeries {
    let mut series = raw_series(symbol, closes);
    series.columns.remove(drop);
    series
}

pub fn make_bars(closes: &[f64]) -> Vec<PriceBar> {
    closes
        .iter()
        .zip(sequential_dates(closes.len()))
        .map(|(&close, date)| PriceBar {
            date,
            open: close - 0.5,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume: 1_000_000,
        })
        .collect()
}
