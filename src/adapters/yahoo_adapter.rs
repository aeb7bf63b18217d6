//! Yahoo Finance daily-bar adapter.
//!
//! Talks to the v8 chart endpoint
//! (`/v8/finance/chart/{symbol}?period1=…&period2=…&interval=1d`) and
//! flattens the nested per-symbol response (`chart.result[0]` with one
//! quote block per symbol) into a plain field-keyed [`RawSeries`].
//!
//! A provider-level error object or an absent result set becomes an empty
//! series; only transport and decoding failures are `Err`.

use std::time::Duration;

use chrono::{DateTime, NaiveDate, NaiveTime};
use serde::Deserialize;
use tracing::warn;

use crate::domain::error::BandviewError;
use crate::domain::series::RawSeries;
use crate::ports::data_port::MarketDataPort;

const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";

// The chart endpoint rejects requests without a browser-ish user agent.
const USER_AGENT: &str = "Mozilla/5.0 (compatible; bandview/0.1)";

pub struct YahooAdapter {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl YahooAdapter {
    pub fn new(timeout: Duration) -> Result<Self, BandviewError> {
        Self::with_base_url(DEFAULT_BASE_URL, timeout)
    }

    pub fn with_base_url(
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, BandviewError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| BandviewError::Io(std::io::Error::other(e)))?;

        Ok(Self {
            base_url: base_url.into(),
            client,
        })
    }

    fn chart_url(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> String {
        let (period1, period2) = period_bounds(start, end);
        format!(
            "{}/v8/finance/chart/{}?period1={}&period2={}&interval=1d",
            self.base_url, symbol, period1, period2
        )
    }
}

/// Unix-timestamp request bounds. The chart API treats `period2` as
/// exclusive, so the end date is pushed one day out to make it inclusive.
pub(crate) fn period_bounds(start: NaiveDate, end: NaiveDate) -> (i64, i64) {
    let midnight = NaiveTime::MIN;
    let period1 = start.and_time(midnight).and_utc().timestamp();
    let period2 = (end + chrono::Duration::days(1))
        .and_time(midnight)
        .and_utc()
        .timestamp();
    (period1, period2)
}

impl MarketDataPort for YahooAdapter {
    fn fetch_daily(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<RawSeries, BandviewError> {
        let url = self.chart_url(symbol, start, end);

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| BandviewError::Fetch {
                symbol: symbol.to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        let body = response.text().map_err(|e| BandviewError::Fetch {
            symbol: symbol.to_string(),
            reason: e.to_string(),
        })?;

        match parse_chart_body(symbol, &body, start, end) {
            Ok(series) => Ok(series),
            // Error pages for dead symbols still decode above; anything that
            // does not is a transport-level failure.
            Err(_) if !status.is_success() => Err(BandviewError::Fetch {
                symbol: symbol.to_string(),
                reason: format!("HTTP {status}"),
            }),
            Err(e) => Err(e),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartNode,
}

#[derive(Debug, Deserialize)]
struct ChartNode {
    result: Option<Vec<ChartResult>>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    timestamp: Option<Vec<i64>>,
    #[serde(default)]
    indicators: Indicators,
}

#[derive(Debug, Default, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<QuoteBlock>,
}

#[derive(Debug, Default, Deserialize)]
struct QuoteBlock {
    open: Option<Vec<Option<f64>>>,
    high: Option<Vec<Option<f64>>>,
    low: Option<Vec<Option<f64>>>,
    close: Option<Vec<Option<f64>>>,
    volume: Option<Vec<Option<f64>>>,
}

/// Decode a chart response body into a [`RawSeries`].
pub(crate) fn parse_chart_body(
    symbol: &str,
    body: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<RawSeries, BandviewError> {
    let decoded: ChartResponse =
        serde_json::from_str(body).map_err(|e| BandviewError::Fetch {
            symbol: symbol.to_string(),
            reason: format!("unexpected response body: {e}"),
        })?;

    if let Some(err) = decoded.chart.error {
        warn!(symbol, code = %err.code, "provider returned error: {}", err.description);
        return Ok(RawSeries::empty(symbol));
    }

    // Primary symbol only: first result, first quote block.
    let Some(result) = decoded.chart.result.and_then(|mut r| {
        if r.is_empty() {
            None
        } else {
            Some(r.swap_remove(0))
        }
    }) else {
        return Ok(RawSeries::empty(symbol));
    };

    let timestamps = result.timestamp.unwrap_or_default();
    if timestamps.is_empty() {
        return Ok(RawSeries::empty(symbol));
    }

    let mut dates = Vec::with_capacity(timestamps.len());
    let mut keep = Vec::with_capacity(timestamps.len());
    for (i, &ts) in timestamps.iter().enumerate() {
        let Some(dt) = DateTime::from_timestamp(ts, 0) else {
            continue;
        };
        let date = dt.date_naive();
        if date < start || date > end {
            continue;
        }
        dates.push(date);
        keep.push(i);
    }

    let quote = result
        .indicators
        .quote
        .into_iter()
        .next()
        .unwrap_or_default();

    let mut series = RawSeries {
        symbol: symbol.to_string(),
        dates,
        columns: Default::default(),
    };

    let mut insert = |name: &str, cells: Option<Vec<Option<f64>>>| {
        if let Some(cells) = cells {
            let aligned: Vec<Option<f64>> = keep
                .iter()
                .map(|&i| cells.get(i).copied().flatten())
                .collect();
            series.columns.insert(name.to_string(), aligned);
        }
    };

    insert("open", quote.open);
    insert("high", quote.high);
    insert("low", quote.low);
    insert("close", quote.close);
    insert("volume", quote.volume);

    Ok(series)
}
