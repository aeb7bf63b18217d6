//! Daily price table types: the provider-shaped raw table and the
//! validated bar records derived from it.

use chrono::NaiveDate;
use std::collections::BTreeMap;

use crate::domain::error::BandviewError;

/// Field names every daily dataset must carry before indicators can run.
pub const REQUIRED_FIELDS: [&str; 5] = ["open", "high", "low", "close", "volume"];

/// A column-keyed daily table as it comes back from a data source.
///
/// Cells are `Option<f64>`: a `None` marks a provider gap or a value that
/// failed numeric coercion. Rows are addressed by position in `dates`; every
/// column has the same length as `dates`.
#[derive(Debug, Clone, Default)]
pub struct RawSeries {
    pub symbol: String,
    pub dates: Vec<NaiveDate>,
    pub columns: BTreeMap<String, Vec<Option<f64>>>,
}

/// One validated trading day.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
}

impl RawSeries {
    pub fn empty(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            dates: Vec::new(),
            columns: BTreeMap::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Check that every required field is present as a column.
    pub fn validate_schema(&self) -> Result<(), BandviewError> {
        let missing: Vec<String> = REQUIRED_FIELDS
            .iter()
            .filter(|f| !self.columns.contains_key(**f))
            .map(|f| f.to_string())
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(BandviewError::SchemaMismatch {
                missing,
                actual: self.columns.keys().cloned().collect(),
            })
        }
    }

    /// Collapse the table into bar records.
    ///
    /// A row is dropped whole if any required cell is `None`. Surviving bars
    /// are sorted ascending by date; duplicate dates keep the first occurrence.
    /// Callers must run [`RawSeries::validate_schema`] first — missing columns
    /// here would panic.
    pub fn coerce_bars(&self) -> Vec<PriceBar> {
        let col = |name: &str| &self.columns[name];
        let (open, high, low, close, volume) = (
            col("open"),
            col("high"),
            col("low"),
            col("close"),
            col("volume"),
        );

        let mut bars: Vec<PriceBar> = self
            .dates
            .iter()
            .enumerate()
            .filter_map(|(i, &date)| {
                Some(PriceBar {
                    date,
                    open: open[i]?,
                    high: high[i]?,
                    low: low[i]?,
                    close: close[i]?,
                    volume: volume[i]? as i64,
                })
            })
            .collect();

        bars.sort_by_key(|b| b.date);
        bars.dedup_by_key(|b| b.date);
        bars
    }
}

/// Builder used by data adapters and tests to assemble a [`RawSeries`]
/// column by column.
#[derive(Debug, Default)]
pub struct RawSeriesBuilder {
    symbol: String,
    dates: Vec<NaiveDate>,
    columns: BTreeMap<String, Vec<Option<f64>>>,
}

impl RawSeriesBuilder {
    pub fn new(symbol: impl Into<String>, dates: Vec<NaiveDate>) -> Self {
        Self {
            symbol: symbol.into(),
            dates,
            columns: BTreeMap::new(),
        }
    }

    /// Add a column. Shorter columns are padded with `None`, longer ones
    /// truncated, so every column matches the date axis.
    pub fn column(mut self, name: impl Into<String>, mut cells: Vec<Option<f64>>) -> Self {
        cells.resize(self.dates.len(), None);
        self.columns.insert(name.into(), cells);
        self
    }

    pub fn build(self) -> RawSeries {
        RawSeries {
            symbol: self.symbol,
            dates: self.dates,
            columns: self.columns,
        }
    }
}
