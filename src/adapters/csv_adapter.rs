//! CSV directory data adapter.
//!
//! Offline [`MarketDataPort`] reading one `{SYMBOL}.csv` file per symbol.
//! Columns are keyed by the lowercased header names, so a file that lacks a
//! required column surfaces the same schema error a provider response would.

use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::domain::error::BandviewError;
use crate::domain::series::RawSeries;
use crate::ports::data_port::MarketDataPort;

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol.to_uppercase()))
    }
}

impl MarketDataPort for CsvAdapter {
    fn fetch_daily(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<RawSeries, BandviewError> {
        let path = self.csv_path(symbol);
        // Unknown symbol is "no data", not a failure.
        if !path.exists() {
            return Ok(RawSeries::empty(symbol));
        }

        let mut reader =
            csv::Reader::from_path(&path).map_err(|e| BandviewError::Fetch {
                symbol: symbol.to_string(),
                reason: format!("failed to open {}: {e}", path.display()),
            })?;

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| BandviewError::Fetch {
                symbol: symbol.to_string(),
                reason: format!("CSV header error: {e}"),
            })?
            .iter()
            .map(|h| h.trim().to_lowercase())
            .collect();

        let date_idx = headers.iter().position(|h| h == "date").ok_or_else(|| {
            BandviewError::Fetch {
                symbol: symbol.to_string(),
                reason: format!("{} has no date column", path.display()),
            }
        })?;

        let mut dates = Vec::new();
        let mut columns: BTreeMap<String, Vec<Option<f64>>> = headers
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != date_idx)
            .map(|(_, h)| (h.clone(), Vec::new()))
            .collect();

        for record in reader.records() {
            let record = record.map_err(|e| BandviewError::Fetch {
                symbol: symbol.to_string(),
                reason: format!("CSV parse error: {e}"),
            })?;

            let Some(date_str) = record.get(date_idx) else {
                continue;
            };
            let date = NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d").map_err(|e| {
                BandviewError::Fetch {
                    symbol: symbol.to_string(),
                    reason: format!("invalid date '{date_str}': {e}"),
                }
            })?;

            if date < start || date > end {
                continue;
            }

            dates.push(date);
            for (i, header) in headers.iter().enumerate() {
                if i == date_idx {
                    continue;
                }
                let cell = record
                    .get(i)
                    .and_then(|v| v.trim().parse::<f64>().ok());
                if let Some(column) = columns.get_mut(header) {
                    column.push(cell);
                }
            }
        }

        Ok(RawSeries {
            symbol: symbol.to_string(),
            dates,
            columns,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn setup() -> (TempDir, CsvAdapter) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().to_path_buf();

        fs::write(
            path.join("NVDA.csv"),
            "date,open,high,low,close,volume\n\
             2024-01-02,49.0,50.0,48.5,49.8,400000000\n\
             2024-01-03,49.5,50.5,48.0,n/a,380000000\n\
             2024-01-04,48.0,49.0,47.0,48.2,390000000\n",
        )
        .unwrap();

        fs::write(
            path.join("NOVOL.csv"),
            "date,open,high,low,close\n2024-01-02,1.0,1.0,1.0,1.0\n",
        )
        .unwrap();

        let adapter = CsvAdapter::new(path);
        (dir, adapter)
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn reads_columns_keyed_by_header() {
        let (_dir, adapter) = setup();
        let series = adapter.fetch_daily("NVDA", date(1), date(31)).unwrap();

        assert_eq!(series.len(), 3);
        assert!(series.validate_schema().is_ok());
        assert_eq!(series.columns["open"][0], Some(49.0));
        assert_eq!(series.columns["volume"][2], Some(390_000_000.0));
    }

    #[test]
    fn unparseable_cells_become_nulls() {
        let (_dir, adapter) = setup();
        let series = adapter.fetch_daily("NVDA", date(1), date(31)).unwrap();

        assert_eq!(series.columns["close"][1], None);
        assert_eq!(series.coerce_bars().len(), 2);
    }

    #[test]
    fn filters_by_inclusive_date_range() {
        let (_dir, adapter) = setup();
        let series = adapter.fetch_daily("NVDA", date(3), date(4)).unwrap();

        assert_eq!(series.len(), 2);
        assert_eq!(series.dates[0], date(3));
        assert_eq!(series.dates[1], date(4));
    }

    #[test]
    fn unknown_symbol_is_empty_not_error() {
        let (_dir, adapter) = setup();
        let series = adapter.fetch_daily("XYZ", date(1), date(31)).unwrap();
        assert!(series.is_empty());
    }

    #[test]
    fn missing_volume_column_fails_schema_check() {
        let (_dir, adapter) = setup();
        let series = adapter.fetch_daily("NOVOL", date(1), date(31)).unwrap();

        let err = series.validate_schema().unwrap_err();
        assert!(
            matches!(err, BandviewError::SchemaMismatch { ref missing, .. } if missing == &["volume"])
        );
    }

    #[test]
    fn lowercase_symbol_resolves_same_file() {
        let (_dir, adapter) = setup();
        let series = adapter.fetch_daily("nvda", date(1), date(31)).unwrap();
        assert_eq!(series.len(), 3);
    }
}
