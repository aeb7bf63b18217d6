//! Market data access port trait.

use crate::domain::error::BandviewError;
use crate::domain::series::RawSeries;
use chrono::NaiveDate;

/// Source of daily bars for a symbol. `end` is inclusive.
///
/// An `Ok` empty series means the provider had nothing for the request
/// (unknown symbol, no trading days, inverted range); callers surface that
/// as a user-facing empty-dataset error. `Err` is reserved for transport
/// and decoding failures.
pub trait MarketDataPort {
    fn fetch_daily(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<RawSeries, BandviewError>;
}
