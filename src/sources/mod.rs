//! Market-data collaborators.

pub mod yahoo;

pub use yahoo::YahooFinanceClient;

use crate::error::Result;
use crate::types::PriceBar;
use chrono::NaiveDate;

/// External market-data source for daily price bars.
///
/// May return an empty sequence for a range with no trading days; errors are
/// recoverable for batch synchronization (the ticker is skipped).
pub trait MarketDataSource {
    /// Fetch daily bars for a ticker with date in [start, end], ascending.
    fn fetch_daily(&self, ticker: &str, start: NaiveDate, end: NaiveDate)
        -> Result<Vec<PriceBar>>;
}
