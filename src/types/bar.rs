use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One daily OHLCV bar from the market-data feed.
///
/// Immutable once recorded for a past date; the external feed is the source
/// of truth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}
