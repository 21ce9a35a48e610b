use crate::types::PriceBar;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One fully populated feature row, the persisted unit of the feature store.
///
/// Rows are keyed by (ticker, date). Every indicator field holds a defined
/// value: edge gaps from rolling windows are filled before a row is ever
/// stored, so readers never see a null feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRow {
    pub ticker: String,
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    pub rsi: f64,
    pub macd_line: f64,
    pub macd_signal: f64,
    pub macd_hist: f64,
    pub bb_mid: f64,
    pub bb_upper: f64,
    pub bb_lower: f64,
    pub bb_bandwidth: f64,
    pub bb_percent_b: f64,
    pub sma: f64,
}

impl FeatureRow {
    /// The OHLCV portion of the row, used to rebuild seam context for
    /// incremental synchronization.
    pub fn price_bar(&self) -> PriceBar {
        PriceBar {
            date: self.date,
            open: self.open,
            high: self.high,
            low: self.low,
            close: self.close,
            volume: self.volume,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_row() -> FeatureRow {
        FeatureRow {
            ticker: "AAPL".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
            open: 150.0,
            high: 155.0,
            low: 148.0,
            close: 153.0,
            volume: 50_000_000.0,
            rsi: 55.0,
            macd_line: 1.2,
            macd_signal: 1.0,
            macd_hist: 0.2,
            bb_mid: 151.0,
            bb_upper: 158.0,
            bb_lower: 144.0,
            bb_bandwidth: 14.0,
            bb_percent_b: 0.64,
            sma: 151.0,
        }
    }

    #[test]
    fn test_price_bar_round_trip() {
        let row = sample_row();
        let bar = row.price_bar();
        assert_eq!(bar.date, row.date);
        assert_eq!(bar.close, row.close);
        assert_eq!(bar.volume, row.volume);
    }

    #[test]
    fn test_feature_row_date_format() {
        let row = sample_row();
        let json = serde_json::to_string(&row).unwrap();
        assert!(json.contains("\"2024-03-15\""));
    }
}
