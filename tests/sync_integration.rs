//! End-to-end synchronization tests against fake market data and an
//! in-memory feature store.

use chrono::{Duration, NaiveDate};
use scry::error::{AppError, Result};
use scry::services::{FeatureStore, SqliteFeatureStore, SyncOutcome, Synchronizer};
use scry::sources::MarketDataSource;
use scry::types::PriceBar;
use scry::Config;

/// Fixed daily series served one range at a time, like a real feed.
struct ScriptedFeed {
    bars: Vec<PriceBar>,
    fail_tickers: Vec<String>,
}

impl ScriptedFeed {
    fn new(start: NaiveDate, closes: &[f64]) -> Self {
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| PriceBar {
                date: start + Duration::days(i as i64),
                open: close - 0.5,
                high: close + 1.0,
                low: close - 1.0,
                close,
                volume: 2_000_000.0,
            })
            .collect();
        Self {
            bars,
            fail_tickers: Vec::new(),
        }
    }
}

impl MarketDataSource for ScriptedFeed {
    fn fetch_daily(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PriceBar>> {
        if self.fail_tickers.iter().any(|t| t == ticker) {
            return Err(AppError::UpstreamFetch {
                ticker: ticker.to_string(),
                message: "scripted failure".to_string(),
            });
        }
        Ok(self
            .bars
            .iter()
            .filter(|b| b.date >= start && b.date <= end)
            .cloned()
            .collect())
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn config_for(tickers: &[&str], history_start: NaiveDate) -> Config {
    Config {
        database_path: ":memory:".to_string(),
        tickers: tickers.iter().map(|t| t.to_string()).collect(),
        history_start,
        window_days: 60,
        min_window_rows: 20,
        seam_context_rows: 60,
        default_horizon_days: 7,
        include_metrics: true,
        include_trend: true,
    }
}

fn trending_closes(count: usize) -> Vec<f64> {
    (0..count)
        .map(|i| 100.0 + (i as f64 * 0.3).sin() * 3.0 + i as f64 * 0.2)
        .collect()
}

#[test]
fn full_then_incremental_sync_builds_contiguous_table() {
    let start = date(2024, 1, 1);
    let feed = ScriptedFeed::new(start, &trending_closes(90));
    let store = SqliteFeatureStore::new_in_memory().unwrap();
    let config = config_for(&["AAPL"], start);
    let sync = Synchronizer::new(&feed, &store, &config);

    // Backfill the first 60 days, then catch up the remaining 30.
    let outcome = sync.sync_ticker("AAPL", start + Duration::days(59)).unwrap();
    assert_eq!(outcome, SyncOutcome::Created(60));

    let outcome = sync.sync_ticker("AAPL", start + Duration::days(89)).unwrap();
    assert_eq!(outcome, SyncOutcome::Appended(30));

    let rows = store
        .find_range("AAPL", start, start + Duration::days(89))
        .unwrap();
    assert_eq!(rows.len(), 90);

    // Contiguous ascending dates, no duplicates, every field populated.
    for pair in rows.windows(2) {
        assert_eq!(pair[1].date - pair[0].date, Duration::days(1));
    }
    for row in &rows {
        assert!(row.rsi.is_finite());
        assert!((0.0..=100.0).contains(&row.rsi));
        assert!(row.bb_upper >= row.bb_mid && row.bb_mid >= row.bb_lower);
        assert_eq!(row.macd_hist, row.macd_line - row.macd_signal);
    }
}

#[test]
fn resync_without_new_data_is_byte_identical() {
    let start = date(2024, 1, 1);
    let today = start + Duration::days(59);
    let feed = ScriptedFeed::new(start, &trending_closes(60));
    let store = SqliteFeatureStore::new_in_memory().unwrap();
    let config = config_for(&["AAPL"], start);
    let sync = Synchronizer::new(&feed, &store, &config);

    sync.sync_ticker("AAPL", today).unwrap();
    let first = store.find_range("AAPL", start, today).unwrap();

    // Second run is a no-op and leaves the table untouched.
    assert_eq!(
        sync.sync_ticker("AAPL", today).unwrap(),
        SyncOutcome::AlreadyCurrent
    );
    let second = store.find_range("AAPL", start, today).unwrap();
    assert_eq!(first, second);
}

#[test]
fn batch_skips_failing_ticker_and_continues() {
    let start = date(2024, 1, 1);
    let mut feed = ScriptedFeed::new(start, &trending_closes(60));
    feed.fail_tickers.push("JPM".to_string());
    let store = SqliteFeatureStore::new_in_memory().unwrap();
    let config = config_for(&["AAPL", "JPM", "MSFT"], start);
    let sync = Synchronizer::new(&feed, &store, &config);

    let report = sync.sync_all(start + Duration::days(59)).unwrap();

    assert_eq!(report.synced.len(), 2);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].0, "JPM");
    assert!(store.find_latest_date("AAPL").unwrap().is_some());
    assert!(store.find_latest_date("JPM").unwrap().is_none());
    assert!(store.find_latest_date("MSFT").unwrap().is_some());
}

#[test]
fn short_history_is_skipped_not_fatal() {
    let start = date(2024, 1, 1);
    // Ten bars cannot warm a 20-day rolling window.
    let feed = ScriptedFeed::new(start, &trending_closes(10));
    let store = SqliteFeatureStore::new_in_memory().unwrap();
    let config = config_for(&["AAPL"], start);
    let sync = Synchronizer::new(&feed, &store, &config);

    let report = sync.sync_all(start + Duration::days(9)).unwrap();
    assert!(report.synced.is_empty());
    assert_eq!(report.skipped.len(), 1);
    assert!(store.find_latest_date("AAPL").unwrap().is_none());
}

#[test]
fn reset_then_sync_rebuilds_from_history_start() {
    let start = date(2024, 1, 1);
    let today = start + Duration::days(59);
    let feed = ScriptedFeed::new(start, &trending_closes(60));
    let store = SqliteFeatureStore::new_in_memory().unwrap();
    let config = config_for(&["AAPL"], start);
    let sync = Synchronizer::new(&feed, &store, &config);

    sync.sync_ticker("AAPL", today).unwrap();
    sync.reset().unwrap();
    assert!(store.find_latest_date("AAPL").unwrap().is_none());

    let outcome = sync.sync_ticker("AAPL", today).unwrap();
    assert_eq!(outcome, SyncOutcome::Created(60));
}
