use chrono::NaiveDate;
use std::env;

/// Default ticker universe for batch synchronization.
const DEFAULT_TICKERS: [&str; 10] = [
    "AAPL", "AMZN", "BRK-B", "GOOGL", "JNJ", "JPM", "META", "MSFT", "NVDA", "TSLA",
];

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the SQLite feature store.
    pub database_path: String,
    /// Tickers covered by batch synchronization.
    pub tickers: Vec<String>,
    /// First date fetched when a ticker has no stored history.
    pub history_start: NaiveDate,
    /// Calendar days of features pulled for a forecast window.
    pub window_days: i64,
    /// Minimum feature rows required before forecasting.
    pub min_window_rows: usize,
    /// Stored rows prepended before computing features for an append range,
    /// so rolling windows are warm at the seam.
    pub seam_context_rows: usize,
    /// Horizon applied when a prediction request omits one.
    pub default_horizon_days: u32,
    /// Include error metrics in prediction responses.
    pub include_metrics: bool,
    /// Include the overall trend in prediction responses.
    pub include_trend: bool,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let tickers = env::var("TICKERS")
            .ok()
            .map(|s| {
                s.split(',')
                    .map(|t| t.trim().to_uppercase())
                    .filter(|t| !t.is_empty())
                    .collect::<Vec<_>>()
            })
            .filter(|t: &Vec<String>| !t.is_empty())
            .unwrap_or_else(|| DEFAULT_TICKERS.iter().map(|t| t.to_string()).collect());

        Self {
            database_path: env::var("DATABASE_PATH").unwrap_or_else(|_| "scry.db".to_string()),
            tickers,
            history_start: env::var("HISTORY_START")
                .ok()
                .and_then(|v| NaiveDate::parse_from_str(&v, "%Y-%m-%d").ok())
                .unwrap_or_else(default_history_start),
            window_days: env::var("WINDOW_DAYS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(60),
            min_window_rows: env::var("MIN_WINDOW_ROWS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(20),
            seam_context_rows: env::var("SEAM_CONTEXT_ROWS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(60),
            default_horizon_days: env::var("DEFAULT_HORIZON_DAYS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(7),
            include_metrics: env::var("INCLUDE_METRICS")
                .ok()
                .map(|v| v == "true" || v == "1")
                .unwrap_or(true),
            include_trend: env::var("INCLUDE_TREND")
                .ok()
                .map(|v| v == "true" || v == "1")
                .unwrap_or(true),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

fn default_history_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2019, 1, 1).expect("valid date")
}
