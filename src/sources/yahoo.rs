//! Yahoo Finance client for historical daily bars.
//!
//! Uses the unofficial v8 chart API with explicit period1/period2 bounds and
//! a 1d interval over blocking HTTP.

use crate::error::{AppError, Result};
use crate::sources::MarketDataSource;
use crate::types::PriceBar;
use chrono::{DateTime, Duration as ChronoDuration, NaiveDate};
use reqwest::blocking::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Yahoo Finance chart response.
#[derive(Debug, Deserialize)]
struct YahooChartResponse {
    chart: YahooChart,
}

#[derive(Debug, Deserialize)]
struct YahooChart {
    result: Option<Vec<YahooResult>>,
    error: Option<YahooApiError>,
}

#[derive(Debug, Deserialize)]
struct YahooApiError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct YahooResult {
    timestamp: Option<Vec<i64>>,
    indicators: YahooIndicators,
}

#[derive(Debug, Deserialize)]
struct YahooIndicators {
    quote: Vec<YahooQuote>,
}

#[derive(Debug, Deserialize)]
struct YahooQuote {
    open: Option<Vec<Option<f64>>>,
    high: Option<Vec<Option<f64>>>,
    low: Option<Vec<Option<f64>>>,
    close: Option<Vec<Option<f64>>>,
    volume: Option<Vec<Option<u64>>>,
}

/// Normalize a symbol for the Yahoo Finance API.
/// Yahoo uses hyphens instead of dots for share classes (e.g., BRK-B not BRK.B)
fn normalize_yahoo_symbol(symbol: &str) -> String {
    symbol.to_uppercase().replace('.', "-")
}

/// Yahoo Finance API client.
pub struct YahooFinanceClient {
    client: Client,
    base_url: String,
}

impl YahooFinanceClient {
    /// Create a new Yahoo Finance client.
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: "https://query1.finance.yahoo.com".to_string(),
        }
    }

    /// Create a client against a different base URL (for testing).
    #[allow(dead_code)]
    pub fn with_base_url(base_url: String) -> Self {
        let mut client = Self::new();
        client.base_url = base_url;
        client
    }

    fn fetch_chart(&self, ticker: &str, start: NaiveDate, end: NaiveDate) -> Result<Vec<PriceBar>> {
        let yahoo_symbol = normalize_yahoo_symbol(ticker);
        // period2 is exclusive, so push it one day past the requested end.
        let period1 = start.and_hms_opt(0, 0, 0).unwrap().and_utc().timestamp();
        let period2 = (end + ChronoDuration::days(1))
            .and_hms_opt(0, 0, 0)
            .unwrap()
            .and_utc()
            .timestamp();
        let url = format!(
            "{}/v8/finance/chart/{}?period1={}&period2={}&interval=1d&includePrePost=false",
            self.base_url, yahoo_symbol, period1, period2
        );

        debug!("Fetching Yahoo Finance data: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| AppError::UpstreamFetch {
                ticker: ticker.to_string(),
                message: format!("request failed: {e}"),
            })?;

        if !response.status().is_success() {
            return Err(AppError::UpstreamFetch {
                ticker: ticker.to_string(),
                message: format!("API error: {}", response.status()),
            });
        }

        let data: YahooChartResponse =
            response.json().map_err(|e| AppError::MalformedResponse {
                origin: "yahoo".to_string(),
                message: format!("parse error: {e}"),
            })?;

        if let Some(error) = data.chart.error {
            return Err(AppError::UpstreamFetch {
                ticker: ticker.to_string(),
                message: format!("{} - {}", error.code, error.description),
            });
        }

        let result = data
            .chart
            .result
            .and_then(|r| r.into_iter().next())
            .ok_or_else(|| AppError::MalformedResponse {
                origin: "yahoo".to_string(),
                message: "no results in response".to_string(),
            })?;

        // A valid response for a range with no trading days has no timestamps.
        let timestamps = match result.timestamp {
            Some(ts) => ts,
            None => return Ok(Vec::new()),
        };

        let quote = result
            .indicators
            .quote
            .into_iter()
            .next()
            .ok_or_else(|| AppError::MalformedResponse {
                origin: "yahoo".to_string(),
                message: "no quote data in response".to_string(),
            })?;

        let opens = quote.open.unwrap_or_default();
        let highs = quote.high.unwrap_or_default();
        let lows = quote.low.unwrap_or_default();
        let closes = quote.close.unwrap_or_default();
        let volumes = quote.volume.unwrap_or_default();

        let mut bars = Vec::new();
        for (i, &timestamp) in timestamps.iter().enumerate() {
            let close = closes.get(i).and_then(|v| *v).unwrap_or(0.0);
            // Skip invalid data points
            if close <= 0.0 {
                continue;
            }

            let date = match DateTime::from_timestamp(timestamp, 0) {
                Some(dt) => dt.date_naive(),
                None => continue,
            };
            if date < start || date > end {
                continue;
            }

            bars.push(PriceBar {
                date,
                open: opens.get(i).and_then(|v| *v).unwrap_or(close),
                high: highs.get(i).and_then(|v| *v).unwrap_or(close),
                low: lows.get(i).and_then(|v| *v).unwrap_or(close),
                close,
                volume: volumes.get(i).and_then(|v| *v).unwrap_or(0) as f64,
            });
        }

        bars.sort_by_key(|b| b.date);
        Ok(bars)
    }
}

impl MarketDataSource for YahooFinanceClient {
    fn fetch_daily(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PriceBar>> {
        self.fetch_chart(ticker, start, end)
    }
}

impl Default for YahooFinanceClient {
    fn default() -> Self {
        Self::new()
    }
}
