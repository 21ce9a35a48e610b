//! Signal post-processing.
//!
//! Turns a raw forecast sequence into weekly trade signals: the sequence is
//! partitioned into 7-day buckets, the bucket minimum is labeled buy, the
//! bucket maximum sell, everything else hold.

use crate::error::{AppError, Result};
use crate::types::{ForecastPoint, TradeAction, TrendDirection};
use chrono::{Duration, NaiveDate};
use tracing::warn;

/// Days per signal bucket.
pub const BUCKET_DAYS: usize = 7;

/// The calendar dates a forecast covers: `horizon_days` consecutive days
/// starting at `start` (tomorrow relative to the feature window).
pub fn forecast_dates(start: NaiveDate, horizon_days: u32) -> Vec<NaiveDate> {
    (0..horizon_days as i64)
        .map(|i| start + Duration::days(i))
        .collect()
}

/// Label a raw forecast with weekly buy/sell/hold actions.
///
/// Values beyond the horizon are ignored. The minimum check runs before the
/// maximum check, so a bucket whose values are all identical labels every day
/// buy. A bucket not fully covered by forecast values is skipped with a
/// warning; an entirely empty labeled result is an error.
pub fn label_forecast(
    ticker: &str,
    values: &[f64],
    horizon_days: u32,
    dates: &[NaiveDate],
) -> Result<Vec<ForecastPoint>> {
    if values.is_empty() {
        return Err(AppError::EmptyForecast {
            ticker: ticker.to_string(),
            horizon: horizon_days,
        });
    }

    let horizon = horizon_days as usize;
    let values = &values[..values.len().min(horizon)];
    let dates = &dates[..dates.len().min(horizon)];

    let mut points = Vec::with_capacity(values.len());
    for (bucket_index, dates_chunk) in dates.chunks(BUCKET_DAYS).enumerate() {
        let start = bucket_index * BUCKET_DAYS;
        if start + dates_chunk.len() > values.len() {
            warn!(
                "{}: bucket {} not fully covered by forecast values, skipping",
                ticker, bucket_index
            );
            continue;
        }
        let bucket = &values[start..start + dates_chunk.len()];

        let min = bucket.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = bucket.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

        for (&date, &value) in dates_chunk.iter().zip(bucket.iter()) {
            let action = if value == min {
                TradeAction::Buy
            } else if value == max {
                TradeAction::Sell
            } else {
                TradeAction::Hold
            };
            points.push(ForecastPoint {
                date,
                predicted_close: value,
                action,
            });
        }
    }

    if points.is_empty() {
        return Err(AppError::IncompleteForecast {
            ticker: ticker.to_string(),
            horizon: horizon_days,
        });
    }

    Ok(points)
}

/// Overall direction over the labeled sequence: upward only under a strict
/// greater-than test of last against first.
pub fn overall_trend(points: &[ForecastPoint]) -> TrendDirection {
    match (points.first(), points.last()) {
        (Some(first), Some(last)) if last.predicted_close > first.predicted_close => {
            TrendDirection::Upward
        }
        _ => TrendDirection::Downward,
    }
}
