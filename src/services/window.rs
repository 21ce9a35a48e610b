//! Forecast window construction.
//!
//! Resolves a requested horizon to the nearest supported discrete horizon and
//! pulls a bounded window of recent feature rows as forecaster input.

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::services::feature_store::FeatureStore;
use crate::types::FeatureRow;
use chrono::{Duration, NaiveDate};
use tracing::debug;

/// Horizons the forecaster supports, in days. All are multiples of a week so
/// signal bucketing never leaves a partial final bucket.
pub const SUPPORTED_HORIZONS: [u32; 8] = [7, 14, 21, 28, 35, 42, 49, 56];

/// Feature window handed to the external forecaster.
#[derive(Debug, Clone)]
pub struct FeatureWindow {
    /// Recent feature rows, ascending by date.
    pub rows: Vec<FeatureRow>,
    /// The snapped horizon the forecast must cover.
    pub horizon_days: u32,
}

/// Snap a requested horizon to the nearest supported value, breaking exact
/// ties toward the smaller horizon.
pub fn snap_horizon(requested: u32) -> u32 {
    let mut best = SUPPORTED_HORIZONS[0];
    let mut best_distance = best.abs_diff(requested);

    for &candidate in &SUPPORTED_HORIZONS[1..] {
        let distance = candidate.abs_diff(requested);
        if distance < best_distance {
            best = candidate;
            best_distance = distance;
        }
    }

    best
}

/// Build the forecaster input for a ticker: the feature rows with date in
/// [today - window_days, today] plus the snapped horizon.
pub fn build_window(
    store: &dyn FeatureStore,
    config: &Config,
    ticker: &str,
    requested_horizon: u32,
    today: NaiveDate,
) -> Result<FeatureWindow> {
    let horizon_days = snap_horizon(requested_horizon);
    if horizon_days != requested_horizon {
        debug!(
            "{}: horizon {} snapped to {}",
            ticker, requested_horizon, horizon_days
        );
    }

    let start = today - Duration::days(config.window_days);
    let rows = store.find_range(ticker, start, today)?;

    if rows.is_empty() {
        return Err(AppError::NoData {
            ticker: ticker.to_string(),
        });
    }
    if rows.len() < config.min_window_rows {
        return Err(AppError::InsufficientData {
            ticker: ticker.to_string(),
            rows: rows.len(),
            min: config.min_window_rows,
        });
    }

    Ok(FeatureWindow { rows, horizon_days })
}
