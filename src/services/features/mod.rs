//! Technical feature computation and row assembly.
//!
//! Derives the fixed indicator set (RSI, MACD, Bollinger Bands, SMA) from an
//! ordered series of daily bars and assembles fully populated feature rows
//! ready for persistence.

pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod rsi;
pub mod sma;

pub use bollinger::{bollinger_series, BollingerPoint};
pub use ema::ema_series;
pub use macd::{macd_series, MacdPoint};
pub use rsi::rsi_series;
pub use sma::sma_series;

use crate::error::{AppError, Result};
use crate::types::{FeatureRow, PriceBar};
use tracing::warn;

/// RSI window, in day-over-day deltas.
pub const RSI_PERIOD: usize = 14;
/// MACD fast EMA span.
pub const MACD_FAST: usize = 12;
/// MACD slow EMA span.
pub const MACD_SLOW: usize = 26;
/// MACD signal EMA span.
pub const MACD_SIGNAL: usize = 9;
/// Bollinger window.
pub const BOLLINGER_PERIOD: usize = 20;
/// Bollinger standard deviation multiplier.
pub const BOLLINGER_STD_DEV: f64 = 2.0;
/// Simple moving average window.
pub const SMA_PERIOD: usize = 20;

/// The longest rolling window. A shorter series cannot produce a fully
/// populated row set even with edge filling.
pub const MIN_BARS: usize = BOLLINGER_PERIOD;

/// Band midpoint, used for percent-b when the bands collapse on every
/// window in the series and no computed value exists to fill from.
const COLLAPSED_PERCENT_B: f64 = 0.5;

/// Compute the full feature set for an ordered series of daily bars.
///
/// The output has one row per input bar with the same dates, every field
/// defined. Leading values a rolling window cannot produce are backfilled
/// from the first computed value; interior and trailing gaps are
/// forward-filled first, mirroring the preparation order of the pipeline.
pub fn compute_features(ticker: &str, bars: &[PriceBar]) -> Result<Vec<FeatureRow>> {
    if bars.len() < MIN_BARS {
        return Err(AppError::InsufficientData {
            ticker: ticker.to_string(),
            rows: bars.len(),
            min: MIN_BARS,
        });
    }

    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();

    let macd = macd_series(&closes, MACD_FAST, MACD_SLOW, MACD_SIGNAL);
    let bands = bollinger_series(&closes, BOLLINGER_PERIOD, BOLLINGER_STD_DEV);

    let rsi = filled_column(ticker, rsi_series(&closes, RSI_PERIOD))?;
    let sma = filled_column(ticker, sma_series(&closes, SMA_PERIOD))?;
    let bb_mid = filled_column(ticker, band_column(&bands, |p| Some(p.mid)))?;
    let bb_upper = filled_column(ticker, band_column(&bands, |p| Some(p.upper)))?;
    let bb_lower = filled_column(ticker, band_column(&bands, |p| Some(p.lower)))?;
    let bb_bandwidth = filled_column(ticker, band_column(&bands, |p| Some(p.bandwidth)))?;
    let bb_percent_b = percent_b_column(ticker, &bands)?;

    let rows = bars
        .iter()
        .enumerate()
        .map(|(i, bar)| FeatureRow {
            ticker: ticker.to_string(),
            date: bar.date,
            open: bar.open,
            high: bar.high,
            low: bar.low,
            close: bar.close,
            volume: bar.volume,
            rsi: rsi[i],
            macd_line: macd[i].line,
            macd_signal: macd[i].signal,
            macd_hist: macd[i].histogram,
            bb_mid: bb_mid[i],
            bb_upper: bb_upper[i],
            bb_lower: bb_lower[i],
            bb_bandwidth: bb_bandwidth[i],
            bb_percent_b: bb_percent_b[i],
            sma: sma[i],
        })
        .collect();

    Ok(rows)
}

/// Forward-fill then backward-fill a feature column in place. Returns false
/// when the column holds no observed value to fill from.
pub fn fill_edges(values: &mut [Option<f64>]) -> bool {
    let mut last = None;
    for v in values.iter_mut() {
        match *v {
            Some(x) => last = Some(x),
            None => *v = last,
        }
    }

    let mut next = None;
    for v in values.iter_mut().rev() {
        match *v {
            Some(x) => next = Some(x),
            None => *v = next,
        }
    }

    last.is_some()
}

/// Fill a column's edges and unwrap it, rejecting a column with no computed
/// values as too short for its window.
fn filled_column(ticker: &str, mut values: Vec<Option<f64>>) -> Result<Vec<f64>> {
    if !fill_edges(&mut values) {
        return Err(AppError::InsufficientData {
            ticker: ticker.to_string(),
            rows: values.len(),
            min: MIN_BARS,
        });
    }
    Ok(values.into_iter().flatten().collect())
}

fn band_column<F>(bands: &[Option<BollingerPoint>], f: F) -> Vec<Option<f64>>
where
    F: Fn(&BollingerPoint) -> Option<f64>,
{
    bands.iter().map(|p| p.as_ref().and_then(&f)).collect()
}

/// Percent-b needs its own path: a window whose bands collapse has no
/// defined value, which is flagged and left to the fill pass. When every
/// window collapsed there is nothing to fill from, so the band midpoint is
/// used instead of failing the whole series.
fn percent_b_column(ticker: &str, bands: &[Option<BollingerPoint>]) -> Result<Vec<f64>> {
    let collapsed = bands
        .iter()
        .flatten()
        .filter(|p| p.percent_b.is_none())
        .count();
    if collapsed > 0 {
        warn!(
            "{}: Bollinger bands collapsed on {} rows, percent-b resolved by fill",
            ticker, collapsed
        );
    }

    let mut values = band_column(bands, |p| p.percent_b);
    if !fill_edges(&mut values) {
        warn!(
            "{}: no defined percent-b in the whole series, using band midpoint",
            ticker
        );
        return Ok(vec![COLLAPSED_PERCENT_B; bands.len()]);
    }
    Ok(values.into_iter().flatten().collect())
}
