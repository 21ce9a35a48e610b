//! External forecaster collaborator.
//!
//! The trained model is opaque to the pipeline: anything that maps a feature
//! window to one predicted close per future day can be plugged in. A
//! deterministic drift baseline ships as the stand-in implementation.

use crate::error::{AppError, Result};
use crate::types::FeatureRow;

/// Opaque multi-day price forecaster.
///
/// Returns one predicted close per future day, in date order, starting
/// tomorrow relative to the window's last row.
pub trait Forecaster {
    fn predict(&self, window: &[FeatureRow], horizon_days: u32) -> Result<Vec<f64>>;
}

/// Random-walk-with-drift baseline.
///
/// Projects the window's last close forward by the mean daily close-to-close
/// change observed in the window. Deterministic, so repeated requests over an
/// unchanged window produce identical forecasts.
pub struct DriftForecaster;

impl Forecaster for DriftForecaster {
    fn predict(&self, window: &[FeatureRow], horizon_days: u32) -> Result<Vec<f64>> {
        let last = window.last().ok_or_else(|| AppError::NoData {
            ticker: "<empty window>".to_string(),
        })?;

        let drift = if window.len() > 1 {
            let first = &window[0];
            (last.close - first.close) / (window.len() - 1) as f64
        } else {
            0.0
        };

        Ok((1..=horizon_days)
            .map(|i| last.close + drift * i as f64)
            .collect())
    }
}
