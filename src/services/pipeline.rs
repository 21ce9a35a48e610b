//! Prediction pipeline orchestration.
//!
//! One parameterized pipeline replaces per-variant endpoints: window build,
//! external forecast, signal post-processing, then optional trend and
//! performance sections controlled by configuration flags. Any stage failure
//! aborts the request; no partial response is emitted.

use crate::config::Config;
use crate::error::Result;
use crate::services::evaluation::evaluate;
use crate::services::feature_store::FeatureStore;
use crate::services::forecast::Forecaster;
use crate::services::signal::{forecast_dates, label_forecast, overall_trend};
use crate::services::window::build_window;
use crate::types::{ForecastRequest, ForecastResponse};
use chrono::{Duration, NaiveDate};
use tracing::{debug, info};

/// Prediction pipeline over injected collaborators.
pub struct PredictionPipeline<'a> {
    store: &'a dyn FeatureStore,
    forecaster: &'a dyn Forecaster,
    config: &'a Config,
}

impl<'a> PredictionPipeline<'a> {
    pub fn new(
        store: &'a dyn FeatureStore,
        forecaster: &'a dyn Forecaster,
        config: &'a Config,
    ) -> Self {
        Self {
            store,
            forecaster,
            config,
        }
    }

    /// Run the full pipeline for one request as of `today`.
    pub fn predict(&self, request: &ForecastRequest, today: NaiveDate) -> Result<ForecastResponse> {
        let ticker = request.symbol.to_uppercase();
        let requested = request
            .prediction_days
            .unwrap_or(self.config.default_horizon_days);

        let window = build_window(self.store, self.config, &ticker, requested, today)?;
        debug!(
            "{}: window of {} rows, horizon {} days",
            ticker,
            window.rows.len(),
            window.horizon_days
        );

        let raw = self.forecaster.predict(&window.rows, window.horizon_days)?;
        let dates = forecast_dates(today + Duration::days(1), window.horizon_days);
        let predictions = label_forecast(&ticker, &raw, window.horizon_days, &dates)?;

        let trend = self
            .config
            .include_trend
            .then(|| overall_trend(&predictions));

        let metrics = self.config.include_metrics.then(|| {
            // Trailing realized closes against the leading forecast values.
            let n = window
                .rows
                .len()
                .min(window.horizon_days as usize)
                .min(raw.len());
            let actuals: Vec<f64> = window.rows[window.rows.len() - n..]
                .iter()
                .map(|row| row.close)
                .collect();
            evaluate(&actuals, &raw[..n])
        });

        info!(
            "{}: {} predictions, trend {:?}",
            ticker,
            predictions.len(),
            trend
        );

        Ok(ForecastResponse {
            symbol: ticker,
            current_price: request.current_price,
            predictions,
            overall_trend: trend,
            performance_metrics: metrics,
        })
    }
}
