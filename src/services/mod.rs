pub mod evaluation;
pub mod feature_store;
pub mod features;
pub mod forecast;
pub mod pipeline;
pub mod signal;
pub mod sync;
pub mod window;

pub use evaluation::evaluate;
pub use feature_store::{FeatureStore, SqliteFeatureStore};
pub use features::compute_features;
pub use forecast::{DriftForecaster, Forecaster};
pub use pipeline::PredictionPipeline;
pub use signal::{forecast_dates, label_forecast, overall_trend};
pub use sync::{SyncOutcome, SyncReport, Synchronizer};
pub use window::{build_window, snap_horizon, FeatureWindow, SUPPORTED_HORIZONS};
