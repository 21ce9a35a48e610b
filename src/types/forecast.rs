use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Trade action assigned to a forecasted day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeAction {
    Buy,
    Sell,
    Hold,
}

/// Direction of the forecast from first to last labeled point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Upward,
    Downward,
}

/// One forecasted day with its assigned action. Produced fresh per request,
/// never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub predicted_close: f64,
    pub action: TradeAction,
}

/// Prediction request payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastRequest {
    pub symbol: String,
    pub current_price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prediction_days: Option<u32>,
}

/// Summary error metrics comparing forecasts against realized closes.
///
/// `r2` is None when the realized closes have zero variance, where the
/// coefficient of determination is undefined; it serializes as null rather
/// than a fabricated number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub struct PerformanceMetrics {
    pub mae: f64,
    pub mse: f64,
    pub rmse: f64,
    pub r2: Option<f64>,
}

/// Prediction response payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastResponse {
    pub symbol: String,
    pub current_price: f64,
    pub predictions: Vec<ForecastPoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overall_trend: Option<TrendDirection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub performance_metrics: Option<PerformanceMetrics>,
}
