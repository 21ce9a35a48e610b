use thiserror::Error;

/// Application error types.
///
/// Synchronization failures are recoverable per ticker: the batch logs a
/// warning and moves on. Prediction-path failures abort the request and are
/// reported with the ticker/horizon that triggered them.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("no data for {ticker} in the requested range")]
    NoData { ticker: String },

    #[error("insufficient data for {ticker}: {rows} rows available, {min} required")]
    InsufficientData {
        ticker: String,
        rows: usize,
        min: usize,
    },

    #[error("forecaster returned no points for {ticker} (horizon {horizon} days)")]
    EmptyForecast { ticker: String, horizon: u32 },

    #[error("forecast for {ticker} too short to label any full week (horizon {horizon} days)")]
    IncompleteForecast { ticker: String, horizon: u32 },

    #[error("market data fetch failed for {ticker}: {message}")]
    UpstreamFetch { ticker: String, message: String },

    #[error("malformed response from {origin}: {message}")]
    MalformedResponse { origin: String, message: String },

    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),

    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),

    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),
}

impl AppError {
    /// Whether a batch synchronization run may skip the ticker and continue.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            AppError::NoData { .. }
                | AppError::InsufficientData { .. }
                | AppError::UpstreamFetch { .. }
                | AppError::MalformedResponse { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_carry_context() {
        let err = AppError::InsufficientData {
            ticker: "AAPL".to_string(),
            rows: 12,
            min: 20,
        };
        let msg = err.to_string();
        assert!(msg.contains("AAPL"));
        assert!(msg.contains("12"));
        assert!(msg.contains("20"));
    }

    #[test]
    fn test_empty_forecast_mentions_horizon() {
        let err = AppError::EmptyForecast {
            ticker: "TSLA".to_string(),
            horizon: 28,
        };
        assert!(err.to_string().contains("28"));
    }

    #[test]
    fn test_recoverable_classification() {
        assert!(AppError::UpstreamFetch {
            ticker: "MSFT".to_string(),
            message: "timeout".to_string(),
        }
        .is_recoverable());

        assert!(!AppError::EmptyForecast {
            ticker: "MSFT".to_string(),
            horizon: 7,
        }
        .is_recoverable());
    }
}
