//! Scry - incremental equity feature pipeline with forecast-to-signal
//! post-processing.
//!
//! Daily price bars are pulled from a market-data source, augmented with a
//! fixed technical-indicator set, and persisted incrementally per ticker.
//! On the prediction side, an opaque forecaster's multi-day output is turned
//! into weekly buy/sell/hold signals.

pub mod config;
pub mod error;
pub mod services;
pub mod sources;
pub mod types;

pub use config::Config;
pub use error::{AppError, Result};
