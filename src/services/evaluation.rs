//! Forecast performance evaluation.

use crate::types::PerformanceMetrics;

/// Compare realized closes against forecasted values of equal length.
///
/// Standard definitions of MAE, MSE, and RMSE; R² is None when the realized
/// closes have zero variance, where the coefficient of determination is
/// undefined. Inputs of unequal length are truncated to the shorter.
pub fn evaluate(actuals: &[f64], forecasts: &[f64]) -> PerformanceMetrics {
    let n = actuals.len().min(forecasts.len());
    if n == 0 {
        return PerformanceMetrics {
            mae: 0.0,
            mse: 0.0,
            rmse: 0.0,
            r2: None,
        };
    }

    let actuals = &actuals[..n];
    let forecasts = &forecasts[..n];

    let mae = actuals
        .iter()
        .zip(forecasts)
        .map(|(a, f)| (a - f).abs())
        .sum::<f64>()
        / n as f64;
    let mse = actuals
        .iter()
        .zip(forecasts)
        .map(|(a, f)| (a - f).powi(2))
        .sum::<f64>()
        / n as f64;
    let rmse = mse.sqrt();

    let mean = actuals.iter().sum::<f64>() / n as f64;
    let ss_tot = actuals.iter().map(|a| (a - mean).powi(2)).sum::<f64>();
    let ss_res = actuals
        .iter()
        .zip(forecasts)
        .map(|(a, f)| (a - f).powi(2))
        .sum::<f64>();
    let r2 = if ss_tot == 0.0 {
        None
    } else {
        Some(1.0 - ss_res / ss_tot)
    };

    PerformanceMetrics { mae, mse, rmse, r2 }
}
