//! Bollinger Bands.

/// Bands and derived columns for one row.
#[derive(Debug, Clone, Copy)]
pub struct BollingerPoint {
    pub mid: f64,
    pub upper: f64,
    pub lower: f64,
    pub bandwidth: f64,
    /// Position of the close within the bands. None when the bands collapse
    /// to a single line (zero deviation), where the position is undefined.
    pub percent_b: Option<f64>,
}

/// Calculate rolling Bollinger Bands.
///
/// The middle band is the rolling mean, the outer bands sit `k` population
/// standard deviations away, bandwidth is upper minus lower, and percent-b
/// is (close - lower) / (upper - lower). The first `period - 1` values lack
/// a full window and are None.
pub fn bollinger_series(closes: &[f64], period: usize, k: f64) -> Vec<Option<BollingerPoint>> {
    let mut out = vec![None; closes.len()];
    if period == 0 || closes.len() < period {
        return out;
    }

    for i in (period - 1)..closes.len() {
        let window = &closes[i + 1 - period..=i];
        let mid = window.iter().sum::<f64>() / period as f64;
        let variance = window.iter().map(|v| (v - mid).powi(2)).sum::<f64>() / period as f64;
        let std_dev = variance.sqrt();

        let upper = mid + k * std_dev;
        let lower = mid - k * std_dev;
        let bandwidth = upper - lower;
        let percent_b = if bandwidth > 0.0 {
            Some((closes[i] - lower) / bandwidth)
        } else {
            None
        };

        out[i] = Some(BollingerPoint {
            mid,
            upper,
            lower,
            bandwidth,
            percent_b,
        });
    }

    out
}
