//! Relative Strength Index (RSI).

/// Calculate a rolling-mean RSI series.
///
/// Gains and losses are averaged over the trailing `period` day-over-day
/// deltas: positive deltas contribute to the gain, negative magnitudes to
/// the loss. A window with zero losses saturates at exactly 100 rather than
/// dividing by zero. The first `period` values lack a full window of deltas
/// and are None.
pub fn rsi_series(closes: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; closes.len()];
    if period == 0 {
        return out;
    }

    for i in period..closes.len() {
        let mut gain_sum = 0.0;
        let mut loss_sum = 0.0;
        for j in (i - period + 1)..=i {
            let change = closes[j] - closes[j - 1];
            if change > 0.0 {
                gain_sum += change;
            } else {
                loss_sum += -change;
            }
        }

        let avg_gain = gain_sum / period as f64;
        let avg_loss = loss_sum / period as f64;

        out[i] = Some(if avg_loss == 0.0 {
            100.0
        } else {
            let rs = avg_gain / avg_loss;
            100.0 - 100.0 / (1.0 + rs)
        });
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rsi_leading_values_undefined() {
        let closes: Vec<f64> = (0..20).map(|i| 100.0 + i as f64).collect();
        let rsi = rsi_series(&closes, 14);
        assert!(rsi[..14].iter().all(|v| v.is_none()));
        assert!(rsi[14..].iter().all(|v| v.is_some()));
    }

    #[test]
    fn test_rsi_short_series_all_undefined() {
        let closes = [100.0, 101.0, 102.0];
        assert!(rsi_series(&closes, 14).iter().all(|v| v.is_none()));
    }

    #[test]
    fn test_rsi_within_bounds() {
        let closes: Vec<f64> = (0..60)
            .map(|i| 100.0 + (i as f64 * 0.7).sin() * 5.0)
            .collect();
        for value in rsi_series(&closes, 14).iter().flatten() {
            assert!((0.0..=100.0).contains(value), "RSI out of range: {value}");
        }
    }

    #[test]
    fn test_rsi_saturates_at_100_without_losses() {
        let closes: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
        let rsi = rsi_series(&closes, 14);
        assert_eq!(rsi[29], Some(100.0));
    }

    #[test]
    fn test_rsi_flat_window_counts_as_no_losses() {
        let closes = [50.0; 30];
        let rsi = rsi_series(&closes, 14);
        assert_eq!(rsi[29], Some(100.0));
    }

    #[test]
    fn test_rsi_near_zero_in_downtrend() {
        let closes: Vec<f64> = (0..30).map(|i| 200.0 - i as f64).collect();
        let rsi = rsi_series(&closes, 14);
        assert_eq!(rsi[29], Some(0.0));
    }

    #[test]
    fn test_rsi_balanced_alternation_is_neutral() {
        // Equal-sized gains and losses alternate, so RS = 1 and RSI = 50.
        let closes: Vec<f64> = (0..31)
            .map(|i| if i % 2 == 0 { 100.0 } else { 101.0 })
            .collect();
        let rsi = rsi_series(&closes, 14);
        let value = rsi[30].unwrap();
        assert!((value - 50.0).abs() < 1e-9, "expected 50, got {value}");
    }
}
