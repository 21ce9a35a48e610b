//! MACD (Moving Average Convergence Divergence).

use crate::services::features::ema::ema_series;

/// MACD line, signal line, and histogram for one row.
#[derive(Debug, Clone, Copy)]
pub struct MacdPoint {
    pub line: f64,
    pub signal: f64,
    pub histogram: f64,
}

/// Calculate the MACD series: the line is the fast EMA minus the slow EMA of
/// the closes, the signal is an EMA of the line, and the histogram is line
/// minus signal.
///
/// Because the EMAs are seeded from the first observation, every row has a
/// defined value and no edge filling is needed for MACD columns.
pub fn macd_series(closes: &[f64], fast: usize, slow: usize, signal: usize) -> Vec<MacdPoint> {
    let fast_ema = ema_series(closes, fast);
    let slow_ema = ema_series(closes, slow);

    let line: Vec<f64> = fast_ema
        .iter()
        .zip(slow_ema.iter())
        .map(|(f, s)| f - s)
        .collect();
    let signal_line = ema_series(&line, signal);

    line.iter()
        .zip(signal_line.iter())
        .map(|(&line, &signal)| MacdPoint {
            line,
            signal,
            histogram: line - signal,
        })
        .collect()
}
