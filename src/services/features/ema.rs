//! Exponential moving average.

/// Calculate an EMA series with smoothing factor 2 / (span + 1).
///
/// The recursion is seeded from the first observation with no bias
/// adjustment, so an output value exists for every input value.
pub fn ema_series(values: &[f64], span: usize) -> Vec<f64> {
    let multiplier = 2.0 / (span as f64 + 1.0);
    let mut ema: Vec<f64> = Vec::with_capacity(values.len());

    for &value in values {
        let next = match ema.last() {
            Some(&prev) => (value - prev) * multiplier + prev,
            None => value,
        };
        ema.push(next);
    }

    ema
}
