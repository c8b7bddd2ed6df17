//! RSI (Relative Strength Index).
//!
//! Close-to-close deltas are split into gain and loss series (losses stored
//! as positive magnitudes), each averaged with a trailing simple mean over
//! `period` deltas:
//!
//!   RSI = 100 - 100 / (1 + avg_gain / avg_loss)
//!
//! If avg_loss == 0 the RSI saturates at 100 (never divides by zero).
//! Warmup: a bar needs `period` deltas behind it, i.e. period + 1 bars;
//! earlier bars are `None`.

use crate::domain::bar::PriceBar;

pub fn calculate(bars: &[PriceBar], period: usize) -> Vec<Option<f64>> {
    if period == 0 {
        return vec![None; bars.len()];
    }

    let mut gains: Vec<f64> = Vec::with_capacity(bars.len().saturating_sub(1));
    let mut losses: Vec<f64> = Vec::with_capacity(bars.len().saturating_sub(1));
    for w in bars.windows(2) {
        let change = w[1].close - w[0].close;
        gains.push(if change > 0.0 { change } else { 0.0 });
        losses.push(if change < 0.0 { -change } else { 0.0 });
    }

    (0..bars.len())
        .map(|i| {
            // Bar i has deltas gains[..i]; need the trailing `period` of them.
            if i < period {
                return None;
            }
            let start = i - period;
            let avg_gain: f64 = gains[start..i].iter().sum::<f64>() / period as f64;
            let avg_loss: f64 = losses[start..i].iter().sum::<f64>() / period as f64;

            if avg_loss == 0.0 {
                Some(100.0)
            } else {
                Some(100.0 - 100.0 / (1.0 + avg_gain / avg_loss))
            }
        })
        .collect()
}
