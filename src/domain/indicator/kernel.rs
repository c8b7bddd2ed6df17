//! Kernel regression estimate.
//!
//! Non-parametric weighted local average over the most recent `window` closes.
//! Bar i (0 = most recent) is weighted by:
//!
//!   w_i = (1 + i² / (2·h²·r))^-r
//!
//! Larger bandwidth h gives a smoother line; smaller h reacts faster. Two
//! instantiations run concurrently per evaluation (a fast and a slow line)
//! and crossings between them drive the crossover strategy.
//!
//! Degenerate case: fewer than `window` closes returns the latest close
//! unchanged (an empty series returns 0.0). This is a defined fallback, not
//! an error — the estimate is always available.

use crate::domain::bar::{recent_closes, PriceBar};

/// Rational quadratic kernel weight for offset `i` from the most recent bar.
pub fn weight(i: usize, h: f64, r: f64) -> f64 {
    let i = i as f64;
    (1.0 + i * i / (2.0 * h * h * r)).powf(-r)
}

/// Weighted average of `closes` (reverse chronological, index 0 = latest).
pub fn estimate(closes: &[f64], h: f64, r: f64, window: usize) -> f64 {
    if closes.is_empty() {
        return 0.0;
    }
    if closes.len() < window {
        return closes[0];
    }

    let mut weighted_sum = 0.0;
    let mut weight_sum = 0.0;
    for (i, &close) in closes.iter().take(window).enumerate() {
        let w = weight(i, h, r);
        weighted_sum += close * w;
        weight_sum += w;
    }
    weighted_sum / weight_sum
}

/// Per-bar kernel estimate over the full series, so both the current and the
/// previous bar's value are available for crossover comparison.
pub fn calculate(bars: &[PriceBar], h: f64, r: f64, window: usize) -> Vec<f64> {
    (0..bars.len())
        .map(|i| {
            let closes = recent_closes(&bars[..=i], window);
            estimate(&closes, h, r, window)
        })
        .collect()
}
