//! Bollinger Bands.
//!
//! Trailing mean and sample standard deviation (divides by N-1) of closes
//! over `period` bars:
//! - upper = mean + width·std
//! - lower = mean - width·std
//!
//! Warmup: first (period - 1) bars are `None`.

use crate::domain::bar::PriceBar;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BollingerPoint {
    pub mean: f64,
    pub std_dev: f64,
    pub upper: f64,
    pub lower: f64,
}

pub fn calculate(bars: &[PriceBar], period: usize, width: f64) -> Vec<Option<BollingerPoint>> {
    if period < 2 {
        return vec![None; bars.len()];
    }

    (0..bars.len())
        .map(|i| {
            if i + 1 < period {
                return None;
            }
            let window = &bars[i + 1 - period..=i];

            let mean: f64 = window.iter().map(|b| b.close).sum::<f64>() / period as f64;
            let variance: f64 = window
                .iter()
                .map(|b| {
                    let diff = b.close - mean;
                    diff * diff
                })
                .sum::<f64>()
                / (period - 1) as f64;
            let std_dev = variance.sqrt();

            Some(BollingerPoint {
                mean,
                std_dev,
                upper: mean + width * std_dev,
                lower: mean - width * std_dev,
            })
        })
        .collect()
}
