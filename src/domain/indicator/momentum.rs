//! Momentum: fractional price change over a fixed lag.
//!
//! momentum(lag)[i] = (C[i] - C[i-lag]) / C[i-lag]
//!
//! Warmup: first `lag` bars are `None`, as is any bar whose reference close
//! is zero.

use crate::domain::bar::PriceBar;

pub fn calculate(bars: &[PriceBar], lag: usize) -> Vec<Option<f64>> {
    if lag == 0 {
        return vec![None; bars.len()];
    }

    (0..bars.len())
        .map(|i| {
            if i < lag {
                return None;
            }
            let reference = bars[i - lag].close;
            if reference == 0.0 {
                return None;
            }
            Some((bars[i].close - reference) / reference)
        })
        .collect()
}
