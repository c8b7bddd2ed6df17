//! Price bar representation.
//!
//! A `PriceBar` is one OHLCV observation; a price series is an ordered slice
//! of bars for a single symbol, strictly increasing in timestamp. The series
//! is the sliding window every indicator reads.

use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq)]
pub struct PriceBar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Check the series invariant: strictly increasing timestamps, no duplicates.
pub fn is_ordered(bars: &[PriceBar]) -> bool {
    bars.windows(2).all(|w| w[0].timestamp < w[1].timestamp)
}

/// Closes in reverse chronological order (index 0 = most recent), at most
/// `window` of them. This is the orientation the kernel estimator weights.
pub fn recent_closes(bars: &[PriceBar], window: usize) -> Vec<f64> {
    bars.iter().rev().take(window).map(|b| b.close).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn make_bars(closes: &[f64]) -> Vec<PriceBar> {
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| PriceBar {
                timestamp: Utc.with_ymd_and_hms(2024, 1, 1, i as u32, 0, 0).unwrap(),
                open: close,
                high: close,
                low: close,
                close,
                volume: 1000.0,
            })
            .collect()
    }

    #[test]
    fn ordered_series() {
        let bars = make_bars(&[100.0, 101.0, 102.0]);
        assert!(is_ordered(&bars));
    }

    #[test]
    fn duplicate_timestamp_rejected() {
        let mut bars = make_bars(&[100.0, 101.0]);
        bars[1].timestamp = bars[0].timestamp;
        assert!(!is_ordered(&bars));
    }

    #[test]
    fn empty_and_single_are_ordered() {
        assert!(is_ordered(&[]));
        assert!(is_ordered(&make_bars(&[100.0])));
    }

    #[test]
    fn recent_closes_reversed() {
        let bars = make_bars(&[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(recent_closes(&bars, 3), vec![4.0, 3.0, 2.0]);
    }

    #[test]
    fn recent_closes_short_series() {
        let bars = make_bars(&[1.0, 2.0]);
        assert_eq!(recent_closes(&bars, 6), vec![2.0, 1.0]);
    }
}
