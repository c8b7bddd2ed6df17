//! Technical indicator implementations.
//!
//! Each indicator is a pure function over a bar slice, computed per bar so
//! both the current and the previous value are available for crossover and
//! threshold comparisons. Warmup bars are `None`; downstream strategies map
//! missing values to HOLD. The composed per-bar view is [`IndicatorSnapshot`].

pub mod bollinger;
pub mod kernel;
pub mod momentum;
pub mod rsi;

use crate::domain::bar::PriceBar;

/// Indicator parameters. The defaults match the reference behaviour; every
/// value is a policy knob, not a hard-coded constant.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorConfig {
    pub kernel_window: usize,
    pub kernel_fast_h: f64,
    pub kernel_slow_h: f64,
    pub kernel_r: f64,
    pub rsi_period: usize,
    pub bollinger_period: usize,
    pub bollinger_width: f64,
    pub momentum_lag: usize,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        IndicatorConfig {
            kernel_window: 6,
            kernel_fast_h: 1.0,
            kernel_slow_h: 3.0,
            kernel_r: 15.75,
            rsi_period: 14,
            bollinger_period: 20,
            bollinger_width: 2.0,
            momentum_lag: 5,
        }
    }
}

impl IndicatorConfig {
    /// Bars needed before every indicator in the snapshot is defined.
    pub fn min_bars(&self) -> usize {
        26.max(self.kernel_window)
            .max(self.rsi_period + 1)
            .max(self.bollinger_period)
            .max(self.momentum_lag + 1)
    }
}

/// Derived per-bar view of the price window. Pure data, recomputed each tick,
/// never persisted independently of the series that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSnapshot {
    pub close: f64,
    pub kernel_fast: f64,
    pub kernel_slow: f64,
    pub rsi: Option<f64>,
    pub sma: Option<f64>,
    pub std_dev: Option<f64>,
    pub upper_band: Option<f64>,
    pub lower_band: Option<f64>,
    pub momentum: Option<f64>,
}

/// Compute a snapshot for every bar in the window.
pub fn compute_snapshots(bars: &[PriceBar], config: &IndicatorConfig) -> Vec<IndicatorSnapshot> {
    let fast = kernel::calculate(bars, config.kernel_fast_h, config.kernel_r, config.kernel_window);
    let slow = kernel::calculate(bars, config.kernel_slow_h, config.kernel_r, config.kernel_window);
    let rsi = rsi::calculate(bars, config.rsi_period);
    let bands = bollinger::calculate(bars, config.bollinger_period, config.bollinger_width);
    let momentum = momentum::calculate(bars, config.momentum_lag);

    (0..bars.len())
        .map(|i| IndicatorSnapshot {
            close: bars[i].close,
            kernel_fast: fast[i],
            kernel_slow: slow[i],
            rsi: rsi[i],
            sma: bands[i].map(|b| b.mean),
            std_dev: bands[i].map(|b| b.std_dev),
            upper_band: bands[i].map(|b| b.upper),
            lower_band: bands[i].map(|b| b.lower),
            momentum: momentum[i],
        })
        .collect()
}

/// The (previous, current) snapshot pair the strategies evaluate, or `None`
/// when the window holds fewer than two bars.
pub fn snapshot_pair<'a>(
    snapshots: &'a [IndicatorSnapshot],
) -> Option<(&'a IndicatorSnapshot, &'a IndicatorSnapshot)> {
    if snapshots.len() < 2 {
        return None;
    }
    Some((&snapshots[snapshots.len() - 2], &snapshots[snapshots.len() - 1]))
}
