//! Signal generators.
//!
//! Three strategies, each a pure function of the (previous, current)
//! indicator snapshot pair for one symbol. Same inputs, same output. Any
//! indicator still in warmup makes the strategy return [`Action::Hold`] —
//! never an error, never a fabricated default.

use crate::domain::indicator::IndicatorSnapshot;
use crate::domain::signal::Action;
use std::fmt;

/// Momentum below/above this magnitude is treated as noise by the
/// RSI/momentum strategy. Fixed by design, not a tunable.
pub const MOMENTUM_NOISE_FLOOR: f64 = 0.02;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrategyKind {
    /// Fast/slow kernel regression crossover (crypto symbols).
    KernelCrossover,
    /// RSI + Bollinger mean reversion (designated equity symbol).
    MeanReversion,
    /// RSI + momentum directional bias (options symbols).
    RsiMomentum,
}

impl StrategyKind {
    pub fn evaluate(&self, prev: &IndicatorSnapshot, curr: &IndicatorSnapshot) -> Action {
        match self {
            StrategyKind::KernelCrossover => evaluate_kernel_crossover(prev, curr),
            StrategyKind::MeanReversion => evaluate_mean_reversion(curr),
            StrategyKind::RsiMomentum => evaluate_rsi_momentum(curr),
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StrategyKind::KernelCrossover => "kernel-crossover",
            StrategyKind::MeanReversion => "mean-reversion",
            StrategyKind::RsiMomentum => "rsi-momentum",
        };
        write!(f, "{}", s)
    }
}

/// Buy when the fast line crosses from at-or-below to above the slow line,
/// sell on the opposite crossing. Only the transition counts: equality on
/// the current bar alone is not a signal.
fn evaluate_kernel_crossover(prev: &IndicatorSnapshot, curr: &IndicatorSnapshot) -> Action {
    let was_at_or_below = prev.kernel_fast <= prev.kernel_slow;
    let was_at_or_above = prev.kernel_fast >= prev.kernel_slow;

    if was_at_or_below && curr.kernel_fast > curr.kernel_slow {
        Action::Buy
    } else if was_at_or_above && curr.kernel_fast < curr.kernel_slow {
        Action::Sell
    } else {
        Action::Hold
    }
}

/// Both conditions must hold jointly; a single confirming indicator is
/// insufficient.
fn evaluate_mean_reversion(curr: &IndicatorSnapshot) -> Action {
    let (Some(rsi), Some(lower), Some(upper)) = (curr.rsi, curr.lower_band, curr.upper_band)
    else {
        return Action::Hold;
    };

    if rsi < 30.0 && curr.close < lower {
        Action::Buy
    } else if rsi > 70.0 && curr.close > upper {
        Action::Sell
    } else {
        Action::Hold
    }
}

fn evaluate_rsi_momentum(curr: &IndicatorSnapshot) -> Action {
    let (Some(rsi), Some(momentum)) = (curr.rsi, curr.momentum) else {
        return Action::Hold;
    };

    if rsi > 50.0 && momentum > MOMENTUM_NOISE_FLOOR {
        Action::Call
    } else if rsi < 50.0 && momentum < -MOMENTUM_NOISE_FLOOR {
        Action::Put
    } else {
        Action::Hold
    }
}
