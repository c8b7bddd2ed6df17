//! Trade signals.

use crate::domain::strategy::StrategyKind;
use chrono::{DateTime, Utc};
use std::fmt;

/// Discrete outcome of a strategy evaluation. `Call`/`Put` are the
/// options-style entries; `Hold` means no action this bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Buy,
    Sell,
    Call,
    Put,
    Hold,
}

impl Action {
    /// An action that would open a position.
    pub fn is_entry(&self) -> bool {
        matches!(self, Action::Buy | Action::Call)
    }

    /// An action that would close an open position.
    pub fn is_exit(&self) -> bool {
        matches!(self, Action::Sell | Action::Put)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Action::Buy => "BUY",
            Action::Sell => "SELL",
            Action::Call => "CALL",
            Action::Put => "PUT",
            Action::Hold => "HOLD",
        };
        write!(f, "{}", s)
    }
}

/// A signal tagged with the strategy that produced it and the bar timestamp
/// it was evaluated against. Consumed within the same tick.
#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    pub action: Action,
    pub strategy: StrategyKind,
    pub at: DateTime<Utc>,
}
