//! Position tracking.

use chrono::{DateTime, Utc};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetClass {
    Crypto,
    Equity,
    Option,
}

impl fmt::Display for AssetClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AssetClass::Crypto => "crypto",
            AssetClass::Equity => "equity",
            AssetClass::Option => "option",
        };
        write!(f, "{}", s)
    }
}

/// One open position. Owned exclusively by the engine's position table,
/// keyed by symbol; at most one per symbol at a time.
#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    pub symbol: String,
    pub asset_class: AssetClass,
    pub entry_price: f64,
    pub quantity: f64,
    pub stop_loss: f64,
    pub take_profit: f64,
    pub opened_at: DateTime<Utc>,
}

impl Position {
    pub fn unrealized_pnl(&self, price: f64) -> f64 {
        self.quantity * (price - self.entry_price)
    }

    pub fn should_stop_loss(&self, price: f64) -> bool {
        self.stop_loss > 0.0 && price <= self.stop_loss
    }

    pub fn should_take_profit(&self, price: f64) -> bool {
        self.take_profit > 0.0 && price >= self.take_profit
    }
}
