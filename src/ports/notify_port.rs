//! Notification port trait.
//!
//! Consumed fire-and-forget by the engine: a notification failure is logged
//! and must never affect trading state.

use crate::domain::error::TradeLoopError;
use crate::domain::performance::PerformanceState;
use crate::domain::signal::Action;
use chrono::{DateTime, Utc};

/// Details of a confirmed fill, sent once per trade.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeAlert {
    pub symbol: String,
    pub action: Action,
    pub quantity: f64,
    pub price: f64,
    pub account_balance: f64,
    pub at: DateTime<Utc>,
}

pub trait NotifyPort {
    fn trade_alert(&self, alert: &TradeAlert) -> Result<(), TradeLoopError>;

    fn performance_report(&self, perf: &PerformanceState) -> Result<(), TradeLoopError>;

    /// Startup/shutdown messages.
    fn lifecycle(&self, message: &str) -> Result<(), TradeLoopError>;
}
