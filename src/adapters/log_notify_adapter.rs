//! Log-backed notification adapter.
//!
//! Emits trade alerts, performance reports and lifecycle messages as
//! structured log events. Stands in for an email/webhook channel; the
//! engine treats the port as fire-and-forget either way.

use crate::domain::error::TradeLoopError;
use crate::domain::performance::PerformanceState;
use crate::ports::notify_port::{NotifyPort, TradeAlert};
use tracing::info;

#[derive(Debug, Default)]
pub struct LogNotifyAdapter;

impl LogNotifyAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl NotifyPort for LogNotifyAdapter {
    fn trade_alert(&self, alert: &TradeAlert) -> Result<(), TradeLoopError> {
        info!(
            symbol = %alert.symbol,
            action = %alert.action,
            quantity = alert.quantity,
            price = alert.price,
            account_balance = alert.account_balance,
            at = %alert.at,
            "trade alert"
        );
        Ok(())
    }

    fn performance_report(&self, perf: &PerformanceState) -> Result<(), TradeLoopError> {
        info!(
            ticks = perf.tick_count,
            trades = perf.trade_count,
            wins = perf.win_count,
            losses = perf.loss_count,
            win_rate = perf.win_rate(),
            pnl = perf.cumulative_pnl,
            "performance"
        );
        Ok(())
    }

    fn lifecycle(&self, message: &str) -> Result<(), TradeLoopError> {
        info!("lifecycle: {message}");
        Ok(())
    }
}
