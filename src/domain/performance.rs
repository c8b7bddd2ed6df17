//! Process-wide performance counters.
//!
//! Explicitly owned, injectable state: the engine holds one instance and is
//! the only writer. Counters move on confirmed fills and position closes.

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PerformanceState {
    pub trade_count: u64,
    pub win_count: u64,
    pub loss_count: u64,
    pub cumulative_pnl: f64,
    pub tick_count: u64,
}

impl PerformanceState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_fill(&mut self) {
        self.trade_count += 1;
    }

    /// Record a closed position's realized PnL. Breakeven counts as neither
    /// a win nor a loss.
    pub fn record_close(&mut self, realized_pnl: f64) {
        self.cumulative_pnl += realized_pnl;
        if realized_pnl > 0.0 {
            self.win_count += 1;
        } else if realized_pnl < 0.0 {
            self.loss_count += 1;
        }
    }

    pub fn record_tick(&mut self) {
        self.tick_count += 1;
    }

    pub fn win_rate(&self) -> f64 {
        let decided = self.win_count + self.loss_count;
        if decided == 0 {
            return 0.0;
        }
        self.win_count as f64 / decided as f64
    }
}
