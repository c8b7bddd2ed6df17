//! Tick loop orchestration.
//!
//! One logical stream of ticks on a fixed interval. Per tracked symbol and
//! per tick: fetch window → compute indicators → evaluate exits (stop/target
//! triggers first, then an opposing signal) → evaluate entries → size →
//! execute → commit state. The position table and performance counters are
//! owned here and mutated only between external calls, so every tick's
//! mutations have committed before the next tick starts.
//!
//! Per-symbol state machine: `Flat` (no entry in the position table) and
//! `InPosition` (exactly one open position). Entry signals are ignored while
//! a position is open.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::domain::bar::{is_ordered, PriceBar};
use crate::domain::execution::{self, ExecutionOutcome, RetryPolicy};
use crate::domain::indicator::{compute_snapshots, snapshot_pair, IndicatorConfig};
use crate::domain::performance::PerformanceState;
use crate::domain::position::{AssetClass, Position};
use crate::domain::signal::{Action, Signal};
use crate::domain::sizing::SizingParams;
use crate::domain::strategy::StrategyKind;
use crate::ports::broker_port::{BrokerPort, OrderRequest};
use crate::ports::clock_port::ClockPort;
use crate::ports::market_data_port::MarketDataPort;
use crate::ports::notify_port::{NotifyPort, TradeAlert};

/// Static per-symbol routing: which strategy evaluates the symbol and how
/// fills are classified for sizing.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolConfig {
    pub symbol: String,
    pub asset_class: AssetClass,
    pub strategy: StrategyKind,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub symbols: Vec<SymbolConfig>,
    pub tick_interval: Duration,
    /// Performance report every this many ticks.
    pub report_every: u64,
    pub fetch_timeout: Duration,
    pub submit_timeout: Duration,
    /// Bars requested from the data port each tick.
    pub fetch_window: usize,
    /// Bars required before signals are evaluated for a symbol. Below this
    /// only stop/target triggers run.
    pub min_bars: usize,
    pub indicators: IndicatorConfig,
    pub sizing: SizingParams,
    pub retry: RetryPolicy,
}

impl EngineConfig {
    pub fn new(symbols: Vec<SymbolConfig>) -> Self {
        let indicators = IndicatorConfig::default();
        let min_bars = indicators.min_bars();
        EngineConfig {
            symbols,
            tick_interval: Duration::from_secs(60),
            report_every: 10,
            fetch_timeout: Duration::from_secs(10),
            submit_timeout: Duration::from_secs(10),
            fetch_window: 168,
            min_bars,
            indicators,
            sizing: SizingParams::default(),
            retry: RetryPolicy::default(),
        }
    }
}

pub struct Engine<D, B, N, C> {
    config: EngineConfig,
    data: D,
    broker: B,
    notify: N,
    clock: C,
    positions: HashMap<String, Position>,
    perf: PerformanceState,
    stop: Arc<AtomicBool>,
}

impl<D, B, N, C> Engine<D, B, N, C>
where
    D: MarketDataPort,
    B: BrokerPort,
    N: NotifyPort,
    C: ClockPort,
{
    pub fn new(config: EngineConfig, data: D, broker: B, notify: N, clock: C) -> Self {
        Engine {
            config,
            data,
            broker,
            notify,
            clock,
            positions: HashMap::new(),
            perf: PerformanceState::new(),
            stop: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Cooperative stop flag. Setting it stops the loop at the next tick
    /// boundary; no in-flight external call is aborted.
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    pub fn positions(&self) -> &HashMap<String, Position> {
        &self.positions
    }

    pub fn performance(&self) -> &PerformanceState {
        &self.perf
    }

    pub fn broker(&self) -> &B {
        &self.broker
    }

    pub fn notify(&self) -> &N {
        &self.notify
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Run until the stop flag is set.
    pub fn run(&mut self) {
        let universe: Vec<String> = self
            .config
            .symbols
            .iter()
            .map(|s| s.symbol.clone())
            .collect();
        info!(symbols = ?universe, "starting trading loop");
        self.send_lifecycle(&format!("trading loop started, monitoring {:?}", universe));

        while !self.stop.load(Ordering::SeqCst) {
            self.run_tick();
            if self.stop.load(Ordering::SeqCst) {
                break;
            }
            self.clock.sleep(self.config.tick_interval);
        }

        self.send_performance_report();
        self.send_lifecycle(&format!(
            "trading loop stopped after {} ticks, {} trades",
            self.perf.tick_count, self.perf.trade_count
        ));
        info!(
            ticks = self.perf.tick_count,
            trades = self.perf.trade_count,
            "trading loop stopped"
        );
    }

    /// Process one tick across the whole symbol universe.
    pub fn run_tick(&mut self) {
        self.perf.record_tick();
        debug!(tick = self.perf.tick_count, "tick started");

        let symbols = self.config.symbols.clone();
        for symbol_config in &symbols {
            if self.stop.load(Ordering::SeqCst) {
                break;
            }
            self.process_symbol(symbol_config);
        }

        if self.config.report_every > 0 && self.perf.tick_count % self.config.report_every == 0 {
            info!(
                tick = self.perf.tick_count,
                trades = self.perf.trade_count,
                wins = self.perf.win_count,
                losses = self.perf.loss_count,
                pnl = self.perf.cumulative_pnl,
                "performance report"
            );
            self.send_performance_report();
        }
    }

    /// One symbol's full pipeline for this tick. Every failure short-circuits
    /// the symbol, never the loop.
    fn process_symbol(&mut self, symbol_config: &SymbolConfig) {
        let symbol = &symbol_config.symbol;

        let bars = match self.data.fetch_ohlc(
            symbol,
            self.config.fetch_window,
            self.config.fetch_timeout,
        ) {
            Ok(bars) => bars,
            Err(err) => {
                warn!(symbol = %symbol, error = %err, "data fetch failed, skipping symbol");
                return;
            }
        };

        if !is_ordered(&bars) {
            warn!(symbol = %symbol, "unordered bar series, skipping symbol");
            return;
        }

        let Some(current) = bars.last() else {
            debug!(symbol = %symbol, "no bars, skipping symbol");
            return;
        };
        let close = current.close;
        let at = current.timestamp;

        // Exits come first: a stop/target trigger beats any new signal.
        if self.positions.contains_key(symbol) {
            if self.try_trigger_exit(symbol, close, at) {
                return;
            }
        }

        if bars.len() < self.config.min_bars {
            debug!(
                symbol = %symbol,
                bars = bars.len(),
                minimum = self.config.min_bars,
                "insufficient history, evaluating later"
            );
            return;
        }

        let snapshots = compute_snapshots(&bars, &self.config.indicators);
        let Some((prev, curr)) = snapshot_pair(&snapshots) else {
            return;
        };

        let signal = Signal {
            action: symbol_config.strategy.evaluate(prev, curr),
            strategy: symbol_config.strategy,
            at,
        };
        if signal.action == Action::Hold {
            return;
        }
        debug!(symbol = %symbol, action = %signal.action, strategy = %signal.strategy, "signal");

        if self.positions.contains_key(symbol) {
            if signal.action.is_exit() {
                self.exit_position(symbol, signal.action, close);
            }
            // Entry signals are ignored while a position is open.
            return;
        }

        if signal.action.is_entry() {
            self.enter_position(symbol_config, signal.action, close);
        }
    }

    /// Stop-loss / take-profit evaluation against the current close. Returns
    /// true when a trigger fired (whether or not the exit order filled).
    fn try_trigger_exit(&mut self, symbol: &str, close: f64, at: DateTime<Utc>) -> bool {
        let Some(position) = self.positions.get(symbol) else {
            return false;
        };

        let stop_hit = position.should_stop_loss(close);
        let target_hit = position.should_take_profit(close);
        if !stop_hit && !target_hit {
            return false;
        }

        info!(
            symbol = %symbol,
            close,
            trigger = if stop_hit { "stop-loss" } else { "take-profit" },
            at = %at,
            "exit trigger fired"
        );
        self.exit_position(symbol, Action::Sell, close);
        true
    }

    fn enter_position(&mut self, symbol_config: &SymbolConfig, action: Action, close: f64) {
        let symbol = &symbol_config.symbol;

        let balance = match self.broker.buying_power() {
            Ok(balance) => balance,
            Err(err) => {
                warn!(symbol = %symbol, error = %err, "balance query failed, skipping entry");
                return;
            }
        };

        let quantity = self
            .config
            .sizing
            .quantity(balance, symbol_config.asset_class, close);
        if quantity <= 0.0 {
            debug!(symbol = %symbol, balance, close, "sized to zero, no order");
            return;
        }

        let request = OrderRequest {
            symbol: symbol.clone(),
            action,
            quantity,
            limit_price: close,
        };

        match self.execute_order(&request) {
            ExecutionOutcome::Filled { order_id } => {
                let position = Position {
                    symbol: symbol.clone(),
                    asset_class: symbol_config.asset_class,
                    entry_price: close,
                    quantity,
                    stop_loss: self.config.sizing.stop_loss_price(close),
                    take_profit: self.config.sizing.take_profit_price(close),
                    opened_at: self.clock.now(),
                };
                self.positions.insert(symbol.clone(), position);
                self.perf.record_fill();
                info!(symbol = %symbol, %action, quantity, price = close, order_id, "entry filled");
                self.send_trade_alert(symbol, action, quantity, close, balance);
            }
            ExecutionOutcome::Rejected { reason } => {
                info!(symbol = %symbol, %action, reason, "entry rejected");
            }
            ExecutionOutcome::Failed => {
                warn!(symbol = %symbol, %action, "entry failed after retries");
            }
        }
    }

    fn exit_position(&mut self, symbol: &str, action: Action, close: f64) {
        let Some(position) = self.positions.get(symbol) else {
            return;
        };

        let request = OrderRequest {
            symbol: symbol.to_string(),
            action,
            quantity: position.quantity,
            limit_price: close,
        };

        match self.execute_order(&request) {
            ExecutionOutcome::Filled { order_id } => {
                let Some(position) = self.positions.remove(symbol) else {
                    return;
                };
                let realized = position.unrealized_pnl(close);
                self.perf.record_fill();
                self.perf.record_close(realized);
                info!(
                    symbol = %symbol,
                    %action,
                    quantity = position.quantity,
                    price = close,
                    pnl = realized,
                    order_id,
                    "exit filled"
                );
                let balance = self.broker.buying_power().unwrap_or(0.0);
                self.send_trade_alert(symbol, action, position.quantity, close, balance);
            }
            ExecutionOutcome::Rejected { reason } => {
                // Position stays open; the next tick re-evaluates.
                info!(symbol = %symbol, %action, reason, "exit rejected");
            }
            ExecutionOutcome::Failed => {
                warn!(symbol = %symbol, %action, "exit failed after retries");
            }
        }
    }

    fn execute_order(&self, request: &OrderRequest) -> ExecutionOutcome {
        execution::execute(
            &self.broker,
            &self.clock,
            &self.stop,
            request,
            self.config.submit_timeout,
            &self.config.retry,
        )
    }

    // Notifications are fire-and-forget: failures are logged and dropped.

    fn send_trade_alert(
        &self,
        symbol: &str,
        action: Action,
        quantity: f64,
        price: f64,
        account_balance: f64,
    ) {
        let alert = TradeAlert {
            symbol: symbol.to_string(),
            action,
            quantity,
            price,
            account_balance,
            at: self.clock.now(),
        };
        if let Err(err) = self.notify.trade_alert(&alert) {
            warn!(symbol = %symbol, error = %err, "trade alert failed");
        }
    }

    fn send_performance_report(&self) {
        if let Err(err) = self.notify.performance_report(&self.perf) {
            warn!(error = %err, "performance report failed");
        }
    }

    fn send_lifecycle(&self, message: &str) {
        if let Err(err) = self.notify.lifecycle(message) {
            warn!(error = %err, "lifecycle notification failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::TradeLoopError;
    use crate::ports::broker_port::OrderAck;
    use chrono::TimeZone;
    use std::cell::{Cell, RefCell};

    struct FakeClock;

    impl ClockPort for FakeClock {
        fn now(&self) -> DateTime<Utc> {
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
        }

        fn sleep(&self, _duration: Duration) {}
    }

    struct StaticData {
        bars: Vec<PriceBar>,
    }

    impl MarketDataPort for StaticData {
        fn fetch_ohlc(
            &self,
            _symbol: &str,
            _window: usize,
            _timeout: Duration,
        ) -> Result<Vec<PriceBar>, TradeLoopError> {
            Ok(self.bars.clone())
        }
    }

    struct AlwaysFillBroker {
        submissions: RefCell<Vec<OrderRequest>>,
    }

    impl AlwaysFillBroker {
        fn new() -> Self {
            AlwaysFillBroker {
                submissions: RefCell::new(Vec::new()),
            }
        }
    }

    impl BrokerPort for AlwaysFillBroker {
        fn submit(
            &self,
            request: &OrderRequest,
            _timeout: Duration,
        ) -> Result<OrderAck, TradeLoopError> {
            self.submissions.borrow_mut().push(request.clone());
            Ok(OrderAck::Accepted {
                order_id: format!("ord-{}", self.submissions.borrow().len()),
            })
        }

        fn buying_power(&self) -> Result<f64, TradeLoopError> {
            Ok(10_000.0)
        }
    }

    struct SilentNotify {
        alerts: Cell<usize>,
    }

    impl SilentNotify {
        fn new() -> Self {
            SilentNotify {
                alerts: Cell::new(0),
            }
        }
    }

    impl NotifyPort for SilentNotify {
        fn trade_alert(&self, _alert: &TradeAlert) -> Result<(), TradeLoopError> {
            self.alerts.set(self.alerts.get() + 1);
            Ok(())
        }

        fn performance_report(&self, _perf: &PerformanceState) -> Result<(), TradeLoopError> {
            Ok(())
        }

        fn lifecycle(&self, _message: &str) -> Result<(), TradeLoopError> {
            Ok(())
        }
    }

    fn make_bars(closes: &[f64]) -> Vec<PriceBar> {
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| PriceBar {
                timestamp: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
                    + chrono::Duration::hours(i as i64),
                open: close,
                high: close,
                low: close,
                close,
                volume: 1000.0,
            })
            .collect()
    }

    /// Closes engineered so the fast kernel line crosses above the slow one
    /// on the final bar: a long decline, then a sharp reversal bar.
    fn crossover_closes() -> Vec<f64> {
        let mut closes: Vec<f64> = (0..32).map(|i| 133.0 - i as f64).collect();
        closes.push(110.0);
        closes
    }

    fn engine_with(
        closes: &[f64],
        strategy: StrategyKind,
        asset_class: AssetClass,
    ) -> Engine<StaticData, AlwaysFillBroker, SilentNotify, FakeClock> {
        let config = EngineConfig::new(vec![SymbolConfig {
            symbol: "ETC".into(),
            asset_class,
            strategy,
        }]);
        Engine::new(
            config,
            StaticData {
                bars: make_bars(closes),
            },
            AlwaysFillBroker::new(),
            SilentNotify::new(),
            FakeClock,
        )
    }

    #[test]
    fn entry_on_crossover_signal() {
        let mut engine = engine_with(
            &crossover_closes(),
            StrategyKind::KernelCrossover,
            AssetClass::Crypto,
        );

        engine.run_tick();

        assert!(engine.positions().contains_key("ETC"));
        assert_eq!(engine.performance().trade_count, 1);

        let position = &engine.positions()["ETC"];
        assert!((position.entry_price - 110.0).abs() < f64::EPSILON);
        // 10_000 × 0.05 × 0.70 / 110
        assert!((position.quantity - 350.0 / 110.0).abs() < 1e-12);
        assert!((position.stop_loss - 110.0 * 0.95).abs() < 1e-9);
        assert!((position.take_profit - 110.0 * 1.10).abs() < 1e-9);
    }

    #[test]
    fn at_most_one_position_under_repeated_entries() {
        let mut engine = engine_with(
            &crossover_closes(),
            StrategyKind::KernelCrossover,
            AssetClass::Crypto,
        );

        // Same crossover window every tick: the signal keeps firing, the
        // position table must not grow and no second entry order goes out.
        engine.run_tick();
        engine.run_tick();
        engine.run_tick();

        assert_eq!(engine.positions().len(), 1);
        assert_eq!(engine.performance().trade_count, 1);
        assert_eq!(engine.broker.submissions.borrow().len(), 1);
    }

    #[test]
    fn insufficient_history_holds() {
        let mut engine = engine_with(
            &[100.0, 101.0, 102.0],
            StrategyKind::MeanReversion,
            AssetClass::Equity,
        );

        engine.run_tick();

        assert!(engine.positions().is_empty());
        assert_eq!(engine.performance().trade_count, 0);
        assert_eq!(engine.performance().tick_count, 1);
    }

    #[test]
    fn take_profit_trigger_closes_position() {
        let mut engine = engine_with(
            &crossover_closes(),
            StrategyKind::KernelCrossover,
            AssetClass::Crypto,
        );
        engine.run_tick();
        assert!(engine.positions().contains_key("ETC"));

        // Next tick the price has rallied through the take-profit level.
        let mut closes = crossover_closes();
        closes.push(110.0 * 1.11);
        engine.data = StaticData {
            bars: make_bars(&closes),
        };

        engine.run_tick();

        assert!(engine.positions().is_empty());
        assert_eq!(engine.performance().win_count, 1);
        assert_eq!(engine.performance().loss_count, 0);
        assert!(engine.performance().cumulative_pnl > 0.0);
    }

    #[test]
    fn stop_loss_trigger_records_loss() {
        let mut engine = engine_with(
            &crossover_closes(),
            StrategyKind::KernelCrossover,
            AssetClass::Crypto,
        );
        engine.run_tick();

        let mut closes = crossover_closes();
        closes.push(110.0 * 0.94);
        engine.data = StaticData {
            bars: make_bars(&closes),
        };

        engine.run_tick();

        assert!(engine.positions().is_empty());
        assert_eq!(engine.performance().loss_count, 1);
        assert!(engine.performance().cumulative_pnl < 0.0);
    }

    #[test]
    fn fetch_failure_skips_symbol_but_tick_continues() {
        struct FailingData;

        impl MarketDataPort for FailingData {
            fn fetch_ohlc(
                &self,
                symbol: &str,
                _window: usize,
                _timeout: Duration,
            ) -> Result<Vec<PriceBar>, TradeLoopError> {
                Err(TradeLoopError::FetchFailed {
                    symbol: symbol.to_string(),
                    reason: "provider down".into(),
                })
            }
        }

        let config = EngineConfig::new(vec![SymbolConfig {
            symbol: "SPY".into(),
            asset_class: AssetClass::Equity,
            strategy: StrategyKind::MeanReversion,
        }]);
        let mut engine = Engine::new(
            config,
            FailingData,
            AlwaysFillBroker::new(),
            SilentNotify::new(),
            FakeClock,
        );

        engine.run_tick();

        assert_eq!(engine.performance().tick_count, 1);
        assert!(engine.positions().is_empty());
    }

    #[test]
    fn notify_failure_does_not_affect_trading_state() {
        struct FailingNotify;

        impl NotifyPort for FailingNotify {
            fn trade_alert(&self, _alert: &TradeAlert) -> Result<(), TradeLoopError> {
                Err(TradeLoopError::Notify {
                    reason: "smtp down".into(),
                })
            }

            fn performance_report(
                &self,
                _perf: &PerformanceState,
            ) -> Result<(), TradeLoopError> {
                Err(TradeLoopError::Notify {
                    reason: "smtp down".into(),
                })
            }

            fn lifecycle(&self, _message: &str) -> Result<(), TradeLoopError> {
                Err(TradeLoopError::Notify {
                    reason: "smtp down".into(),
                })
            }
        }

        let config = EngineConfig::new(vec![SymbolConfig {
            symbol: "ETC".into(),
            asset_class: AssetClass::Crypto,
            strategy: StrategyKind::KernelCrossover,
        }]);
        let mut engine = Engine::new(
            config,
            StaticData {
                bars: make_bars(&crossover_closes()),
            },
            AlwaysFillBroker::new(),
            FailingNotify,
            FakeClock,
        );

        engine.run_tick();

        assert!(engine.positions().contains_key("ETC"));
        assert_eq!(engine.performance().trade_count, 1);
    }

    #[test]
    fn stop_flag_halts_run_loop() {
        let mut engine = engine_with(
            &[100.0, 101.0],
            StrategyKind::KernelCrossover,
            AssetClass::Crypto,
        );
        engine.stop_handle().store(true, Ordering::SeqCst);

        engine.run();

        assert_eq!(engine.performance().tick_count, 0);
    }

    #[test]
    fn unordered_bars_are_skipped() {
        let mut bars = make_bars(&crossover_closes());
        let first_ts = bars[0].timestamp;
        bars.last_mut().unwrap().timestamp = first_ts;

        let config = EngineConfig::new(vec![SymbolConfig {
            symbol: "ETC".into(),
            asset_class: AssetClass::Crypto,
            strategy: StrategyKind::KernelCrossover,
        }]);
        let mut engine = Engine::new(
            config,
            StaticData { bars },
            AlwaysFillBroker::new(),
            SilentNotify::new(),
            FakeClock,
        );

        engine.run_tick();

        assert!(engine.positions().is_empty());
    }
}
