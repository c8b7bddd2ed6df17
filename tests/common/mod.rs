#![allow(dead_code)]

//! Shared mock ports for integration tests.

use chrono::{DateTime, TimeZone, Utc};
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::time::Duration;

use tradeloop::domain::bar::PriceBar;
use tradeloop::domain::error::TradeLoopError;
use tradeloop::domain::performance::PerformanceState;
use tradeloop::ports::broker_port::{BrokerPort, OrderAck, OrderRequest};
use tradeloop::ports::clock_port::ClockPort;
use tradeloop::ports::market_data_port::MarketDataPort;
use tradeloop::ports::notify_port::{NotifyPort, TradeAlert};

pub fn make_bars(closes: &[f64]) -> Vec<PriceBar> {
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

/// A long decline then a sharp reversal bar, so the fast kernel estimate
/// crosses above the slow one on the final bar.
pub fn crossover_closes() -> Vec<f64> {
    let mut closes: Vec<f64> = (0..32).map(|i| 133.0 - i as f64).collect();
    closes.push(110.0);
    closes
}

/// Fixed-now clock that records total sleep time.
pub struct ManualClock {
    pub slept: Cell<Duration>,
}

impl ManualClock {
    pub fn new() -> Self {
        ManualClock {
            slept: Cell::new(Duration::ZERO),
        }
    }
}

impl ClockPort for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    fn sleep(&self, duration: Duration) {
        self.slept.set(self.slept.get() + duration);
    }
}

/// Serves one bar series per tick; the final series repeats once the
/// script is exhausted.
pub struct SequencedData {
    ticks: RefCell<VecDeque<Vec<PriceBar>>>,
    last: RefCell<Vec<PriceBar>>,
}

impl SequencedData {
    pub fn new(ticks: Vec<Vec<PriceBar>>) -> Self {
        SequencedData {
            ticks: RefCell::new(ticks.into()),
            last: RefCell::new(Vec::new()),
        }
    }
}

impl MarketDataPort for SequencedData {
    fn fetch_ohlc(
        &self,
        _symbol: &str,
        _window: usize,
        _timeout: Duration,
    ) -> Result<Vec<PriceBar>, TradeLoopError> {
        if let Some(bars) = self.ticks.borrow_mut().pop_front() {
            *self.last.borrow_mut() = bars;
        }
        Ok(self.last.borrow().clone())
    }
}

/// Replays a script of submit results, then fills everything after the
/// script runs out.
pub struct ScriptedBroker {
    script: RefCell<VecDeque<Result<OrderAck, TradeLoopError>>>,
    pub submissions: RefCell<Vec<OrderRequest>>,
    pub balance: f64,
}

impl ScriptedBroker {
    pub fn always_fill(balance: f64) -> Self {
        Self::with_script(balance, Vec::new())
    }

    pub fn with_script(balance: f64, script: Vec<Result<OrderAck, TradeLoopError>>) -> Self {
        ScriptedBroker {
            script: RefCell::new(script.into()),
            submissions: RefCell::new(Vec::new()),
            balance,
        }
    }

    pub fn submit_count(&self) -> usize {
        self.submissions.borrow().len()
    }
}

impl BrokerPort for ScriptedBroker {
    fn submit(&self, request: &OrderRequest, _timeout: Duration) -> Result<OrderAck, TradeLoopError> {
        self.submissions.borrow_mut().push(request.clone());
        match self.script.borrow_mut().pop_front() {
            Some(result) => result,
            None => Ok(OrderAck::Accepted {
                order_id: format!("fill-{}", self.submissions.borrow().len()),
            }),
        }
    }

    fn buying_power(&self) -> Result<f64, TradeLoopError> {
        Ok(self.balance)
    }
}

/// Counts every notification without delivering anywhere.
pub struct CountingNotify {
    pub alerts: RefCell<Vec<TradeAlert>>,
    pub reports: Cell<usize>,
    pub lifecycle_messages: RefCell<Vec<String>>,
}

impl CountingNotify {
    pub fn new() -> Self {
        CountingNotify {
            alerts: RefCell::new(Vec::new()),
            reports: Cell::new(0),
            lifecycle_messages: RefCell::new(Vec::new()),
        }
    }
}

impl NotifyPort for CountingNotify {
    fn trade_alert(&self, alert: &TradeAlert) -> Result<(), TradeLoopError> {
        self.alerts.borrow_mut().push(alert.clone());
        Ok(())
    }

    fn performance_report(&self, _perf: &PerformanceState) -> Result<(), TradeLoopError> {
        self.reports.set(self.reports.get() + 1);
        Ok(())
    }

    fn lifecycle(&self, message: &str) -> Result<(), TradeLoopError> {
        self.lifecycle_messages.borrow_mut().push(message.to_string());
        Ok(())
    }
}
