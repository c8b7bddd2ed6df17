//! Paper trading broker adapter.
//!
//! Deterministic in-process broker for dry runs: every well-formed order is
//! accepted with a sequential identifier, nothing leaves the process, and
//! the configured balance never changes. Zero or negative quantities are
//! rejected the way a real venue would refuse them.

use crate::domain::error::TradeLoopError;
use crate::ports::broker_port::{BrokerPort, OrderAck, OrderRequest};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::info;

pub struct PaperBrokerAdapter {
    balance: f64,
    next_order_id: AtomicU64,
}

impl PaperBrokerAdapter {
    pub fn new(balance: f64) -> Self {
        Self {
            balance,
            next_order_id: AtomicU64::new(1),
        }
    }
}

impl BrokerPort for PaperBrokerAdapter {
    fn submit(
        &self,
        request: &OrderRequest,
        _timeout: Duration,
    ) -> Result<OrderAck, TradeLoopError> {
        if request.quantity <= 0.0 || request.limit_price <= 0.0 {
            return Ok(OrderAck::Rejected {
                reason: "non-positive quantity or price".into(),
            });
        }

        let id = self.next_order_id.fetch_add(1, Ordering::SeqCst);
        let order_id = format!("paper-{}", id);
        info!(
            symbol = %request.symbol,
            action = %request.action,
            quantity = request.quantity,
            limit_price = request.limit_price,
            order_id,
            "paper order accepted"
        );
        Ok(OrderAck::Accepted { order_id })
    }

    fn buying_power(&self) -> Result<f64, TradeLoopError> {
        Ok(self.balance)
    }
}
