//! Order placement and account access port trait.

use crate::domain::error::TradeLoopError;
use crate::domain::signal::Action;
use std::time::Duration;

/// Order submission request. Limit orders only.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRequest {
    pub symbol: String,
    pub action: Action,
    pub quantity: f64,
    pub limit_price: f64,
}

/// Valid broker response to a submission.
///
/// `Accepted` carries the broker's order identifier; an empty identifier
/// means the order is unconfirmed and the caller should treat the attempt as
/// failed. `Rejected` is a well-formed "no" (e.g. the price moved) and is
/// not retried.
#[derive(Debug, Clone, PartialEq)]
pub enum OrderAck {
    Accepted { order_id: String },
    Rejected { reason: String },
}

pub trait BrokerPort {
    /// Submit a limit order. Transport problems (including a timeout the
    /// adapter enforces) surface as [`TradeLoopError::Transport`].
    fn submit(&self, request: &OrderRequest, timeout: Duration)
        -> Result<OrderAck, TradeLoopError>;

    /// Current buying power for sizing.
    fn buying_power(&self) -> Result<f64, TradeLoopError>;
}
