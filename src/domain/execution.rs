//! Order execution with bounded exponential-backoff retry.
//!
//! The retry control flow is an explicit state machine stepped against the
//! clock port rather than an opaque sleep loop, so fake-clock tests and
//! cooperative cancellation compose with the tick scheduler.
//!
//! Outcome taxonomy:
//! - `Filled`: the broker confirmed an order identifier.
//! - `Rejected`: a well-formed refusal (price moved). Not retried.
//! - `Failed`: every attempt errored or returned an unconfirmed ack; the
//!   caller treats this as "no position change, log and continue".

use crate::domain::error::TradeLoopError;
use crate::ports::broker_port::{BrokerPort, OrderAck, OrderRequest};
use crate::ports::clock_port::ClockPort;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::warn;

#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    pub max_retries: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy { max_retries: 3 }
    }
}

impl RetryPolicy {
    /// Backoff after a failed attempt `n` (0-based): 2^n seconds.
    pub fn backoff(&self, attempt: u32) -> Duration {
        Duration::from_secs(1u64 << attempt)
    }

    /// Total wait across the whole schedule (1 + 2 + 4 = 7s for 3 retries).
    pub fn total_backoff(&self) -> Duration {
        (0..self.max_retries).map(|n| self.backoff(n)).sum()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExecutionOutcome {
    Filled { order_id: String },
    Rejected { reason: String },
    Failed,
}

/// Retry progression. `Waiting` records which attempt just failed so the
/// next step resumes at `failed + 1`.
#[derive(Debug, Clone, PartialEq)]
enum RetryState {
    Attempting(u32),
    Waiting { failed: u32 },
    Done(ExecutionOutcome),
}

/// Drive one order through the retry schedule.
///
/// The stop flag is honoured before every broker call: once a stop is
/// requested no new attempt starts and the order resolves to `Failed`. An
/// in-flight call is never aborted.
pub fn execute<B, C>(
    broker: &B,
    clock: &C,
    stop: &AtomicBool,
    request: &OrderRequest,
    timeout: Duration,
    policy: &RetryPolicy,
) -> ExecutionOutcome
where
    B: BrokerPort,
    C: ClockPort,
{
    let mut state = RetryState::Attempting(0);

    loop {
        state = match state {
            RetryState::Attempting(attempt) if attempt >= policy.max_retries => {
                RetryState::Done(ExecutionOutcome::Failed)
            }
            RetryState::Attempting(attempt) => {
                if stop.load(Ordering::SeqCst) {
                    warn!(symbol = %request.symbol, "stop requested, abandoning order");
                    RetryState::Done(ExecutionOutcome::Failed)
                } else {
                    step_attempt(broker, request, timeout, attempt)
                }
            }
            RetryState::Waiting { failed } => {
                clock.sleep(policy.backoff(failed));
                RetryState::Attempting(failed + 1)
            }
            RetryState::Done(outcome) => return outcome,
        };
    }
}

fn step_attempt<B: BrokerPort>(
    broker: &B,
    request: &OrderRequest,
    timeout: Duration,
    attempt: u32,
) -> RetryState {
    match broker.submit(request, timeout) {
        Ok(OrderAck::Accepted { order_id }) if !order_id.is_empty() => {
            RetryState::Done(ExecutionOutcome::Filled { order_id })
        }
        Ok(OrderAck::Accepted { .. }) => {
            warn!(
                symbol = %request.symbol,
                attempt = attempt + 1,
                "order ack without confirmed identifier"
            );
            RetryState::Waiting { failed: attempt }
        }
        Ok(OrderAck::Rejected { reason }) => {
            RetryState::Done(ExecutionOutcome::Rejected { reason })
        }
        Err(err) => {
            warn!(
                symbol = %request.symbol,
                attempt = attempt + 1,
                error = %err,
                "order submission attempt failed"
            );
            RetryState::Waiting { failed: attempt }
        }
    }
}
