//! Clock port trait.
//!
//! Time and sleeping go through a port so the retry schedule and the tick
//! scheduler are deterministic under test (a fake clock advances instantly).

use chrono::{DateTime, Utc};
use std::time::Duration;

pub trait ClockPort {
    fn now(&self) -> DateTime<Utc>;

    fn sleep(&self, duration: Duration);
}
