//! Wall-clock adapter.

use crate::ports::clock_port::ClockPort;
use chrono::{DateTime, Utc};
use std::time::Duration;

#[derive(Debug, Default)]
pub struct SystemClockAdapter;

impl SystemClockAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl ClockPort for SystemClockAdapter {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}
