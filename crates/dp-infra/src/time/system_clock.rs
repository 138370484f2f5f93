use std::time::{SystemTime, UNIX_EPOCH};

use dp_core::ports::ClockPort;

/// Wall clock in Unix milliseconds.
///
/// A system time before the epoch reads as `0`; session tokens stay unique
/// regardless because the registry bumps repeated values.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl ClockPort for SystemClock {
    fn now_ms(&self) -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
            .unwrap_or_default()
    }
}
