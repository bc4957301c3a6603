// tests/support/mocks/time.rs
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use std::sync::atomic::{AtomicI64, Ordering};
use thesis_sessions::application::ports::time::Clock;

static FIXED_NOW: Lazy<DateTime<Utc>> = Lazy::new(|| {
    DateTime::parse_from_rfc3339("2024-01-01T00:00:00Z")
        .expect("invalid RFC3339 in tests/support/mocks/time.rs")
        .with_timezone(&Utc)
});

/// Deterministic starting point for every test clock.
pub fn fixed_now() -> DateTime<Utc> {
    *FIXED_NOW
}

/// Whole-second clock that only moves when told to.
pub struct ManualClock {
    secs: AtomicI64,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::at(fixed_now().timestamp())
    }

    pub fn at(secs: i64) -> Self {
        Self {
            secs: AtomicI64::new(secs),
        }
    }

    pub fn advance(&self, secs: i64) {
        self.secs.fetch_add(secs, Ordering::SeqCst);
    }

    pub fn unix(&self) -> i64 {
        self.secs.load(Ordering::SeqCst)
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp(self.unix(), 0).expect("clock out of range")
    }
}
