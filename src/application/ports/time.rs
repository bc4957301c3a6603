// src/application/ports/time.rs
use chrono::{DateTime, Utc};

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    /// Current time truncated to whole Unix seconds.
    fn unix_now(&self) -> i64 {
        self.now().timestamp()
    }
}
