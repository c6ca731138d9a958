//! Clock Abstraction
//!
//! Every "now" comparison in the engines (overlap checks, active-assignment
//! queries, sweep cutoffs) goes through [`Clock`] so tests can pin time.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, NaiveDate, Utc};

/// Source of the current time, injectable for tests
pub trait Clock: Send + Sync + fmt::Debug {
    /// Current instant as Unix-epoch milliseconds
    fn now_millis(&self) -> i64;

    /// Current UTC calendar date
    fn today(&self) -> NaiveDate {
        DateTime::<Utc>::from_timestamp_millis(self.now_millis())
            .unwrap_or_else(Utc::now)
            .date_naive()
    }
}

/// Shared clock handle
pub type SharedClock = Arc<dyn Clock>;

/// Production clock backed by the system time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// Test clock pinned to a settable instant
#[derive(Debug, Default)]
pub struct FixedClock {
    millis: AtomicI64,
}

impl FixedClock {
    pub fn at(millis: i64) -> Self {
        Self {
            millis: AtomicI64::new(millis),
        }
    }

    /// Move the pinned instant
    pub fn set(&self, millis: i64) {
        self.millis.store(millis, Ordering::SeqCst);
    }

    /// Advance the pinned instant by a number of days
    pub fn advance_days(&self, days: i64) {
        self.millis
            .fetch_add(days * 24 * 60 * 60 * 1000, Ordering::SeqCst);
    }
}

impl Clock for FixedClock {
    fn now_millis(&self) -> i64 {
        self.millis.load(Ordering::SeqCst)
    }
}
