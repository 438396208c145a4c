//! Time sources for countdown sessions.
//!
//! Sessions never count ticks. Every tick and animation frame reads the
//! clock and recomputes the remaining time from the fixed target, so late or
//! dropped timer messages cannot accumulate into display error.
//!
//! ```rust
//! use bubbletea_countdown::clock::{Clock, ManualClock};
//! use std::time::Duration;
//!
//! let clock = ManualClock::from_millis(0);
//! clock.advance(Duration::from_secs(61));
//! assert_eq!(clock.now().timestamp_millis(), 61_000);
//! ```

use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// A source of the current instant.
pub trait Clock: fmt::Debug + Send + Sync {
    /// Returns the current instant.
    fn now(&self) -> DateTime<Utc>;
}

/// Reads the system wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to.
///
/// Clones share the same reading, so a test can keep one handle while the
/// session owns another.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    millis: Arc<AtomicI64>,
}

impl ManualClock {
    /// Creates a clock reading `millis` milliseconds after the Unix epoch.
    pub fn from_millis(millis: i64) -> Self {
        Self {
            millis: Arc::new(AtomicI64::new(millis)),
        }
    }

    /// Creates a clock frozen at `instant`.
    pub fn at(instant: DateTime<Utc>) -> Self {
        Self::from_millis(instant.timestamp_millis())
    }

    /// Moves the clock forward.
    pub fn advance(&self, by: Duration) {
        let ms = i64::try_from(by.as_millis()).unwrap_or(i64::MAX);
        self.millis.fetch_add(ms, Ordering::SeqCst);
    }

    /// Jumps the clock to `instant`. Moving backwards is allowed.
    pub fn set(&self, instant: DateTime<Utc>) {
        self.millis
            .store(instant.timestamp_millis(), Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        let ms = self.millis.load(Ordering::SeqCst);
        DateTime::from_timestamp_millis(ms).unwrap_or(DateTime::<Utc>::MIN_UTC)
    }
}
