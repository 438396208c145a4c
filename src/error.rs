//! Error types for countdown construction.
//!
//! A running countdown has no failure modes: every tick either renders a
//! value or completes the session. All errors therefore surface while a
//! session is being built, and the host decides what to show instead.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors returned when a countdown session cannot be created.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CountdownError {
    /// The configured target could not be interpreted as a date/time.
    #[error("invalid countdown target: {input:?}")]
    InvalidTarget {
        /// The raw value that failed to parse.
        input: String,
    },

    /// The configured target is not strictly in the future.
    #[error("countdown target {target} is not after the current time {now}")]
    PastTarget {
        /// The parsed target instant.
        target: DateTime<Utc>,
        /// The clock reading it was compared against.
        now: DateTime<Utc>,
    },

    /// Countdown configuration could not be read or is out of range.
    #[error("config error: {0}")]
    Config(String),
}

/// Result alias for countdown construction.
pub type Result<T> = std::result::Result<T, CountdownError>;
