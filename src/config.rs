//! Countdown options and file-based configuration.
//!
//! Options follow the functional-option style used across bubbletea
//! components:
//!
//! ```rust
//! use bubbletea_countdown::config::{with_completion_message, with_tick_interval};
//! use std::time::Duration;
//!
//! let opts = [
//!     with_tick_interval(Duration::from_millis(500)),
//!     with_completion_message("Launch!"),
//! ];
//! # let _ = opts;
//! ```
//!
//! A host that keeps its settings on disk can load a [`Config`] from TOML:
//!
//! ```toml
//! target = "2026-12-31T23:59:59Z"
//! tick_interval_ms = 1000
//! animation_interval_ms = 1000
//! completion_message = "Happy new year"
//! ```

use crate::clock::{Clock, SystemClock};
use crate::error::{CountdownError, Result};
use crate::visibility::{AlwaysVisible, VisibilitySource};
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Default delay between ticks.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(1000);
/// Default delay between animation frames.
pub const DEFAULT_ANIMATION_INTERVAL: Duration = Duration::from_millis(1000);
/// Default live-region text on completion.
pub const DEFAULT_COMPLETION_MESSAGE: &str = "Countdown complete";

/// Resolved settings for one countdown session.
#[derive(Debug, Clone)]
pub struct Options {
    /// Delay between ticks.
    pub tick_interval: Duration,
    /// Delay between animation frames.
    pub animation_interval: Duration,
    /// Text announced on the live region when the countdown finishes.
    pub completion_message: String,
    /// Source of the current time.
    pub clock: Arc<dyn Clock>,
    /// Source of the host's visibility.
    pub visibility: Arc<dyn VisibilitySource>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            tick_interval: DEFAULT_TICK_INTERVAL,
            animation_interval: DEFAULT_ANIMATION_INTERVAL,
            completion_message: DEFAULT_COMPLETION_MESSAGE.to_string(),
            clock: Arc::new(SystemClock),
            visibility: Arc::new(AlwaysVisible),
        }
    }
}

impl Options {
    /// Applies `opts` in order on top of the defaults.
    pub fn from_options(opts: &[CountdownOption]) -> Self {
        let mut options = Self::default();
        for opt in opts {
            opt.apply(&mut options);
        }
        options
    }
}

/// Configuration option for a countdown session.
#[derive(Debug, Clone)]
pub enum CountdownOption {
    /// Sets the tick interval.
    TickInterval(Duration),
    /// Sets the animation interval.
    AnimationInterval(Duration),
    /// Sets the completion announcement.
    CompletionMessage(String),
    /// Replaces the clock.
    Clock(Arc<dyn Clock>),
    /// Replaces the visibility source.
    Visibility(Arc<dyn VisibilitySource>),
}

impl CountdownOption {
    fn apply(&self, o: &mut Options) {
        match self {
            CountdownOption::TickInterval(d) => o.tick_interval = *d,
            CountdownOption::AnimationInterval(d) => o.animation_interval = *d,
            CountdownOption::CompletionMessage(m) => o.completion_message = m.clone(),
            CountdownOption::Clock(c) => o.clock = Arc::clone(c),
            CountdownOption::Visibility(v) => o.visibility = Arc::clone(v),
        }
    }
}

/// Sets how often the remaining time is recomputed.
pub fn with_tick_interval(interval: Duration) -> CountdownOption {
    CountdownOption::TickInterval(interval)
}

/// Sets how often the rollover highlight is re-evaluated.
pub fn with_animation_interval(interval: Duration) -> CountdownOption {
    CountdownOption::AnimationInterval(interval)
}

/// Sets the live-region announcement made on completion.
pub fn with_completion_message(message: impl Into<String>) -> CountdownOption {
    CountdownOption::CompletionMessage(message.into())
}

/// Uses `clock` instead of the system clock.
pub fn with_clock(clock: impl Clock + 'static) -> CountdownOption {
    CountdownOption::Clock(Arc::new(clock))
}

/// Uses `source` to decide whether the animation should run.
pub fn with_visibility(source: impl VisibilitySource + 'static) -> CountdownOption {
    CountdownOption::Visibility(Arc::new(source))
}

/// On-disk countdown configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Target instant in any form accepted by [`crate::target::parse_target`].
    pub target: String,
    /// Tick interval in milliseconds.
    #[serde(default = "default_tick_ms")]
    pub tick_interval_ms: u64,
    /// Animation interval in milliseconds.
    #[serde(default = "default_animation_ms")]
    pub animation_interval_ms: u64,
    /// Live-region announcement on completion.
    #[serde(default = "default_completion_message")]
    pub completion_message: String,
}

fn default_tick_ms() -> u64 {
    DEFAULT_TICK_INTERVAL.as_millis() as u64
}

fn default_animation_ms() -> u64 {
    DEFAULT_ANIMATION_INTERVAL.as_millis() as u64
}

fn default_completion_message() -> String {
    DEFAULT_COMPLETION_MESSAGE.to_string()
}

impl Config {
    /// Parses a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Config = toml::from_str(s).map_err(|e| CountdownError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| CountdownError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&text)
    }

    fn validate(&self) -> Result<()> {
        if self.tick_interval_ms == 0 {
            return Err(CountdownError::Config(
                "tick_interval_ms must be greater than zero".to_string(),
            ));
        }
        if self.animation_interval_ms == 0 {
            return Err(CountdownError::Config(
                "animation_interval_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// The options this config implies, for use ahead of caller options.
    pub fn options(&self) -> Vec<CountdownOption> {
        vec![
            with_tick_interval(Duration::from_millis(self.tick_interval_ms)),
            with_animation_interval(Duration::from_millis(self.animation_interval_ms)),
            with_completion_message(self.completion_message.clone()),
        ]
    }
}
