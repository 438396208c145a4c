#![warn(missing_docs)]

//! # bubbletea-countdown
//!
//! A countdown component for [bubbletea-rs](https://github.com/whit3rabbit/bubbletea-rs)
//! applications: days, hours, minutes and seconds until a fixed instant, with
//! a digit-flip effect, rollover highlighting and a one-shot completion
//! message.
//!
//! ## Overview
//!
//! A countdown follows the Elm Architecture like every other bubbletea
//! component, with `init()`, `update()` and `view()`. What sets it apart:
//!
//! - **No drift**: each tick recomputes the remaining time from the clock
//!   instead of decrementing a counter, so late ticks never accumulate error.
//! - **Injected collaborators**: the clock, the display and the host's
//!   visibility are passed in, so any number of countdowns can run side by
//!   side and every one of them can be driven deterministically in tests.
//! - **Exactly-once completion**: reaching the target cancels both timers and
//!   emits a single [`countdown::CompleteMsg`].
//!
//! ## Quick Start
//!
//! ```rust
//! use bubbletea_countdown::prelude::*;
//!
//! let mut countdown = Countdown::new("2999-12-31T23:59:59Z", TerminalDisplay::new())
//!     .expect("valid future target");
//! let _cmd = countdown.init();
//! assert!(countdown.running());
//! assert!(!countdown.view().is_empty());
//! ```
//!
//! Invalid or past targets are rejected up front:
//!
//! ```rust
//! use bubbletea_countdown::prelude::*;
//!
//! let err = Countdown::new("2001-01-01", TerminalDisplay::new()).unwrap_err();
//! assert!(matches!(err, CountdownError::PastTarget { .. }));
//! ```
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`countdown`] | The countdown session and its messages |
//! | [`display`] | Display trait, terminal renderer, mirroring and recording |
//! | [`remaining`] | Day/hour/minute/second breakdown and formatting |
//! | [`target`] | Target parsing and validation |
//! | [`clock`] | System and manual clocks |
//! | [`visibility`] | Host visibility and the change message |
//! | [`config`] | Options and TOML configuration |
//!
//! ## Logging
//!
//! Lifecycle events are emitted through [`tracing`]. The crate never installs
//! a subscriber.

pub mod clock;
pub mod config;
pub mod countdown;
pub mod display;
pub mod error;
pub mod remaining;
pub mod target;
pub mod visibility;

pub use countdown::{CompleteMsg, Model as Countdown, State};
pub use error::CountdownError;

/// Prelude module for convenient imports.
///
/// ```rust
/// use bubbletea_countdown::prelude::*;
/// ```
pub mod prelude {
    pub use crate::clock::{Clock, ManualClock, SystemClock};
    pub use crate::config::{
        with_animation_interval, with_clock, with_completion_message, with_tick_interval,
        with_visibility, Config, CountdownOption,
    };
    pub use crate::countdown::{CompleteMsg, Model as Countdown, State};
    pub use crate::display::{Display, Mirrored, RecordingDisplay, TerminalDisplay};
    pub use crate::error::CountdownError;
    pub use crate::remaining::{Remaining, Unit};
    pub use crate::visibility::{SharedVisibility, Visibility, VisibilitySource};
}
