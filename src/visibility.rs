//! Host visibility, used to pause decorative animation.
//!
//! When the host is hidden (terminal unfocused, window minimised) a countdown
//! stops its animation timer but keeps ticking, so the digits are correct the
//! moment the host is shown again. The session learns about changes through a
//! [`VisibilityMsg`] and then reads the current state from its
//! [`VisibilitySource`].

use bubbletea_rs::{tick, Cmd, Msg};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Whether the host is currently shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// The host is shown.
    Visible,
    /// The host is hidden.
    Hidden,
}

/// Read-only view of the host's visibility flag.
pub trait VisibilitySource: fmt::Debug + Send + Sync {
    /// Current visibility.
    fn visibility(&self) -> Visibility;
}

/// A host that is never hidden.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysVisible;

impl VisibilitySource for AlwaysVisible {
    fn visibility(&self) -> Visibility {
        Visibility::Visible
    }
}

/// A visibility flag the host flips as focus changes. Clones share state.
///
/// ```rust
/// use bubbletea_countdown::visibility::{SharedVisibility, Visibility, VisibilitySource};
///
/// let flag = SharedVisibility::new(Visibility::Visible);
/// let seen_by_session = flag.clone();
/// flag.set(Visibility::Hidden);
/// assert_eq!(seen_by_session.visibility(), Visibility::Hidden);
/// ```
#[derive(Debug, Clone)]
pub struct SharedVisibility {
    hidden: Arc<AtomicBool>,
}

impl SharedVisibility {
    /// Creates a flag with an initial state.
    pub fn new(initial: Visibility) -> Self {
        Self {
            hidden: Arc::new(AtomicBool::new(initial == Visibility::Hidden)),
        }
    }

    /// Updates the flag. Sessions only notice after a [`VisibilityMsg`].
    pub fn set(&self, visibility: Visibility) {
        self.hidden
            .store(visibility == Visibility::Hidden, Ordering::SeqCst);
    }
}

impl Default for SharedVisibility {
    fn default() -> Self {
        Self::new(Visibility::Visible)
    }
}

impl VisibilitySource for SharedVisibility {
    fn visibility(&self) -> Visibility {
        if self.hidden.load(Ordering::SeqCst) {
            Visibility::Hidden
        } else {
            Visibility::Visible
        }
    }
}

/// Signals that the host's visibility changed.
///
/// An `id` of `0` addresses every countdown.
#[derive(Debug, Clone)]
pub struct VisibilityMsg {
    /// The countdown this message targets, or `0` for all.
    pub id: i64,
}

/// A command that tells every countdown to re-read its visibility source.
pub fn changed() -> Cmd {
    changed_for(0)
}

/// A command that tells one countdown to re-read its visibility source.
pub fn changed_for(id: i64) -> Cmd {
    tick(Duration::from_nanos(1), move |_| {
        Box::new(VisibilityMsg { id }) as Msg
    })
}
