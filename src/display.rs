//! Rendering collaborators for countdown sessions.
//!
//! A session never formats output itself. It pushes digit strings, flip
//! triggers, highlight state and live-region announcements into a
//! [`Display`], which is handed to it at construction. Three displays ship
//! with the crate:
//!
//! - [`TerminalDisplay`] renders the digits with Lip Gloss styles and is what
//!   `Model::view` shows in a bubbletea program.
//! - [`Mirrored`] fans every call out to several displays, for layouts that
//!   repeat the same digits in more than one place.
//! - [`RecordingDisplay`] keeps a log of every call, for tests and for hosts
//!   that want to replay updates elsewhere.

use crate::remaining::Unit;
use lipgloss_extras::lipgloss::Color;
use lipgloss_extras::prelude::*;
use std::fmt;
use std::sync::{Arc, Mutex};

/// Target of a countdown's visible output.
pub trait Display: fmt::Debug + Send {
    /// Called once before each tick's writes. Transient effects from the
    /// previous frame (flips) can be cleared here.
    fn begin_frame(&mut self) {}

    /// Replaces the text of one digit group.
    fn write(&mut self, unit: Unit, value: &str);

    /// Plays the flip effect for a digit group whose value just changed.
    fn flip(&mut self, unit: Unit);

    /// Toggles the highlight of a digit group that is about to roll over.
    fn set_active(&mut self, unit: Unit, active: bool);

    /// Posts a message to the live region read by assistive technology.
    fn announce(&mut self, message: &str);

    /// Renders the display for a terminal frame.
    fn view(&self) -> String {
        String::new()
    }
}

impl<D: Display + ?Sized> Display for Box<D> {
    fn begin_frame(&mut self) {
        (**self).begin_frame()
    }
    fn write(&mut self, unit: Unit, value: &str) {
        (**self).write(unit, value)
    }
    fn flip(&mut self, unit: Unit) {
        (**self).flip(unit)
    }
    fn set_active(&mut self, unit: Unit, active: bool) {
        (**self).set_active(unit, active)
    }
    fn announce(&mut self, message: &str) {
        (**self).announce(message)
    }
    fn view(&self) -> String {
        (**self).view()
    }
}

/// Broadcasts every update to a set of displays showing the same countdown.
#[derive(Debug)]
pub struct Mirrored<D> {
    targets: Vec<D>,
}

impl<D: Display> Mirrored<D> {
    /// Creates a mirror over `targets`. The first target provides the view.
    pub fn new(targets: Vec<D>) -> Self {
        Self { targets }
    }

    /// The mirrored displays.
    pub fn targets(&self) -> &[D] {
        &self.targets
    }
}

impl<D: Display> Display for Mirrored<D> {
    fn begin_frame(&mut self) {
        self.targets.iter_mut().for_each(|d| d.begin_frame());
    }

    fn write(&mut self, unit: Unit, value: &str) {
        self.targets.iter_mut().for_each(|d| d.write(unit, value));
    }

    fn flip(&mut self, unit: Unit) {
        self.targets.iter_mut().for_each(|d| d.flip(unit));
    }

    fn set_active(&mut self, unit: Unit, active: bool) {
        self.targets
            .iter_mut()
            .for_each(|d| d.set_active(unit, active));
    }

    fn announce(&mut self, message: &str) {
        self.targets.iter_mut().for_each(|d| d.announce(message));
    }

    fn view(&self) -> String {
        self.targets.first().map(|d| d.view()).unwrap_or_default()
    }
}

/// One call received by a [`RecordingDisplay`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayCall {
    /// `write(unit, value)`
    Write(Unit, String),
    /// `flip(unit)`
    Flip(Unit),
    /// `set_active(unit, active)`
    Active(Unit, bool),
    /// `announce(message)`
    Announce(String),
}

/// Records every display call. Clones share the same log.
///
/// The current digits are tracked apart from the log, so draining the log
/// with [`RecordingDisplay::take`] does not forget what is on screen.
#[derive(Debug, Clone, Default)]
pub struct RecordingDisplay {
    log: Arc<Mutex<Log>>,
}

#[derive(Debug, Default)]
struct Log {
    calls: Vec<DisplayCall>,
    current: [Option<String>; 4],
}

impl RecordingDisplay {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all calls so far.
    pub fn calls(&self) -> Vec<DisplayCall> {
        self.lock().calls.clone()
    }

    /// Drains the log, returning what was recorded.
    pub fn take(&self) -> Vec<DisplayCall> {
        std::mem::take(&mut self.lock().calls)
    }

    /// The most recent value written to each unit, in render order.
    pub fn current(&self) -> [Option<String>; 4] {
        self.lock().current.clone()
    }

    /// Every announcement still in the log.
    pub fn announcements(&self) -> Vec<String> {
        self.lock()
            .calls
            .iter()
            .filter_map(|call| match call {
                DisplayCall::Announce(m) => Some(m.clone()),
                _ => None,
            })
            .collect()
    }

    fn push(&self, call: DisplayCall) {
        let mut log = self.lock();
        if let DisplayCall::Write(unit, value) = &call {
            log.current[unit.index()] = Some(value.clone());
        }
        log.calls.push(call);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Log> {
        // A poisoned log still holds valid calls.
        self.log.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Display for RecordingDisplay {
    fn write(&mut self, unit: Unit, value: &str) {
        self.push(DisplayCall::Write(unit, value.to_string()));
    }

    fn flip(&mut self, unit: Unit) {
        self.push(DisplayCall::Flip(unit));
    }

    fn set_active(&mut self, unit: Unit, active: bool) {
        self.push(DisplayCall::Active(unit, active));
    }

    fn announce(&mut self, message: &str) {
        self.push(DisplayCall::Announce(message.to_string()));
    }

    fn view(&self) -> String {
        self.current()
            .iter()
            .map(|v| v.as_deref().unwrap_or("--"))
            .collect::<Vec<_>>()
            .join(":")
    }
}

/// Styles used by [`TerminalDisplay`].
#[derive(Debug, Clone)]
pub struct Styles {
    /// Digits at rest.
    pub digits: Style,
    /// Digits that changed on the current frame.
    pub flipped: Style,
    /// Digits about to roll over.
    pub active: Style,
    /// Unit labels under the digits.
    pub label: Style,
    /// The live region line.
    pub live: Style,
}

impl Default for Styles {
    fn default() -> Self {
        Self {
            digits: Style::new().bold(true),
            flipped: Style::new().bold(true).foreground(Color::from("#FF5F87")),
            active: Style::new().bold(true).underline(true),
            label: Style::new().foreground(Color::from("#626262")),
            live: Style::new().italic(true),
        }
    }
}

/// Renders a countdown as four styled digit groups with labels.
///
/// ```rust
/// use bubbletea_countdown::display::{Display, TerminalDisplay};
/// use bubbletea_countdown::remaining::Unit;
///
/// let mut d = TerminalDisplay::new();
/// d.write(Unit::Seconds, "07");
/// assert_eq!(d.value(Unit::Seconds), "07");
/// ```
#[derive(Debug, Clone)]
pub struct TerminalDisplay {
    /// Styles applied when rendering.
    pub styles: Styles,
    /// Text placed between digit groups.
    pub separator: String,

    values: [String; 4],
    flipped: [bool; 4],
    active: [bool; 4],
    live: String,
}

impl Default for TerminalDisplay {
    fn default() -> Self {
        Self {
            styles: Styles::default(),
            separator: " : ".to_string(),
            values: Default::default(),
            flipped: [false; 4],
            active: [false; 4],
            live: String::new(),
        }
    }
}

impl TerminalDisplay {
    /// Creates a display with default styles and no digits yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current text of a digit group.
    pub fn value(&self, unit: Unit) -> &str {
        &self.values[unit.index()]
    }

    /// Whether the group flipped on the current frame.
    pub fn is_flipped(&self, unit: Unit) -> bool {
        self.flipped[unit.index()]
    }

    /// Whether the group is highlighted.
    pub fn is_active(&self, unit: Unit) -> bool {
        self.active[unit.index()]
    }

    /// Current live-region text.
    pub fn live_region(&self) -> &str {
        &self.live
    }

    fn render_unit(&self, unit: Unit) -> String {
        let i = unit.index();
        let style = if self.flipped[i] {
            &self.styles.flipped
        } else if self.active[i] {
            &self.styles.active
        } else {
            &self.styles.digits
        };
        style.render(&self.values[i])
    }
}

impl Display for TerminalDisplay {
    fn begin_frame(&mut self) {
        self.flipped = [false; 4];
    }

    fn write(&mut self, unit: Unit, value: &str) {
        self.values[unit.index()] = value.to_string();
    }

    fn flip(&mut self, unit: Unit) {
        self.flipped[unit.index()] = true;
    }

    fn set_active(&mut self, unit: Unit, active: bool) {
        self.active[unit.index()] = active;
    }

    fn announce(&mut self, message: &str) {
        self.live = message.to_string();
    }

    fn view(&self) -> String {
        let digits = Unit::ALL
            .iter()
            .map(|u| self.render_unit(*u))
            .collect::<Vec<_>>()
            .join(&self.separator);

        // One-letter labels centred under their digit group.
        let labels = Unit::ALL
            .iter()
            .map(|u| {
                let w = self.values[u.index()].chars().count().max(2);
                self.styles
                    .label
                    .render(&format!("{:^w$}", &u.label()[..1], w = w))
            })
            .collect::<Vec<_>>()
            .join(&" ".repeat(self.separator.chars().count()));

        let mut out = format!("{}\n{}", digits, labels);
        if !self.live.is_empty() {
            out.push('\n');
            out.push_str(&self.styles.live.render(&self.live));
        }
        out
    }
}
