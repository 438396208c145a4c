//! Countdown component for Bubble Tea applications.
//!
//! A countdown counts down to a fixed target instant and renders the
//! remaining time as four two-digit groups: days, hours, minutes and
//! seconds. It owns two repeating timers:
//!
//! - the **tick**, which recomputes the remaining time from the clock and
//!   writes changed digit groups to the display, flipping each one it changes;
//! - the **animation**, which highlights the groups that are about to roll
//!   over. It is purely decorative and stops while the host is hidden.
//!
//! When a tick finds no time left, the countdown renders `00` everywhere,
//! cancels both timers, announces completion on the live region and emits a
//! single [`CompleteMsg`]. A finished countdown cannot be restarted.
//!
//! # Basic Usage
//!
//! ```rust
//! use bubbletea_countdown::countdown::Model;
//! use bubbletea_countdown::display::TerminalDisplay;
//!
//! let mut countdown = Model::new("2999-01-01T00:00:00Z", TerminalDisplay::new())
//!     .expect("target is in the future");
//! let _cmd = countdown.init();
//! assert!(countdown.running());
//! ```
//!
//! # bubbletea-rs Integration
//!
//! ```rust
//! use bubbletea_rs::{Cmd, Model as BubbleTeaModel, Msg};
//! use bubbletea_countdown::countdown::{CompleteMsg, Model as Countdown};
//! use bubbletea_countdown::display::TerminalDisplay;
//!
//! struct App {
//!     countdown: Countdown,
//!     done: bool,
//! }
//!
//! impl BubbleTeaModel for App {
//!     fn init() -> (Self, Option<Cmd>) {
//!         let mut countdown = Countdown::new("2999-01-01", TerminalDisplay::new())
//!             .expect("valid target");
//!         let cmd = countdown.init();
//!         (App { countdown, done: false }, cmd)
//!     }
//!
//!     fn update(&mut self, msg: Msg) -> Option<Cmd> {
//!         if let Some(done) = msg.downcast_ref::<CompleteMsg>() {
//!             if done.id == self.countdown.id() {
//!                 self.done = true;
//!             }
//!         }
//!         self.countdown.update(msg)
//!     }
//!
//!     fn view(&self) -> String {
//!         self.countdown.view()
//!     }
//! }
//! ```
//!
//! # Visibility
//!
//! Send [`crate::visibility::changed`] whenever the host gains or loses
//! focus. The countdown re-reads its visibility source: hidden pauses the
//! animation, visible re-arms it from scratch. The tick is never paused, so
//! the digits stay accurate across focus changes.

use crate::clock::Clock;
use crate::config::{Config, CountdownOption, Options};
use crate::display::{Display, TerminalDisplay};
use crate::error::Result;
use crate::remaining::{Remaining, Unit};
use crate::target::{ensure_future, parse_target};
use crate::visibility::{Visibility, VisibilityMsg};
use bubbletea_rs::{batch, tick as bubbletea_tick, Cmd, Model as BubbleTeaModel, Msg};
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;
use tracing::{debug, info, warn};

// Internal ID management for countdown instances
static LAST_ID: AtomicI64 = AtomicI64::new(0);

fn next_id() -> i64 {
    LAST_ID.fetch_add(1, Ordering::SeqCst) + 1
}

/// Lifecycle state of a countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// Counting down. Also the state of a torn-down session that never
    /// finished.
    Running,
    /// The target was reached. Terminal.
    Completed,
}

/// Message delivered by the repeating tick.
///
/// Only the countdown whose id and current tick tag match will act on it;
/// messages from a cancelled tick are dropped on arrival.
#[derive(Debug, Clone)]
pub struct TickMsg {
    /// The countdown that scheduled this tick.
    pub id: i64,
    tag: u64,
}

/// Message delivered by the repeating animation timer.
#[derive(Debug, Clone)]
pub struct AnimationMsg {
    /// The countdown that scheduled this frame.
    pub id: i64,
    tag: u64,
}

/// Sent exactly once when a countdown reaches its target.
#[derive(Debug, Clone)]
pub struct CompleteMsg {
    /// The countdown that finished.
    pub id: i64,
}

/// A countdown session.
///
/// Timer handles are tags. Arming a timer allocates a fresh tag and returns
/// a command that delivers a message carrying it; cancelling clears the
/// stored tag so the in-flight message is ignored.
#[derive(Debug)]
pub struct Model<D: Display = TerminalDisplay> {
    target: DateTime<Utc>,
    options: Options,
    display: D,
    id: i64,
    state: State,
    tick_tag: Option<u64>,
    animation_tag: Option<u64>,
    last_tag: u64,
    last_rendered: [Option<String>; 4],
    active: [bool; 4],
    listening: bool,
}

impl<D: Display> Model<D> {
    /// Creates a countdown to `target` using the system clock.
    ///
    /// # Errors
    ///
    /// [`crate::CountdownError::InvalidTarget`] if `target` does not parse,
    /// [`crate::CountdownError::PastTarget`] if it is not in the future.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bubbletea_countdown::countdown::Model;
    /// use bubbletea_countdown::display::RecordingDisplay;
    /// use bubbletea_countdown::CountdownError;
    ///
    /// let display = RecordingDisplay::new();
    /// let countdown = Model::new("2999-01-01T00:00:00Z", display.clone()).unwrap();
    /// assert!(countdown.running());
    /// // The first frame is drawn before any tick fires.
    /// assert!(display.current().iter().all(|v| v.is_some()));
    ///
    /// let err = Model::new("not a date", RecordingDisplay::new()).unwrap_err();
    /// assert!(matches!(err, CountdownError::InvalidTarget { .. }));
    /// ```
    pub fn new(target: &str, display: D) -> Result<Self> {
        Self::new_with_options(target, display, &[])
    }

    /// Creates a countdown to `target` with the given options.
    pub fn new_with_options(target: &str, display: D, opts: &[CountdownOption]) -> Result<Self> {
        let parsed = match parse_target(target) {
            Ok(t) => t,
            Err(e) => {
                warn!(error = %e, "rejected countdown target");
                return Err(e);
            }
        };
        Self::with_target_and_options(parsed, display, opts)
    }

    /// Creates a countdown to an already parsed instant.
    pub fn with_target(target: DateTime<Utc>, display: D) -> Result<Self> {
        Self::with_target_and_options(target, display, &[])
    }

    /// Creates a countdown to an already parsed instant with options.
    ///
    /// The target is validated against the clock from `opts`.
    pub fn with_target_and_options(
        target: DateTime<Utc>,
        display: D,
        opts: &[CountdownOption],
    ) -> Result<Self> {
        let options = Options::from_options(opts);
        let now = options.clock.now();
        if let Err(e) = ensure_future(target, now) {
            warn!(error = %e, "rejected countdown target");
            return Err(e);
        }
        Ok(Self::launch(target, display, options))
    }

    /// Creates a countdown from a loaded [`Config`]. `opts` are applied after
    /// the config's own settings and win on conflict.
    pub fn from_config(config: &Config, display: D, opts: &[CountdownOption]) -> Result<Self> {
        let mut all = config.options();
        all.extend_from_slice(opts);
        Self::new_with_options(&config.target, display, &all)
    }

    // Renders the first frame straight away so the display is never blank.
    fn launch(target: DateTime<Utc>, display: D, options: Options) -> Self {
        let mut model = Self {
            target,
            options,
            display,
            id: next_id(),
            state: State::Running,
            tick_tag: None,
            animation_tag: None,
            last_tag: 0,
            last_rendered: Default::default(),
            active: [false; 4],
            listening: true,
        };
        let remaining = model.remaining();
        model.render(remaining);
        debug!(id = model.id, until = %target, "countdown created");
        model
    }

    /// Unique identifier of this countdown.
    pub fn id(&self) -> i64 {
        self.id
    }

    /// The instant being counted down to.
    pub fn target(&self) -> DateTime<Utc> {
        self.target
    }

    /// Current lifecycle state.
    pub fn state(&self) -> State {
        self.state
    }

    /// Whether the target has been reached.
    pub fn completed(&self) -> bool {
        self.state == State::Completed
    }

    /// Whether the countdown is still counting: not completed and not torn
    /// down.
    pub fn running(&self) -> bool {
        self.state == State::Running && self.listening
    }

    /// Whether a tick is armed.
    pub fn ticking(&self) -> bool {
        self.tick_tag.is_some()
    }

    /// Whether the animation timer is armed.
    pub fn animating(&self) -> bool {
        self.animation_tag.is_some()
    }

    /// Whether visibility changes are still observed.
    pub fn listening(&self) -> bool {
        self.listening
    }

    /// Milliseconds until the target, negative once it has passed.
    pub fn remaining_millis(&self) -> i64 {
        (self.target - self.options.clock.now()).num_milliseconds()
    }

    /// Remaining time read from the clock now.
    pub fn remaining(&self) -> Remaining {
        Remaining::from_millis(self.remaining_millis())
    }

    /// The settings this countdown runs with.
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// The display the countdown writes to.
    pub fn display(&self) -> &D {
        &self.display
    }

    /// Mutable access to the display, e.g. to restyle it.
    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    /// A message for the currently armed tick, if any.
    pub fn tick_msg(&self) -> Option<TickMsg> {
        self.tick_tag.map(|tag| TickMsg { id: self.id, tag })
    }

    /// A message for the currently armed animation frame, if any.
    pub fn animation_msg(&self) -> Option<AnimationMsg> {
        self.animation_tag
            .map(|tag| AnimationMsg { id: self.id, tag })
    }

    /// Arms the tick, and the animation if the host is visible.
    ///
    /// Returns `None` for a completed or torn-down countdown. Calling it
    /// again re-arms both timers with fresh handles.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bubbletea_countdown::config::with_visibility;
    /// use bubbletea_countdown::countdown::Model;
    /// use bubbletea_countdown::display::RecordingDisplay;
    /// use bubbletea_countdown::visibility::{SharedVisibility, Visibility};
    ///
    /// let hidden = SharedVisibility::new(Visibility::Hidden);
    /// let mut countdown = Model::new_with_options(
    ///     "2999-01-01",
    ///     RecordingDisplay::new(),
    ///     &[with_visibility(hidden)],
    /// )
    /// .unwrap();
    ///
    /// assert!(countdown.init().is_some());
    /// assert!(countdown.ticking());
    /// assert!(!countdown.animating()); // hidden hosts skip the animation
    /// ```
    pub fn init(&mut self) -> Option<Cmd> {
        if !self.running() {
            return None;
        }
        let tick = self.arm_tick();
        debug!(id = self.id, "tick armed");
        if self.options.visibility.visibility() == Visibility::Visible {
            let animation = self.arm_animation();
            debug!(id = self.id, "animation armed");
            return Some(batch(vec![tick, animation]));
        }
        Some(tick)
    }

    /// Routes countdown messages. Anything else is ignored.
    ///
    /// Every accepted tick or animation frame re-arms its timer under a new
    /// handle, so a message delivered twice is only acted on once.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bubbletea_countdown::clock::ManualClock;
    /// use bubbletea_countdown::config::with_clock;
    /// use bubbletea_countdown::countdown::Model;
    /// use bubbletea_countdown::display::{Display, RecordingDisplay};
    /// use std::time::Duration;
    ///
    /// let clock = ManualClock::from_millis(0);
    /// let display = RecordingDisplay::new();
    /// // 1 minute 30 seconds after the epoch.
    /// let mut countdown =
    ///     Model::new_with_options("90000", display.clone(), &[with_clock(clock.clone())]).unwrap();
    /// let _ = countdown.init();
    ///
    /// clock.advance(Duration::from_secs(31));
    /// let tick = countdown.tick_msg().unwrap();
    /// assert!(countdown.update(Box::new(tick.clone())).is_some());
    /// assert_eq!(display.view(), "00:00:00:59");
    ///
    /// // The same message again is stale.
    /// assert!(countdown.update(Box::new(tick)).is_none());
    /// ```
    pub fn update(&mut self, msg: Msg) -> Option<Cmd> {
        if let Some(tick_msg) = msg.downcast_ref::<TickMsg>() {
            if tick_msg.id != self.id || self.tick_tag != Some(tick_msg.tag) {
                return None;
            }
            return Some(self.on_tick());
        }

        if let Some(frame) = msg.downcast_ref::<AnimationMsg>() {
            if frame.id != self.id || self.animation_tag != Some(frame.tag) {
                return None;
            }
            return Some(self.on_animation_frame());
        }

        if let Some(vis) = msg.downcast_ref::<VisibilityMsg>() {
            if vis.id != 0 && vis.id != self.id {
                return None;
            }
            return self.on_visibility_change();
        }

        None
    }

    // Callers have already matched the armed tick handle.
    fn on_tick(&mut self) -> Cmd {
        let ms = self.remaining_millis();
        if ms <= 0 {
            return self.complete();
        }
        self.render(Remaining::from_millis(ms));
        self.arm_tick()
    }

    fn on_animation_frame(&mut self) -> Cmd {
        let remaining = self.remaining();
        for unit in Unit::ALL {
            self.set_active(unit, remaining.is_rolling(unit));
        }
        self.arm_animation()
    }

    fn on_visibility_change(&mut self) -> Option<Cmd> {
        if !self.listening || self.tick_tag.is_none() {
            return None;
        }
        match self.options.visibility.visibility() {
            Visibility::Hidden => {
                if self.animation_tag.take().is_some() {
                    debug!(id = self.id, "animation paused");
                    self.clear_highlights();
                }
                None
            }
            Visibility::Visible => {
                if self.animation_tag.is_some() {
                    return None;
                }
                debug!(id = self.id, "animation resumed");
                Some(self.arm_animation())
            }
        }
    }

    /// Cancels both timers and stops observing visibility. Safe to call any
    /// number of times, including after completion.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bubbletea_countdown::countdown::{Model, State};
    /// use bubbletea_countdown::display::TerminalDisplay;
    ///
    /// let mut countdown = Model::new("2999-01-01", TerminalDisplay::new()).unwrap();
    /// let _ = countdown.init();
    /// let pending = countdown.tick_msg().unwrap();
    ///
    /// countdown.teardown();
    /// countdown.teardown();
    /// assert!(!countdown.running());
    /// assert_eq!(countdown.state(), State::Running); // never completed
    /// assert!(countdown.update(Box::new(pending)).is_none());
    /// ```
    pub fn teardown(&mut self) {
        if !self.listening && self.tick_tag.is_none() && self.animation_tag.is_none() {
            return;
        }
        self.tick_tag = None;
        self.animation_tag = None;
        self.listening = false;
        info!(id = self.id, "countdown torn down");
    }

    /// Renders the display.
    pub fn view(&self) -> String {
        self.display.view()
    }

    fn complete(&mut self) -> Cmd {
        self.render(Remaining::ZERO);
        self.tick_tag = None;
        self.animation_tag = None;
        self.listening = false;
        self.state = State::Completed;
        self.clear_highlights();
        self.display.announce(&self.options.completion_message);
        info!(id = self.id, "countdown complete");

        let id = self.id;
        bubbletea_tick(Duration::from_nanos(1), move |_| {
            Box::new(CompleteMsg { id }) as Msg
        })
    }

    // Writes only the groups whose text changed; each changed group that
    // already had a value flips.
    fn render(&mut self, remaining: Remaining) {
        self.display.begin_frame();
        for (unit, value) in Unit::ALL.into_iter().zip(remaining.formatted()) {
            let slot = &mut self.last_rendered[unit.index()];
            if slot.as_deref() == Some(value.as_str()) {
                continue;
            }
            self.display.write(unit, &value);
            if slot.is_some() {
                self.display.flip(unit);
            }
            *slot = Some(value);
        }
    }

    fn set_active(&mut self, unit: Unit, active: bool) {
        let i = unit.index();
        if self.active[i] != active {
            self.active[i] = active;
            self.display.set_active(unit, active);
        }
    }

    fn clear_highlights(&mut self) {
        for unit in Unit::ALL {
            self.set_active(unit, false);
        }
    }

    fn next_tag(&mut self) -> u64 {
        self.last_tag += 1;
        self.last_tag
    }

    fn arm_tick(&mut self) -> Cmd {
        let tag = self.next_tag();
        self.tick_tag = Some(tag);
        self.schedule_tick(tag)
    }

    fn arm_animation(&mut self) -> Cmd {
        let tag = self.next_tag();
        self.animation_tag = Some(tag);
        self.schedule_animation(tag)
    }

    fn schedule_tick(&self, tag: u64) -> Cmd {
        let id = self.id;
        bubbletea_tick(self.options.tick_interval, move |_| {
            Box::new(TickMsg { id, tag }) as Msg
        })
    }

    fn schedule_animation(&self, tag: u64) -> Cmd {
        let id = self.id;
        bubbletea_tick(self.options.animation_interval, move |_| {
            Box::new(AnimationMsg { id, tag }) as Msg
        })
    }
}

impl BubbleTeaModel for Model {
    /// Starts a one-minute countdown on the system clock.
    fn init() -> (Self, Option<Cmd>) {
        let mut model = Self::default();
        let cmd = model.init();
        (model, cmd)
    }

    fn update(&mut self, msg: Msg) -> Option<Cmd> {
        self.update(msg)
    }

    fn view(&self) -> String {
        self.view()
    }
}

impl Default for Model {
    /// A countdown ending one minute from now, rendered in the terminal.
    fn default() -> Self {
        let options = Options::default();
        let target = options.clock.now() + chrono::Duration::seconds(60);
        Self::launch(target, TerminalDisplay::new(), options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::config::{with_clock, with_completion_message, with_visibility};
    use crate::display::{DisplayCall, Mirrored, RecordingDisplay};
    use crate::error::CountdownError;
    use crate::visibility::SharedVisibility;

    // 2027-01-15T08:00:00Z
    const START: i64 = 1_800_000_000_000;

    struct Harness {
        model: Model<RecordingDisplay>,
        clock: ManualClock,
        display: RecordingDisplay,
        visibility: SharedVisibility,
    }

    impl Harness {
        fn new(offset_ms: i64) -> Self {
            let clock = ManualClock::from_millis(START);
            let display = RecordingDisplay::new();
            let visibility = SharedVisibility::default();
            let target = DateTime::from_timestamp_millis(START + offset_ms).unwrap();
            let model = Model::with_target_and_options(
                target,
                display.clone(),
                &[with_clock(clock.clone()), with_visibility(visibility.clone())],
            )
            .unwrap();
            Self {
                model,
                clock,
                display,
                visibility,
            }
        }

        fn advance_and_tick(&mut self, ms: u64) -> Option<Cmd> {
            self.clock.advance(Duration::from_millis(ms));
            let msg = self.model.tick_msg().expect("tick armed");
            self.model.update(Box::new(msg))
        }

        fn shown(&self) -> Vec<String> {
            self.display
                .current()
                .into_iter()
                .map(|v| v.unwrap_or_default())
                .collect()
        }

        fn hide(&mut self) -> Option<Cmd> {
            self.visibility.set(Visibility::Hidden);
            self.model.update(Box::new(VisibilityMsg { id: 0 }))
        }

        fn show(&mut self) -> Option<Cmd> {
            self.visibility.set(Visibility::Visible);
            self.model.update(Box::new(VisibilityMsg { id: 0 }))
        }
    }

    fn writes(calls: &[DisplayCall]) -> usize {
        calls
            .iter()
            .filter(|c| matches!(c, DisplayCall::Write(..)))
            .count()
    }

    #[test]
    fn test_initial_render_before_any_tick() {
        let h = Harness::new(90_061_000);
        assert_eq!(h.shown(), ["01", "01", "01", "01"]);
        assert!(!h
            .display
            .calls()
            .iter()
            .any(|c| matches!(c, DisplayCall::Flip(_))));
        assert!(!h.model.ticking());
        assert_eq!(h.model.state(), State::Running);
    }

    #[test]
    fn test_sixty_one_ticks_roll_minutes_and_seconds() {
        let mut h = Harness::new(90_061_000);
        let _ = h.model.init();
        h.display.take();

        h.advance_and_tick(1_000);
        assert_eq!(
            h.display.take(),
            vec![
                DisplayCall::Write(Unit::Seconds, "00".to_string()),
                DisplayCall::Flip(Unit::Seconds),
            ]
        );

        h.advance_and_tick(1_000);
        assert_eq!(
            h.display.take(),
            vec![
                DisplayCall::Write(Unit::Minutes, "00".to_string()),
                DisplayCall::Flip(Unit::Minutes),
                DisplayCall::Write(Unit::Seconds, "59".to_string()),
                DisplayCall::Flip(Unit::Seconds),
            ]
        );

        for _ in 0..59 {
            assert!(h.advance_and_tick(1_000).is_some());
        }
        assert_eq!(h.shown(), ["01", "01", "00", "00"]);
        assert!(h.model.running());
    }

    #[test]
    fn test_late_ticks_self_correct() {
        let mut h = Harness::new(90_061_000);
        let _ = h.model.init();

        // A single tick arriving 5.5 s late shows the true remaining time.
        h.advance_and_tick(5_500);
        assert_eq!(h.shown(), ["01", "01", "00", "55"]);

        // An early tick within the same second writes nothing.
        h.display.take();
        h.advance_and_tick(300);
        assert_eq!(writes(&h.display.take()), 0);
    }

    #[tokio::test]
    async fn test_completes_exactly_once() {
        let mut h = Harness::new(500);
        let _ = h.model.init();
        assert_eq!(h.shown(), ["00", "00", "00", "00"]);
        h.display.take();

        let stale = h.model.tick_msg().unwrap();
        let stale_frame = h.model.animation_msg().unwrap();
        let cmd = h.advance_and_tick(1_000).expect("completion command");

        assert!(h.model.completed());
        assert!(!h.model.ticking());
        assert!(!h.model.animating());
        assert!(!h.model.running());
        assert_eq!(h.shown(), ["00", "00", "00", "00"]);
        assert_eq!(
            h.display.take(),
            vec![DisplayCall::Announce("Countdown complete".to_string())]
        );

        let msg = cmd.await.expect("message");
        let done = msg.downcast_ref::<CompleteMsg>().expect("complete msg");
        assert_eq!(done.id, h.model.id());

        // Further ticks, however they arrive, are inert.
        assert!(h.model.update(Box::new(stale.clone())).is_none());
        assert!(h.model.update(Box::new(stale)).is_none());
        assert!(h.model.update(Box::new(stale_frame)).is_none());
        assert!(h.model.tick_msg().is_none());
        assert!(h.model.animation_msg().is_none());
        assert!(h.model.init().is_none());
        assert!(h.show().is_none());
        assert!(h.display.calls().is_empty());
    }

    #[test]
    fn test_duplicated_tick_cannot_fork_a_second_chain() {
        let mut h = Harness::new(90_061_000);
        let _ = h.model.init();
        h.display.take();

        h.clock.advance(Duration::from_secs(1));
        let tick = h.model.tick_msg().unwrap();
        assert!(h.model.update(Box::new(tick.clone())).is_some());
        let next = h.model.tick_msg().unwrap();
        assert_ne!(next.tag, tick.tag);

        // The host delivering the same message again schedules nothing.
        h.clock.advance(Duration::from_secs(1));
        h.display.take();
        assert!(h.model.update(Box::new(tick)).is_none());
        assert!(h.display.calls().is_empty());

        // Only the re-armed handle keeps the countdown going.
        assert!(h.model.update(Box::new(next)).is_some());
        assert_eq!(h.shown(), ["01", "01", "00", "59"]);
    }

    #[test]
    fn test_duplicated_animation_frame_is_dropped() {
        let mut h = Harness::new(90_060_000);
        let _ = h.model.init();
        let frame = h.model.animation_msg().unwrap();
        assert!(h.model.update(Box::new(frame.clone())).is_some());
        assert_ne!(h.model.animation_msg().unwrap().tag, frame.tag);
        h.display.take();
        assert!(h.model.update(Box::new(frame)).is_none());
        assert!(h.display.calls().is_empty());
    }

    #[tokio::test]
    async fn test_mirrored_displays_run_to_completion() {
        let clock = ManualClock::at(DateTime::from_timestamp_millis(START).unwrap());
        let a = RecordingDisplay::new();
        let b = RecordingDisplay::new();
        let target = DateTime::from_timestamp_millis(START + 3_000).unwrap();
        let mut model = Model::with_target_and_options(
            target,
            Mirrored::new(vec![a.clone(), b.clone()]),
            &[with_clock(clock.clone())],
        )
        .unwrap();
        let _ = model.init();
        assert_eq!(model.view(), "00:00:00:03");

        let mut done = None;
        for _ in 0..3 {
            clock.advance(Duration::from_secs(1));
            let tick = model.tick_msg().expect("tick armed");
            done = model.update(Box::new(tick));
            assert_eq!(a.current(), b.current());
        }

        assert!(model.completed());
        assert_eq!(model.view(), "00:00:00:00");
        assert_eq!(a.calls(), b.calls());
        assert_eq!(a.announcements(), vec!["Countdown complete".to_string()]);
        assert_eq!(b.announcements().len(), 1);

        let msg = done.expect("completion command").await.expect("message");
        assert_eq!(msg.downcast_ref::<CompleteMsg>().unwrap().id, model.id());
    }

    #[test]
    fn test_completion_from_nonzero_display() {
        let mut h = Harness::new(2_000);
        let _ = h.model.init();
        assert_eq!(h.shown(), ["00", "00", "00", "02"]);

        h.advance_and_tick(1_000);
        assert_eq!(h.shown(), ["00", "00", "00", "01"]);
        assert!(h.advance_and_tick(1_000).is_some());
        assert_eq!(h.shown(), ["00", "00", "00", "00"]);
        assert!(h.model.completed());
        assert_eq!(h.display.announcements().len(), 1);
    }

    #[test]
    fn test_custom_completion_message() {
        let clock = ManualClock::from_millis(START);
        let display = RecordingDisplay::new();
        let mut model = Model::new_with_options(
            "1800000000100",
            display.clone(),
            &[with_clock(clock.clone()), with_completion_message("Liftoff")],
        )
        .unwrap();
        let _ = model.init();
        clock.advance(Duration::from_secs(1));
        let tick = model.tick_msg().unwrap();
        assert!(model.update(Box::new(tick)).is_some());
        assert_eq!(display.announcements(), vec!["Liftoff".to_string()]);
    }

    #[test]
    fn test_construction_rejects_past_and_invalid_targets() {
        let clock = ManualClock::from_millis(START);
        let now = clock.now();

        let at_now = Model::with_target_and_options(
            now,
            RecordingDisplay::new(),
            &[with_clock(clock.clone())],
        );
        assert!(matches!(at_now, Err(CountdownError::PastTarget { .. })));

        let before = Model::new_with_options(
            "2020-01-01T00:00:00Z",
            RecordingDisplay::new(),
            &[with_clock(clock.clone())],
        );
        assert!(matches!(before, Err(CountdownError::PastTarget { .. })));

        let garbage = Model::new("soon", RecordingDisplay::new());
        assert_eq!(
            garbage.unwrap_err(),
            CountdownError::InvalidTarget {
                input: "soon".to_string()
            }
        );
    }

    #[test]
    fn test_animation_highlights_rollover() {
        let mut h = Harness::new(90_060_000); // 1d 1h 1m 0s
        let _ = h.model.init();
        assert!(h.model.animating());
        h.display.take();

        let frame = h.model.animation_msg().unwrap();
        assert!(h.model.update(Box::new(frame)).is_some());
        assert_eq!(
            h.display.take(),
            vec![DisplayCall::Active(Unit::Minutes, true)]
        );

        // One second later nothing is about to roll; the highlight clears.
        h.clock.advance(Duration::from_secs(1));
        let frame = h.model.animation_msg().unwrap();
        h.model.update(Box::new(frame));
        assert_eq!(
            h.display.take(),
            vec![DisplayCall::Active(Unit::Minutes, false)]
        );
    }

    #[test]
    fn test_hide_and_show_never_touch_digits() {
        let mut h = Harness::new(90_060_000);
        let _ = h.model.init();
        let old_frame = h.model.animation_msg().unwrap();
        h.model.update(Box::new(old_frame.clone()));
        let before = h.shown();
        h.display.take();

        assert!(h.hide().is_none());
        assert!(!h.model.animating());
        assert!(h.model.ticking());

        // Ticks keep running while hidden.
        h.advance_and_tick(1_000);
        assert_eq!(h.shown(), ["01", "01", "00", "59"]);

        assert!(h.show().is_some());
        assert!(h.model.animating());
        // Showing twice does not arm a second animation.
        assert!(h.show().is_none());

        // Frames from before the pause are dropped.
        assert!(h.model.update(Box::new(old_frame)).is_none());

        let calls = h.display.take();
        assert!(calls.contains(&DisplayCall::Active(Unit::Minutes, false)));
        assert_eq!(writes(&calls), 2);
        assert_ne!(before, h.shown());
    }

    #[test]
    fn test_hidden_host_starts_without_animation() {
        let mut h = Harness::new(90_061_000);
        h.visibility.set(Visibility::Hidden);
        assert!(h.model.init().is_some());
        assert!(h.model.ticking());
        assert!(!h.model.animating());
    }

    #[test]
    fn test_teardown_is_idempotent() {
        let mut h = Harness::new(90_061_000);
        let _ = h.model.init();
        let pending = h.model.tick_msg().unwrap();
        h.display.take();

        h.model.teardown();
        assert!(!h.model.ticking());
        assert!(!h.model.animating());
        assert!(!h.model.listening());
        assert!(!h.model.running());
        assert_eq!(h.model.state(), State::Running);

        h.model.teardown();
        h.clock.advance(Duration::from_secs(5));
        assert!(h.model.update(Box::new(pending)).is_none());
        assert!(h.show().is_none());
        assert!(h.model.init().is_none());
        assert!(h.display.calls().is_empty());
    }

    #[test]
    fn test_teardown_after_completion_is_noop() {
        let mut h = Harness::new(500);
        let _ = h.model.init();
        h.advance_and_tick(1_000);
        assert!(h.model.completed());
        h.model.teardown();
        assert_eq!(h.model.state(), State::Completed);
    }

    #[test]
    fn test_messages_for_other_countdowns_are_ignored() {
        let mut a = Harness::new(90_061_000);
        let mut b = Harness::new(90_061_000);
        let _ = a.model.init();
        let _ = b.model.init();
        assert_ne!(a.model.id(), b.model.id());

        let b_tick = b.model.tick_msg().unwrap();
        a.clock.advance(Duration::from_secs(1));
        a.display.take();
        assert!(a.model.update(Box::new(b_tick)).is_none());
        assert!(a.model.update(Box::new(VisibilityMsg { id: b.model.id() })).is_none());
        assert!(a.model.update(Box::new("unrelated")).is_none());
        assert!(a.display.calls().is_empty());
    }

    #[test]
    fn test_reinit_drops_previous_handles() {
        let mut h = Harness::new(90_061_000);
        let _ = h.model.init();
        let first = h.model.tick_msg().unwrap();
        let _ = h.model.init();
        assert!(h.model.update(Box::new(first)).is_none());
        assert!(h.advance_and_tick(1_000).is_some());
    }

    #[test]
    fn test_from_config() {
        let config = Config::from_toml_str(
            r#"
            target = "2027-01-15T08:00:10Z"
            tick_interval_ms = 250
            completion_message = "Done"
            "#,
        )
        .unwrap();
        let clock = ManualClock::from_millis(START);
        let model =
            Model::from_config(&config, RecordingDisplay::new(), &[with_clock(clock)]).unwrap();
        assert_eq!(model.options().tick_interval, Duration::from_millis(250));
        assert_eq!(model.options().completion_message, "Done");
        assert_eq!(model.remaining().seconds, 10);
    }

    #[test]
    fn test_default_model_counts_down_one_minute() {
        let (model, cmd) = <Model as BubbleTeaModel>::init();
        assert!(cmd.is_some());
        assert!(model.running());
        assert!(model.ticking());
        let ms = model.remaining_millis();
        assert!(ms > 55_000 && ms <= 60_000, "{ms}");
        assert!(!model.view().is_empty());
    }
}
