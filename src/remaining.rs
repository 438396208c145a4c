//! Calendar-agnostic breakdown of a remaining duration.
//!
//! A day is always 24 hours; months and years are not modelled. Negative
//! inputs clamp to zero so a display can never show a negative value.

use std::fmt;

/// Milliseconds in one day.
pub const MS_PER_DAY: i64 = 86_400_000;
/// Milliseconds in one hour.
pub const MS_PER_HOUR: i64 = 3_600_000;
/// Milliseconds in one minute.
pub const MS_PER_MINUTE: i64 = 60_000;
/// Milliseconds in one second.
pub const MS_PER_SECOND: i64 = 1_000;

/// One of the four digit groups a countdown renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Unit {
    /// Whole days.
    Days,
    /// Hours within the day.
    Hours,
    /// Minutes within the hour.
    Minutes,
    /// Seconds within the minute.
    Seconds,
}

impl Unit {
    /// All units, largest first. This is also the render order.
    pub const ALL: [Unit; 4] = [Unit::Days, Unit::Hours, Unit::Minutes, Unit::Seconds];

    /// Position of the unit inside [`Unit::ALL`].
    pub fn index(self) -> usize {
        match self {
            Unit::Days => 0,
            Unit::Hours => 1,
            Unit::Minutes => 2,
            Unit::Seconds => 3,
        }
    }

    /// Short label shown under the digits.
    pub fn label(self) -> &'static str {
        match self {
            Unit::Days => "days",
            Unit::Hours => "hours",
            Unit::Minutes => "minutes",
            Unit::Seconds => "seconds",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Remaining time split into display units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Remaining {
    /// Whole days.
    pub days: u64,
    /// Hours, `0..24`.
    pub hours: u64,
    /// Minutes, `0..60`.
    pub minutes: u64,
    /// Seconds, `0..60`.
    pub seconds: u64,
}

impl Remaining {
    /// All-zero breakdown rendered on completion.
    pub const ZERO: Remaining = Remaining {
        days: 0,
        hours: 0,
        minutes: 0,
        seconds: 0,
    };

    /// Decomposes `ms` milliseconds. Values `<= 0` yield [`Remaining::ZERO`];
    /// sub-second remainders are truncated.
    pub fn from_millis(ms: i64) -> Self {
        if ms <= 0 {
            return Self::ZERO;
        }
        let days = ms / MS_PER_DAY;
        let rest = ms % MS_PER_DAY;
        let hours = rest / MS_PER_HOUR;
        let rest = rest % MS_PER_HOUR;
        let minutes = rest / MS_PER_MINUTE;
        let rest = rest % MS_PER_MINUTE;
        let seconds = rest / MS_PER_SECOND;

        Self {
            days: days as u64,
            hours: hours as u64,
            minutes: minutes as u64,
            seconds: seconds as u64,
        }
    }

    /// Value of a single unit.
    pub fn get(&self, unit: Unit) -> u64 {
        match unit {
            Unit::Days => self.days,
            Unit::Hours => self.hours,
            Unit::Minutes => self.minutes,
            Unit::Seconds => self.seconds,
        }
    }

    /// Total milliseconds represented by the breakdown.
    pub fn as_millis(&self) -> i64 {
        self.days as i64 * MS_PER_DAY
            + self.hours as i64 * MS_PER_HOUR
            + self.minutes as i64 * MS_PER_MINUTE
            + self.seconds as i64 * MS_PER_SECOND
    }

    /// Zero-padded strings for every unit, in [`Unit::ALL`] order.
    pub fn formatted(&self) -> [String; 4] {
        Unit::ALL.map(|unit| pad2(self.get(unit)))
    }

    /// Whether `unit` is about to roll over: every smaller unit reads zero.
    ///
    /// Seconds have no smaller unit and are never highlighted.
    pub fn is_rolling(&self, unit: Unit) -> bool {
        match unit {
            Unit::Seconds => false,
            Unit::Minutes => self.seconds == 0,
            Unit::Hours => self.seconds == 0 && self.minutes == 0,
            Unit::Days => self.seconds == 0 && self.minutes == 0 && self.hours == 0,
        }
    }
}

/// Pads single-digit values with a leading zero. Larger values are printed
/// as-is, so a countdown of 100+ days shows three digits.
pub fn pad2(value: u64) -> String {
    format!("{:02}", value)
}
