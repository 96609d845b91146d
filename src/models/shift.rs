//! Shift model.
//!
//! A shift is a fixed weekly time slot: a weekday, a start and end
//! time of day, and the number of people it needs.
//!
//! # Time Model
//! Times of day are stored as whole minutes since midnight so that
//! containment checks are exact. Durations handed to the assignment
//! model are integer ticks of a quarter hour (`TICKS_PER_HOUR` = 4),
//! which keeps a 07:15 start representable without fractional arithmetic.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Integer sub-hour unit used by the assignment model.
pub const TICKS_PER_HOUR: i64 = 4;

/// Minutes per tick.
pub const MINUTES_PER_TICK: u16 = 15;

/// Day of the week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Weekday {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
    Sun,
}

impl Weekday {
    /// All days, Monday first.
    pub const ALL: [Weekday; 7] = [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
        Weekday::Sun,
    ];

    /// Three-letter abbreviation ("Mon").
    pub fn abbr(self) -> &'static str {
        match self {
            Weekday::Mon => "Mon",
            Weekday::Tue => "Tue",
            Weekday::Wed => "Wed",
            Weekday::Thu => "Thu",
            Weekday::Fri => "Fri",
            Weekday::Sat => "Sat",
            Weekday::Sun => "Sun",
        }
    }

    /// Upper-case full name, as used for availability table columns ("MONDAY").
    pub fn column_name(self) -> &'static str {
        match self {
            Weekday::Mon => "MONDAY",
            Weekday::Tue => "TUESDAY",
            Weekday::Wed => "WEDNESDAY",
            Weekday::Thu => "THURSDAY",
            Weekday::Fri => "FRIDAY",
            Weekday::Sat => "SATURDAY",
            Weekday::Sun => "SUNDAY",
        }
    }

    /// Parses an abbreviation or full day name, ignoring case.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::ALL.into_iter().find(|d| {
            s.eq_ignore_ascii_case(d.abbr()) || s.eq_ignore_ascii_case(d.column_name())
        })
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.abbr())
    }
}

/// A time of day with minute resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimeOfDay {
    minutes: u16,
}

impl TimeOfDay {
    /// Last representable minute boundary (24:00).
    pub const END_OF_DAY: TimeOfDay = TimeOfDay { minutes: 24 * 60 };

    /// Creates a time from hour and minute.
    ///
    /// Returns `None` unless `hour < 24` and `minute < 60`, or the
    /// value is exactly 24:00.
    pub fn new(hour: u16, minute: u16) -> Option<Self> {
        if (hour < 24 && minute < 60) || (hour == 24 && minute == 0) {
            Some(Self {
                minutes: hour * 60 + minute,
            })
        } else {
            None
        }
    }

    /// Creates a time from a whole number of hours.
    pub fn hours(hour: u16) -> Option<Self> {
        Self::new(hour, 0)
    }

    /// Minutes since midnight.
    #[inline]
    pub fn minutes(self) -> u16 {
        self.minutes
    }

    /// Fractional hours since midnight (07:15 → 7.25).
    #[inline]
    pub fn as_hours(self) -> f64 {
        f64::from(self.minutes) / 60.0
    }

    /// Whether this time falls on a tick boundary.
    #[inline]
    pub fn is_tick_aligned(self) -> bool {
        self.minutes % MINUTES_PER_TICK == 0
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.minutes / 60, self.minutes % 60)
    }
}

/// A weekly shift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shift {
    /// Stable identifier ("S1").
    pub id: String,
    /// Day the shift takes place.
    pub day: Weekday,
    /// Start time (inclusive).
    pub start: TimeOfDay,
    /// End time (exclusive).
    pub end: TimeOfDay,
    /// Number of people the shift needs, exactly.
    pub required: u32,
}

impl Shift {
    /// Creates a new shift.
    pub fn new(
        id: impl Into<String>,
        day: Weekday,
        start: TimeOfDay,
        end: TimeOfDay,
        required: u32,
    ) -> Self {
        Self {
            id: id.into(),
            day,
            start,
            end,
            required,
        }
    }

    /// Duration in minutes (0 if the shift is malformed).
    #[inline]
    pub fn duration_minutes(&self) -> u16 {
        self.end.minutes().saturating_sub(self.start.minutes())
    }

    /// Duration in quarter-hour ticks, rounded to the nearest tick.
    pub fn duration_ticks(&self) -> i64 {
        let minutes = i64::from(self.duration_minutes());
        let tick = i64::from(MINUTES_PER_TICK);
        (minutes + tick / 2) / tick
    }

    /// Duration in fractional hours.
    pub fn duration_hours(&self) -> f64 {
        f64::from(self.duration_minutes()) / 60.0
    }
}

impl fmt::Display for Shift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} {}-{})", self.id, self.day, self.start, self.end)
    }
}
