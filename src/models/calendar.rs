//! Free-time intervals and weekly availability calendars.
//!
//! A person declares, for each weekday, a list of intervals during which
//! they are free. Intervals are half-open [start, end).
//!
//! # Coverage
//! A shift is covered iff a single declared interval on the shift's day
//! contains the whole shift. Two adjacent intervals that together span
//! the shift do not cover it.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{Shift, TimeOfDay, Weekday};

/// A free-time interval [start, end).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreeInterval {
    /// Interval start (inclusive).
    pub start: TimeOfDay,
    /// Interval end (exclusive).
    pub end: TimeOfDay,
}

impl FreeInterval {
    /// Creates a new interval.
    pub fn new(start: TimeOfDay, end: TimeOfDay) -> Self {
        Self { start, end }
    }

    /// Interval bounds as fractional hours.
    pub fn as_hours(&self) -> (f64, f64) {
        (self.start.as_hours(), self.end.as_hours())
    }

    /// Whether [start, end) lies entirely inside this interval.
    #[inline]
    pub fn contains_range(&self, start: TimeOfDay, end: TimeOfDay) -> bool {
        self.start <= start && end <= self.end
    }
}

/// Free intervals per weekday for one person.
///
/// Days with no entry have no availability.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyCalendar {
    days: BTreeMap<Weekday, Vec<FreeInterval>>,
}

impl WeeklyCalendar {
    /// Creates an empty calendar (never available).
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a free interval on a day.
    pub fn with_interval(mut self, day: Weekday, interval: FreeInterval) -> Self {
        self.add_interval(day, interval);
        self
    }

    /// Adds a free interval on a day.
    pub fn add_interval(&mut self, day: Weekday, interval: FreeInterval) {
        self.days.entry(day).or_default().push(interval);
    }

    /// Replaces the intervals of a day.
    pub fn set_day(&mut self, day: Weekday, intervals: Vec<FreeInterval>) {
        if intervals.is_empty() {
            self.days.remove(&day);
        } else {
            self.days.insert(day, intervals);
        }
    }

    /// Intervals declared for a day.
    pub fn intervals_on(&self, day: Weekday) -> &[FreeInterval] {
        self.days.get(&day).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether any interval is declared at all.
    pub fn is_empty(&self) -> bool {
        self.days.values().all(Vec::is_empty)
    }

    /// Whether a single declared interval on `day` contains [start, end).
    pub fn covers(&self, day: Weekday, start: TimeOfDay, end: TimeOfDay) -> bool {
        self.intervals_on(day)
            .iter()
            .any(|w| w.contains_range(start, end))
    }

    /// Whether the calendar covers a shift.
    pub fn covers_shift(&self, shift: &Shift) -> bool {
        self.covers(shift.day, shift.start, shift.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u16, m: u16) -> TimeOfDay {
        TimeOfDay::new(h, m).unwrap()
    }

    fn iv(sh: u16, sm: u16, eh: u16, em: u16) -> FreeInterval {
        FreeInterval::new(t(sh, sm), t(eh, em))
    }

    #[test]
    fn test_contains_range() {
        let w = iv(7, 0, 12, 0);
        assert!(w.contains_range(t(7, 15), t(9, 0)));
        assert!(w.contains_range(t(7, 0), t(12, 0))); // exact fit
        assert!(!w.contains_range(t(6, 45), t(9, 0)));
        assert!(!w.contains_range(t(11, 0), t(12, 15)));
    }

    #[test]
    fn test_partial_coverage_fails() {
        let cal = WeeklyCalendar::new().with_interval(Weekday::Mon, iv(7, 30, 9, 0));
        assert!(!cal.covers(Weekday::Mon, t(7, 15), t(9, 0)));
    }

    #[test]
    fn test_split_coverage_fails() {
        let cal = WeeklyCalendar::new()
            .with_interval(Weekday::Mon, iv(7, 0, 8, 0))
            .with_interval(Weekday::Mon, iv(8, 0, 9, 0));
        assert!(!cal.covers(Weekday::Mon, t(7, 15), t(9, 0)));
        assert!(cal.covers(Weekday::Mon, t(8, 0), t(9, 0)));
    }

    #[test]
    fn test_other_day_does_not_cover() {
        let cal = WeeklyCalendar::new().with_interval(Weekday::Tue, iv(0, 0, 24, 0));
        assert!(!cal.covers(Weekday::Mon, t(9, 0), t(12, 0)));
        assert!(cal.covers(Weekday::Tue, t(9, 0), t(12, 0)));
    }

    #[test]
    fn test_set_day_empty_clears() {
        let mut cal = WeeklyCalendar::new().with_interval(Weekday::Mon, iv(7, 0, 9, 0));
        assert!(!cal.is_empty());
        cal.set_day(Weekday::Mon, Vec::new());
        assert!(cal.is_empty());
        assert!(cal.intervals_on(Weekday::Mon).is_empty());
    }
}
