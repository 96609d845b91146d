//! Weekly shift catalog.
//!
//! The catalog is the fixed, ordered grid of shifts solved for one week.
//! It is constructed once by the caller and only read afterwards.

use serde::{Deserialize, Serialize};

use super::{Shift, TimeOfDay, Weekday};

/// An ordered list of weekly shifts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShiftCatalog {
    shifts: Vec<Shift>,
}

impl ShiftCatalog {
    /// Creates a catalog from shifts, preserving their order.
    pub fn new(shifts: Vec<Shift>) -> Self {
        Self { shifts }
    }

    /// The standard 26-shift week.
    ///
    /// Monday to Thursday run five shifts (07:15, 09:00, 12:00, 15:00,
    /// 17:00), Friday has no evening shift, and the weekend has a
    /// single 10:00-14:00 shift per day.
    pub fn standard_week() -> Self {
        // (start h, start m, end h, required)
        const WEEKDAY_SLOTS: [(u16, u16, u16, u32); 5] = [
            (7, 15, 9, 3),
            (9, 0, 12, 4),
            (12, 0, 15, 4),
            (15, 0, 17, 4),
            (17, 0, 19, 3),
        ];

        let mut shifts = Vec::with_capacity(26);
        let mut push = |day: Weekday, sh: u16, sm: u16, eh: u16, required: u32| {
            let id = format!("S{}", shifts.len() + 1);
            let start = TimeOfDay::new(sh, sm).unwrap_or(TimeOfDay::END_OF_DAY);
            let end = TimeOfDay::hours(eh).unwrap_or(TimeOfDay::END_OF_DAY);
            shifts.push(Shift::new(id, day, start, end, required));
        };

        for day in [Weekday::Mon, Weekday::Tue, Weekday::Wed, Weekday::Thu] {
            for (sh, sm, eh, req) in WEEKDAY_SLOTS {
                push(day, sh, sm, eh, req);
            }
        }
        for (sh, sm, eh, req) in &WEEKDAY_SLOTS[..4] {
            push(Weekday::Fri, *sh, *sm, *eh, *req);
        }
        push(Weekday::Sat, 10, 0, 14, 2);
        push(Weekday::Sun, 10, 0, 14, 2);

        Self { shifts }
    }

    /// Adds a shift to the end of the catalog.
    pub fn with_shift(mut self, shift: Shift) -> Self {
        self.shifts.push(shift);
        self
    }

    /// All shifts in catalog order.
    pub fn shifts(&self) -> &[Shift] {
        &self.shifts
    }

    /// Number of shifts.
    pub fn len(&self) -> usize {
        self.shifts.len()
    }

    /// Whether the catalog has no shifts.
    pub fn is_empty(&self) -> bool {
        self.shifts.is_empty()
    }

    /// Finds a shift by ID.
    pub fn get(&self, id: &str) -> Option<&Shift> {
        self.shifts.iter().find(|s| s.id == id)
    }

    /// Position of a shift in catalog order.
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.shifts.iter().position(|s| s.id == id)
    }

    /// Days that have at least one shift, in week order.
    pub fn days(&self) -> Vec<Weekday> {
        let mut days: Vec<Weekday> = self.shifts.iter().map(|s| s.day).collect();
        days.sort();
        days.dedup();
        days
    }

    /// Catalog indices of the shifts on `day`.
    pub fn shifts_on(&self, day: Weekday) -> Vec<usize> {
        self.shifts
            .iter()
            .enumerate()
            .filter(|(_, s)| s.day == day)
            .map(|(i, _)| i)
            .collect()
    }

    /// Total person-ticks the week needs: Σ required × duration.
    pub fn total_demand_ticks(&self) -> i64 {
        self.shifts
            .iter()
            .map(|s| i64::from(s.required) * s.duration_ticks())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_week_shape() {
        let catalog = ShiftCatalog::standard_week();
        assert_eq!(catalog.len(), 26);
        assert_eq!(catalog.shifts()[0].id, "S1");
        assert_eq!(catalog.shifts()[25].id, "S26");
        assert_eq!(catalog.shifts_on(Weekday::Mon).len(), 5);
        assert_eq!(catalog.shifts_on(Weekday::Fri).len(), 4);
        assert_eq!(catalog.shifts_on(Weekday::Sat).len(), 1);
        assert_eq!(catalog.days().len(), 7);
    }

    #[test]
    fn test_standard_week_values() {
        let catalog = ShiftCatalog::standard_week();
        let s1 = catalog.get("S1").unwrap();
        assert_eq!(s1.day, Weekday::Mon);
        assert!((s1.start.as_hours() - 7.25).abs() < 1e-12);
        assert_eq!(s1.required, 3);

        let s24 = catalog.get("S24").unwrap();
        assert_eq!(s24.day, Weekday::Fri);
        assert_eq!(s24.end, TimeOfDay::hours(17).unwrap());

        let s26 = catalog.get("S26").unwrap();
        assert_eq!(s26.day, Weekday::Sun);
        assert_eq!(s26.duration_ticks(), 16);
    }

    #[test]
    fn test_total_demand() {
        // Mon-Thu: 3*7 + 4*12 + 4*12 + 4*8 + 3*8 = 173 ticks/day
        // Fri: 149, weekend: 2 * 2 * 16 = 64
        let catalog = ShiftCatalog::standard_week();
        assert_eq!(catalog.total_demand_ticks(), 173 * 4 + 149 + 64);
    }

    #[test]
    fn test_index_of() {
        let catalog = ShiftCatalog::standard_week();
        assert_eq!(catalog.index_of("S3"), Some(2));
        assert_eq!(catalog.index_of("S99"), None);
    }
}
