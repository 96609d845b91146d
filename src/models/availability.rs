//! Availability matrix.
//!
//! The boolean relation (person, shift) → "is available", derived once
//! from each person's weekly calendar and the shift catalog.

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{Person, ShiftCatalog, WeeklyCalendar};
use crate::error::ScheduleError;

/// A person together with their declared free time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonAvailability {
    /// Normalized person.
    pub person: Person,
    /// Declared free intervals per weekday.
    pub calendar: WeeklyCalendar,
}

impl PersonAvailability {
    /// Creates a new entry.
    pub fn new(person: Person, calendar: WeeklyCalendar) -> Self {
        Self { person, calendar }
    }
}

/// Availability of every person for every shift of a catalog.
///
/// Rows are people (in first-seen order), columns are shifts in
/// catalog order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityMatrix {
    shift_count: usize,
    people: Vec<Person>,
    rows: Vec<Vec<bool>>,
}

impl AvailabilityMatrix {
    /// Creates an empty matrix for `shift_count` shifts.
    pub fn new(shift_count: usize) -> Self {
        Self {
            shift_count,
            people: Vec::new(),
            rows: Vec::new(),
        }
    }

    /// Builds the matrix from declared calendars.
    ///
    /// A person is available for a shift iff one of their intervals on
    /// the shift's day fully contains it. Entries whose names normalize
    /// to the same person collapse into one row: the row keeps the
    /// position of the first entry and the availability of the last.
    pub fn build(entries: &[PersonAvailability], catalog: &ShiftCatalog) -> Self {
        let mut matrix = Self::new(catalog.len());
        for entry in entries {
            let flags = catalog
                .shifts()
                .iter()
                .map(|s| entry.calendar.covers_shift(s))
                .collect();
            matrix.upsert(entry.person.clone(), flags);
        }
        matrix
    }

    /// Adds a person row, replacing an existing row for the same person.
    ///
    /// # Errors
    /// `ScheduleError::ShapeMismatch` if `flags` does not have one entry
    /// per shift.
    pub fn push_person(&mut self, person: Person, flags: Vec<bool>) -> Result<(), ScheduleError> {
        if flags.len() != self.shift_count {
            return Err(ScheduleError::ShapeMismatch {
                expected: self.shift_count,
                found: flags.len(),
            });
        }
        self.upsert(person, flags);
        Ok(())
    }

    /// Builder form of [`push_person`](Self::push_person).
    pub fn with_person(mut self, name: &str, flags: Vec<bool>) -> Result<Self, ScheduleError> {
        if let Some(person) = Person::new(name) {
            self.push_person(person, flags)?;
        }
        Ok(self)
    }

    fn upsert(&mut self, person: Person, flags: Vec<bool>) {
        match self.people.iter().position(|p| *p == person) {
            Some(idx) => {
                warn!(
                    person = %person,
                    "duplicate person after name normalization; keeping latest availability"
                );
                self.rows[idx] = flags;
            }
            None => {
                self.people.push(person);
                self.rows.push(flags);
            }
        }
    }

    /// People in row order.
    pub fn people(&self) -> &[Person] {
        &self.people
    }

    /// Number of people.
    pub fn person_count(&self) -> usize {
        self.people.len()
    }

    /// Number of shifts (columns).
    pub fn shift_count(&self) -> usize {
        self.shift_count
    }

    /// Row index of a person by (raw or normalized) name.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        let person = Person::new(name)?;
        self.people.iter().position(|p| *p == person)
    }

    /// Whether person `p` is available for shift `s` (indices).
    ///
    /// Out-of-range indices are unavailable.
    #[inline]
    pub fn is_available(&self, p: usize, s: usize) -> bool {
        self.rows
            .get(p)
            .and_then(|row| row.get(s))
            .copied()
            .unwrap_or(false)
    }

    /// Number of people available for shift `s`.
    pub fn available_count(&self, s: usize) -> usize {
        (0..self.people.len())
            .filter(|&p| self.is_available(p, s))
            .count()
    }

    /// Number of shifts person `p` is available for.
    pub fn shifts_available(&self, p: usize) -> usize {
        self.rows
            .get(p)
            .map(|row| row.iter().filter(|&&a| a).count())
            .unwrap_or(0)
    }
}
