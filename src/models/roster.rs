//! Roster (solution) model.
//!
//! A roster is the solved mapping from shifts to the people working
//! them. It is produced as a whole from one solver solution and never
//! edited piecemeal.

use serde::{Deserialize, Serialize};

/// A person-to-shift assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    /// Assigned shift ID.
    pub shift_id: String,
    /// Assigned person (normalized name).
    pub person: String,
    /// Duration of the shift in quarter-hour ticks (denormalized).
    pub ticks: i64,
}

/// A complete weekly roster.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roster {
    /// Assignments, in catalog order then person order.
    pub entries: Vec<RosterEntry>,
}

impl RosterEntry {
    /// Creates a new assignment.
    pub fn new(shift_id: impl Into<String>, person: impl Into<String>, ticks: i64) -> Self {
        Self {
            shift_id: shift_id.into(),
            person: person.into(),
            ticks,
        }
    }
}

impl Roster {
    /// Creates an empty roster.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an assignment.
    pub fn add_entry(&mut self, entry: RosterEntry) {
        self.entries.push(entry);
    }

    /// People assigned to a shift.
    pub fn people_on(&self, shift_id: &str) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|e| e.shift_id == shift_id)
            .map(|e| e.person.as_str())
            .collect()
    }

    /// Shifts assigned to a person.
    pub fn shifts_for(&self, person: &str) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|e| e.person == person)
            .map(|e| e.shift_id.as_str())
            .collect()
    }

    /// Whether a person works a shift.
    pub fn is_assigned(&self, shift_id: &str, person: &str) -> bool {
        self.entries
            .iter()
            .any(|e| e.shift_id == shift_id && e.person == person)
    }

    /// Total ticks assigned to a person.
    pub fn ticks_for(&self, person: &str) -> i64 {
        self.entries
            .iter()
            .filter(|e| e.person == person)
            .map(|e| e.ticks)
            .sum()
    }

    /// Number of assignments.
    pub fn assignment_count(&self) -> usize {
        self.entries.len()
    }
}
