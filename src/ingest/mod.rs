//! Availability ingestion.
//!
//! Turns declared free time (parsed records or a raw table whose cells
//! hold serialized interval lists) into [`PersonAvailability`] entries,
//! collecting recoverable problems as [`IngestWarning`]s instead of
//! failing.
//!
//! # Cell Format
//! ```text
//! ['07:15:00 - 09:00:00', '12:00:00 - 15:00:00']
//! ```
//! A cell that does not parse as a whole is treated as "no availability
//! that day".

mod parse;
mod table;

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{AvailabilityMatrix, PersonAvailability, ShiftCatalog, Weekday};

pub use parse::{
    parse_cell, parse_interval, parse_interval_list, parse_time_of_day, split_list_literal,
    ParseError,
};
pub use table::{
    ingest_records, ingest_table, AvailabilityRecord, AvailabilityTable, IngestOptions,
    DEFAULT_NAME_COLUMN,
};

/// Fatal ingestion errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IngestError {
    /// The table has no column with the configured name header.
    #[error("availability table has no '{0}' column")]
    MissingColumn(String),
}

/// Category of a recoverable ingestion problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IngestWarningKind {
    /// A day cell could not be parsed; the day was left empty.
    MalformedCell,
    /// A row has no usable name; the row was skipped.
    MissingName,
}

/// A recoverable ingestion problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestWarning {
    /// Problem category.
    pub kind: IngestWarningKind,
    /// Zero-based input row.
    pub row: usize,
    /// Normalized person name, when known.
    pub person: Option<String>,
    /// Affected day, for cell problems.
    pub day: Option<Weekday>,
    /// Human-readable detail.
    pub message: String,
}

impl IngestWarning {
    pub(crate) fn missing_name(row: usize) -> Self {
        Self {
            kind: IngestWarningKind::MissingName,
            row,
            person: None,
            day: None,
            message: format!("row {row} has no name; skipped"),
        }
    }
}

impl fmt::Display for IngestWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.person, self.day) {
            (Some(p), Some(d)) => write!(f, "row {} ({p}, {d}): {}", self.row, self.message),
            (Some(p), None) => write!(f, "row {} ({p}): {}", self.row, self.message),
            _ => write!(f, "row {}: {}", self.row, self.message),
        }
    }
}

/// Output of ingestion: one entry per named row, plus warnings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestReport {
    /// People in input order (duplicates not yet collapsed).
    pub people: Vec<PersonAvailability>,
    /// Recoverable problems.
    pub warnings: Vec<IngestWarning>,
}

impl IngestReport {
    pub(crate) fn push_warning(&mut self, warning: IngestWarning) {
        self.warnings.push(warning);
    }

    /// Whether any problem was recorded.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Derives the availability matrix against a catalog.
    pub fn into_matrix(self, catalog: &ShiftCatalog) -> AvailabilityMatrix {
        AvailabilityMatrix::build(&self.people, catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warning_display() {
        let w = IngestWarning {
            kind: IngestWarningKind::MalformedCell,
            row: 3,
            person: Some("Alice".into()),
            day: Some(Weekday::Tue),
            message: "bad".into(),
        };
        assert_eq!(w.to_string(), "row 3 (Alice, Tue): bad");
        assert_eq!(IngestWarning::missing_name(1).to_string(), "row 1: row 1 has no name; skipped");
    }

    #[test]
    fn test_duplicates_collapse_in_matrix() {
        let records = vec![
            AvailabilityRecord::new("alice").with_day(Weekday::Mon, ["07:00:00 - 12:00:00"]),
            AvailabilityRecord::new("ALICE").with_day(Weekday::Sun, ["10:00:00 - 14:00:00"]),
        ];
        let report = ingest_records(&records);
        assert_eq!(report.people.len(), 2);
        assert!(!report.has_warnings());

        let catalog = ShiftCatalog::standard_week();
        let matrix = report.into_matrix(&catalog);
        assert_eq!(matrix.person_count(), 1);
        assert!(!matrix.is_available(0, 0));
        assert!(matrix.is_available(0, catalog.index_of("S26").unwrap()));
    }
}
