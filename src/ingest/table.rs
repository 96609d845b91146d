//! Record and table ingestion.
//!
//! Bad cells never stop ingestion: a cell that fails to parse leaves
//! the person with no availability on that day and produces an
//! [`IngestWarning`]. Only a missing name column is fatal.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::parse::{parse_cell, parse_interval_list, ParseError};
use super::{IngestError, IngestReport, IngestWarning, IngestWarningKind};
use crate::models::{Person, PersonAvailability, WeeklyCalendar, Weekday};

/// Default name column of availability tables.
pub const DEFAULT_NAME_COLUMN: &str = "STUDENT NAME";

/// One person's raw availability: interval strings per weekday.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityRecord {
    /// Raw display name.
    pub name: String,
    /// `"HH:MM:SS - HH:MM:SS"` strings per day.
    pub days: BTreeMap<Weekday, Vec<String>>,
}

impl AvailabilityRecord {
    /// Creates a record with no availability.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            days: BTreeMap::new(),
        }
    }

    /// Sets the interval strings of a day.
    pub fn with_day<S: Into<String>>(
        mut self,
        day: Weekday,
        items: impl IntoIterator<Item = S>,
    ) -> Self {
        self.days
            .insert(day, items.into_iter().map(Into::into).collect());
        self
    }
}

/// Tabular availability: a header row and one row per person.
///
/// `None` cells are missing values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityTable {
    /// Column headers.
    pub columns: Vec<String>,
    /// Rows; shorter rows are padded with missing values.
    pub rows: Vec<Vec<Option<String>>>,
}

impl AvailabilityTable {
    /// Creates a table with the given headers.
    pub fn new<S: Into<String>>(columns: impl IntoIterator<Item = S>) -> Self {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Appends a row.
    pub fn with_row(mut self, row: Vec<Option<&str>>) -> Self {
        self.rows
            .push(row.into_iter().map(|c| c.map(str::to_string)).collect());
        self
    }

    fn column_index(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|c| c.trim().eq_ignore_ascii_case(name))
    }
}

/// Table ingestion options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestOptions {
    /// Header of the column holding display names.
    pub name_column: String,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            name_column: DEFAULT_NAME_COLUMN.to_string(),
        }
    }
}

/// Ingests parsed records.
///
/// Records with a blank name are skipped with a warning.
pub fn ingest_records(records: &[AvailabilityRecord]) -> IngestReport {
    let mut report = IngestReport::default();

    for (row, record) in records.iter().enumerate() {
        let Some(person) = Person::new(&record.name) else {
            report.push_warning(IngestWarning::missing_name(row));
            continue;
        };

        let mut calendar = WeeklyCalendar::new();
        for (&day, items) in &record.days {
            let intervals = degrade(parse_interval_list(items), row, &person, day, &mut report);
            calendar.set_day(day, intervals);
        }
        report.people.push(PersonAvailability::new(person, calendar));
    }

    debug!(people = report.people.len(), warnings = report.warnings.len(), "ingested records");
    report
}

/// Ingests a table with a name column and one column per weekday
/// (`MONDAY` … `SUNDAY`, case-insensitive).
///
/// A missing weekday column means no availability on that day.
///
/// # Errors
/// `IngestError::MissingColumn` if the name column is absent.
pub fn ingest_table(
    table: &AvailabilityTable,
    options: &IngestOptions,
) -> Result<IngestReport, IngestError> {
    let name_idx = table
        .column_index(&options.name_column)
        .ok_or_else(|| IngestError::MissingColumn(options.name_column.clone()))?;
    let day_columns: Vec<(Weekday, usize)> = Weekday::ALL
        .into_iter()
        .filter_map(|d| table.column_index(d.column_name()).map(|i| (d, i)))
        .collect();

    let mut report = IngestReport::default();
    for (row_idx, row) in table.rows.iter().enumerate() {
        let cell = |i: usize| row.get(i).and_then(|c| c.as_deref());

        let Some(person) = cell(name_idx).and_then(Person::new) else {
            report.push_warning(IngestWarning::missing_name(row_idx));
            continue;
        };

        let mut calendar = WeeklyCalendar::new();
        for &(day, col) in &day_columns {
            let Some(raw) = cell(col).filter(|s| !s.trim().is_empty()) else {
                continue;
            };
            let intervals = degrade(parse_cell(raw), row_idx, &person, day, &mut report);
            calendar.set_day(day, intervals);
        }
        report.people.push(PersonAvailability::new(person, calendar));
    }

    debug!(
        rows = table.rows.len(),
        people = report.people.len(),
        warnings = report.warnings.len(),
        "ingested availability table"
    );
    Ok(report)
}

fn degrade(
    parsed: Result<Vec<crate::models::FreeInterval>, ParseError>,
    row: usize,
    person: &Person,
    day: Weekday,
    report: &mut IngestReport,
) -> Vec<crate::models::FreeInterval> {
    match parsed {
        Ok(intervals) => intervals,
        Err(e) => {
            warn!(
                row,
                person = %person,
                day = %day,
                error = %e,
                "malformed availability; treating day as unavailable"
            );
            report.push_warning(IngestWarning {
                kind: IngestWarningKind::MalformedCell,
                row,
                person: Some(person.name().to_string()),
                day: Some(day),
                message: e.to_string(),
            });
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ShiftCatalog, TimeOfDay};

    fn sample_table() -> AvailabilityTable {
        AvailabilityTable::new(["STUDENT NAME", "MONDAY", "TUESDAY", "SATURDAY"])
            .with_row(vec![
                Some("  alice smith "),
                Some("['07:00:00 - 12:00:00']"),
                Some("['07:15:00 - 09:00:00', '15:00:00 - 19:00:00']"),
                None,
            ])
            .with_row(vec![
                Some("BOB"),
                Some("07:00:00 - 12:00:00"), // not a list
                Some("[]"),
                Some("['10:00:00 - 14:00:00']"),
            ])
            .with_row(vec![None, Some("['07:00:00 - 12:00:00']")])
    }

    #[test]
    fn test_ingest_table() {
        let report = ingest_table(&sample_table(), &IngestOptions::default()).unwrap();
        assert_eq!(report.people.len(), 2);
        assert_eq!(report.people[0].person.name(), "Alice Smith");
        assert_eq!(report.people[1].person.name(), "Bob");

        let alice = &report.people[0].calendar;
        assert_eq!(alice.intervals_on(Weekday::Tue).len(), 2);
        assert!(alice.intervals_on(Weekday::Sat).is_empty());
    }

    #[test]
    fn test_malformed_cell_degrades() {
        let report = ingest_table(&sample_table(), &IngestOptions::default()).unwrap();
        let bob = &report.people[1].calendar;
        assert!(bob.intervals_on(Weekday::Mon).is_empty());
        assert_eq!(bob.intervals_on(Weekday::Sat).len(), 1);

        let malformed: Vec<_> = report
            .warnings
            .iter()
            .filter(|w| w.kind == IngestWarningKind::MalformedCell)
            .collect();
        assert_eq!(malformed.len(), 1);
        assert_eq!(malformed[0].person.as_deref(), Some("Bob"));
        assert_eq!(malformed[0].day, Some(Weekday::Mon));
    }

    #[test]
    fn test_missing_name_row_skipped() {
        let report = ingest_table(&sample_table(), &IngestOptions::default()).unwrap();
        assert!(report
            .warnings
            .iter()
            .any(|w| w.kind == IngestWarningKind::MissingName && w.row == 2));
    }

    #[test]
    fn test_missing_name_column_is_fatal() {
        let table = AvailabilityTable::new(["NAME", "MONDAY"]).with_row(vec![Some("alice"), None]);
        let err = ingest_table(&table, &IngestOptions::default()).unwrap_err();
        assert!(matches!(err, IngestError::MissingColumn(ref c) if c == "STUDENT NAME"));
    }

    #[test]
    fn test_custom_name_column() {
        let table = AvailabilityTable::new(["employee", "monday"])
            .with_row(vec![Some("carol"), Some("['09:00:00 - 12:00:00']")]);
        let options = IngestOptions {
            name_column: "EMPLOYEE".into(),
        };
        let report = ingest_table(&table, &options).unwrap();
        assert_eq!(report.people[0].person.name(), "Carol");
        assert!(report.people[0].calendar.covers(
            Weekday::Mon,
            TimeOfDay::hours(9).unwrap(),
            TimeOfDay::hours(12).unwrap()
        ));
    }

    #[test]
    fn test_ingest_records() {
        let records = vec![
            AvailabilityRecord::new("dave").with_day(Weekday::Mon, ["07:15:00 - 09:00:00"]),
            AvailabilityRecord::new("erin").with_day(Weekday::Mon, ["07:15:00 09:00:00"]),
            AvailabilityRecord::new("   "),
        ];
        let report = ingest_records(&records);
        assert_eq!(report.people.len(), 2);
        assert_eq!(report.warnings.len(), 2);

        let matrix = report.into_matrix(&ShiftCatalog::standard_week());
        assert!(matrix.is_available(0, 0)); // Dave, S1
        assert!(!matrix.is_available(1, 0)); // Erin's Monday was malformed
    }

    #[test]
    fn test_table_from_json() {
        let json = r#"{
            "columns": ["STUDENT NAME", "SUNDAY"],
            "rows": [["frank", "['10:00:00 - 14:00:00']"], ["gina", null]]
        }"#;
        let table: AvailabilityTable = serde_json::from_str(json).unwrap();
        let report = ingest_table(&table, &IngestOptions::default()).unwrap();
        assert_eq!(report.people.len(), 2);
        assert!(report.warnings.is_empty());
        assert!(report.people[1].calendar.is_empty());
    }
}
