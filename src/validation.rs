//! Input validation for weekly rostering.
//!
//! Two levels:
//! - [`validate_catalog`]: structural errors in the shift catalog
//!   (duplicate IDs, empty shifts, zero headcount, times off the
//!   quarter-hour grid). These stop a solve.
//! - [`diagnose`]: cheap necessary conditions for feasibility (enough
//!   available people per shift, enough total capacity). These are
//!   reported but never stop a solve; the solver has the final word.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::RosterConfig;
use crate::models::{AvailabilityMatrix, ShiftCatalog, TICKS_PER_HOUR};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationErrorKind {
    /// Two shifts share the same ID.
    DuplicateId,
    /// A shift does not end after it starts.
    NonPositiveDuration,
    /// A shift requires nobody.
    ZeroHeadcount,
    /// A shift boundary is not on the quarter-hour grid.
    MisalignedTime,
    /// Fewer people are available for a shift than it requires.
    UnderstaffedShift,
    /// A single shift is longer than the weekly cap.
    ShiftExceedsCap,
    /// Total demand exceeds what all people together may work.
    CapacityShortfall,
}

impl ValidationError {
    /// Creates a new error.
    pub fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Validates the structure of a shift catalog.
///
/// Checks:
/// 1. No duplicate shift IDs
/// 2. Every shift ends after it starts
/// 3. Every shift requires at least one person
/// 4. Start and end fall on quarter-hour boundaries
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_catalog(catalog: &ShiftCatalog) -> ValidationResult {
    let mut errors = Vec::new();
    let mut ids = HashSet::new();

    for shift in catalog.shifts() {
        if !ids.insert(shift.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate shift ID: {}", shift.id),
            ));
        }

        if shift.end <= shift.start {
            errors.push(ValidationError::new(
                ValidationErrorKind::NonPositiveDuration,
                format!(
                    "Shift '{}' ends at {} before it starts at {}",
                    shift.id, shift.end, shift.start
                ),
            ));
        }

        if shift.required == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::ZeroHeadcount,
                format!("Shift '{}' requires nobody", shift.id),
            ));
        }

        if !shift.start.is_tick_aligned() || !shift.end.is_tick_aligned() {
            errors.push(ValidationError::new(
                ValidationErrorKind::MisalignedTime,
                format!("Shift '{}' is not on the quarter-hour grid", shift.id),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Finds obvious reasons a week cannot be staffed.
///
/// An empty result does not imply feasibility.
pub fn diagnose(
    catalog: &ShiftCatalog,
    availability: &AvailabilityMatrix,
    config: &RosterConfig,
) -> Vec<ValidationError> {
    let mut findings = Vec::new();
    let cap_ticks = config.weekly_cap_ticks();

    for (s, shift) in catalog.shifts().iter().enumerate() {
        let available = availability.available_count(s);
        if available < shift.required as usize {
            findings.push(ValidationError::new(
                ValidationErrorKind::UnderstaffedShift,
                format!(
                    "Shift '{}' needs {} people but only {} are available",
                    shift.id, shift.required, available
                ),
            ));
        }
        if shift.duration_ticks() > cap_ticks {
            findings.push(ValidationError::new(
                ValidationErrorKind::ShiftExceedsCap,
                format!(
                    "Shift '{}' lasts {:.2} h, more than the {} h weekly cap",
                    shift.id,
                    shift.duration_hours(),
                    config.weekly_hour_cap
                ),
            ));
        }
    }

    let demand = catalog.total_demand_ticks();
    let capacity = availability.person_count() as i64 * cap_ticks;
    if demand > capacity {
        findings.push(ValidationError::new(
            ValidationErrorKind::CapacityShortfall,
            format!(
                "Week needs {:.2} person-hours but {} people at {} h can cover {:.2}",
                demand as f64 / TICKS_PER_HOUR as f64,
                availability.person_count(),
                config.weekly_hour_cap,
                capacity as f64 / TICKS_PER_HOUR as f64
            ),
        ));
    }

    findings
}
