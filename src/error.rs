//! Crate-level error type.
//!
//! Solver outcomes (infeasible, time limit) are not errors; they are
//! reported through [`ScheduleOutcome`](crate::scheduler::ScheduleOutcome).

use thiserror::Error;

use crate::validation::ValidationError;

/// Errors that stop a scheduling run.
#[derive(Debug, Error)]
pub enum ScheduleError {
    /// The shift catalog failed validation.
    #[error("invalid shift catalog: {}", join_messages(.0))]
    InvalidCatalog(Vec<ValidationError>),

    /// Availability rows do not match the number of shifts.
    #[error("availability covers {found} shifts but the catalog has {expected}")]
    ShapeMismatch { expected: usize, found: usize },

    /// A reported solution broke a hard constraint.
    #[error("solver returned an inconsistent solution: {0}")]
    InconsistentSolution(String),
}

fn join_messages(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}
