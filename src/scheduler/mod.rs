//! Weekly scheduling entry point, result reporting and KPI evaluation.
//!
//! # Flow
//!
//! 1. Validate the shift catalog (fatal on error)
//! 2. Check the availability matrix matches the catalog
//! 3. Log feasibility diagnostics
//! 4. Build the roster model
//! 5. Solve within the configured time budget
//! 6. Extract and verify the report
//!
//! Solver outcomes without a roster (infeasible, time limit) are
//! returned as [`ScheduleOutcome::NoSchedule`], not as errors.
//!
//! # References
//!
//! - Ernst et al. (2004), "Staff scheduling and rostering: A review"
//! - Van den Bergh et al. (2013), "Personnel scheduling: A literature review"

mod kpi;
mod report;
#[cfg(test)]
mod scenarios;

pub use kpi::RosterKpi;
pub use report::{PersonLoad, RosterReport, ShiftRoster};

use tracing::{info, warn};

use crate::config::RosterConfig;
use crate::cp::{CpSolver, LpSolver, SolveStatus, SolverConfig};
use crate::error::ScheduleError;
use crate::formulation::RosterCpBuilder;
use crate::models::{AvailabilityMatrix, ShiftCatalog};
use crate::validation::{diagnose, validate_catalog, ValidationError};

/// Result of scheduling one week.
#[derive(Debug, Clone, PartialEq)]
pub enum ScheduleOutcome {
    /// A roster satisfying every hard constraint.
    Solved(RosterReport),
    /// No roster: the constraints are infeasible or the budget ran out first.
    NoSchedule {
        /// Terminal solver status.
        status: SolveStatus,
        /// Diagnostics found before solving, possibly explaining the failure.
        diagnostics: Vec<ValidationError>,
    },
}

impl ScheduleOutcome {
    /// Terminal solver status.
    pub fn status(&self) -> SolveStatus {
        match self {
            ScheduleOutcome::Solved(report) => report.status,
            ScheduleOutcome::NoSchedule { status, .. } => *status,
        }
    }

    /// The report, if a roster was found.
    pub fn report(&self) -> Option<&RosterReport> {
        match self {
            ScheduleOutcome::Solved(report) => Some(report),
            ScheduleOutcome::NoSchedule { .. } => None,
        }
    }

    /// Whether a roster was found.
    pub fn is_solved(&self) -> bool {
        matches!(self, ScheduleOutcome::Solved(_))
    }
}

/// Weekly scheduler over an injected solver.
///
/// Holds no state besides the solver, so one scheduler can serve any
/// number of independent weeks.
///
/// # Example
/// ```
/// use u_roster::config::RosterConfig;
/// use u_roster::cp::LpSolver;
/// use u_roster::models::{AvailabilityMatrix, Shift, ShiftCatalog, TimeOfDay, Weekday};
/// use u_roster::scheduler::WeeklyScheduler;
///
/// let catalog = ShiftCatalog::new(vec![Shift::new(
///     "S1",
///     Weekday::Mon,
///     TimeOfDay::hours(9).unwrap(),
///     TimeOfDay::hours(12).unwrap(),
///     1,
/// )]);
/// let availability = AvailabilityMatrix::new(1)
///     .with_person("alice", vec![true])
///     .unwrap();
///
/// let scheduler = WeeklyScheduler::new(LpSolver::new());
/// let outcome = scheduler
///     .solve_week(&catalog, &availability, &RosterConfig::default())
///     .unwrap();
/// assert!(outcome.is_solved());
/// ```
#[derive(Debug, Clone, Default)]
pub struct WeeklyScheduler<S> {
    solver: S,
}

impl<S: CpSolver> WeeklyScheduler<S> {
    /// Creates a scheduler using `solver`.
    pub fn new(solver: S) -> Self {
        Self { solver }
    }

    /// The underlying solver.
    pub fn solver(&self) -> &S {
        &self.solver
    }

    /// Schedules one week.
    ///
    /// # Errors
    /// - `ScheduleError::InvalidCatalog` if the catalog fails validation
    /// - `ScheduleError::ShapeMismatch` if the matrix was built for another catalog
    /// - `ScheduleError::InconsistentSolution` if the solver returns values
    ///   that break a hard constraint
    pub fn solve_week(
        &self,
        catalog: &ShiftCatalog,
        availability: &AvailabilityMatrix,
        config: &RosterConfig,
    ) -> Result<ScheduleOutcome, ScheduleError> {
        validate_catalog(catalog).map_err(ScheduleError::InvalidCatalog)?;
        if availability.shift_count() != catalog.len() {
            return Err(ScheduleError::ShapeMismatch {
                expected: catalog.len(),
                found: availability.shift_count(),
            });
        }

        let diagnostics = diagnose(catalog, availability, config);
        for d in &diagnostics {
            warn!(kind = ?d.kind, "{}", d.message);
        }

        info!(
            event = "schedule_week",
            solver = self.solver.name(),
            shifts = catalog.len(),
            people = availability.person_count(),
            weekly_hour_cap = config.weekly_hour_cap,
        );

        let builder = RosterCpBuilder::new(catalog, availability, config);
        let (built, solution) = builder.solve(
            &self.solver,
            &SolverConfig::with_time_limit(config.time_limit()),
        );

        if !solution.is_solution_found() {
            info!(event = "no_schedule", status = %solution.status);
            return Ok(ScheduleOutcome::NoSchedule {
                status: solution.status,
                diagnostics,
            });
        }

        let report = report::build_report(catalog, availability, config, &built, &solution)?;
        if report.may_not_be_optimal() {
            warn!(
                gap_hours = report.fairness_gap_hours(),
                "time limit reached; roster may not be fairness-optimal"
            );
        }
        Ok(ScheduleOutcome::Solved(report))
    }
}

/// Schedules one week with the default [`LpSolver`].
///
/// # Errors
/// See [`WeeklyScheduler::solve_week`].
pub fn solve_week(
    catalog: &ShiftCatalog,
    availability: &AvailabilityMatrix,
    config: &RosterConfig,
) -> Result<ScheduleOutcome, ScheduleError> {
    WeeklyScheduler::new(LpSolver::new()).solve_week(catalog, availability, config)
}
