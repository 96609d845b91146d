//! Roster formulation.
//!
//! Translates a shift catalog, an availability matrix and a
//! [`RosterConfig`] into a [`CpModel`] that any [`CpSolver`] can solve.
//! The translation is pure and deterministic: identical inputs give an
//! identical model.
//!
//! # Model
//! For shifts `s`, people `p`, days `d` and durations `t(s)` in ticks:
//! - `x[s,p] ∈ {0,1}` for every pair
//! - coverage: `Σ_p x[s,p] = required(s)`
//! - availability: `x[s,p] = 0` if `p` cannot work `s`
//! - weekly cap: `Σ_s t(s)·x[s,p] ≤ cap·4`
//! - optional per-day caps on shift count and ticks
//! - objective: minimize `max_p load(p) - min_p load(p)`
//!
//! # Reference
//! - Ernst et al. (2004), "Staff scheduling and rostering: A review of
//!   applications, methods and models"

mod fairness;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::RosterConfig;
use crate::cp::{CpModel, CpSolution, CpSolver, LinearExpr, SolverConfig, VarId};
use crate::models::{AvailabilityMatrix, ShiftCatalog, TICKS_PER_HOUR};

pub use fairness::FairnessVars;

/// A built roster model: the CP model plus handles to its variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterModel {
    /// The solver-facing model.
    pub model: CpModel,
    /// Assignment variables, indexed `[shift][person]`.
    pub assignment: Vec<Vec<VarId>>,
    /// Fairness variables; `None` when there are no people.
    pub fairness: Option<FairnessVars>,
}

impl RosterModel {
    /// Assignment variable of a (shift, person) pair.
    pub fn assignment_var(&self, shift: usize, person: usize) -> Option<VarId> {
        self.assignment.get(shift)?.get(person).copied()
    }
}

/// Builds a [`RosterModel`] from domain inputs.
///
/// # Example
/// ```
/// use u_roster::config::RosterConfig;
/// use u_roster::formulation::RosterCpBuilder;
/// use u_roster::models::{AvailabilityMatrix, ShiftCatalog};
///
/// let catalog = ShiftCatalog::standard_week();
/// let availability = AvailabilityMatrix::new(catalog.len())
///     .with_person("alice", vec![true; 26])
///     .unwrap();
/// let config = RosterConfig::default();
///
/// let built = RosterCpBuilder::new(&catalog, &availability, &config).build();
/// assert_eq!(built.assignment.len(), 26);
/// ```
pub struct RosterCpBuilder<'a> {
    catalog: &'a ShiftCatalog,
    availability: &'a AvailabilityMatrix,
    config: &'a RosterConfig,
}

impl<'a> RosterCpBuilder<'a> {
    /// Creates a new builder.
    pub fn new(
        catalog: &'a ShiftCatalog,
        availability: &'a AvailabilityMatrix,
        config: &'a RosterConfig,
    ) -> Self {
        Self {
            catalog,
            availability,
            config,
        }
    }

    /// Builds the model.
    ///
    /// Variables and constraints are created in a fixed order: assignment
    /// variables (shift-major), coverage, availability, weekly cap,
    /// per-day shift cap, per-day hour cap, then the fairness objective.
    pub fn build(&self) -> RosterModel {
        let shifts = self.catalog.shifts();
        let people = self.availability.people();
        let names: Vec<&str> = people.iter().map(|p| p.name()).collect();
        let ticks: Vec<i64> = shifts.iter().map(|s| s.duration_ticks()).collect();

        let mut model = CpModel::new("weekly-roster");

        let assignment: Vec<Vec<VarId>> = shifts
            .iter()
            .map(|shift| {
                names
                    .iter()
                    .map(|name| model.new_bool_var(format!("x_{}__{}", shift.id, name)))
                    .collect()
            })
            .collect();

        for (shift, row) in shifts.iter().zip(&assignment) {
            model.add_eq(
                format!("cover {}", shift.id),
                LinearExpr::sum(row.iter().copied()),
                i64::from(shift.required),
            );
        }

        for (s, shift) in shifts.iter().enumerate() {
            for (p, name) in names.iter().enumerate() {
                if !self.availability.is_available(p, s) {
                    model.add_eq(
                        format!("{name} unavailable for {}", shift.id),
                        LinearExpr::sum([assignment[s][p]]),
                        0,
                    );
                }
            }
        }

        let cap_ticks = self.config.weekly_cap_ticks();
        for (p, name) in names.iter().enumerate() {
            let expr = LinearExpr::weighted_sum(
                assignment.iter().zip(&ticks).map(|(row, &t)| (row[p], t)),
            );
            model.add_le(format!("weekly cap for {name}"), expr, cap_ticks);
        }

        let days = self.catalog.days();
        if let Some(max) = self.config.daily_shift_cap() {
            for day in &days {
                let on_day = self.catalog.shifts_on(*day);
                for (p, name) in names.iter().enumerate() {
                    let expr = LinearExpr::sum(on_day.iter().map(|&s| assignment[s][p]));
                    model.add_le(format!("{name} shift cap on {day}"), expr, i64::from(max));
                }
            }
        }
        if let Some(max_hours) = self.config.daily_hour_cap() {
            for day in &days {
                let on_day = self.catalog.shifts_on(*day);
                for (p, name) in names.iter().enumerate() {
                    let expr = LinearExpr::weighted_sum(
                        on_day.iter().map(|&s| (assignment[s][p], ticks[s])),
                    );
                    model.add_le(
                        format!("{name} hour cap on {day}"),
                        expr,
                        i64::from(max_hours) * TICKS_PER_HOUR,
                    );
                }
            }
        }

        let fairness =
            fairness::add_fairness_objective(&mut model, &assignment, &ticks, &names, cap_ticks);

        debug!(
            shifts = shifts.len(),
            people = names.len(),
            variables = model.variable_count(),
            constraints = model.constraint_count(),
            "built roster model"
        );

        RosterModel {
            model,
            assignment,
            fairness,
        }
    }

    /// Builds and solves the model.
    pub fn solve<S: CpSolver>(
        &self,
        solver: &S,
        config: &SolverConfig,
    ) -> (RosterModel, CpSolution) {
        let built = self.build();
        let solution = solver.solve(&built.model, config);
        (built, solution)
    }
}
