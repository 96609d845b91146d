//! Roster report extraction.
//!
//! Reads a solver solution back into domain terms and re-checks every
//! hard constraint on the way. A solver is trusted to return feasible
//! values, but a report is never produced from values that break one.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::RosterConfig;
use crate::cp::{CpSolution, SolveStats, SolveStatus, VarId};
use crate::error::ScheduleError;
use crate::formulation::RosterModel;
use crate::models::{
    AvailabilityMatrix, Roster, RosterEntry, ShiftCatalog, TimeOfDay, Weekday, TICKS_PER_HOUR,
};

/// People assigned to one shift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftRoster {
    /// Shift ID.
    pub shift_id: String,
    /// Day of the shift.
    pub day: Weekday,
    /// Start time.
    pub start: TimeOfDay,
    /// End time.
    pub end: TimeOfDay,
    /// Required headcount.
    pub required: u32,
    /// Assigned people, in person order.
    pub assigned: Vec<String>,
}

/// Weekly load of one person.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonLoad {
    /// Normalized name.
    pub person: String,
    /// Load in quarter-hour ticks.
    pub ticks: i64,
    /// Load in hours (`ticks / 4`).
    pub hours: f64,
    /// Number of shifts worked.
    pub shifts: usize,
}

/// A solved week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterReport {
    /// Solver status: `Optimal` or `Feasible`.
    pub status: SolveStatus,
    /// Flat assignment list.
    pub roster: Roster,
    /// Per-shift view, in catalog order.
    pub shifts: Vec<ShiftRoster>,
    /// Per-person loads, in person order. People with no shifts are included.
    pub loads: Vec<PersonLoad>,
    /// Largest load in ticks.
    pub max_load_ticks: i64,
    /// Smallest load in ticks.
    pub min_load_ticks: i64,
    /// `max_load_ticks - min_load_ticks`.
    pub fairness_gap_ticks: i64,
    /// Search statistics of the solve.
    pub stats: SolveStats,
}

impl RosterReport {
    /// Whether the fairness gap is proven minimal.
    pub fn is_optimal(&self) -> bool {
        self.status == SolveStatus::Optimal
    }

    /// Whether the solver stopped on its budget before proving optimality.
    ///
    /// The roster is still valid; only its fairness may be improvable.
    pub fn may_not_be_optimal(&self) -> bool {
        !self.is_optimal()
    }

    /// Fairness gap in hours.
    pub fn fairness_gap_hours(&self) -> f64 {
        ticks_to_hours(self.fairness_gap_ticks)
    }

    /// Load of a person by normalized name.
    pub fn load_for(&self, person: &str) -> Option<&PersonLoad> {
        self.loads.iter().find(|l| l.person == person)
    }

    /// Hours of a person by normalized name (0 if unknown).
    pub fn hours_for(&self, person: &str) -> f64 {
        self.load_for(person).map_or(0.0, |l| l.hours)
    }

    /// Total assigned hours.
    pub fn total_hours(&self) -> f64 {
        ticks_to_hours(self.loads.iter().map(|l| l.ticks).sum())
    }
}

impl fmt::Display for RosterReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Roster ({})", self.status)?;
        for s in &self.shifts {
            writeln!(
                f,
                "  {} {} {}-{} [{}/{}]: {}",
                s.shift_id,
                s.day,
                s.start,
                s.end,
                s.assigned.len(),
                s.required,
                s.assigned.join(", ")
            )?;
        }
        writeln!(f, "Hours")?;
        for l in &self.loads {
            writeln!(f, "  {}: {:.2} h ({} shifts)", l.person, l.hours, l.shifts)?;
        }
        write!(f, "Fairness gap: {:.2} h", self.fairness_gap_hours())?;
        if self.may_not_be_optimal() {
            write!(f, " (may not be optimal)")?;
        }
        Ok(())
    }
}

fn ticks_to_hours(ticks: i64) -> f64 {
    ticks as f64 / TICKS_PER_HOUR as f64
}

fn inconsistent(message: String) -> ScheduleError {
    ScheduleError::InconsistentSolution(message)
}

/// Extracts a report from a solution, verifying every hard constraint.
///
/// # Errors
/// `ScheduleError::InconsistentSolution` if the solution has no values,
/// has a value count other than the model's variable count, or breaks
/// headcount, availability, a cap, or the load bookkeeping.
pub(crate) fn build_report(
    catalog: &ShiftCatalog,
    availability: &AvailabilityMatrix,
    config: &RosterConfig,
    built: &RosterModel,
    solution: &CpSolution,
) -> Result<RosterReport, ScheduleError> {
    if !solution.is_solution_found() {
        return Err(inconsistent(format!("status {} carries no values", solution.status)));
    }
    let expected = built.model.variable_count();
    if solution.values.len() != expected {
        let found = solution.values.len();
        return Err(inconsistent(format!("{found} values for {expected} variables")));
    }

    let people = availability.people();
    let value = |var: VarId| {
        solution
            .value(var)
            .ok_or_else(|| inconsistent(format!("no value for variable {}", var.index())))
    };

    let mut roster = Roster::new();
    let mut shifts = Vec::with_capacity(catalog.len());
    let mut ticks = vec![0i64; people.len()];
    let mut counts = vec![0usize; people.len()];
    // [person][day] -> (shifts, ticks)
    let mut daily = vec![[(0u32, 0i64); 7]; people.len()];

    for (s, shift) in catalog.shifts().iter().enumerate() {
        let row = built
            .assignment
            .get(s)
            .ok_or_else(|| inconsistent(format!("no variables for shift {}", shift.id)))?;

        let mut assigned = Vec::new();
        for (p, person) in people.iter().enumerate() {
            let var = *row
                .get(p)
                .ok_or_else(|| inconsistent(format!("no variable for {person} on {}", shift.id)))?;
            if value(var)? != 1 {
                continue;
            }
            if !availability.is_available(p, s) {
                let msg = format!("{person} assigned to {} while unavailable", shift.id);
                return Err(inconsistent(msg));
            }
            let t = shift.duration_ticks();
            ticks[p] += t;
            counts[p] += 1;
            let day = &mut daily[p][shift.day as usize];
            day.0 += 1;
            day.1 += t;
            assigned.push(person.name().to_string());
            roster.add_entry(RosterEntry::new(&shift.id, person.name(), t));
        }

        if assigned.len() != shift.required as usize {
            return Err(inconsistent(format!(
                "shift {} has {} people, needs {}",
                shift.id,
                assigned.len(),
                shift.required
            )));
        }

        shifts.push(ShiftRoster {
            shift_id: shift.id.clone(),
            day: shift.day,
            start: shift.start,
            end: shift.end,
            required: shift.required,
            assigned,
        });
    }

    let cap = config.weekly_cap_ticks();
    for (p, person) in people.iter().enumerate() {
        if ticks[p] > cap {
            let msg = format!("{person} works {} ticks over the cap of {cap}", ticks[p]);
            return Err(inconsistent(msg));
        }
        for (d, &(n, t)) in daily[p].iter().enumerate() {
            let over_count = config.daily_shift_cap().is_some_and(|max| n > max);
            let over_hours = config
                .daily_hour_cap()
                .is_some_and(|max| t > i64::from(max) * TICKS_PER_HOUR);
            if over_count || over_hours {
                let msg = format!("{person} exceeds a daily cap on {}", Weekday::ALL[d]);
                return Err(inconsistent(msg));
            }
        }
    }

    let max_load_ticks = ticks.iter().copied().max().unwrap_or(0);
    let min_load_ticks = ticks.iter().copied().min().unwrap_or(0);

    if let Some(fair) = &built.fairness {
        for (p, &load) in fair.loads.iter().enumerate() {
            if value(load)? != ticks[p] {
                return Err(inconsistent(format!(
                    "load of {} is {} but shifts sum to {}",
                    people[p],
                    value(load)?,
                    ticks[p]
                )));
            }
        }
        if value(fair.max_load)? != max_load_ticks || value(fair.min_load)? != min_load_ticks {
            return Err(inconsistent("max/min load disagree with per-person loads".to_string()));
        }
    }

    let loads = people
        .iter()
        .zip(ticks.iter().zip(&counts))
        .map(|(person, (&t, &n))| PersonLoad {
            person: person.name().to_string(),
            ticks: t,
            hours: ticks_to_hours(t),
            shifts: n,
        })
        .collect();

    Ok(RosterReport {
        status: solution.status,
        roster,
        shifts,
        loads,
        max_load_ticks,
        min_load_ticks,
        fairness_gap_ticks: max_load_ticks - min_load_ticks,
        stats: solution.stats,
    })
}
