//! Solver boundary.
//!
//! Any backend that can read a [`CpModel`] and return values for its
//! variables within a time budget implements [`CpSolver`].

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{CpModel, VarId};

/// Solver parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolverConfig {
    /// Wall-clock budget for one solve.
    pub time_limit: Duration,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            time_limit: Duration::from_secs(30),
        }
    }
}

impl SolverConfig {
    /// Config with the given time limit.
    pub fn with_time_limit(time_limit: Duration) -> Self {
        Self { time_limit }
    }
}

/// Terminal status of a solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SolveStatus {
    /// A solution was found and proven optimal.
    Optimal,
    /// A solution was found but the budget ran out before optimality was proven.
    Feasible,
    /// No assignment satisfies the constraints.
    Infeasible,
    /// The budget ran out before any solution was found.
    TimeLimit,
    /// The model itself is malformed.
    ModelInvalid,
}

impl SolveStatus {
    /// Whether the status carries a usable solution.
    pub fn has_solution(self) -> bool {
        matches!(self, SolveStatus::Optimal | SolveStatus::Feasible)
    }

    /// Upper-case status name.
    pub fn name(self) -> &'static str {
        match self {
            SolveStatus::Optimal => "OPTIMAL",
            SolveStatus::Feasible => "FEASIBLE",
            SolveStatus::Infeasible => "INFEASIBLE",
            SolveStatus::TimeLimit => "TIME_LIMIT",
            SolveStatus::ModelInvalid => "MODEL_INVALID",
        }
    }
}

impl std::fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Search statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolveStats {
    /// Search nodes visited.
    pub nodes: u64,
    /// Solutions found (each strictly better than the last).
    pub solutions: u64,
    /// Wall-clock time spent.
    pub elapsed: Duration,
}

/// Result of a solve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CpSolution {
    /// Terminal status.
    pub status: SolveStatus,
    /// Value per variable in declaration order; empty without a solution.
    pub values: Vec<i64>,
    /// Objective value of the solution, if the model has an objective.
    pub objective: Option<i64>,
    /// Search statistics.
    pub stats: SolveStats,
}

impl CpSolution {
    /// A solution-less result.
    pub fn without_solution(status: SolveStatus, stats: SolveStats) -> Self {
        Self {
            status,
            values: Vec::new(),
            objective: None,
            stats,
        }
    }

    /// Whether a solution was found.
    ///
    /// A model without variables has an empty solution.
    pub fn is_solution_found(&self) -> bool {
        self.status.has_solution()
    }

    /// Value of a variable, if a solution exists.
    pub fn value(&self, var: VarId) -> Option<i64> {
        self.values.get(var.index()).copied()
    }

    /// Whether a boolean variable is set.
    pub fn is_true(&self, var: VarId) -> bool {
        self.value(var) == Some(1)
    }
}

/// A constraint solver backend.
pub trait CpSolver {
    /// Backend name for diagnostics.
    fn name(&self) -> &'static str;

    /// Solves a model within `config.time_limit`.
    ///
    /// Any returned solution must satisfy every constraint of `model`.
    fn solve(&self, model: &CpModel, config: &SolverConfig) -> CpSolution;
}
