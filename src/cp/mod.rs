//! Constraint-programming layer.
//!
//! Defines the narrow boundary between rostering logic and a solver:
//! a declarative [`CpModel`] (bounded integer variables, linear
//! constraints, max/min equalities, a linear objective) and the
//! [`CpSolver`] trait that turns a model into a [`CpSolution`] within a
//! time budget. Model-building code depends only on these types, so any
//! backend can be substituted. The bundled [`LpSolver`] runs branch and
//! bound over `microlp` linear relaxations.
//!
//! # Reference
//! - Rossi, van Beek, Walsh (2006), "Handbook of Constraint Programming", Ch. 3
//! - Laborie et al. (2018), "IBM ILOG CP Optimizer for Scheduling"

mod lp;
mod model;
mod solver;

pub use lp::LpSolver;
pub use model::{
    ConstraintKind, CpConstraint, CpModel, LinearExpr, Relation, VarDecl, VarId, VarKind,
    MAX_MAGNITUDE,
};
pub use solver::{CpSolution, CpSolver, SolveStats, SolveStatus, SolverConfig};
