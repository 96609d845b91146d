//! Linear-relaxation backend over the `microlp` simplex solver.
//!
//! # Algorithm
//!
//! 1. The model becomes a linear program. Every variable keeps its domain
//!    as real bounds and linear constraints map one-to-one.
//!    `target == max(args)` becomes `target ≥ x` for each argument plus
//!    `target ≤ x + M·(1 − s_x)` with selector booleans summing to 1, where
//!    `M` is the widest difference the domains allow (mirrored for min).
//! 2. Depth-first branch and bound over the relaxation. Among model
//!    variables with a fractional value, the one closest to an integer is
//!    branched on, nearest side first; selectors are branched on only once
//!    every model variable is integral. A branch reaching a domain bound
//!    fixes the variable in place, any other adds a bound row. Children are
//!    re-optimized from the parent's basis.
//! 3. When the model variables are integral, max/min targets are taken from
//!    their arguments and the point is checked against the model. A feasible
//!    point that improves the objective becomes the incumbent.
//! 4. Objectives are integral: a node survives only if its relaxation can
//!    beat the incumbent by at least one.
//!
//! Exhausting the tree proves optimality (or infeasibility). Hitting the
//! time or node budget returns the incumbent as `Feasible`, or `TimeLimit`
//! without one.
//!
//! # Reference
//! - Wolsey (1998), "Integer Programming", Ch. 7 (LP-based branch and bound)
//! - Achterberg (2007), "Constraint Integer Programming", Ch. 5 (branching)

use std::collections::BTreeMap;
use std::time::Instant;

use microlp::{ComparisonOp, OptimizationDirection, Problem, Solution, Variable};
use tracing::{debug, info, warn};

use super::{
    ConstraintKind, CpModel, CpSolution, CpSolver, Relation, SolveStats, SolveStatus,
    SolverConfig, VarId,
};

/// Distance from an integer below which an LP value counts as integral.
const INTEGRALITY_TOLERANCE: f64 = 1e-6;

/// Exact backend: branch and bound over `microlp` relaxations.
///
/// # Example
/// ```
/// use u_roster::cp::{CpModel, CpSolver, LinearExpr, LpSolver, SolveStatus, SolverConfig};
///
/// let mut model = CpModel::new("pick-two");
/// let vars: Vec<_> = (0..3).map(|i| model.new_bool_var(format!("x{i}"))).collect();
/// model.add_eq("exactly two", LinearExpr::sum(vars.iter().copied()), 2);
///
/// let solution = LpSolver::new().solve(&model, &SolverConfig::default());
/// assert_eq!(solution.status, SolveStatus::Optimal);
/// assert_eq!(vars.iter().filter(|&&v| solution.is_true(v)).count(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct LpSolver {
    node_limit: Option<u64>,
}

impl LpSolver {
    /// Creates a solver bounded only by the time limit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Additionally stops after `limit` relaxations.
    ///
    /// Reaching the node limit is reported like reaching the time limit.
    pub fn with_node_limit(mut self, limit: u64) -> Self {
        self.node_limit = Some(limit);
        self
    }
}

impl CpSolver for LpSolver {
    fn name(&self) -> &'static str {
        "microlp"
    }

    fn solve(&self, model: &CpModel, config: &SolverConfig) -> CpSolution {
        let started = Instant::now();

        if let Err(reason) = model.check() {
            warn!(event = "model_invalid", model = %model.name, reason = %reason);
            return CpSolution::without_solution(SolveStatus::ModelInvalid, SolveStats::default());
        }

        info!(
            event = "solve_start",
            solver = self.name(),
            model = %model.name,
            variables = model.variable_count(),
            constraints = model.constraint_count(),
            time_limit_ms = config.time_limit.as_millis() as u64,
        );

        let relaxation = Relaxation::new(model);
        let mut search = Search {
            model,
            relaxation: &relaxation,
            deadline: started.checked_add(config.time_limit),
            node_limit: self.node_limit,
            best: None,
            stats: SolveStats::default(),
            stopped: false,
        };

        let mut failure = None;
        if relaxation.contradiction {
            debug!(event = "contradiction", model = %model.name);
        } else if model.variable_count() == 0 {
            search.offer(Vec::new());
        } else {
            match relaxation.problem.solve() {
                Ok(root) => search.run(root),
                Err(microlp::Error::Infeasible) => {}
                Err(err) => failure = Some(err),
            }
        }

        let mut stats = search.stats;
        stats.elapsed = started.elapsed();

        let solution = match (failure, search.best, search.stopped) {
            (Some(err), _, _) => {
                warn!(event = "relaxation_failed", model = %model.name, error = %err);
                CpSolution::without_solution(SolveStatus::ModelInvalid, stats)
            }
            (None, Some((values, objective)), stopped) => CpSolution {
                status: if stopped {
                    SolveStatus::Feasible
                } else {
                    SolveStatus::Optimal
                },
                values,
                objective: model.objective().map(|_| objective),
                stats,
            },
            (None, None, true) => CpSolution::without_solution(SolveStatus::TimeLimit, stats),
            (None, None, false) => CpSolution::without_solution(SolveStatus::Infeasible, stats),
        };

        info!(
            event = "solve_end",
            status = %solution.status,
            objective = ?solution.objective,
            nodes = stats.nodes,
            solutions = stats.solutions,
            elapsed_ms = stats.elapsed.as_millis() as u64,
        );
        solution
    }
}

/// An LP variable that must end integral, with its domain.
#[derive(Debug, Clone, Copy)]
struct Integral {
    var: Variable,
    lb: i64,
    ub: i64,
}

#[derive(Debug, Clone, Copy)]
enum Extremum {
    Max,
    Min,
}

/// A model translated to a linear program.
struct Relaxation {
    problem: Problem,
    /// LP variable of each model variable, in declaration order.
    vars: Vec<Integral>,
    /// Max/min selector booleans.
    selectors: Vec<Integral>,
    /// A row without variables was violated.
    contradiction: bool,
}

impl Relaxation {
    fn new(model: &CpModel) -> Self {
        let mut costs = vec![0i64; model.variable_count()];
        if let Some(objective) = model.objective() {
            for &(v, c) in &objective.terms {
                costs[v.index()] += c;
            }
        }

        let mut problem = Problem::new(OptimizationDirection::Minimize);
        let mut vars = Vec::with_capacity(model.variable_count());
        for (decl, &cost) in model.variables().iter().zip(&costs) {
            let var = problem.add_var(cost as f64, (decl.lb as f64, decl.ub as f64));
            vars.push(Integral {
                var,
                lb: decl.lb,
                ub: decl.ub,
            });
        }

        let mut relaxation = Self {
            problem,
            vars,
            selectors: Vec::new(),
            contradiction: false,
        };
        for c in model.constraints() {
            match &c.kind {
                ConstraintKind::Linear {
                    expr,
                    relation,
                    rhs,
                } => {
                    let terms: Vec<(Variable, i64)> = expr
                        .terms
                        .iter()
                        .map(|&(v, coef)| (relaxation.lp_var(v), coef))
                        .collect();
                    let op = match relation {
                        Relation::Eq => ComparisonOp::Eq,
                        Relation::Le => ComparisonOp::Le,
                        Relation::Ge => ComparisonOp::Ge,
                    };
                    relaxation.add_row(terms, op, rhs - expr.constant);
                }
                ConstraintKind::MaxEquality { target, vars } => {
                    relaxation.add_extremum(*target, vars, Extremum::Max)
                }
                ConstraintKind::MinEquality { target, vars } => {
                    relaxation.add_extremum(*target, vars, Extremum::Min)
                }
            }
        }
        relaxation
    }

    fn lp_var(&self, v: VarId) -> Variable {
        self.vars[v.index()].var
    }

    /// Adds a row, merging repeated variables and dropping zero terms.
    fn add_row(
        &mut self,
        terms: impl IntoIterator<Item = (Variable, i64)>,
        op: ComparisonOp,
        rhs: i64,
    ) {
        let mut merged: BTreeMap<Variable, i64> = BTreeMap::new();
        for (var, coef) in terms {
            *merged.entry(var).or_default() += coef;
        }
        let row: Vec<(Variable, f64)> = merged
            .into_iter()
            .filter(|&(_, coef)| coef != 0)
            .map(|(var, coef)| (var, coef as f64))
            .collect();

        if row.is_empty() {
            let holds = match op {
                ComparisonOp::Eq => rhs == 0,
                ComparisonOp::Le => 0 <= rhs,
                ComparisonOp::Ge => 0 >= rhs,
            };
            self.contradiction |= !holds;
            return;
        }
        self.problem.add_constraint(row, op, rhs as f64);
    }

    fn add_extremum(&mut self, target: VarId, args: &[VarId], kind: Extremum) {
        let t = self.vars[target.index()];
        let mut selected = Vec::with_capacity(args.len());
        for &arg in args {
            let x = self.vars[arg.index()];
            let s = self.problem.add_var(0.0, (0.0, 1.0));
            self.selectors.push(Integral { var: s, lb: 0, ub: 1 });
            selected.push((s, 1));

            match kind {
                Extremum::Max => {
                    let big_m = (t.ub - x.lb).max(0);
                    self.add_row([(t.var, 1), (x.var, -1)], ComparisonOp::Ge, 0);
                    let row = [(t.var, 1), (x.var, -1), (s, big_m)];
                    self.add_row(row, ComparisonOp::Le, big_m);
                }
                Extremum::Min => {
                    let big_m = (x.ub - t.lb).max(0);
                    self.add_row([(t.var, 1), (x.var, -1)], ComparisonOp::Le, 0);
                    let row = [(x.var, 1), (t.var, -1), (s, big_m)];
                    self.add_row(row, ComparisonOp::Le, big_m);
                }
            }
        }
        self.add_row(selected, ComparisonOp::Eq, 1);
    }
}

/// One side of a branching decision.
#[derive(Debug, Clone, Copy)]
enum Branch {
    Fix(Variable, i64),
    AtMost(Variable, i64),
    AtLeast(Variable, i64),
}

impl Branch {
    /// Both children of a fractional value, nearest side first.
    fn split(candidate: Integral, value: f64) -> (Branch, Branch) {
        let floor = value.floor() as i64;
        let ceil = floor + 1;
        let down = if floor <= candidate.lb {
            Branch::Fix(candidate.var, candidate.lb)
        } else {
            Branch::AtMost(candidate.var, floor)
        };
        let up = if ceil >= candidate.ub {
            Branch::Fix(candidate.var, candidate.ub)
        } else {
            Branch::AtLeast(candidate.var, ceil)
        };
        if value - (floor as f64) < 0.5 {
            (down, up)
        } else {
            (up, down)
        }
    }

    fn apply(self, lp: Solution) -> Result<Solution, microlp::Error> {
        match self {
            Branch::Fix(var, value) => lp.fix_var(var, value as f64),
            Branch::AtMost(var, bound) => {
                lp.add_constraint([(var, 1.0)], ComparisonOp::Le, bound as f64)
            }
            Branch::AtLeast(var, bound) => {
                lp.add_constraint([(var, 1.0)], ComparisonOp::Ge, bound as f64)
            }
        }
    }
}

struct Search<'a> {
    model: &'a CpModel,
    relaxation: &'a Relaxation,
    deadline: Option<Instant>,
    node_limit: Option<u64>,
    /// Incumbent values and objective (0 without an objective).
    best: Option<(Vec<i64>, i64)>,
    stats: SolveStats,
    stopped: bool,
}

impl Search<'_> {
    fn out_of_budget(&self) -> bool {
        self.node_limit.is_some_and(|limit| self.stats.nodes >= limit)
            || self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    fn run(&mut self, root: Solution) {
        let mut pending: Vec<(Solution, Option<Branch>)> = vec![(root, None)];

        while let Some((parent, branch)) = pending.pop() {
            if self.out_of_budget() {
                self.stopped = true;
                return;
            }
            self.stats.nodes += 1;

            let lp = match branch {
                None => parent,
                Some(branch) => match branch.apply(parent) {
                    Ok(lp) => lp,
                    Err(microlp::Error::Infeasible) => continue,
                    Err(err) => {
                        debug!(event = "node_failed", error = %err, nodes = self.stats.nodes);
                        continue;
                    }
                },
            };

            let bound = lp.objective() + self.objective_constant();
            if !self.may_improve(bound) {
                continue;
            }

            if let Some(values) = self.integral_point(&lp) {
                if self.offer(values) && self.model.objective().is_none() {
                    // Without an objective the first solution is as good as any.
                    return;
                }
                if !self.may_improve(bound) {
                    continue;
                }
            }

            let candidate = closest_to_integral(&lp, &self.relaxation.vars)
                .or_else(|| closest_to_integral(&lp, &self.relaxation.selectors));
            let Some((candidate, value)) = candidate else {
                continue;
            };

            let (near, far) = Branch::split(candidate, value);
            pending.push((lp.clone(), Some(far)));
            pending.push((lp, Some(near)));
        }
    }

    fn objective_constant(&self) -> f64 {
        self.model.objective().map_or(0.0, |o| o.constant as f64)
    }

    /// Whether a relaxation bound leaves room for a strictly better objective.
    fn may_improve(&self, bound: f64) -> bool {
        match &self.best {
            None => true,
            Some(_) if self.model.objective().is_none() => false,
            Some((_, best)) => (bound - INTEGRALITY_TOLERANCE).ceil() <= (*best - 1) as f64,
        }
    }

    /// Model values of an LP point whose model variables are all integral.
    fn integral_point(&self, lp: &Solution) -> Option<Vec<i64>> {
        let mut values = Vec::with_capacity(self.relaxation.vars.len());
        for v in &self.relaxation.vars {
            let x = lp[v.var];
            let rounded = x.round();
            if (x - rounded).abs() > INTEGRALITY_TOLERANCE {
                return None;
            }
            values.push((rounded as i64).clamp(v.lb, v.ub));
        }

        // Selectors may still be fractional.
        for c in self.model.constraints() {
            match &c.kind {
                ConstraintKind::MaxEquality { target, vars } => {
                    if let Some(m) = vars.iter().map(|v| values[v.index()]).max() {
                        values[target.index()] = m;
                    }
                }
                ConstraintKind::MinEquality { target, vars } => {
                    if let Some(m) = vars.iter().map(|v| values[v.index()]).min() {
                        values[target.index()] = m;
                    }
                }
                ConstraintKind::Linear { .. } => {}
            }
        }
        Some(values)
    }

    /// Records `values` if they are feasible and improve the incumbent.
    fn offer(&mut self, values: Vec<i64>) -> bool {
        if !self.model.is_feasible(&values) {
            return false;
        }
        let objective = self.model.objective().map_or(0, |o| o.evaluate(&values));
        if self.best.as_ref().is_some_and(|(_, best)| objective >= *best) {
            return false;
        }

        self.stats.solutions += 1;
        debug!(event = "solution", objective, nodes = self.stats.nodes);
        self.best = Some((values, objective));
        true
    }
}

/// The fractional variable closest to an integer, first in order on ties.
fn closest_to_integral(lp: &Solution, candidates: &[Integral]) -> Option<(Integral, f64)> {
    let mut chosen: Option<(Integral, f64, f64)> = None;
    for c in candidates {
        let x = lp[c.var];
        let distance = (x - x.round()).abs();
        if distance > INTEGRALITY_TOLERANCE && chosen.map_or(true, |(_, _, d)| distance < d) {
            chosen = Some((*c, x, distance));
        }
    }
    chosen.map(|(c, x, _)| (c, x))
}
