//! Declarative integer model handed to a solver.
//!
//! A `CpModel` is a plain description: bounded integer variables
//! (booleans are integers in [0, 1]), linear constraints, max/min
//! equalities, and an optional linear objective to minimize. It holds
//! no search state, so one model can be solved by any `CpSolver`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Largest magnitude a bound, right-hand side, or reachable linear value may take.
///
/// Keeps every evaluation far from `i64` overflow and exact in `f64`.
pub const MAX_MAGNITUDE: i64 = 1 << 31;

/// Handle to a model variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VarId(pub(crate) usize);

impl VarId {
    /// Position of the variable in declaration order.
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Variable kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VarKind {
    /// Domain {0, 1}.
    Bool,
    /// Domain [lb, ub].
    Int,
}

/// A declared variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VarDecl {
    /// Variable name (for diagnostics).
    pub name: String,
    /// Kind.
    pub kind: VarKind,
    /// Lower bound (inclusive).
    pub lb: i64,
    /// Upper bound (inclusive).
    pub ub: i64,
}

/// A weighted sum of variables plus a constant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinearExpr {
    /// (variable, coefficient) terms.
    pub terms: Vec<(VarId, i64)>,
    /// Constant offset.
    pub constant: i64,
}

impl LinearExpr {
    /// Empty expression (value 0).
    pub fn new() -> Self {
        Self::default()
    }

    /// Σ vars with coefficient 1.
    pub fn sum(vars: impl IntoIterator<Item = VarId>) -> Self {
        Self {
            terms: vars.into_iter().map(|v| (v, 1)).collect(),
            constant: 0,
        }
    }

    /// Σ coef × var.
    pub fn weighted_sum(terms: impl IntoIterator<Item = (VarId, i64)>) -> Self {
        Self {
            terms: terms.into_iter().collect(),
            constant: 0,
        }
    }

    /// Adds a term.
    pub fn with_term(mut self, var: VarId, coef: i64) -> Self {
        self.terms.push((var, coef));
        self
    }

    /// Adds a constant.
    pub fn with_constant(mut self, constant: i64) -> Self {
        self.constant += constant;
        self
    }

    /// Evaluates the expression against per-variable values.
    ///
    /// Saturates instead of overflowing.
    pub fn evaluate(&self, values: &[i64]) -> i64 {
        self.terms.iter().fold(self.constant, |acc, &(v, c)| {
            acc.saturating_add(c.saturating_mul(values.get(v.0).copied().unwrap_or(0)))
        })
    }

    /// Upper bound on |value| over the given domains. Every coefficient
    /// counts at least once, so the coefficient sum is bounded too.
    fn reach(&self, variables: &[VarDecl]) -> i128 {
        self.terms.iter().fold(i128::from(self.constant).abs(), |acc, &(v, c)| {
            let d = &variables[v.0];
            let widest = i128::from(d.lb).abs().max(i128::from(d.ub).abs()).max(1);
            acc.saturating_add(i128::from(c).abs().saturating_mul(widest))
        })
    }

    /// The expression multiplied by -1.
    pub fn negated(&self) -> Self {
        Self {
            terms: self.terms.iter().map(|&(v, c)| (v, -c)).collect(),
            constant: -self.constant,
        }
    }
}

/// Comparison of a linear constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Relation {
    /// expr == rhs
    Eq,
    /// expr <= rhs
    Le,
    /// expr >= rhs
    Ge,
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Relation::Eq => "==",
            Relation::Le => "<=",
            Relation::Ge => ">=",
        })
    }
}

/// Constraint body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConstraintKind {
    /// `expr (relation) rhs`.
    Linear {
        expr: LinearExpr,
        relation: Relation,
        rhs: i64,
    },
    /// `target == max(vars)`.
    MaxEquality { target: VarId, vars: Vec<VarId> },
    /// `target == min(vars)`.
    MinEquality { target: VarId, vars: Vec<VarId> },
}

/// A named constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CpConstraint {
    /// Human-readable label explaining why the constraint exists.
    pub name: String,
    /// Body.
    pub kind: ConstraintKind,
}

impl CpConstraint {
    /// Whether the constraint holds for the given values.
    pub fn is_satisfied(&self, values: &[i64]) -> bool {
        let value = |v: VarId| values.get(v.0).copied();
        match &self.kind {
            ConstraintKind::Linear {
                expr,
                relation,
                rhs,
            } => {
                let lhs = expr.evaluate(values);
                match relation {
                    Relation::Eq => lhs == *rhs,
                    Relation::Le => lhs <= *rhs,
                    Relation::Ge => lhs >= *rhs,
                }
            }
            ConstraintKind::MaxEquality { target, vars } => {
                let max = vars.iter().filter_map(|&v| value(v)).max();
                value(*target).is_some() && value(*target) == max
            }
            ConstraintKind::MinEquality { target, vars } => {
                let min = vars.iter().filter_map(|&v| value(v)).min();
                value(*target).is_some() && value(*target) == min
            }
        }
    }
}

/// A complete model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CpModel {
    /// Model name.
    pub name: String,
    variables: Vec<VarDecl>,
    constraints: Vec<CpConstraint>,
    objective: Option<LinearExpr>,
}

impl CpModel {
    /// Creates an empty model.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            variables: Vec::new(),
            constraints: Vec::new(),
            objective: None,
        }
    }

    /// Declares a boolean variable.
    pub fn new_bool_var(&mut self, name: impl Into<String>) -> VarId {
        self.push_var(name.into(), VarKind::Bool, 0, 1)
    }

    /// Declares an integer variable with domain [lb, ub].
    pub fn new_int_var(&mut self, lb: i64, ub: i64, name: impl Into<String>) -> VarId {
        self.push_var(name.into(), VarKind::Int, lb, ub)
    }

    fn push_var(&mut self, name: String, kind: VarKind, lb: i64, ub: i64) -> VarId {
        let id = VarId(self.variables.len());
        self.variables.push(VarDecl { name, kind, lb, ub });
        id
    }

    /// Adds `expr (relation) rhs`.
    pub fn add_linear(
        &mut self,
        name: impl Into<String>,
        expr: LinearExpr,
        relation: Relation,
        rhs: i64,
    ) {
        self.constraints.push(CpConstraint {
            name: name.into(),
            kind: ConstraintKind::Linear {
                expr,
                relation,
                rhs,
            },
        });
    }

    /// Adds `expr == rhs`.
    pub fn add_eq(&mut self, name: impl Into<String>, expr: LinearExpr, rhs: i64) {
        self.add_linear(name, expr, Relation::Eq, rhs);
    }

    /// Adds `expr <= rhs`.
    pub fn add_le(&mut self, name: impl Into<String>, expr: LinearExpr, rhs: i64) {
        self.add_linear(name, expr, Relation::Le, rhs);
    }

    /// Adds `target == max(vars)`.
    pub fn add_max_equality(&mut self, name: impl Into<String>, target: VarId, vars: Vec<VarId>) {
        self.constraints.push(CpConstraint {
            name: name.into(),
            kind: ConstraintKind::MaxEquality { target, vars },
        });
    }

    /// Adds `target == min(vars)`.
    pub fn add_min_equality(&mut self, name: impl Into<String>, target: VarId, vars: Vec<VarId>) {
        self.constraints.push(CpConstraint {
            name: name.into(),
            kind: ConstraintKind::MinEquality { target, vars },
        });
    }

    /// Sets the objective to minimize. Replaces any previous objective.
    pub fn minimize(&mut self, expr: LinearExpr) {
        self.objective = Some(expr);
    }

    /// Declared variables.
    pub fn variables(&self) -> &[VarDecl] {
        &self.variables
    }

    /// Variable declaration.
    pub fn variable(&self, id: VarId) -> Option<&VarDecl> {
        self.variables.get(id.0)
    }

    /// Constraints in insertion order.
    pub fn constraints(&self) -> &[CpConstraint] {
        &self.constraints
    }

    /// Objective, if any.
    pub fn objective(&self) -> Option<&LinearExpr> {
        self.objective.as_ref()
    }

    /// Number of variables.
    pub fn variable_count(&self) -> usize {
        self.variables.len()
    }

    /// Number of constraints.
    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }

    /// Checks that every referenced variable exists, every domain is
    /// non-empty, and no bound or linear value exceeds [`MAX_MAGNITUDE`].
    /// Returns a description of the first problem found.
    pub fn check(&self) -> Result<(), String> {
        for v in &self.variables {
            if v.lb > v.ub {
                return Err(format!("variable '{}' has empty domain [{}, {}]", v.name, v.lb, v.ub));
            }
            if v.lb.unsigned_abs().max(v.ub.unsigned_abs()) > MAX_MAGNITUDE.unsigned_abs() {
                return Err(format!("variable '{}' has a bound beyond ±{MAX_MAGNITUDE}", v.name));
            }
        }

        let n = self.variables.len();
        let dangling = |v: &VarId| v.0 >= n;
        for c in &self.constraints {
            let bad = match &c.kind {
                ConstraintKind::Linear { expr, .. } => expr.terms.iter().any(|(v, _)| dangling(v)),
                ConstraintKind::MaxEquality { target, vars }
                | ConstraintKind::MinEquality { target, vars } => {
                    dangling(target) || vars.is_empty() || vars.iter().any(dangling)
                }
            };
            if bad {
                return Err(format!("constraint '{}' is malformed", c.name));
            }
        }

        if let Some(obj) = &self.objective {
            if obj.terms.iter().any(|(v, _)| dangling(v)) {
                return Err("objective references an unknown variable".to_string());
            }
        }

        let limit = i128::from(MAX_MAGNITUDE);
        for c in &self.constraints {
            if let ConstraintKind::Linear { expr, rhs, .. } = &c.kind {
                if expr.reach(&self.variables) > limit || i128::from(*rhs).abs() > limit {
                    return Err(format!("constraint '{}' exceeds ±{MAX_MAGNITUDE}", c.name));
                }
            }
        }
        if let Some(obj) = &self.objective {
            if obj.reach(&self.variables) > limit {
                return Err(format!("objective exceeds ±{MAX_MAGNITUDE}"));
            }
        }
        Ok(())
    }

    /// Whether `values` satisfy every domain and constraint.
    pub fn is_feasible(&self, values: &[i64]) -> bool {
        values.len() == self.variables.len()
            && self
                .variables
                .iter()
                .zip(values)
                .all(|(d, &x)| d.lb <= x && x <= d.ub)
            && self.constraints.iter().all(|c| c.is_satisfied(values))
    }
}
