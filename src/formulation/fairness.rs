//! Minimax fairness objective.
//!
//! Adds one load variable per person, the maximum and minimum load, and
//! minimizes their difference. Total hours are fixed by coverage, so the
//! objective only redistributes them.
//!
//! # Reference
//! - Ogryczak et al. (2014), "Fair optimization and networks: A survey"

use serde::{Deserialize, Serialize};

use crate::cp::{CpModel, LinearExpr, VarId};

/// Variables introduced by the fairness objective.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FairnessVars {
    /// Load in ticks per person, in person order.
    pub loads: Vec<VarId>,
    /// Largest load.
    pub max_load: VarId,
    /// Smallest load.
    pub min_load: VarId,
}

/// Adds load variables and the `max_load - min_load` objective.
///
/// `assignment` is indexed `[shift][person]`; `ticks[s]` is the duration
/// of shift `s`. Returns `None` (and adds nothing) when there are no
/// people.
pub(crate) fn add_fairness_objective(
    model: &mut CpModel,
    assignment: &[Vec<VarId>],
    ticks: &[i64],
    names: &[&str],
    cap_ticks: i64,
) -> Option<FairnessVars> {
    if names.is_empty() {
        return None;
    }

    let mut loads = Vec::with_capacity(names.len());
    for (p, name) in names.iter().enumerate() {
        let load = model.new_int_var(0, cap_ticks, format!("load__{name}"));
        let expr = LinearExpr::weighted_sum(
            assignment
                .iter()
                .zip(ticks)
                .map(|(row, &t)| (row[p], t)),
        )
        .with_term(load, -1);
        model.add_eq(format!("load of {name}"), expr, 0);
        loads.push(load);
    }

    let max_load = model.new_int_var(0, cap_ticks, "max_load");
    let min_load = model.new_int_var(0, cap_ticks, "min_load");
    model.add_max_equality("max_load is the largest load", max_load, loads.clone());
    model.add_min_equality("min_load is the smallest load", min_load, loads.clone());
    model.minimize(LinearExpr::new().with_term(max_load, 1).with_term(min_load, -1));

    Some(FairnessVars {
        loads,
        max_load,
        min_load,
    })
}
