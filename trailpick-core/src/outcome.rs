//! Mapping solver output back onto trails.

use std::collections::BTreeSet;
use std::fmt;

use crate::model::{SelectionModel, VariableKey};
use crate::solver::{SolverOutput, SolverStatus};
use crate::Trail;

/// Objectives below this are reported as infeasible.
pub const INFEASIBLE_OBJECTIVE_THRESHOLD: f64 = 1e-10;

/// Distance from 1 within which a binary value counts as selected.
pub const SELECTION_TOLERANCE: f64 = 1e-6;

/// Trails chosen by an optimal solve.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    /// Selected trails in catalog order.
    pub trails: Vec<Trail>,
    /// Objective value of the selection.
    pub objective: f64,
}

/// Result of a selection run.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectionOutcome {
    /// An optimal selection.
    Selected(Selection),
    /// The solver stopped with a feasible but unproven solution.
    Suboptimal,
    /// The solver ran out of time.
    Timeout,
    /// No selection satisfies the constraints.
    Infeasible,
}

impl SelectionOutcome {
    /// The selection, if the run produced one.
    pub const fn selection(&self) -> Option<&Selection> {
        match self {
            Self::Selected(selection) => Some(selection),
            _ => None,
        }
    }
}

impl fmt::Display for SelectionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Selected(selection) => {
                write!(f, "objective: {}", selection.objective)?;
                for trail in &selection.trails {
                    write!(f, "\n{} - {}", trail.id, trail.name)?;
                }
                Ok(())
            }
            Self::Suboptimal => f.write_str("suboptimal"),
            Self::Timeout => f.write_str("timeout"),
            Self::Infeasible => f.write_str("the problem appears infeasible."),
        }
    }
}

/// Translate raw solver output for `model`, built from `eligible`.
///
/// Conflict indicators are ignored. Names the model does not know are logged
/// and skipped.
pub fn interpret(
    output: &SolverOutput,
    model: &SelectionModel,
    eligible: &[Trail],
) -> SelectionOutcome {
    match output.status {
        SolverStatus::Optimal => {}
        SolverStatus::Suboptimal => return SelectionOutcome::Suboptimal,
        SolverStatus::Timeout => return SelectionOutcome::Timeout,
        SolverStatus::Infeasible => return SelectionOutcome::Infeasible,
    }

    let registry = model.registry();
    let mut columns = vec![0.0; registry.len()];
    let mut chosen = BTreeSet::new();
    for (name, value) in &output.values {
        let Some(id) = registry.lookup(name) else {
            log::warn!("solver reported unknown variable {name}; ignoring");
            continue;
        };
        if let Some(slot) = columns.get_mut(id.index()) {
            *slot = *value;
        }
        if let Some(VariableKey::Selection(index)) = registry.key(id)
            && (value - 1.0).abs() <= SELECTION_TOLERANCE
        {
            chosen.insert(index);
        }
    }

    let objective = output
        .objective
        .unwrap_or_else(|| model.objective().evaluate(&columns));
    if objective < INFEASIBLE_OBJECTIVE_THRESHOLD {
        log::info!("optimal objective {objective} is effectively zero; reporting infeasible");
        return SelectionOutcome::Infeasible;
    }

    let trails = chosen
        .into_iter()
        .filter_map(|index| eligible.get(index).cloned())
        .collect();
    SelectionOutcome::Selected(Selection { trails, objective })
}
