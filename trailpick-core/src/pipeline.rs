//! End-to-end selection: filter, build, emit, solve and interpret.

use std::time::Duration;

use thiserror::Error;

use crate::lp::{LpError, emit_lp};
use crate::model::{ModelError, ModelParameters, SelectionModel};
use crate::outcome::{SelectionOutcome, interpret};
use crate::solver::{DEFAULT_SOLVER_TIMEOUT, MilpSolver, SolverError};
use crate::{Trail, TrailFilter};

/// Everything needed to run a selection.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionConfig {
    /// Per-trail eligibility bounds.
    pub filter: TrailFilter,
    /// Integer-program parameters.
    pub model: ModelParameters,
    /// Solver time budget.
    pub timeout: Duration,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            filter: TrailFilter::default(),
            model: ModelParameters::default(),
            timeout: DEFAULT_SOLVER_TIMEOUT,
        }
    }
}

/// A built and rendered model that has not been solved yet.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedSelection {
    /// Trails that passed the filter, in catalog order.
    pub eligible: Vec<Trail>,
    /// The integer program.
    pub model: SelectionModel,
    /// The model as LP text; `None` when no trail is eligible.
    pub model_text: Option<String>,
}

/// Product of a selection run.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionRun {
    /// Trails that passed the filter, in catalog order.
    pub eligible: Vec<Trail>,
    /// The model as LP text; `None` when no trail is eligible.
    pub model_text: Option<String>,
    /// Interpreted result.
    pub outcome: SelectionOutcome,
}

/// Errors that abort a selection run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SelectionError {
    /// The model could not be built.
    #[error(transparent)]
    Model(#[from] ModelError),
    /// The model could not be rendered.
    #[error(transparent)]
    Emit(#[from] LpError),
    /// The solver failed.
    #[error(transparent)]
    Solver(#[from] SolverError),
}

/// Filter `catalog` and build the model without rendering or solving it.
pub fn build_model(
    catalog: &[Trail],
    config: &SelectionConfig,
) -> Result<(Vec<Trail>, SelectionModel), ModelError> {
    let eligible = config.filter.apply(catalog);
    let model = SelectionModel::build(&eligible, &config.model)?;
    Ok((eligible, model))
}

/// Filter `catalog`, build the model and render it as LP text.
///
/// The text is available before any solver runs, so callers can persist it
/// even when the solve later fails.
pub fn prepare_selection(
    catalog: &[Trail],
    config: &SelectionConfig,
) -> Result<PreparedSelection, SelectionError> {
    let (eligible, model) = build_model(catalog, config)?;
    let model_text = match emit_lp(&model) {
        Ok(text) => Some(text),
        Err(LpError::EmptyModel) => None,
        Err(err) => return Err(err.into()),
    };
    Ok(PreparedSelection {
        eligible,
        model,
        model_text,
    })
}

impl PreparedSelection {
    /// Solve the prepared model within `timeout`.
    ///
    /// When more trails are requested than are eligible, or none are
    /// eligible, the run is reported infeasible without invoking the solver.
    pub fn solve(
        self,
        solver: &dyn MilpSolver,
        timeout: Duration,
    ) -> Result<SelectionRun, SelectionError> {
        let Self {
            eligible,
            model,
            model_text,
        } = self;
        let outcome = match model_text.as_deref() {
            Some(text) if !model.requests_more_than_eligible() => {
                log::debug!(
                    "solving model with {} variables and {} constraints",
                    model.variable_count(),
                    model.constraint_count()
                );
                let output = solver.solve(text, timeout)?;
                log::info!("solver finished with {:?}", output.status);
                interpret(&output, &model, &eligible)
            }
            _ => {
                log::info!(
                    "skipping solver: {} trails requested, {} eligible",
                    model.target_count(),
                    model.eligible_count()
                );
                SelectionOutcome::Infeasible
            }
        };
        Ok(SelectionRun {
            eligible,
            model_text,
            outcome,
        })
    }
}

/// Select trails from `catalog` using `solver`.
///
/// Equivalent to [`prepare_selection`] followed by [`PreparedSelection::solve`].
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use trailpick_core::{
///     MilpSolver, SelectionConfig, SelectionOutcome, SolverError, SolverOutput,
///     SolverStatus, select_trails,
/// };
///
/// struct Unused;
///
/// impl MilpSolver for Unused {
///     fn solve(&self, _: &str, _: Duration) -> Result<SolverOutput, SolverError> {
///         Ok(SolverOutput::status_only(SolverStatus::Timeout))
///     }
/// }
///
/// let run = select_trails(&[], &SelectionConfig::default(), &Unused).unwrap();
/// assert_eq!(run.outcome, SelectionOutcome::Infeasible);
/// assert_eq!(run.model_text, None);
/// ```
pub fn select_trails(
    catalog: &[Trail],
    config: &SelectionConfig,
    solver: &dyn MilpSolver,
) -> Result<SelectionRun, SelectionError> {
    prepare_selection(catalog, config)?.solve(solver, config.timeout)
}
