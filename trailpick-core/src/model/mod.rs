//! Integer-program construction for trail selection.
//!
//! [`SelectionModel::build`] turns the eligible trails into a maximisation
//! over binary selection variables `x_i`, with:
//!
//! - an exact count constraint,
//! - lower and upper bounds on total elevation gain,
//! - when a minimum separation is requested, one indicator `y_ij` per pair
//!   linked to `x_i AND x_j`, and a big-M constraint that only bites when both
//!   trails are selected.
//!
//! The pairwise groups grow as `N(N-1)/2`; [`ModelParameters::separation_item_limit`]
//! caps `N` whenever they are generated.

mod linear;
mod registry;

use thiserror::Error;

use crate::{DistanceUnit, ObjectiveMode, Trail};

pub use linear::{Constraint, ConstraintKind, LinearExpr, Relation};
pub use registry::{VariableId, VariableKey, VariableRegistry};

/// Default big-M constant for the separation constraints.
pub const DEFAULT_BIG_M: f64 = 10_000.0;

/// Default cap on eligible trails when pairwise constraints are generated.
pub const DEFAULT_SEPARATION_ITEM_LIMIT: usize = 1_000;

/// Parameters shaping the integer program.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelParameters {
    /// Exact number of trails to select.
    pub target_count: u32,
    /// Scoring function to maximise.
    pub objective: ObjectiveMode,
    /// Lower bound on the summed elevation gain, in feet.
    pub min_total_elevation: f64,
    /// Upper bound on the summed elevation gain, in feet; may be infinite.
    pub max_total_elevation: f64,
    /// Minimum distance in miles between any two selected trails; `0` disables.
    pub min_separation: f64,
    /// Relaxation constant for the separation constraints.
    ///
    /// Must be at least `min_separation`, otherwise the constraint also binds
    /// pairs that are not both selected.
    pub big_m: f64,
    /// Largest eligible set for which pairwise constraints are generated.
    pub separation_item_limit: usize,
}

impl Default for ModelParameters {
    fn default() -> Self {
        Self {
            target_count: 5,
            objective: ObjectiveMode::Popularity,
            min_total_elevation: 0.0,
            max_total_elevation: f64::INFINITY,
            min_separation: 0.0,
            big_m: DEFAULT_BIG_M,
            separation_item_limit: DEFAULT_SEPARATION_ITEM_LIMIT,
        }
    }
}

impl ModelParameters {
    /// Report whether pairwise separation constraints will be generated.
    pub fn separation_enabled(&self) -> bool {
        self.min_separation > 0.0
    }

    fn validate(&self, eligible: usize) -> Result<(), ModelError> {
        check_number("min_total_elevation", self.min_total_elevation, false)?;
        check_number("max_total_elevation", self.max_total_elevation, true)?;
        check_number("min_separation", self.min_separation, false)?;
        if self.min_separation < 0.0 {
            return Err(ModelError::InvalidParameter {
                field: "min_separation",
                value: self.min_separation,
            });
        }
        if !self.separation_enabled() {
            return Ok(());
        }
        check_number("big_m", self.big_m, false)?;
        if self.big_m < self.min_separation {
            return Err(ModelError::BigMTooSmall {
                big_m: self.big_m,
                min_separation: self.min_separation,
            });
        }
        if eligible > self.separation_item_limit {
            return Err(ModelError::TooManyCandidates {
                eligible,
                limit: self.separation_item_limit,
            });
        }
        Ok(())
    }
}

fn check_number(field: &'static str, value: f64, allow_infinite: bool) -> Result<(), ModelError> {
    if value.is_nan() || (!allow_infinite && value.is_infinite()) {
        return Err(ModelError::InvalidParameter { field, value });
    }
    Ok(())
}

/// Errors raised while building a [`SelectionModel`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    /// A numeric parameter was NaN, infinite or negative where not allowed.
    #[error("model parameter {field} has invalid value {value}")]
    InvalidParameter {
        /// Parameter name.
        field: &'static str,
        /// Offending value.
        value: f64,
    },
    /// The big-M constant cannot relax the separation constraint.
    #[error("big-M {big_m} must be at least the minimum separation {min_separation}")]
    BigMTooSmall {
        /// Configured big-M.
        big_m: f64,
        /// Requested minimum separation.
        min_separation: f64,
    },
    /// Too many eligible trails for the quadratic pairwise formulation.
    #[error(
        "{eligible} eligible trails exceed the pairwise separation limit of {limit}; \
         tighten the filters or raise the limit"
    )]
    TooManyCandidates {
        /// Number of eligible trails.
        eligible: usize,
        /// Configured limit.
        limit: usize,
    },
}

/// A solver-ready integer program. Every variable is binary.
///
/// Column order is positional: `x_i` for each eligible trail in input order,
/// then `y_i_j` in lexicographic pair order. Results must be mapped back with
/// the same trail slice the model was built from.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use trailpick_core::{ModelParameters, SelectionModel, Trail};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let trails: Vec<Trail> = (0..3)
///     .map(|i| {
///         Trail::new(format!("t{i}"), format!("Trail {i}"), Coord { x: 0.0, y: f64::from(i) })
///             .map(|t| t.with_length(1.0).with_rating(4.0, 10))
///     })
///     .collect::<Result<_, _>>()?;
///
/// let params = ModelParameters { target_count: 2, ..ModelParameters::default() };
/// let model = SelectionModel::build(&trails, &params)?;
/// assert_eq!(model.registry().len(), 3);
/// assert_eq!(model.constraints().len(), 3);
///
/// let separated = ModelParameters { min_separation: 5.0, ..params };
/// let model = SelectionModel::build(&trails, &separated)?;
/// assert_eq!(model.pair_count(), 3);
/// assert_eq!(model.constraints().len(), 3 + 3 * 4);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionModel {
    registry: VariableRegistry,
    objective: LinearExpr,
    constraints: Vec<Constraint>,
    target_count: u32,
    eligible_count: usize,
}

impl SelectionModel {
    /// Build the model using great-circle distances in miles between trails.
    pub fn build(trails: &[Trail], params: &ModelParameters) -> Result<Self, ModelError> {
        Self::build_with_distances(trails, params, |a, b| a.distance_to(b, DistanceUnit::Miles))
    }

    /// Build the model with a caller-supplied pairwise distance in miles.
    pub fn build_with_distances<F>(
        trails: &[Trail],
        params: &ModelParameters,
        pair_distance: F,
    ) -> Result<Self, ModelError>
    where
        F: Fn(&Trail, &Trail) -> f64,
    {
        params.validate(trails.len())?;

        let mut registry = VariableRegistry::default();
        let selection: Vec<VariableId> = (0..trails.len())
            .map(|i| registry.register(VariableKey::Selection(i)))
            .collect();

        let objective = selection
            .iter()
            .zip(trails)
            .map(|(&x, trail)| (x, params.objective.coefficient(trail)))
            .collect();

        let mut constraints = Vec::with_capacity(3);
        constraints.push(Constraint {
            kind: ConstraintKind::Count,
            pair: None,
            expr: selection.iter().map(|&x| (x, 1.0)).collect(),
            relation: Relation::Equal,
            rhs: f64::from(params.target_count),
        });
        let elevation: LinearExpr = selection
            .iter()
            .zip(trails)
            .map(|(&x, trail)| (x, trail.elevation_gain))
            .collect();
        constraints.push(Constraint {
            kind: ConstraintKind::ElevationLower,
            pair: None,
            expr: elevation.clone(),
            relation: Relation::GreaterOrEqual,
            rhs: params.min_total_elevation,
        });
        constraints.push(Constraint {
            kind: ConstraintKind::ElevationUpper,
            pair: None,
            expr: elevation,
            relation: Relation::LessOrEqual,
            rhs: params.max_total_elevation,
        });

        if params.separation_enabled() {
            add_separation_groups(
                trails,
                &selection,
                params,
                &pair_distance,
                &mut registry,
                &mut constraints,
            );
        }

        log::debug!(
            "built selection model: {} variables, {} constraints",
            registry.len(),
            constraints.len()
        );

        Ok(Self {
            registry,
            objective,
            constraints,
            target_count: params.target_count,
            eligible_count: trails.len(),
        })
    }

    /// Variable registry.
    pub const fn registry(&self) -> &VariableRegistry {
        &self.registry
    }

    /// Objective expression; always maximised.
    pub const fn objective(&self) -> &LinearExpr {
        &self.objective
    }

    /// Constraints in emission order.
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Requested number of selected trails.
    pub const fn target_count(&self) -> u32 {
        self.target_count
    }

    /// Number of eligible trails (selection variables).
    pub const fn eligible_count(&self) -> usize {
        self.eligible_count
    }

    /// Number of binary variables.
    pub fn variable_count(&self) -> usize {
        self.registry.len()
    }

    /// Number of constraints.
    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }

    /// Number of conflict indicators, `N(N-1)/2` when separation is active.
    pub fn pair_count(&self) -> usize {
        self.registry
            .iter()
            .filter(|(_, key, _)| matches!(key, VariableKey::Conflict(..)))
            .count()
    }

    /// Report whether more trails are requested than exist.
    ///
    /// Such a model is still well-formed; the solver boundary reports it as
    /// infeasible.
    pub fn requests_more_than_eligible(&self) -> bool {
        usize::try_from(self.target_count).map_or(true, |target| target > self.eligible_count)
    }

    /// Constraints violated by a column-indexed assignment.
    pub fn violated_constraints(&self, values: &[f64], tolerance: f64) -> Vec<&Constraint> {
        self.constraints
            .iter()
            .filter(|constraint| !constraint.is_satisfied_by(values, tolerance))
            .collect()
    }
}

fn add_separation_groups<F>(
    trails: &[Trail],
    selection: &[VariableId],
    params: &ModelParameters,
    pair_distance: &F,
    registry: &mut VariableRegistry,
    constraints: &mut Vec<Constraint>,
) where
    F: Fn(&Trail, &Trail) -> f64,
{
    let n = trails.len();
    let pairs: Vec<(usize, usize)> = (0..n)
        .flat_map(|i| ((i + 1)..n).map(move |j| (i, j)))
        .collect();
    let indicators: Vec<VariableId> = pairs
        .iter()
        .map(|&(i, j)| registry.register(VariableKey::Conflict(i, j)))
        .collect();

    constraints.reserve(pairs.len() * 4);
    let mut max_distance = 0.0_f64;
    for (&(i, j), &y) in pairs.iter().zip(&indicators) {
        let (Some(&x_i), Some(&x_j), Some(first), Some(second)) =
            (selection.get(i), selection.get(j), trails.get(i), trails.get(j))
        else {
            continue;
        };
        let dist = pair_distance(first, second);
        max_distance = max_distance.max(dist);

        constraints.push(Constraint {
            kind: ConstraintKind::LinkBoth,
            pair: Some((i, j)),
            expr: LinearExpr::new()
                .with_term(y, 1.0)
                .with_term(x_i, -1.0)
                .with_term(x_j, -1.0),
            relation: Relation::GreaterOrEqual,
            rhs: -1.0,
        });
        constraints.push(Constraint {
            kind: ConstraintKind::LinkFirst,
            pair: Some((i, j)),
            expr: LinearExpr::new().with_term(y, 1.0).with_term(x_i, -1.0),
            relation: Relation::LessOrEqual,
            rhs: 0.0,
        });
        constraints.push(Constraint {
            kind: ConstraintKind::LinkSecond,
            pair: Some((i, j)),
            expr: LinearExpr::new().with_term(y, 1.0).with_term(x_j, -1.0),
            relation: Relation::LessOrEqual,
            rhs: 0.0,
        });
        // bigM - bigM*y + dist*y >= min_separation, with bigM moved to the bound.
        constraints.push(Constraint {
            kind: ConstraintKind::Separation,
            pair: Some((i, j)),
            expr: LinearExpr::new().with_term(y, dist - params.big_m),
            relation: Relation::GreaterOrEqual,
            rhs: params.min_separation - params.big_m,
        });
    }

    if params.big_m <= max_distance {
        log::warn!(
            "big-M {} does not exceed the largest pairwise distance {max_distance:.3} miles",
            params.big_m
        );
    }
}

#[cfg(test)]
mod tests;
