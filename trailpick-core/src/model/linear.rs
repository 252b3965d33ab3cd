//! Linear expressions and constraints over registry columns.

use super::registry::VariableId;

/// Ordered sum of `coefficient * variable` terms.
///
/// Terms keep insertion order so the emitted model is deterministic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinearExpr {
    terms: Vec<(VariableId, f64)>,
}

impl LinearExpr {
    /// An expression with no terms.
    pub const fn new() -> Self {
        Self { terms: Vec::new() }
    }

    /// Append `coefficient * variable`.
    #[must_use]
    pub fn with_term(mut self, variable: VariableId, coefficient: f64) -> Self {
        self.push(variable, coefficient);
        self
    }

    /// Append `coefficient * variable` in place.
    pub fn push(&mut self, variable: VariableId, coefficient: f64) {
        self.terms.push((variable, coefficient));
    }

    /// Terms in insertion order.
    pub fn terms(&self) -> &[(VariableId, f64)] {
        &self.terms
    }

    /// Report whether the expression has no terms.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Evaluate against a column-indexed assignment; missing columns count as 0.
    pub fn evaluate(&self, values: &[f64]) -> f64 {
        self.terms
            .iter()
            .map(|(id, coefficient)| coefficient * values.get(id.index()).copied().unwrap_or(0.0))
            .sum()
    }
}

impl FromIterator<(VariableId, f64)> for LinearExpr {
    fn from_iter<I: IntoIterator<Item = (VariableId, f64)>>(iter: I) -> Self {
        Self {
            terms: iter.into_iter().collect(),
        }
    }
}

/// Comparison between a constraint's expression and its bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    /// `=`
    Equal,
    /// `<=`
    LessOrEqual,
    /// `>=`
    GreaterOrEqual,
}

impl Relation {
    /// Operator as written in the LP grammar.
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Equal => "=",
            Self::LessOrEqual => "<=",
            Self::GreaterOrEqual => ">=",
        }
    }

    fn holds(self, lhs: f64, rhs: f64, tolerance: f64) -> bool {
        match self {
            Self::Equal => (lhs - rhs).abs() <= tolerance,
            Self::LessOrEqual => lhs <= rhs + tolerance,
            Self::GreaterOrEqual => lhs + tolerance >= rhs,
        }
    }
}

/// Which part of the formulation produced a constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstraintKind {
    /// Exactly `target_count` trails are selected.
    Count,
    /// Total elevation gain lower bound.
    ElevationLower,
    /// Total elevation gain upper bound.
    ElevationUpper,
    /// `y_ij >= x_i + x_j - 1`.
    LinkBoth,
    /// `y_ij <= x_i`.
    LinkFirst,
    /// `y_ij <= x_j`.
    LinkSecond,
    /// Big-M minimum separation between a selected pair.
    Separation,
}

impl ConstraintKind {
    /// Report whether the kind belongs to a pairwise group.
    pub const fn is_pairwise(self) -> bool {
        matches!(
            self,
            Self::LinkBoth | Self::LinkFirst | Self::LinkSecond | Self::Separation
        )
    }
}

/// `expr <relation> rhs`, with all constants folded into `rhs`.
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    /// Origin of the constraint.
    pub kind: ConstraintKind,
    /// Trail indices `(i, j)` with `i < j` for pairwise constraints.
    pub pair: Option<(usize, usize)>,
    /// Left-hand side.
    pub expr: LinearExpr,
    /// Comparison operator.
    pub relation: Relation,
    /// Right-hand side bound.
    pub rhs: f64,
}

impl Constraint {
    /// Check the constraint against a column-indexed assignment.
    pub fn is_satisfied_by(&self, values: &[f64], tolerance: f64) -> bool {
        self.relation
            .holds(self.expr.evaluate(values), self.rhs, tolerance)
    }
}
