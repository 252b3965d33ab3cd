//! Text emitter for the `lp_solve` LP format.
//!
//! The output is one statement per line:
//!
//! ```text
//! max: 10*x_0 + 20*x_1 + 30*x_2;
//! count: x_0 + x_1 + x_2 = 2;
//! elev_min: 100*x_0 + 200*x_1 + 300*x_2 >= 0;
//! elev_max: 100*x_0 + 200*x_1 + 300*x_2 <= 1e30;
//! bin x_0,x_1,x_2;
//! ```
//!
//! Every row carries a label: `lp_solve` reads an unlabelled single-variable
//! relation as a bound, which the `bin` section then overrides.

use std::fmt::{self, Write};

use thiserror::Error;

use crate::model::{Constraint, ConstraintKind, LinearExpr, SelectionModel, VariableRegistry};

/// Bound written for infinite right-hand sides.
pub const LP_INFINITY: &str = "1e30";

/// Largest magnitude printed in integer form.
const INTEGRAL_LIMIT: f64 = 1e15;

/// Errors raised while rendering a model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LpError {
    /// The model has no variables, so every row would be a bare constant.
    #[error("model has no variables; there are no eligible trails to select from")]
    EmptyModel,
    /// The underlying writer failed or a term named an unregistered variable.
    #[error("failed to format LP text")]
    Format(#[from] fmt::Error),
}

/// Render `model` as LP text.
///
/// # Errors
/// [`LpError::EmptyModel`] when the model has no variables.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use trailpick_core::{ModelParameters, SelectionModel, Trail, emit_lp};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let trail = Trail::new("a", "A", Coord { x: 0.0, y: 0.0 })?.with_rating(4.0, 10);
/// let params = ModelParameters { target_count: 1, ..ModelParameters::default() };
/// let text = emit_lp(&SelectionModel::build(&[trail], &params)?)?;
/// assert_eq!(text.lines().next(), Some("max: 10*x_0;"));
/// assert_eq!(text.lines().nth(1), Some("count: x_0 = 1;"));
/// assert!(text.ends_with("bin x_0;\n"));
/// # Ok(())
/// # }
/// ```
pub fn emit_lp(model: &SelectionModel) -> Result<String, LpError> {
    let mut out = String::new();
    write_lp(model, &mut out)?;
    Ok(out)
}

/// Write `model` as LP text to `out`.
///
/// # Errors
/// [`LpError::EmptyModel`] when the model has no variables, or
/// [`LpError::Format`] when `out` fails.
pub fn write_lp<W: Write>(model: &SelectionModel, out: &mut W) -> Result<(), LpError> {
    let registry = model.registry();
    if registry.is_empty() {
        return Err(LpError::EmptyModel);
    }
    writeln!(out, "max: {};", Terms(model.objective(), registry))?;
    for constraint in model.constraints() {
        writeln!(
            out,
            "{}: {} {} {};",
            RowLabel(constraint),
            Terms(&constraint.expr, registry),
            constraint.relation.symbol(),
            Number(constraint.rhs)
        )?;
    }
    out.write_str("bin ")?;
    for (position, (_, _, name)) in registry.iter().enumerate() {
        if position > 0 {
            out.write_char(',')?;
        }
        out.write_str(name)?;
    }
    out.write_str(";\n")?;
    Ok(())
}

/// Display adapter for a row name.
struct RowLabel<'a>(&'a Constraint);

impl fmt::Display for RowLabel<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stem = match self.0.kind {
            ConstraintKind::Count => "count",
            ConstraintKind::ElevationLower => "elev_min",
            ConstraintKind::ElevationUpper => "elev_max",
            ConstraintKind::LinkBoth => "both",
            ConstraintKind::LinkFirst => "first",
            ConstraintKind::LinkSecond => "second",
            ConstraintKind::Separation => "sep",
        };
        f.write_str(stem)?;
        match self.0.pair {
            Some((i, j)) => write!(f, "_{i}_{j}"),
            None => Ok(()),
        }
    }
}

/// Display adapter for an expression.
struct Terms<'a>(&'a LinearExpr, &'a VariableRegistry);

impl fmt::Display for Terms<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self(expr, registry) = self;
        if expr.is_empty() {
            return f.write_str("0");
        }
        for (position, &(id, coefficient)) in expr.terms().iter().enumerate() {
            let name = registry.name(id).ok_or(fmt::Error)?;
            let magnitude = coefficient.abs();
            match (position, coefficient.is_sign_negative()) {
                (0, false) => {}
                (0, true) => f.write_str("-")?,
                (_, false) => f.write_str(" + ")?,
                (_, true) => f.write_str(" - ")?,
            }
            if magnitude == 1.0 {
                f.write_str(name)?;
            } else {
                write!(f, "{}*{name}", Number(magnitude))?;
            }
        }
        Ok(())
    }
}

/// Display adapter for an LP number.
struct Number(f64);

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = self.0;
        if value.is_infinite() {
            return if value.is_sign_negative() {
                write!(f, "-{LP_INFINITY}")
            } else {
                f.write_str(LP_INFINITY)
            };
        }
        if value == 0.0 {
            return f.write_str("0");
        }
        if value.fract() == 0.0 && value.abs() < INTEGRAL_LIMIT {
            write!(f, "{value:.0}")
        } else {
            write!(f, "{value:.6}")
        }
    }
}
