//! Parsing of `lp_solve` exit codes and textual reports.

use trailpick_core::{SolverError, SolverOutput, SolverStatus};

const OBJECTIVE_PREFIX: &str = "Value of objective function:";
const VARIABLES_HEADER: &str = "Actual values of the variables:";

/// `lp_solve` exit codes.
pub mod exit_code {
    /// Proven optimum.
    pub const OPTIMAL: i32 = 0;
    /// Feasible but not proven optimal.
    pub const SUBOPTIMAL: i32 = 1;
    /// No feasible solution.
    pub const INFEASIBLE: i32 = 2;
    /// Objective is unbounded.
    pub const UNBOUNDED: i32 = 3;
    /// Time limit reached.
    pub const TIMEOUT: i32 = 7;
}

/// Map an exit code to a solver status.
///
/// Unbounded models cannot arise from a well-formed selection model, so they
/// are reported as faults together with any unrecognised code.
pub fn status_for_exit(code: i32, stderr: &str) -> Result<SolverStatus, SolverError> {
    match code {
        exit_code::OPTIMAL => Ok(SolverStatus::Optimal),
        exit_code::SUBOPTIMAL => Ok(SolverStatus::Suboptimal),
        exit_code::INFEASIBLE => Ok(SolverStatus::Infeasible),
        exit_code::TIMEOUT => Ok(SolverStatus::Timeout),
        exit_code::UNBOUNDED => Err(SolverError::SolverFault {
            code: Some(code),
            detail: "model is unbounded".to_owned(),
        }),
        _ => Err(SolverError::SolverFault {
            code: Some(code),
            detail: stderr.trim().to_owned(),
        }),
    }
}

/// Build solver output from an exit code and the captured stdout.
///
/// Reports are parsed only for statuses that carry a solution.
pub fn parse_output(code: i32, stdout: &str, stderr: &str) -> Result<SolverOutput, SolverError> {
    let status = status_for_exit(code, stderr)?;
    match status {
        SolverStatus::Optimal | SolverStatus::Suboptimal => {
            let (objective, values) = parse_report(stdout)?;
            Ok(SolverOutput {
                status,
                objective,
                values,
            })
        }
        SolverStatus::Timeout | SolverStatus::Infeasible => {
            Ok(SolverOutput::status_only(status))
        }
    }
}

/// Extract the objective value and variable block from a report.
///
/// When the report holds several solution blocks the last one wins.
pub fn parse_report(stdout: &str) -> Result<(Option<f64>, Vec<(String, f64)>), SolverError> {
    let mut objective = None;
    let mut values = Vec::new();
    let mut in_variables = false;

    for line in stdout.lines() {
        let trimmed = line.trim();
        if let Some(rest) = trimmed.strip_prefix(OBJECTIVE_PREFIX) {
            objective = Some(parse_number(rest.trim(), "objective value")?);
            in_variables = false;
            continue;
        }
        if trimmed == VARIABLES_HEADER {
            values.clear();
            in_variables = true;
            continue;
        }
        if !in_variables {
            continue;
        }
        if trimmed.is_empty() || trimmed.ends_with(':') {
            in_variables = false;
            continue;
        }
        let mut fields = trimmed.split_whitespace();
        match (fields.next(), fields.next(), fields.next()) {
            (Some(name), Some(value), None) => {
                values.push((name.to_owned(), parse_number(value, name)?));
            }
            _ => {
                return Err(SolverError::MalformedOutput {
                    reason: format!("unexpected variable line `{trimmed}`"),
                });
            }
        }
    }

    if objective.is_none() && values.is_empty() {
        return Err(SolverError::MalformedOutput {
            reason: "report has neither an objective value nor variable values".to_owned(),
        });
    }
    Ok((objective, values))
}

fn parse_number(raw: &str, what: &str) -> Result<f64, SolverError> {
    raw.parse().map_err(|_| SolverError::MalformedOutput {
        reason: format!("cannot parse {what} from `{raw}`"),
    })
}
