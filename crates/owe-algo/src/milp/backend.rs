//! Solver adapters.
//!
//! A backend takes a [`MilpModel`], translates it for an external solver,
//! solves it and hands back one value per variable plus a termination
//! status. Infeasibility is a status, never an error.

use super::model::{MilpModel, Relation};
use good_lp::solvers::microlp::microlp;
use good_lp::{
    constraint, variable, Expression, ProblemVariables, ResolutionError, Solution, SolutionStatus,
    Solver, SolverModel, Variable,
};
use serde::Serialize;
use std::time::{Duration, Instant};
use tracing::debug;

#[cfg(feature = "solver-highs")]
use good_lp::solvers::highs::highs as highs_solver;

/// Termination status of a solve
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "message", rename_all = "lowercase")]
pub enum SolveStatus {
    Optimal,
    /// Feasible but not proven optimal (time limit, gap)
    Feasible,
    Infeasible,
    /// Solver crash, unbounded model or unsupported input
    Error(String),
}

impl SolveStatus {
    /// An assignment is available
    pub fn has_solution(&self) -> bool {
        matches!(self, SolveStatus::Optimal | SolveStatus::Feasible)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SolveStatus::Optimal => "optimal",
            SolveStatus::Feasible => "feasible",
            SolveStatus::Infeasible => "infeasible",
            SolveStatus::Error(_) => "error",
        }
    }
}

impl std::fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolveStatus::Error(message) => write!(f, "error: {}", message),
            other => f.write_str(other.as_str()),
        }
    }
}

/// Raw result of a backend call
#[derive(Debug, Clone)]
pub struct SolverOutcome {
    pub status: SolveStatus,
    /// One value per model variable; empty without a solution
    pub values: Vec<f64>,
    pub solve_time: Duration,
}

/// Build, solve and extract through an external solver.
pub trait SolverBackend {
    fn name(&self) -> &'static str;
    fn solve(&self, model: &MilpModel) -> SolverOutcome;
}

/// good_lp solvers compiled into this build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MilpSolverKind {
    /// Pure-Rust branch and bound
    #[default]
    Microlp,
    #[cfg(feature = "solver-highs")]
    Highs,
}

impl MilpSolverKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MilpSolverKind::Microlp => "microlp",
            #[cfg(feature = "solver-highs")]
            MilpSolverKind::Highs => "highs",
        }
    }

    /// Names accepted by [`std::str::FromStr`] in this build
    pub fn available() -> &'static [&'static str] {
        &[
            "microlp",
            #[cfg(feature = "solver-highs")]
            "highs",
        ]
    }
}

impl std::str::FromStr for MilpSolverKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "microlp" => Ok(MilpSolverKind::Microlp),
            "highs" => {
                #[cfg(feature = "solver-highs")]
                {
                    Ok(MilpSolverKind::Highs)
                }
                #[cfg(not(feature = "solver-highs"))]
                {
                    Err("solver 'highs' requires the solver-highs feature".to_string())
                }
            }
            other => Err(format!(
                "unknown MILP solver '{}'; available: {}",
                other,
                Self::available().join(", ")
            )),
        }
    }
}

/// Adapter over the good_lp modelling layer
#[derive(Debug, Clone, Default)]
pub struct GoodLpBackend {
    kind: MilpSolverKind,
    time_limit_seconds: Option<f64>,
}

impl GoodLpBackend {
    pub fn new(kind: MilpSolverKind) -> Self {
        Self {
            kind,
            time_limit_seconds: None,
        }
    }

    /// Wall-clock limit, honoured by solvers that support one
    pub fn with_time_limit(mut self, seconds: f64) -> Self {
        self.time_limit_seconds = Some(seconds);
        self
    }

    pub fn kind(&self) -> MilpSolverKind {
        self.kind
    }
}

impl SolverBackend for GoodLpBackend {
    fn name(&self) -> &'static str {
        self.kind.as_str()
    }

    fn solve(&self, model: &MilpModel) -> SolverOutcome {
        let start = Instant::now();
        let result = match self.kind {
            MilpSolverKind::Microlp => {
                if self.time_limit_seconds.is_some() {
                    debug!("microlp ignores the time limit");
                }
                solve_with(model, microlp, |problem| problem)
            }
            #[cfg(feature = "solver-highs")]
            MilpSolverKind::Highs => {
                let limit = self.time_limit_seconds;
                solve_with(model, highs_solver, move |problem| match limit {
                    Some(seconds) => problem.set_time_limit(seconds),
                    None => problem,
                })
            }
        };
        let solve_time = start.elapsed();

        match result {
            Ok((status, values)) => SolverOutcome {
                status: status_from_solution(status),
                values,
                solve_time,
            },
            Err(err) => SolverOutcome {
                status: status_from_error(err),
                values: Vec::new(),
                solve_time,
            },
        }
    }
}

/// A solver that stops on a limit still returns its incumbent
fn status_from_solution(status: SolutionStatus) -> SolveStatus {
    match status {
        SolutionStatus::Optimal => SolveStatus::Optimal,
        SolutionStatus::TimeLimit | SolutionStatus::GapLimit => SolveStatus::Feasible,
    }
}

fn status_from_error(err: ResolutionError) -> SolveStatus {
    match err {
        ResolutionError::Infeasible => SolveStatus::Infeasible,
        ResolutionError::Unbounded => SolveStatus::Error("model is unbounded".to_string()),
        other => SolveStatus::Error(other.to_string()),
    }
}

fn to_expression(expr: &super::model::LinearExpr, handles: &[Variable]) -> Expression {
    let mut out = Expression::from(expr.constant_term());
    for &(var, coefficient) in expr.terms() {
        out += coefficient * handles[var.index()];
    }
    out
}

fn solve_with<S, F>(
    model: &MilpModel,
    solver: S,
    configure: F,
) -> Result<(SolutionStatus, Vec<f64>), ResolutionError>
where
    S: Solver,
    S::Model: SolverModel<Error = ResolutionError>,
    F: FnOnce(S::Model) -> S::Model,
{
    let mut vars = ProblemVariables::new();
    let handles: Vec<Variable> = model
        .variables()
        .iter()
        .map(|_| vars.add(variable().binary()))
        .collect();

    let objective = to_expression(model.objective(), &handles);
    let mut problem = configure(vars.minimise(objective).using(solver));

    for c in model.constraints() {
        let lhs = to_expression(&c.lhs, &handles);
        let rhs = c.rhs;
        problem = match c.relation {
            Relation::Le => problem.with(constraint!(lhs <= rhs)),
            Relation::Ge => problem.with(constraint!(lhs >= rhs)),
            Relation::Eq => problem.with(constraint!(lhs == rhs)),
        };
    }

    let solution = problem.solve()?;
    let values = handles.iter().map(|v| solution.value(*v)).collect();
    Ok((solution.status(), values))
}
