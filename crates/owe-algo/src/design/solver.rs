//! Design solver entry points.

use super::{formulate, DesignError, DesignProblem, DesignSolution};
use crate::milp::{GoodLpBackend, MilpSolverKind, SolverBackend};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Solver selection and limits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DesignSolverOptions {
    /// Backend name (`microlp`, or `highs` with the solver-highs feature)
    #[serde(default = "default_solver")]
    pub solver: String,
    /// Wall-clock limit for backends that support one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_limit_seconds: Option<f64>,
}

fn default_solver() -> String {
    MilpSolverKind::default().as_str().to_string()
}

impl Default for DesignSolverOptions {
    fn default() -> Self {
        Self::new(MilpSolverKind::default())
    }
}

impl DesignSolverOptions {
    pub fn new(kind: MilpSolverKind) -> Self {
        Self {
            solver: kind.as_str().to_string(),
            time_limit_seconds: None,
        }
    }

    pub fn with_time_limit(mut self, seconds: f64) -> Self {
        self.time_limit_seconds = Some(seconds);
        self
    }

    /// Resolve the configured backend.
    pub fn backend(&self) -> Result<GoodLpBackend, DesignError> {
        let kind = self.solver.parse::<MilpSolverKind>().map_err(DesignError::Config)?;
        if let Some(seconds) = self.time_limit_seconds {
            if !(seconds.is_finite() && seconds > 0.0) {
                return Err(DesignError::Config(format!(
                    "time limit must be positive, got {}",
                    seconds
                )));
            }
        }
        let backend = GoodLpBackend::new(kind);
        Ok(match self.time_limit_seconds {
            Some(seconds) => backend.with_time_limit(seconds),
            None => backend,
        })
    }
}

/// Formulate and solve a design problem with a good_lp backend.
///
/// Infeasible models come back as a solution with
/// [`crate::milp::SolveStatus::Infeasible`]; only configuration and input
/// problems are errors.
pub fn solve_design(
    problem: &DesignProblem,
    options: &DesignSolverOptions,
) -> Result<DesignSolution, DesignError> {
    let backend = options.backend()?;
    solve_design_with(problem, &backend)
}

/// Formulate and solve a design problem with any backend.
pub fn solve_design_with(
    problem: &DesignProblem,
    backend: &dyn SolverBackend,
) -> Result<DesignSolution, DesignError> {
    let formulation = formulate(problem)?;
    let outcome = backend.solve(&formulation.model);
    info!(
        solver = backend.name(),
        status = outcome.status.as_str(),
        seconds = outcome.solve_time.as_secs_f64(),
        "design solve finished"
    );
    Ok(DesignSolution::from_outcome(&formulation, outcome, backend.name()))
}
