//! Radial offshore grid design.
//!
//! This module turns entity records, candidate edges and the cost engines
//! into a mixed-integer program and reads the selected topology back out.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────────────┐
//! │  RADIAL OFFSHORE GRID DESIGN                                           │
//! │                                                                        │
//! │  Decide:                                                               │
//! │    y_w  ∈ {0,1}   wind farm w is connected                             │
//! │    y_s  ∈ {0,1}   offshore substation s is built                       │
//! │    x_ws ∈ {0,1}   inter-array cable w → s (viable pairs only)          │
//! │    x_so ∈ {0,1}   export cable s → o (viable pairs only)               │
//! │    t_sok ∈ {0,1}  capacity tier k is active on export edge s → o       │
//! │                                                                        │
//! │  Minimize:                                                             │
//! │    Σ F_w·y_w + Σ IAC_ws·x_ws + Σ (OSS_s(L_k) + EC_so(L_k))·t_sok       │
//! └────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Constraints
//!
//! ```text
//!   Σ_s x_ws = y_w                          wind farm degree
//!   x_ws ≤ y_w,  x_ws ≤ y_s                 inter-array link
//!   Σ_o x_so = y_s                          substation degree
//!   x_so ≤ y_s,  x_so ≤ eligible_o          export link
//!   Σ_s P_w·x_ws = P_w·y_w                  wind farm capacity
//!   Σ_k t_sok = x_so                        tier selection
//!   Σ_ok L_k·t_sok (= | ≥) Σ_w P_w·x_ws     capacity conservation
//!   x = 0 where the ISO codes differ        ISO match
//!   Σ_w P_w·y_w ≥ max(f·ΣP, P_min)          minimum capacity
//! ```
//!
//! Substation and export cable costs depend on the aggregate capacity of the
//! substation. They are priced per capacity tier (see [`tiers`]) so that the
//! objective stays linear.

mod formulator;
mod problem;
mod solution;
mod solver;
pub mod tiers;

pub use formulator::{
    formulate, ExportCandidate, Formulation, InterArrayCandidate, SubstationTerms, TierOption,
};
pub use problem::{DesignProblem, DesignProblemBuilder};
pub use solution::{
    CableSummary, DesignSolution, SelectedExport, SelectedInterArray, SelectedSubstation,
    SelectedWindFarm,
};
pub use solver::{solve_design, solve_design_with, DesignSolverOptions};
pub use tiers::{CapacityTiers, TierMode};

use crate::cost::CostError;
use owe_core::OweError;
use thiserror::Error;

/// Errors that abort a design run before or instead of a solve.
///
/// Infeasible models are not errors; see [`DesignSolution::status`].
#[derive(Debug, Error)]
pub enum DesignError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Cost(#[from] CostError),

    #[error("No valid configuration: {0}")]
    NoValidConfiguration(String),
}

impl From<OweError> for DesignError {
    fn from(err: OweError) -> Self {
        match err {
            OweError::Config(message) => DesignError::Config(message),
            OweError::NoValidConfiguration(message) => DesignError::NoValidConfiguration(message),
            other => DesignError::Config(other.to_string()),
        }
    }
}

impl From<DesignError> for OweError {
    fn from(err: DesignError) -> Self {
        match err {
            DesignError::Config(message) => OweError::Config(message),
            DesignError::Cost(cost) => cost.into(),
            DesignError::NoValidConfiguration(message) => OweError::NoValidConfiguration(message),
        }
    }
}
