//! Mixed-integer linear programming layer.
//!
//! [`MilpModel`] is an arena of variables, named expressions and named
//! constraint families that knows nothing about any solver. A
//! [`SolverBackend`] translates it for an external solver and returns one
//! value per variable and a [`SolveStatus`]:
//!
//! ```text
//!   MilpModel ──build──▶ good_lp problem ──solve──▶ solver ──extract──▶ SolverOutcome
//! ```
//!
//! The default backend uses the pure-Rust `microlp` branch and bound. HiGHS
//! is available behind the `solver-highs` feature.

mod backend;
mod model;

pub use backend::{GoodLpBackend, MilpSolverKind, SolveStatus, SolverBackend, SolverOutcome};
pub use model::{
    Constraint, ExprId, LinearExpr, MilpModel, Relation, VarId, Variable, Violation,
};
