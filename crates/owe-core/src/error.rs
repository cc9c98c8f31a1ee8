//! Unified error type for the offshore grid designer
//!
//! [`OweError`] is the boundary error of the core crates. The taxonomy follows
//! how a run can fail:
//!
//! - configuration errors abort model construction before any solver call
//! - an empty model, once invalid records are dropped, cannot be built
//!
//! Invalid entity records are reported through [`crate::Diagnostics`], not as
//! errors. Infeasibility and solver failures are solve statuses carried by
//! the solution.
//!
//! ```
//! use owe_core::{OweError, OweResult};
//!
//! fn check_ceiling(km: f64) -> OweResult<f64> {
//!     if km <= 0.0 {
//!         return Err(OweError::Config(format!("distance ceiling must be positive, got {km}")));
//!     }
//!     Ok(km)
//! }
//!
//! assert!(check_ceiling(150.0).is_ok());
//! assert!(check_ceiling(-1.0).is_err());
//! ```

use thiserror::Error;

/// Unified error type for all core operations.
#[derive(Error, Debug)]
pub enum OweError {
    /// Missing or invalid coefficient tables, catalog or scalar settings
    #[error("Configuration error: {0}")]
    Config(String),

    /// Nothing valid remains to build a model from
    #[error("No valid configuration: {0}")]
    NoValidConfiguration(String),

    /// I/O errors raised by record loaders
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl OweError {
    /// Configuration errors are fatal for the whole run.
    pub fn is_config(&self) -> bool {
        matches!(self, OweError::Config(_))
    }
}

/// Convenience type alias for Results using OweError.
pub type OweResult<T> = Result<T, OweError>;

impl From<String> for OweError {
    fn from(s: String) -> Self {
        OweError::Config(s)
    }
}
