//! Parametric cost engines.
//!
//! Each engine is a stateless service built once from validated
//! configuration and then queried many times while the formulator prices
//! candidate edges and substation capacity tiers.
//!
//! | Engine | Prices |
//! |--------|--------|
//! | [`CableEngine`] | cable type and count for a route, power and polarity |
//! | [`SubstationEngine`] | foundation, converter and marine operations of an offshore substation |
//! | [`PresentValueEngine`] | discounting of a cost stream over the project timeline |
//!
//! All of them produce a [`CostBreakdown`]: the four undiscounted cost
//! components always travel together with their present value.

pub mod cable;
pub mod present_value;
pub mod substation;

pub use cable::{CableEngine, CableLink, CableSelection, CableType};
pub use present_value::{PresentValue, PresentValueEngine};
pub use substation::{SubstationCost, SubstationEngine, SupportStructure};

use owe_core::{Euros, OweError};
use serde::Serialize;
use thiserror::Error;

/// Errors raised by the cost engines.
///
/// All of them are configuration or input errors: an engine never returns a
/// zero cost in place of a failure.
#[derive(Debug, Error)]
pub enum CostError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("no cable type rated at or above {min_voltage_kv} kV in the catalog")]
    EmptyCatalog { min_voltage_kv: f64 },

    #[error("no cable combination of at most {max_cables} cables carries {required_mw} MW over {length_km:.1} km")]
    NoFeasibleCable {
        required_mw: f64,
        length_km: f64,
        max_cables: u32,
    },

    #[error("unrecognized support structure regime for water depth {0} m")]
    UnrecognizedRegime(f64),

    #[error("invalid cost input: {0}")]
    InvalidInput(String),
}

impl From<CostError> for OweError {
    fn from(err: CostError) -> Self {
        OweError::Config(err.to_string())
    }
}

impl From<OweError> for CostError {
    fn from(err: OweError) -> Self {
        match err {
            OweError::Config(message) => CostError::Config(message),
            other => CostError::Config(other.to_string()),
        }
    }
}

/// Undiscounted cost components together with their present value.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct CostBreakdown {
    pub equipment: Euros,
    pub installation: Euros,
    /// Recurring cost per operating year
    pub operational_yearly: Euros,
    pub decommissioning: Euros,
    pub present_value: PresentValue,
}

impl CostBreakdown {
    /// Lifecycle cost used by the objective
    pub fn total(&self) -> Euros {
        self.present_value.total
    }

    /// Sum of the undiscounted one-off costs
    pub fn capital(&self) -> Euros {
        self.equipment + self.installation
    }

    /// Component-wise sum, present values included
    pub fn combined(&self, other: &CostBreakdown) -> CostBreakdown {
        let (a, b) = (&self.present_value, &other.present_value);
        CostBreakdown {
            equipment: self.equipment + other.equipment,
            installation: self.installation + other.installation,
            operational_yearly: self.operational_yearly + other.operational_yearly,
            decommissioning: self.decommissioning + other.decommissioning,
            present_value: PresentValue {
                equipment: a.equipment + b.equipment,
                installation: a.installation + b.installation,
                operational: a.operational + b.operational,
                decommissioning: a.decommissioning + b.decommissioning,
                total: a.total + b.total,
            },
        }
    }
}
