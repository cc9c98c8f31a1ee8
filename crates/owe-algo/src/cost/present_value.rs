//! Discounting over the project timeline.
//!
//! ```text
//! PV = (equip + inst)·f(t_inst) + Σ_{y=t_ops0..=t_ops1} ope·f(y) + deco·f(t_deco)
//! f(y) = (1 + r)^-y
//! ```
//!
//! With the reference timeline (installation 0, operations 5..=29,
//! decommissioning 30) and `r = 0` the total reduces to
//! `equip + inst + 25·ope + deco`.

use super::{CostBreakdown, CostError};
use crate::config::PresentValueConfig;
use owe_core::Euros;
use serde::Serialize;

/// Discounted cost components
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct PresentValue {
    pub equipment: Euros,
    pub installation: Euros,
    pub operational: Euros,
    pub decommissioning: Euros,
    pub total: Euros,
}

/// Discounts cost streams with a fixed timeline and rate.
#[derive(Debug, Clone)]
pub struct PresentValueEngine {
    config: PresentValueConfig,
    /// Σ f(y) over the operating years
    annuity: f64,
}

impl PresentValueEngine {
    pub fn new(config: PresentValueConfig) -> Result<Self, CostError> {
        config.validate()?;
        let rate = config.discount_rate;
        let annuity = (config.operation_start..=config.operation_end)
            .map(|year| discount_factor(rate, year))
            .sum();
        Ok(Self { config, annuity })
    }

    pub fn config(&self) -> &PresentValueConfig {
        &self.config
    }

    /// `(1 + r)^-year`
    pub fn factor(&self, year: u32) -> f64 {
        discount_factor(self.config.discount_rate, year)
    }

    /// Present value of one unit paid every operating year
    pub fn annuity_factor(&self) -> f64 {
        self.annuity
    }

    pub fn evaluate(
        &self,
        equipment: Euros,
        installation: Euros,
        operational_yearly: Euros,
        decommissioning: Euros,
    ) -> PresentValue {
        let install = self.factor(self.config.installation_year);
        let equipment = equipment * install;
        let installation = installation * install;
        let operational = operational_yearly * self.annuity;
        let decommissioning = decommissioning * self.factor(self.config.decommissioning_year);

        PresentValue {
            equipment,
            installation,
            operational,
            decommissioning,
            total: equipment + installation + operational + decommissioning,
        }
    }

    /// Bundle raw components with their present value.
    pub fn breakdown(
        &self,
        equipment: Euros,
        installation: Euros,
        operational_yearly: Euros,
        decommissioning: Euros,
    ) -> CostBreakdown {
        CostBreakdown {
            equipment,
            installation,
            operational_yearly,
            decommissioning,
            present_value: self.evaluate(equipment, installation, operational_yearly, decommissioning),
        }
    }
}

impl Default for PresentValueEngine {
    fn default() -> Self {
        let config = PresentValueConfig::default();
        let annuity = (config.operation_start..=config.operation_end)
            .map(|year| discount_factor(config.discount_rate, year))
            .sum();
        Self { config, annuity }
    }
}

fn discount_factor(rate: f64, year: u32) -> f64 {
    (1.0 + rate).powi(-(year as i32))
}
