//! Design problem input.

use crate::config::DesignConfig;
use owe_core::{OffshoreSubstation, OnshoreSubstation, Scenario, WindFarm};

/// Entity records plus run configuration.
///
/// Records are taken as loaded; invalid ones are filtered out (and reported)
/// when the problem is formulated.
#[derive(Debug, Clone, Default)]
pub struct DesignProblem {
    pub scenario: Scenario,
    pub config: DesignConfig,
}

impl DesignProblem {
    pub fn new(scenario: Scenario, config: DesignConfig) -> Self {
        Self { scenario, config }
    }

    pub fn num_wind_farms(&self) -> usize {
        self.scenario.wind_farms.len()
    }

    pub fn num_offshore_substations(&self) -> usize {
        self.scenario.offshore.len()
    }

    pub fn num_onshore_substations(&self) -> usize {
        self.scenario.onshore.len()
    }
}

/// Builder for design problems
pub struct DesignProblemBuilder {
    problem: DesignProblem,
}

impl DesignProblemBuilder {
    pub fn new() -> Self {
        Self {
            problem: DesignProblem::default(),
        }
    }

    /// Start from an existing scenario
    pub fn scenario(mut self, scenario: Scenario) -> Self {
        self.problem.scenario = scenario;
        self
    }

    pub fn config(mut self, config: DesignConfig) -> Self {
        self.problem.config = config;
        self
    }

    pub fn wind_farm(mut self, wind_farm: WindFarm) -> Self {
        self.problem.scenario.wind_farms.push(wind_farm);
        self
    }

    pub fn offshore_substation(mut self, substation: OffshoreSubstation) -> Self {
        self.problem.scenario.offshore.push(substation);
        self
    }

    pub fn onshore_substation(mut self, substation: OnshoreSubstation) -> Self {
        self.problem.scenario.onshore.push(substation);
        self
    }

    /// Set the inter-array and export distance ceilings (km)
    pub fn distance_ceilings(mut self, inter_array_km: f64, export_km: f64) -> Self {
        self.problem.config.viability.inter_array_max_km = inter_array_km;
        self.problem.config.viability.export_max_km = export_km;
        self
    }

    /// Share of total wind farm capacity that must be connected
    pub fn min_capacity_fraction(mut self, fraction: f64) -> Self {
        self.problem.config.capacity.min_fraction = fraction;
        self
    }

    pub fn discount_rate(mut self, rate: f64) -> Self {
        self.problem.config.present_value.discount_rate = rate;
        self
    }

    pub fn build(self) -> DesignProblem {
        self.problem
    }
}

impl Default for DesignProblemBuilder {
    fn default() -> Self {
        Self::new()
    }
}
