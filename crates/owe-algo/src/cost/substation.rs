//! Offshore substation pricing.
//!
//! The support structure follows from the water depth:
//!
//! | Depth          | Structure   | Marine spread                        |
//! |----------------|-------------|--------------------------------------|
//! | < 30 m         | sand island | self-unloading bulk vessel (SUBV)    |
//! | [30 m, 150 m)  | jacket      | platform installation vessel (PSIV)  |
//! | ≥ 150 m        | floating    | heavy lift (HLCV) + anchor handling (AHV) |
//!
//! Foundation cost scales with the *equivalent* capacity (halved for AC
//! stations), converter cost with the rated capacity. Ice cover inflates
//! the foundation by 10 %. Installation and decommissioning are priced from
//! vessel time at a day rate.

use super::{CostBreakdown, CostError, PresentValueEngine};
use crate::config::{
    BulkVesselCoefficients, StructureCoefficients, SubstationCoefficients, SubstationConfig,
    VesselCoefficients, VesselFleet,
};
use owe_core::{Euros, Kilometers, Megawatts, Meters, OffshoreSubstation, Polarity};
use serde::Serialize;
use std::f64::consts::PI;
use tracing::trace;

/// Foundation regime of an offshore substation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SupportStructure {
    SandIsland,
    Jacket,
    Floating,
}

impl SupportStructure {
    /// Regime for a water depth; non-finite depths have none.
    pub fn from_depth(depth: Meters, coefficients: &SubstationCoefficients) -> Result<Self, CostError> {
        let d = depth.value();
        if !d.is_finite() {
            return Err(CostError::UnrecognizedRegime(d));
        }
        if d < coefficients.sand_island_max_depth_m {
            Ok(SupportStructure::SandIsland)
        } else if d < coefficients.jacket_max_depth_m {
            Ok(SupportStructure::Jacket)
        } else {
            Ok(SupportStructure::Floating)
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SupportStructure::SandIsland => "sand_island",
            SupportStructure::Jacket => "jacket",
            SupportStructure::Floating => "floating",
        }
    }
}

impl std::fmt::Display for SupportStructure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Priced substation
#[derive(Debug, Clone, Serialize)]
pub struct SubstationCost {
    pub structure: SupportStructure,
    pub polarity: Polarity,
    pub capacity: Megawatts,
    pub equivalent_capacity: Megawatts,
    /// Support structure, ice adaptation included
    pub foundation: Euros,
    pub converter: Euros,
    pub cost: CostBreakdown,
}

/// Prices offshore substations from configured coefficient tables.
#[derive(Debug, Clone)]
pub struct SubstationEngine {
    config: SubstationConfig,
    present_value: PresentValueEngine,
}

impl SubstationEngine {
    pub fn new(config: SubstationConfig, present_value: PresentValueEngine) -> Result<Self, CostError> {
        config.validate()?;
        Ok(Self {
            config,
            present_value,
        })
    }

    pub fn config(&self) -> &SubstationConfig {
        &self.config
    }

    pub fn structure(&self, depth: Meters) -> Result<SupportStructure, CostError> {
        SupportStructure::from_depth(depth, &self.config.coefficients)
    }

    /// Price a site at a given aggregate capacity with the configured polarity.
    pub fn price_site(&self, site: &OffshoreSubstation, capacity: Megawatts) -> Result<SubstationCost, CostError> {
        self.price(
            site.water_depth,
            site.ice_cover,
            site.port_distance,
            capacity,
            self.config.polarity,
        )
    }

    /// Lifecycle cost of a site at a given aggregate capacity.
    pub fn cost(&self, site: &OffshoreSubstation, capacity: Megawatts) -> Result<Euros, CostError> {
        Ok(self.price_site(site, capacity)?.cost.total())
    }

    pub fn price(
        &self,
        depth: Meters,
        ice_cover: bool,
        port_distance: Kilometers,
        capacity: Megawatts,
        polarity: Polarity,
    ) -> Result<SubstationCost, CostError> {
        if !(capacity.is_finite() && capacity.value() >= 0.0) {
            return Err(CostError::InvalidInput(format!(
                "substation capacity must be non-negative and finite, got {}",
                capacity
            )));
        }
        if !(port_distance.is_finite() && port_distance.value() >= 0.0) {
            return Err(CostError::InvalidInput(format!(
                "port distance must be non-negative and finite, got {}",
                port_distance
            )));
        }

        let c = &self.config.coefficients;
        let structure = self.structure(depth)?;
        let d = depth.value();
        let equivalent = match polarity {
            Polarity::Ac => capacity * c.ac_equivalent_factor,
            Polarity::Dc => capacity,
        };

        let island_volume = match structure {
            SupportStructure::SandIsland => Some(self.island_volume(d, equivalent)),
            _ => None,
        };

        let mut foundation = match structure {
            SupportStructure::SandIsland => {
                let area = c.sand_island.area_per_mw * equivalent.value();
                let volume = island_volume.unwrap_or_default();
                c.sand_island.volume_cost * volume + c.sand_island.area_cost * area
            }
            SupportStructure::Jacket => structure_cost(&c.jacket, d, equivalent.value()),
            SupportStructure::Floating => structure_cost(&c.floating, d, equivalent.value()),
        };
        if ice_cover {
            foundation *= c.ice_cover_factor;
        }

        let conv = c.converter(polarity);
        let converter = conv.c5 * capacity.value() * 1e3 + conv.c6 * 1e6;

        let pd = port_distance.value();
        let installation = marine_cost(&c.installation, structure, pd, island_volume);
        let decommissioning = marine_cost(&c.decommissioning, structure, pd, island_volume);

        let mut operational = c.opex_converter_fraction * converter;
        if structure == SupportStructure::SandIsland {
            operational += c.opex_sand_island_fraction * foundation;
        }

        trace!(
            %structure,
            capacity_mw = capacity.value(),
            foundation,
            converter,
            installation,
            "substation priced"
        );

        Ok(SubstationCost {
            structure,
            polarity,
            capacity,
            equivalent_capacity: equivalent,
            foundation: Euros(foundation),
            converter: Euros(converter),
            cost: self.present_value.breakdown(
                Euros(foundation + converter),
                Euros(installation),
                Euros(operational),
                Euros(decommissioning),
            ),
        })
    }

    /// Fill volume of a conical sand island (m³). Emerged sites count as depth zero.
    fn island_volume(&self, depth_m: f64, equivalent: Megawatts) -> f64 {
        let island = &self.config.coefficients.sand_island;
        let area = island.area_per_mw * equivalent.value();
        let r_hub = (area / PI).sqrt();
        let r_seabed = r_hub + (depth_m.max(0.0) + island.freeboard_m) / island.slope;
        (1.0 / 3.0) * island.slope * PI * (r_seabed.powi(3) - r_hub.powi(3))
    }
}

fn structure_cost(c: &StructureCoefficients, depth_m: f64, equivalent_mw: f64) -> f64 {
    (c.c1 * depth_m + c.c2 * 1e3) * equivalent_mw + (c.c3 * depth_m + c.c4 * 1e3)
}

fn vessel_cost(v: &VesselCoefficients, port_distance_km: f64) -> f64 {
    let hours = (1.0 / v.capacity) * (2.0 * port_distance_km / v.speed_kmh + v.load_time_h) + v.site_time_h;
    hours * v.day_rate_keur * 1e3 / 24.0
}

fn bulk_vessel_cost(v: &BulkVesselCoefficients, port_distance_km: f64, volume_m3: f64) -> f64 {
    let hours = (volume_m3 / v.capacity_m3) * (2.0 * port_distance_km / v.speed_kmh)
        + volume_m3 / v.loading_rate_m3h
        + volume_m3 / v.unloading_rate_m3h;
    hours * v.day_rate_keur * 1e3 / 24.0
}

fn marine_cost(
    fleet: &VesselFleet,
    structure: SupportStructure,
    port_distance_km: f64,
    island_volume: Option<f64>,
) -> f64 {
    match structure {
        SupportStructure::SandIsland => {
            bulk_vessel_cost(&fleet.subv, port_distance_km, island_volume.unwrap_or_default())
        }
        SupportStructure::Jacket => vessel_cost(&fleet.psiv, port_distance_km),
        SupportStructure::Floating => {
            vessel_cost(&fleet.hlcv, port_distance_km) + vessel_cost(&fleet.ahv, port_distance_km)
        }
    }
}
