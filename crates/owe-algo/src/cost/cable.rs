//! Cable sizing and pricing.
//!
//! For a route, a required active power and a polarity the engine picks the
//! cheapest (cable type, parallel count) pair from the catalog:
//!
//! 1. scale the power to W; AC links carry the apparent power `P / pf`
//! 2. drop catalog rows below the minimum voltage of the link
//! 3. per row, `n = max(1, ⌈S / (V·I)⌉)`
//! 4. route length `L = route_multiplier · distance`
//! 5. equipment and installation cost = `€/m · L · n`
//! 6. keep the minimum of equipment + installation, first row on ties
//!
//! The charging-derated model replaces step 3 for AC links: the usable
//! capacity of `n` cables is
//! `√max(0, (√3·V·n·I)² − (½·V²·2πf·C·L)²)` and `n` grows until it covers
//! the requirement or reaches `max_cables`.

use super::{CostBreakdown, CostError, PresentValueEngine};
use crate::config::{CableCapacityModel, CableConfig, CableLinkConfig};
use owe_core::{Euros, Kilometers, Megawatts, Meters, Polarity};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use tracing::trace;

/// One catalog row
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CableType {
    pub voltage_kv: f64,
    pub section_mm2: f64,
    pub resistance_mohm_per_km: f64,
    pub capacitance_nf_per_km: f64,
    pub ampacity_a: f64,
    /// Supply cost (€/m)
    pub equipment_cost_per_m: f64,
    /// Laying cost (€/m)
    pub installation_cost_per_m: f64,
}

impl CableType {
    pub const fn new(
        voltage_kv: f64,
        section_mm2: f64,
        resistance_mohm_per_km: f64,
        capacitance_nf_per_km: f64,
        ampacity_a: f64,
        equipment_cost_per_m: f64,
        installation_cost_per_m: f64,
    ) -> Self {
        Self {
            voltage_kv,
            section_mm2,
            resistance_mohm_per_km,
            capacitance_nf_per_km,
            ampacity_a,
            equipment_cost_per_m,
            installation_cost_per_m,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        let positive = [
            ("voltage_kv", self.voltage_kv),
            ("ampacity_a", self.ampacity_a),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(format!("{} must be positive, got {}", name, value));
            }
        }
        let non_negative = [
            ("section_mm2", self.section_mm2),
            ("resistance_mohm_per_km", self.resistance_mohm_per_km),
            ("capacitance_nf_per_km", self.capacitance_nf_per_km),
            ("equipment_cost_per_m", self.equipment_cost_per_m),
            ("installation_cost_per_m", self.installation_cost_per_m),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(format!("{} must be non-negative, got {}", name, value));
            }
        }
        Ok(())
    }

    #[inline]
    fn voltage_v(&self) -> f64 {
        self.voltage_kv * 1e3
    }

    #[inline]
    fn resistance_ohm_per_m(&self) -> f64 {
        self.resistance_mohm_per_km * 1e-6
    }

    #[inline]
    fn capacitance_f_per_m(&self) -> f64 {
        self.capacitance_nf_per_km * 1e-12
    }

    /// Rated transfer capacity of one cable (VA or W)
    pub fn nominal_capacity(&self) -> f64 {
        self.voltage_v() * self.ampacity_a
    }

    fn charging_derated_capacity(&self, count: u32, route_m: f64, frequency_hz: f64) -> f64 {
        let v = self.voltage_v();
        let thermal = 3f64.sqrt() * v * count as f64 * self.ampacity_a;
        let charging = 0.5 * v * v * 2.0 * PI * frequency_hz * self.capacitance_f_per_m() * route_m;
        (thermal * thermal - charging * charging).max(0.0).sqrt()
    }
}

/// Reference catalog of three-core submarine cables
pub fn default_catalog() -> Vec<CableType> {
    vec![
        CableType::new(132.0, 630.0, 39.5, 209.0, 818.0, 406.0, 335.0),
        CableType::new(132.0, 800.0, 32.4, 217.0, 888.0, 560.0, 340.0),
        CableType::new(132.0, 1000.0, 27.5, 238.0, 949.0, 727.0, 350.0),
        CableType::new(220.0, 500.0, 48.9, 136.0, 732.0, 362.0, 350.0),
        CableType::new(220.0, 630.0, 39.1, 151.0, 808.0, 503.0, 360.0),
        CableType::new(220.0, 800.0, 31.9, 163.0, 879.0, 691.0, 370.0),
        CableType::new(220.0, 1000.0, 27.0, 177.0, 942.0, 920.0, 380.0),
        CableType::new(400.0, 800.0, 31.4, 130.0, 870.0, 860.0, 540.0),
        CableType::new(400.0, 1000.0, 26.5, 140.0, 932.0, 995.0, 555.0),
        CableType::new(400.0, 1200.0, 22.1, 170.0, 986.0, 1130.0, 570.0),
        CableType::new(400.0, 1400.0, 18.9, 180.0, 1015.0, 1265.0, 580.0),
        CableType::new(400.0, 1600.0, 16.6, 190.0, 1036.0, 1400.0, 600.0),
        CableType::new(400.0, 2000.0, 13.2, 200.0, 1078.0, 1535.0, 615.0),
    ]
}

/// Role of a cable in the radial hierarchy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CableLink {
    /// Wind farm to offshore substation
    InterArray,
    /// Offshore substation to onshore substation
    Export,
}

impl std::fmt::Display for CableLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CableLink::InterArray => write!(f, "inter-array"),
            CableLink::Export => write!(f, "export"),
        }
    }
}

/// Chosen cable combination for one route
#[derive(Debug, Clone, Serialize)]
pub struct CableSelection {
    pub cable: CableType,
    /// Position of the chosen row in the catalog
    pub catalog_index: usize,
    pub count: u32,
    pub route_length: Meters,
    /// Power the combination must carry (VA for AC, W for DC)
    pub required_capacity: f64,
    /// Capacity of the whole combination in the same unit
    pub installed_capacity: f64,
    /// Joule losses at full load
    pub resistive_losses: Megawatts,
    /// Losses over transported active power
    pub loss_ratio: f64,
    pub cost: CostBreakdown,
}

/// Sizes and prices cables from an immutable catalog.
#[derive(Debug, Clone)]
pub struct CableEngine {
    config: CableConfig,
    present_value: PresentValueEngine,
}

impl CableEngine {
    /// Fails when the catalog has no row at or above either link's voltage floor.
    pub fn new(config: CableConfig, present_value: PresentValueEngine) -> Result<Self, CostError> {
        config.validate()?;
        for link in [&config.inter_array, &config.export] {
            if !config.catalog.iter().any(|c| c.voltage_kv >= link.min_voltage_kv) {
                return Err(CostError::EmptyCatalog {
                    min_voltage_kv: link.min_voltage_kv,
                });
            }
        }
        Ok(Self {
            config,
            present_value,
        })
    }

    pub fn config(&self) -> &CableConfig {
        &self.config
    }

    /// Sizing settings of a link role
    pub fn link(&self, link: CableLink) -> &CableLinkConfig {
        match link {
            CableLink::InterArray => &self.config.inter_array,
            CableLink::Export => &self.config.export,
        }
    }

    /// Size a cable for a link role using its configured voltage floor and polarity.
    pub fn size(
        &self,
        distance: Kilometers,
        power: Megawatts,
        link: CableLink,
    ) -> Result<CableSelection, CostError> {
        let settings = self.link(link);
        self.size_with(distance, power, settings.polarity, settings.min_voltage_kv)
    }

    /// Lifecycle cost of the cheapest combination for a link role.
    pub fn cost(
        &self,
        distance: Kilometers,
        power: Megawatts,
        link: CableLink,
    ) -> Result<Euros, CostError> {
        Ok(self.size(distance, power, link)?.cost.total())
    }

    /// Size a cable with an explicit polarity and voltage floor.
    pub fn size_with(
        &self,
        distance: Kilometers,
        power: Megawatts,
        polarity: Polarity,
        min_voltage_kv: f64,
    ) -> Result<CableSelection, CostError> {
        if !(power.is_finite() && power.value() > 0.0) {
            return Err(CostError::InvalidInput(format!(
                "required power must be positive and finite, got {}",
                power
            )));
        }
        if !(distance.is_finite() && distance.value() >= 0.0) {
            return Err(CostError::InvalidInput(format!(
                "cable distance must be non-negative and finite, got {}",
                distance
            )));
        }

        let active_w = power.to_watts();
        let required = match polarity {
            Polarity::Ac => active_w / self.config.power_factor,
            Polarity::Dc => active_w,
        };
        let route_m = (distance * self.config.route_multiplier).to_meters().value();
        let derated = polarity == Polarity::Ac
            && self.config.capacity_model == CableCapacityModel::ChargingDerated;

        let mut eligible = 0usize;
        let mut best: Option<(usize, u32, f64)> = None;

        for (index, cable) in self.config.catalog.iter().enumerate() {
            if cable.voltage_kv < min_voltage_kv {
                continue;
            }
            eligible += 1;

            let count = if derated {
                match self.derated_count(cable, required, route_m) {
                    Some(n) => n,
                    None => continue,
                }
            } else {
                nominal_count(cable, required)
            };

            let capital =
                (cable.equipment_cost_per_m + cable.installation_cost_per_m) * route_m * count as f64;
            trace!(
                voltage_kv = cable.voltage_kv,
                section_mm2 = cable.section_mm2,
                count,
                capital,
                "cable candidate"
            );
            // Strict comparison keeps the first row on ties
            if best.map_or(true, |(_, _, cost)| capital < cost) {
                best = Some((index, count, capital));
            }
        }

        if eligible == 0 {
            return Err(CostError::EmptyCatalog { min_voltage_kv });
        }
        let (catalog_index, count, _) = best.ok_or(CostError::NoFeasibleCable {
            required_mw: power.value(),
            length_km: route_m / 1e3,
            max_cables: self.config.max_cables,
        })?;

        let cable = self.config.catalog[catalog_index];
        let installed_capacity = if derated {
            cable.charging_derated_capacity(count, route_m, self.config.frequency_hz)
        } else {
            cable.nominal_capacity() * count as f64
        };

        let current = required / cable.voltage_v();
        let losses_w = current * current * cable.resistance_ohm_per_m() * route_m / count as f64;

        let length = count as f64 * route_m;
        let equipment = Euros(cable.equipment_cost_per_m * length);
        let installation = Euros(cable.installation_cost_per_m * length);
        let operational = equipment * self.config.opex_fraction;
        let decommissioning = installation * self.config.decommissioning_fraction;

        Ok(CableSelection {
            cable,
            catalog_index,
            count,
            route_length: Meters(route_m),
            required_capacity: required,
            installed_capacity,
            resistive_losses: Megawatts(losses_w / 1e6),
            loss_ratio: losses_w / active_w,
            cost: self
                .present_value
                .breakdown(equipment, installation, operational, decommissioning),
        })
    }

    fn derated_count(&self, cable: &CableType, required: f64, route_m: f64) -> Option<u32> {
        (1..=self.config.max_cables).find(|&n| {
            cable.charging_derated_capacity(n, route_m, self.config.frequency_hz) >= required
        })
    }
}

fn nominal_count(cable: &CableType, required: f64) -> u32 {
    let per_cable = cable.nominal_capacity();
    ((required / per_cable).ceil() as u32).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> CableEngine {
        CableEngine::new(CableConfig::default(), PresentValueEngine::default()).unwrap()
    }

    #[test]
    fn test_capacity_covers_requirement() {
        let e = engine();
        for mw in [5.0, 100.0, 400.0, 800.0, 1500.0, 3000.0] {
            for km in [1.0, 20.0, 80.0, 200.0] {
                for link in [CableLink::InterArray, CableLink::Export] {
                    let sel = e.size(Kilometers(km), Megawatts(mw), link).unwrap();
                    assert!(sel.count >= 1);
                    assert!(
                        sel.installed_capacity >= sel.required_capacity,
                        "{mw} MW over {km} km"
                    );
                    assert!(sel.cable.voltage_kv >= e.link(link).min_voltage_kv);
                }
            }
        }
    }

    #[test]
    fn test_cost_monotone_in_distance_and_power() {
        let e = engine();
        let mut previous = 0.0;
        for km in [1.0, 5.0, 10.0, 50.0, 120.0] {
            let cost = e.cost(Kilometers(km), Megawatts(600.0), CableLink::Export).unwrap().value();
            assert!(cost >= previous);
            previous = cost;
        }
        let mut previous = 0.0;
        for mw in [10.0, 200.0, 450.0, 900.0, 2000.0] {
            let cost = e.cost(Kilometers(40.0), Megawatts(mw), CableLink::InterArray).unwrap().value();
            assert!(cost >= previous);
            previous = cost;
        }
    }

    #[test]
    fn test_known_sizing() {
        // 300 MW AC: S = 333.3 MVA. A single 400 kV 800 mm² cable (348 MVA,
        // 860 + 540 €/m) beats 2 x 220 kV 630 mm² (2 x 863 €/m).
        let sel = engine()
            .size_with(Kilometers(10.0), Megawatts(300.0), Polarity::Ac, 132.0)
            .unwrap();
        assert_eq!(sel.catalog_index, 7);
        assert_eq!(sel.count, 1);
        assert!((sel.route_length.value() - 12_000.0).abs() < 1e-6);
        let expected_equipment = 860.0 * 12_000.0;
        assert!((sel.cost.equipment.value() - expected_equipment).abs() < 1e-6);
        assert!((sel.cost.operational_yearly.value() - 0.002 * expected_equipment).abs() < 1e-6);
        assert!((sel.cost.decommissioning.value() - 0.5 * 540.0 * 12_000.0).abs() < 1e-6);

        // Catalog capped at 220 kV: 2 x 630 mm²
        let mut config = CableConfig::default();
        config.catalog.retain(|c| c.voltage_kv <= 220.0);
        config.export.min_voltage_kv = 220.0;
        let capped = CableEngine::new(config, PresentValueEngine::default()).unwrap();
        let sel220 = capped
            .size_with(Kilometers(10.0), Megawatts(300.0), Polarity::Ac, 220.0)
            .unwrap();
        assert_eq!(sel220.cable.voltage_kv, 220.0);
        assert_eq!(sel220.cable.section_mm2, 630.0);
        assert_eq!(sel220.count, 2);
        assert!((sel220.cost.equipment.value() - 2.0 * 503.0 * 12_000.0).abs() < 1e-6);
    }

    #[test]
    fn test_dc_needs_fewer_cables_than_ac() {
        let e = engine();
        let ac = e.size_with(Kilometers(50.0), Megawatts(1000.0), Polarity::Ac, 400.0).unwrap();
        let dc = e.size_with(Kilometers(50.0), Megawatts(1000.0), Polarity::Dc, 400.0).unwrap();
        assert!(dc.required_capacity < ac.required_capacity);
        assert!(dc.cost.total() <= ac.cost.total());
    }

    #[test]
    fn test_voltage_floor_above_catalog_is_error() {
        let result = engine().size_with(Kilometers(10.0), Megawatts(100.0), Polarity::Ac, 525.0);
        assert!(matches!(result, Err(CostError::EmptyCatalog { .. })));
    }

    #[test]
    fn test_invalid_inputs_rejected() {
        let e = engine();
        assert!(e.size(Kilometers(10.0), Megawatts(0.0), CableLink::Export).is_err());
        assert!(e.size(Kilometers(f64::NAN), Megawatts(10.0), CableLink::Export).is_err());
        assert!(e.size(Kilometers(-1.0), Megawatts(10.0), CableLink::Export).is_err());
    }

    #[test]
    fn test_losses_reported() {
        let sel = engine().size(Kilometers(30.0), Megawatts(500.0), CableLink::Export).unwrap();
        assert!(sel.resistive_losses.value() > 0.0);
        assert!(sel.loss_ratio > 0.0 && sel.loss_ratio < 0.1);
    }

    #[test]
    fn test_charging_derated_model() {
        let mut config = CableConfig::default();
        config.capacity_model = CableCapacityModel::ChargingDerated;
        let derated = CableEngine::new(config, PresentValueEngine::default()).unwrap();

        let sel = derated.size(Kilometers(60.0), Megawatts(800.0), CableLink::Export).unwrap();
        assert!(sel.installed_capacity >= sel.required_capacity);

        // Long AC routes are eventually consumed by charging current
        let err = derated.size(Kilometers(50_000.0), Megawatts(800.0), CableLink::Export);
        assert!(matches!(err, Err(CostError::NoFeasibleCable { .. })));

        // DC is unaffected by the model
        let dc = derated
            .size_with(Kilometers(50_000.0), Megawatts(800.0), Polarity::Dc, 400.0)
            .unwrap();
        assert!(dc.count >= 1);
    }

    #[test]
    fn test_custom_catalog_from_config() {
        let mut config = CableConfig::default();
        config.catalog = vec![CableType::new(66.0, 400.0, 50.0, 200.0, 600.0, 200.0, 150.0)];
        config.inter_array.min_voltage_kv = 66.0;

        // The export floor (400 kV) leaves nothing in a 66 kV catalog
        let err = CableEngine::new(config.clone(), PresentValueEngine::default()).unwrap_err();
        assert!(matches!(err, CostError::EmptyCatalog { min_voltage_kv } if min_voltage_kv == 400.0));

        config.export.min_voltage_kv = 66.0;
        let e = CableEngine::new(config, PresentValueEngine::default()).unwrap();
        let sel = e.size(Kilometers(5.0), Megawatts(50.0), CableLink::InterArray).unwrap();
        assert_eq!(sel.cable.voltage_kv, 66.0);
        assert_eq!(sel.count, 2);
    }
}
