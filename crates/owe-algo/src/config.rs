//! Run configuration for the offshore grid designer.
//!
//! Every scalar and coefficient table the engines read lives here, with the
//! reference values as defaults. A TOML file only needs to name the values
//! it overrides:
//!
//! ```toml
//! [viability]
//! export_max_km = 250.0
//!
//! [capacity]
//! min_fraction = 0.8
//!
//! [cables.export]
//! polarity = "dc"
//! ```
//!
//! Call [`DesignConfig::validate`] before building engines; configuration
//! errors are fatal and must never degrade into a zero cost.

use crate::cost::cable::{default_catalog, CableType};
use owe_core::{OweError, OweResult, Polarity};
use serde::{Deserialize, Serialize};

/// Complete configuration of one design run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DesignConfig {
    #[serde(default)]
    pub viability: ViabilityConfig,
    #[serde(default)]
    pub capacity: CapacityConfig,
    #[serde(default)]
    pub present_value: PresentValueConfig,
    #[serde(default)]
    pub cables: CableConfig,
    #[serde(default)]
    pub substation: SubstationConfig,
    #[serde(default)]
    pub tiers: TierConfig,
}

impl DesignConfig {
    /// Check every section, returning the first configuration error.
    pub fn validate(&self) -> OweResult<()> {
        self.viability.validate()?;
        self.capacity.validate()?;
        self.present_value.validate()?;
        self.cables.validate()?;
        self.substation.validate()?;
        self.tiers.validate()?;
        Ok(())
    }
}

fn config_error(message: impl Into<String>) -> OweError {
    OweError::Config(message.into())
}

fn require_finite(name: &str, value: f64) -> OweResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(config_error(format!("{} must be finite, got {}", name, value)))
    }
}

fn require_positive(name: &str, value: f64) -> OweResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(config_error(format!("{} must be positive, got {}", name, value)))
    }
}

fn require_non_negative(name: &str, value: f64) -> OweResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(config_error(format!("{} must be non-negative, got {}", name, value)))
    }
}

// ============================================================================
// Viability
// ============================================================================

/// Distance ceilings for candidate edges
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViabilityConfig {
    /// Maximum wind farm to offshore substation distance
    #[serde(default = "default_inter_array_max_km")]
    pub inter_array_max_km: f64,
    /// Maximum offshore to onshore substation distance
    #[serde(default = "default_export_max_km")]
    pub export_max_km: f64,
}

impl Default for ViabilityConfig {
    fn default() -> Self {
        Self {
            inter_array_max_km: default_inter_array_max_km(),
            export_max_km: default_export_max_km(),
        }
    }
}

fn default_inter_array_max_km() -> f64 {
    150.0
}

fn default_export_max_km() -> f64 {
    300.0
}

impl ViabilityConfig {
    pub fn validate(&self) -> OweResult<()> {
        require_non_negative("viability.inter_array_max_km", self.inter_array_max_km)?;
        require_non_negative("viability.export_max_km", self.export_max_km)
    }
}

// ============================================================================
// Capacity
// ============================================================================

/// Capacity requirements on the selected design
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapacityConfig {
    /// Share of the total wind farm capacity that must be connected.
    /// Values above 1 are accepted and make the model infeasible.
    #[serde(default = "default_min_fraction")]
    pub min_fraction: f64,
    /// Absolute floor in MW; the larger of both requirements applies
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_mw: Option<f64>,
    /// Upper bound on the aggregate capacity of any single offshore substation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_substation_mw: Option<f64>,
}

impl Default for CapacityConfig {
    fn default() -> Self {
        Self {
            min_fraction: default_min_fraction(),
            min_mw: None,
            max_substation_mw: None,
        }
    }
}

fn default_min_fraction() -> f64 {
    0.5
}

impl CapacityConfig {
    pub fn validate(&self) -> OweResult<()> {
        require_non_negative("capacity.min_fraction", self.min_fraction)?;
        if let Some(mw) = self.min_mw {
            require_non_negative("capacity.min_mw", mw)?;
        }
        if let Some(mw) = self.max_substation_mw {
            require_positive("capacity.max_substation_mw", mw)?;
        }
        Ok(())
    }

    /// Required connected capacity for a given total potential
    pub fn required_mw(&self, total_mw: f64) -> f64 {
        let from_fraction = self.min_fraction * total_mw;
        match self.min_mw {
            Some(mw) => from_fraction.max(mw),
            None => from_fraction,
        }
    }
}

// ============================================================================
// Present value
// ============================================================================

/// Project timeline and discount rate.
///
/// Years are relative to the installation year. Operations run over the
/// inclusive range `operation_start..=operation_end`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresentValueConfig {
    #[serde(default = "default_discount_rate")]
    pub discount_rate: f64,
    #[serde(default)]
    pub installation_year: u32,
    #[serde(default = "default_operation_start")]
    pub operation_start: u32,
    #[serde(default = "default_operation_end")]
    pub operation_end: u32,
    #[serde(default = "default_decommissioning_year")]
    pub decommissioning_year: u32,
    #[serde(default = "default_end_year")]
    pub end_year: u32,
}

impl Default for PresentValueConfig {
    fn default() -> Self {
        Self {
            discount_rate: default_discount_rate(),
            installation_year: 0,
            operation_start: default_operation_start(),
            operation_end: default_operation_end(),
            decommissioning_year: default_decommissioning_year(),
            end_year: default_end_year(),
        }
    }
}

fn default_discount_rate() -> f64 {
    0.05
}

fn default_operation_start() -> u32 {
    5
}

fn default_operation_end() -> u32 {
    29
}

fn default_decommissioning_year() -> u32 {
    30
}

fn default_end_year() -> u32 {
    32
}

impl PresentValueConfig {
    pub fn validate(&self) -> OweResult<()> {
        require_finite("present_value.discount_rate", self.discount_rate)?;
        if self.discount_rate <= -1.0 {
            return Err(config_error(format!(
                "present_value.discount_rate must be greater than -1, got {}",
                self.discount_rate
            )));
        }
        let ordered = self.installation_year <= self.operation_start
            && self.operation_start <= self.operation_end
            && self.operation_end <= self.decommissioning_year
            && self.decommissioning_year <= self.end_year;
        if !ordered {
            return Err(config_error(format!(
                "present_value timeline must be ordered (installation {} <= operation {}..={} <= decommissioning {} <= end {})",
                self.installation_year,
                self.operation_start,
                self.operation_end,
                self.decommissioning_year,
                self.end_year
            )));
        }
        Ok(())
    }

    /// Number of operating years
    pub fn operating_years(&self) -> u32 {
        self.operation_end - self.operation_start + 1
    }
}

// ============================================================================
// Cables
// ============================================================================

/// How the per-cable transfer capacity is computed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CableCapacityModel {
    /// voltage x ampacity
    #[default]
    Nominal,
    /// AC capacity reduced by the capacitive charging current of the route
    ChargingDerated,
}

/// Sizing settings for one cable role
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CableLinkConfig {
    /// Catalog rows below this voltage are excluded
    pub min_voltage_kv: f64,
    #[serde(default)]
    pub polarity: Polarity,
}

impl CableLinkConfig {
    pub fn new(min_voltage_kv: f64, polarity: Polarity) -> Self {
        Self {
            min_voltage_kv,
            polarity,
        }
    }
}

/// Cable sizing and pricing parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CableConfig {
    #[serde(default = "default_power_factor")]
    pub power_factor: f64,
    /// Route length over straight-line distance
    #[serde(default = "default_route_multiplier")]
    pub route_multiplier: f64,
    #[serde(default)]
    pub capacity_model: CableCapacityModel,
    /// Grid frequency for the charging-derated model
    #[serde(default = "default_frequency_hz")]
    pub frequency_hz: f64,
    /// Cable count ceiling for the charging-derated model
    #[serde(default = "default_max_cables")]
    pub max_cables: u32,
    /// Yearly operations as a share of equipment cost
    #[serde(default = "default_cable_opex_fraction")]
    pub opex_fraction: f64,
    /// Decommissioning as a share of installation cost
    #[serde(default = "default_cable_decommissioning_fraction")]
    pub decommissioning_fraction: f64,
    #[serde(default = "default_inter_array_link")]
    pub inter_array: CableLinkConfig,
    #[serde(default = "default_export_link")]
    pub export: CableLinkConfig,
    #[serde(default = "default_catalog")]
    pub catalog: Vec<CableType>,
}

impl Default for CableConfig {
    fn default() -> Self {
        Self {
            power_factor: default_power_factor(),
            route_multiplier: default_route_multiplier(),
            capacity_model: CableCapacityModel::default(),
            frequency_hz: default_frequency_hz(),
            max_cables: default_max_cables(),
            opex_fraction: default_cable_opex_fraction(),
            decommissioning_fraction: default_cable_decommissioning_fraction(),
            inter_array: default_inter_array_link(),
            export: default_export_link(),
            catalog: default_catalog(),
        }
    }
}

fn default_power_factor() -> f64 {
    0.90
}

fn default_route_multiplier() -> f64 {
    1.2
}

fn default_frequency_hz() -> f64 {
    50.0
}

fn default_max_cables() -> u32 {
    200
}

fn default_cable_opex_fraction() -> f64 {
    0.002
}

fn default_cable_decommissioning_fraction() -> f64 {
    0.5
}

fn default_inter_array_link() -> CableLinkConfig {
    CableLinkConfig::new(132.0, Polarity::Ac)
}

fn default_export_link() -> CableLinkConfig {
    CableLinkConfig::new(400.0, Polarity::Ac)
}

impl CableConfig {
    pub fn validate(&self) -> OweResult<()> {
        if !(self.power_factor > 0.0 && self.power_factor <= 1.0) {
            return Err(config_error(format!(
                "cables.power_factor must be in (0, 1], got {}",
                self.power_factor
            )));
        }
        require_positive("cables.route_multiplier", self.route_multiplier)?;
        require_positive("cables.frequency_hz", self.frequency_hz)?;
        if self.max_cables == 0 {
            return Err(config_error("cables.max_cables must be at least 1"));
        }
        require_non_negative("cables.opex_fraction", self.opex_fraction)?;
        require_non_negative("cables.decommissioning_fraction", self.decommissioning_fraction)?;
        require_non_negative("cables.inter_array.min_voltage_kv", self.inter_array.min_voltage_kv)?;
        require_non_negative("cables.export.min_voltage_kv", self.export.min_voltage_kv)?;
        if self.catalog.is_empty() {
            return Err(config_error("cables.catalog is empty"));
        }
        for (index, cable) in self.catalog.iter().enumerate() {
            cable
                .validate()
                .map_err(|e| config_error(format!("cables.catalog[{}]: {}", index, e)))?;
        }
        Ok(())
    }
}

// ============================================================================
// Substations
// ============================================================================

/// Foundation coefficients for jacket and floating structures:
/// `(c1·depth + c2·1000)·equiv + (c3·depth + c4·1000)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StructureCoefficients {
    pub c1: f64,
    pub c2: f64,
    pub c3: f64,
    pub c4: f64,
}

/// Artificial island geometry and unit costs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SandIslandCoefficients {
    /// Island surface per MW of equivalent capacity (m²/MW)
    pub area_per_mw: f64,
    /// Side slope of the island cone
    pub slope: f64,
    /// Height of the island crest above sea level (m)
    pub freeboard_m: f64,
    /// Fill cost (€/m³)
    pub volume_cost: f64,
    /// Surface cost (€/m²)
    pub area_cost: f64,
}

/// Converter cost: `c5·capacity·1000 + c6·10⁶`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConverterCoefficients {
    pub c5: f64,
    pub c6: f64,
}

/// Vessel that carries one structure per trip
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VesselCoefficients {
    /// Structures per trip
    pub capacity: f64,
    pub speed_kmh: f64,
    /// Loading time per trip (h)
    pub load_time_h: f64,
    /// Time on site (h)
    pub site_time_h: f64,
    /// Day rate (k€/day)
    pub day_rate_keur: f64,
}

/// Self-unloading bulk vessel moving island fill
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BulkVesselCoefficients {
    /// Hold volume per trip (m³)
    pub capacity_m3: f64,
    pub speed_kmh: f64,
    /// Loading rate (m³/h)
    pub loading_rate_m3h: f64,
    /// Unloading rate (m³/h)
    pub unloading_rate_m3h: f64,
    /// Day rate (k€/day)
    pub day_rate_keur: f64,
}

/// Vessels used for one marine operation (installation or decommissioning)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VesselFleet {
    /// Self-unloading bulk vessel for sand islands
    pub subv: BulkVesselCoefficients,
    /// Platform supply and installation vessel for jackets
    pub psiv: VesselCoefficients,
    /// Heavy lift cargo vessel for floating topsides
    pub hlcv: VesselCoefficients,
    /// Anchor handling vessel for floating moorings
    pub ahv: VesselCoefficients,
}

impl VesselFleet {
    fn reference(ahv_site_time_h: f64) -> Self {
        Self {
            subv: BulkVesselCoefficients {
                capacity_m3: 20000.0,
                speed_kmh: 25.0,
                loading_rate_m3h: 2000.0,
                unloading_rate_m3h: 6000.0,
                day_rate_keur: 15.0,
            },
            psiv: VesselCoefficients {
                capacity: 1.0,
                speed_kmh: 18.5,
                load_time_h: 24.0,
                site_time_h: 96.0,
                day_rate_keur: 200.0,
            },
            hlcv: VesselCoefficients {
                capacity: 1.0,
                speed_kmh: 22.5,
                load_time_h: 10.0,
                site_time_h: 0.0,
                day_rate_keur: 40.0,
            },
            ahv: VesselCoefficients {
                capacity: 3.0,
                speed_kmh: 18.5,
                load_time_h: 30.0,
                site_time_h: ahv_site_time_h,
                day_rate_keur: 40.0,
            },
        }
    }

    fn validate(&self, section: &str) -> OweResult<()> {
        let subv = &self.subv;
        require_positive(&format!("{section}.subv.capacity_m3"), subv.capacity_m3)?;
        require_positive(&format!("{section}.subv.speed_kmh"), subv.speed_kmh)?;
        require_positive(&format!("{section}.subv.loading_rate_m3h"), subv.loading_rate_m3h)?;
        require_positive(&format!("{section}.subv.unloading_rate_m3h"), subv.unloading_rate_m3h)?;
        require_non_negative(&format!("{section}.subv.day_rate_keur"), subv.day_rate_keur)?;
        for (name, vessel) in [("psiv", &self.psiv), ("hlcv", &self.hlcv), ("ahv", &self.ahv)] {
            require_positive(&format!("{section}.{name}.capacity"), vessel.capacity)?;
            require_positive(&format!("{section}.{name}.speed_kmh"), vessel.speed_kmh)?;
            require_non_negative(&format!("{section}.{name}.load_time_h"), vessel.load_time_h)?;
            require_non_negative(&format!("{section}.{name}.site_time_h"), vessel.site_time_h)?;
            require_non_negative(&format!("{section}.{name}.day_rate_keur"), vessel.day_rate_keur)?;
        }
        Ok(())
    }
}

/// Every coefficient of the substation cost model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubstationCoefficients {
    /// Depths strictly below this use a sand island (m)
    pub sand_island_max_depth_m: f64,
    /// Depths strictly below this (and not sand island) use a jacket (m)
    pub jacket_max_depth_m: f64,
    /// Equivalent-capacity factor applied for AC stations
    pub ac_equivalent_factor: f64,
    /// Foundation multiplier for sites with sea ice
    pub ice_cover_factor: f64,
    pub sand_island: SandIslandCoefficients,
    pub jacket: StructureCoefficients,
    pub floating: StructureCoefficients,
    pub converter_ac: ConverterCoefficients,
    pub converter_dc: ConverterCoefficients,
    pub installation: VesselFleet,
    pub decommissioning: VesselFleet,
    /// Yearly operations as a share of converter cost
    pub opex_converter_fraction: f64,
    /// Yearly operations as a share of foundation cost (sand islands only)
    pub opex_sand_island_fraction: f64,
}

impl Default for SubstationCoefficients {
    fn default() -> Self {
        Self {
            sand_island_max_depth_m: 30.0,
            jacket_max_depth_m: 150.0,
            ac_equivalent_factor: 0.5,
            ice_cover_factor: 1.10,
            sand_island: SandIslandCoefficients {
                area_per_mw: 5.0,
                slope: 0.75,
                freeboard_m: 3.0,
                volume_cost: 3.26,
                area_cost: 804.0,
            },
            jacket: StructureCoefficients {
                c1: 233.0,
                c2: 47.0,
                c3: 309.0,
                c4: 62.0,
            },
            floating: StructureCoefficients {
                c1: 87.0,
                c2: 68.0,
                c3: 116.0,
                c4: 91.0,
            },
            converter_ac: ConverterCoefficients { c5: 22.87, c6: 7.06 },
            converter_dc: ConverterCoefficients {
                c5: 102.93,
                c6: 31.75,
            },
            installation: VesselFleet::reference(90.0),
            decommissioning: VesselFleet::reference(30.0),
            opex_converter_fraction: 0.03,
            opex_sand_island_fraction: 0.015,
        }
    }
}

impl SubstationCoefficients {
    pub fn validate(&self) -> OweResult<()> {
        require_finite("substation.sand_island_max_depth_m", self.sand_island_max_depth_m)?;
        require_finite("substation.jacket_max_depth_m", self.jacket_max_depth_m)?;
        if self.sand_island_max_depth_m > self.jacket_max_depth_m {
            return Err(config_error(
                "substation.sand_island_max_depth_m must not exceed jacket_max_depth_m",
            ));
        }
        require_positive("substation.ac_equivalent_factor", self.ac_equivalent_factor)?;
        require_positive("substation.ice_cover_factor", self.ice_cover_factor)?;

        let island = &self.sand_island;
        require_positive("substation.sand_island.area_per_mw", island.area_per_mw)?;
        require_positive("substation.sand_island.slope", island.slope)?;
        require_non_negative("substation.sand_island.freeboard_m", island.freeboard_m)?;
        require_non_negative("substation.sand_island.volume_cost", island.volume_cost)?;
        require_non_negative("substation.sand_island.area_cost", island.area_cost)?;

        for (name, c) in [("jacket", &self.jacket), ("floating", &self.floating)] {
            for (field, value) in [("c1", c.c1), ("c2", c.c2), ("c3", c.c3), ("c4", c.c4)] {
                require_non_negative(&format!("substation.{name}.{field}"), value)?;
            }
        }
        for (name, c) in [("converter_ac", &self.converter_ac), ("converter_dc", &self.converter_dc)] {
            require_non_negative(&format!("substation.{name}.c5"), c.c5)?;
            require_non_negative(&format!("substation.{name}.c6"), c.c6)?;
        }

        self.installation.validate("substation.installation")?;
        self.decommissioning.validate("substation.decommissioning")?;
        require_non_negative("substation.opex_converter_fraction", self.opex_converter_fraction)?;
        require_non_negative("substation.opex_sand_island_fraction", self.opex_sand_island_fraction)
    }

    pub fn converter(&self, polarity: Polarity) -> &ConverterCoefficients {
        match polarity {
            Polarity::Ac => &self.converter_ac,
            Polarity::Dc => &self.converter_dc,
        }
    }
}

/// Substation pricing settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubstationConfig {
    #[serde(default)]
    pub polarity: Polarity,
    #[serde(default)]
    pub coefficients: SubstationCoefficients,
}

impl SubstationConfig {
    pub fn validate(&self) -> OweResult<()> {
        self.coefficients.validate()
    }
}

// ============================================================================
// Capacity tiers
// ============================================================================

/// Discretisation of substation capacity in the MILP
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TierConfig {
    /// Enumerate exact subset sums up to this many reachable wind farms
    #[serde(default = "default_exact_tier_limit")]
    pub exact_tier_limit: usize,
    /// Number of uniform levels once the exact enumeration is too large
    #[serde(default = "default_grid_tiers")]
    pub grid_tiers: usize,
}

impl Default for TierConfig {
    fn default() -> Self {
        Self {
            exact_tier_limit: default_exact_tier_limit(),
            grid_tiers: default_grid_tiers(),
        }
    }
}

fn default_exact_tier_limit() -> usize {
    10
}

fn default_grid_tiers() -> usize {
    24
}

impl TierConfig {
    pub fn validate(&self) -> OweResult<()> {
        if self.grid_tiers == 0 {
            return Err(config_error("tiers.grid_tiers must be at least 1"));
        }
        if self.exact_tier_limit > 20 {
            return Err(config_error(format!(
                "tiers.exact_tier_limit must be at most 20, got {}",
                self.exact_tier_limit
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        let config = DesignConfig::default();
        config.validate().unwrap();
        assert_eq!(config.viability.inter_array_max_km, 150.0);
        assert_eq!(config.viability.export_max_km, 300.0);
        assert_eq!(config.present_value.operating_years(), 25);
        assert_eq!(config.cables.catalog.len(), 13);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let text = r#"
            [viability]
            export_max_km = 250.0

            [capacity]
            min_fraction = 0.8
            min_mw = 1200.0

            [cables.export]
            min_voltage_kv = 220.0
            polarity = "dc"
        "#;
        let config: DesignConfig = toml::from_str(text).unwrap();
        assert_eq!(config.viability.export_max_km, 250.0);
        assert_eq!(config.viability.inter_array_max_km, 150.0);
        assert_eq!(config.cables.export.polarity, Polarity::Dc);
        assert_eq!(config.cables.inter_array.min_voltage_kv, 132.0);
        assert_eq!(config.substation.coefficients, SubstationCoefficients::default());
        assert_eq!(config.capacity.required_mw(1000.0), 1200.0);
        assert_eq!(config.capacity.required_mw(2000.0), 1600.0);
        config.validate().unwrap();
    }

    #[test]
    fn test_round_trips_through_toml() {
        let config = DesignConfig::default();
        let text = toml::to_string_pretty(&config).unwrap();
        let back: DesignConfig = toml::from_str(&text).unwrap();
        assert_eq!(back.substation.coefficients, config.substation.coefficients);
        assert_eq!(back.present_value, config.present_value);
    }

    #[test]
    fn test_unordered_timeline_rejected() {
        let mut config = DesignConfig::default();
        config.present_value.decommissioning_year = 20;
        let err = config.validate().unwrap_err();
        assert!(err.is_config());
        assert!(err.to_string().contains("timeline"));
    }

    #[test]
    fn test_discount_rate_bounds() {
        let mut pv = PresentValueConfig::default();
        pv.discount_rate = -1.0;
        assert!(pv.validate().is_err());
        pv.discount_rate = 0.0;
        assert!(pv.validate().is_ok());
        pv.discount_rate = f64::NAN;
        assert!(pv.validate().is_err());
    }

    #[test]
    fn test_empty_catalog_rejected() {
        let mut config = DesignConfig::default();
        config.cables.catalog.clear();
        assert!(config.validate().unwrap_err().to_string().contains("catalog"));
    }

    #[test]
    fn test_negative_ceiling_rejected() {
        let mut config = DesignConfig::default();
        config.viability.inter_array_max_km = -5.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_decommissioning_fleet_differs_only_in_ahv() {
        let c = SubstationCoefficients::default();
        assert_eq!(c.installation.psiv, c.decommissioning.psiv);
        assert_eq!(c.installation.ahv.site_time_h, 90.0);
        assert_eq!(c.decommissioning.ahv.site_time_h, 30.0);
    }
}
