//! # owe-core: Offshore Grid Entity Model
//!
//! Data structures shared by the offshore grid designer: the three entity
//! roles of a radial offshore grid, typed identifiers, physical units, the
//! error taxonomy and per-entity diagnostics.
//!
//! ## Radial hierarchy
//!
//! ```text
//!   WindFarm ──inter-array──▶ OffshoreSubstation ──export──▶ OnshoreSubstation
//! ```
//!
//! Every wind farm has at most one offshore parent and every offshore
//! substation at most one onshore parent. Records are immutable inputs: they
//! are loaded once per run and never mutated by the optimisation.
//!
//! ## Quick Start
//!
//! ```
//! use owe_core::*;
//!
//! let mut scenario = Scenario::default();
//! scenario.wind_farms.push(WindFarm::new(WindFarmId::new(1), "DK", GeoPoint::new(11.0, 55.2), Megawatts(500.0)));
//! scenario.offshore.push(OffshoreSubstation::new(
//!     OffshoreSubstationId::new(10),
//!     "DK",
//!     GeoPoint::new(11.3, 55.4),
//!     Meters(35.0),
//!     Kilometers(60.0),
//! ));
//! scenario.onshore.push(OnshoreSubstation::new(OnshoreSubstationId::new(100), "DK", GeoPoint::new(12.0, 55.7)));
//!
//! let (clean, diagnostics) = scenario.sanitize();
//! assert_eq!(clean.wind_farms.len(), 1);
//! assert!(!diagnostics.has_issues());
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

pub mod diagnostics;
pub mod error;
pub mod units;

pub use diagnostics::{DiagnosticIssue, Diagnostics, Severity};
pub use error::{OweError, OweResult};
pub use units::{Euros, Kilometers, Megawatts, Meters};

// Newtype wrappers for IDs for type safety
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WindFarmId(usize);
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OffshoreSubstationId(usize);
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OnshoreSubstationId(usize);

impl WindFarmId {
    #[inline]
    pub fn new(value: usize) -> Self {
        WindFarmId(value)
    }
    #[inline]
    pub fn value(&self) -> usize {
        self.0
    }
}

impl OffshoreSubstationId {
    #[inline]
    pub fn new(value: usize) -> Self {
        OffshoreSubstationId(value)
    }
    #[inline]
    pub fn value(&self) -> usize {
        self.0
    }
}

impl OnshoreSubstationId {
    #[inline]
    pub fn new(value: usize) -> Self {
        OnshoreSubstationId(value)
    }
    #[inline]
    pub fn value(&self) -> usize {
        self.0
    }
}

impl fmt::Display for WindFarmId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WindFarm {}", self.0)
    }
}

impl fmt::Display for OffshoreSubstationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OffshoreSubstation {}", self.0)
    }
}

impl fmt::Display for OnshoreSubstationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OnshoreSubstation {}", self.0)
    }
}

/// A longitude/latitude pair in decimal degrees (WGS 84).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lon: f64,
    pub lat: f64,
}

impl GeoPoint {
    pub const fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    pub fn is_finite(&self) -> bool {
        self.lon.is_finite() && self.lat.is_finite()
    }

    /// Within [-180, 180] x [-90, 90]
    pub fn in_range(&self) -> bool {
        (-180.0..=180.0).contains(&self.lon) && (-90.0..=90.0).contains(&self.lat)
    }
}

/// Transmission polarity of a link or converter station.
///
/// `Ac` is three-phase alternating current.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    #[default]
    Ac,
    Dc,
}

impl Polarity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Polarity::Ac => "ac",
            Polarity::Dc => "dc",
        }
    }
}

impl fmt::Display for Polarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Polarity {
    type Err = OweError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "ac" | "hvac" => Ok(Polarity::Ac),
            "dc" | "hvdc" => Ok(Polarity::Dc),
            other => Err(OweError::Config(format!(
                "unknown polarity '{}'; supported values: ac, dc",
                other
            ))),
        }
    }
}

/// Anything with an identity, a position and a country code.
///
/// The viability builder and the formulator only need these three facts to
/// pair entities up.
pub trait Located {
    type Id: Copy + Ord + std::hash::Hash + fmt::Display;

    fn id(&self) -> Self::Id;
    fn location(&self) -> GeoPoint;
    fn iso(&self) -> &str;
}

// Basic entity records
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindFarm {
    pub id: WindFarmId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// ISO 3166 country code of the exclusive economic zone
    pub iso: String,
    pub location: GeoPoint,
    /// Rated capacity
    pub capacity: Megawatts,
    /// Fixed cost of developing and connecting the farm
    #[serde(default)]
    pub fixed_cost: Euros,
}

impl WindFarm {
    pub fn new(id: WindFarmId, iso: impl Into<String>, location: GeoPoint, capacity: Megawatts) -> Self {
        Self {
            id,
            name: None,
            iso: iso.into(),
            location,
            capacity,
            fixed_cost: Euros::ZERO,
        }
    }

    pub fn with_fixed_cost(mut self, cost: Euros) -> Self {
        self.fixed_cost = cost;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OffshoreSubstation {
    pub id: OffshoreSubstationId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub iso: String,
    pub location: GeoPoint,
    /// Water depth, positive below sea level
    pub water_depth: Meters,
    /// Sea ice forms at the site during winter
    #[serde(default)]
    pub ice_cover: bool,
    /// Sailing distance to the nearest installation port
    pub port_distance: Kilometers,
}

impl OffshoreSubstation {
    pub fn new(
        id: OffshoreSubstationId,
        iso: impl Into<String>,
        location: GeoPoint,
        water_depth: Meters,
        port_distance: Kilometers,
    ) -> Self {
        Self {
            id,
            name: None,
            iso: iso.into(),
            location,
            water_depth,
            ice_cover: false,
            port_distance,
        }
    }

    pub fn with_ice_cover(mut self, ice_cover: bool) -> Self {
        self.ice_cover = ice_cover;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OnshoreSubstation {
    pub id: OnshoreSubstationId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub iso: String,
    pub location: GeoPoint,
    /// Whether export cables may land here
    #[serde(default = "default_eligible")]
    pub eligible: bool,
}

fn default_eligible() -> bool {
    true
}

impl OnshoreSubstation {
    pub fn new(id: OnshoreSubstationId, iso: impl Into<String>, location: GeoPoint) -> Self {
        Self {
            id,
            name: None,
            iso: iso.into(),
            location,
            eligible: true,
        }
    }

    pub fn with_eligible(mut self, eligible: bool) -> Self {
        self.eligible = eligible;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

impl Located for WindFarm {
    type Id = WindFarmId;

    fn id(&self) -> WindFarmId {
        self.id
    }
    fn location(&self) -> GeoPoint {
        self.location
    }
    fn iso(&self) -> &str {
        &self.iso
    }
}

impl Located for OffshoreSubstation {
    type Id = OffshoreSubstationId;

    fn id(&self) -> OffshoreSubstationId {
        self.id
    }
    fn location(&self) -> GeoPoint {
        self.location
    }
    fn iso(&self) -> &str {
        &self.iso
    }
}

impl Located for OnshoreSubstation {
    type Id = OnshoreSubstationId;

    fn id(&self) -> OnshoreSubstationId {
        self.id
    }
    fn location(&self) -> GeoPoint {
        self.location
    }
    fn iso(&self) -> &str {
        &self.iso
    }
}

/// The three keyed entity collections of one design run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub wind_farms: Vec<WindFarm>,
    #[serde(default)]
    pub offshore: Vec<OffshoreSubstation>,
    #[serde(default)]
    pub onshore: Vec<OnshoreSubstation>,
}

impl Scenario {
    /// Total rated capacity of all wind farms
    pub fn total_capacity(&self) -> Megawatts {
        self.wind_farms.iter().map(|wf| wf.capacity).sum()
    }

    /// Drop entities with invalid attributes, reporting each one.
    ///
    /// Duplicate ids keep the first record. Non-finite values are errors;
    /// coordinates outside the usual degree ranges are only warned about,
    /// since the distance utility accepts them.
    pub fn sanitize(&self) -> (Scenario, Diagnostics) {
        let mut diag = Diagnostics::new();
        let mut clean = Scenario::default();

        let mut seen = HashSet::new();
        for wf in &self.wind_farms {
            let label = wf.id.to_string();
            if !seen.insert(wf.id) {
                diag.add_error_with_entity("validation", "duplicate wind farm id", &label);
                continue;
            }
            let mut problems = common_problems(wf, &mut diag, &label);
            if !(wf.capacity.is_finite() && wf.capacity.value() > 0.0) {
                diag.add_error_with_entity("validation", "capacity must be positive and finite", &label);
                problems += 1;
            }
            if !(wf.fixed_cost.is_finite() && wf.fixed_cost.value() >= 0.0) {
                diag.add_error_with_entity("validation", "fixed cost must be non-negative and finite", &label);
                problems += 1;
            }
            if problems == 0 {
                clean.wind_farms.push(wf.clone());
            }
        }

        let mut seen = HashSet::new();
        for oss in &self.offshore {
            let label = oss.id.to_string();
            if !seen.insert(oss.id) {
                diag.add_error_with_entity("validation", "duplicate offshore substation id", &label);
                continue;
            }
            let mut problems = common_problems(oss, &mut diag, &label);
            if !oss.water_depth.is_finite() {
                diag.add_error_with_entity("validation", "water depth is missing or not finite", &label);
                problems += 1;
            }
            if !(oss.port_distance.is_finite() && oss.port_distance.value() >= 0.0) {
                diag.add_error_with_entity("validation", "port distance must be non-negative and finite", &label);
                problems += 1;
            }
            if problems == 0 {
                clean.offshore.push(oss.clone());
            }
        }

        let mut seen = HashSet::new();
        for onss in &self.onshore {
            let label = onss.id.to_string();
            if !seen.insert(onss.id) {
                diag.add_error_with_entity("validation", "duplicate onshore substation id", &label);
                continue;
            }
            if common_problems(onss, &mut diag, &label) == 0 {
                clean.onshore.push(onss.clone());
            }
        }

        (clean, diag)
    }
}

fn common_problems<E: Located>(entity: &E, diag: &mut Diagnostics, label: &str) -> usize {
    let mut problems = 0;
    let location = entity.location();
    if !location.is_finite() {
        diag.add_error_with_entity("validation", "coordinates are missing or not finite", label);
        problems += 1;
    } else if !location.in_range() {
        diag.add_warning_with_entity("validation", "coordinates outside [-180,180] x [-90,90]", label);
    }
    if entity.iso().trim().is_empty() {
        diag.add_error_with_entity("validation", "ISO code is empty", label);
        problems += 1;
    }
    problems
}
