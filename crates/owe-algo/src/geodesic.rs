//! Great-circle distances on a spherical Earth.
//!
//! Haversine formula with a mean Earth radius of 6371 km:
//!
//! ```text
//! a = sin²(Δφ/2) + cos φ₁ · cos φ₂ · sin²(Δλ/2)
//! d = 2R · asin(√a)
//! ```
//!
//! `a` is clamped to [0, 1] so rounding near antipodal points never pushes
//! `asin` outside its domain. Degrees outside the usual ranges are accepted
//! and simply wrap through the trigonometric functions.

use owe_core::{GeoPoint, Kilometers};
use serde::{Deserialize, Serialize};

/// Mean Earth radius in kilometers
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Output unit for [`haversine_distance`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceUnit {
    Meters,
    #[default]
    Kilometers,
}

/// Great-circle distance between two points, in the requested unit.
pub fn haversine_distance(a: GeoPoint, b: GeoPoint, unit: DistanceUnit) -> f64 {
    let km = haversine_km(a, b).value();
    match unit {
        DistanceUnit::Kilometers => km,
        DistanceUnit::Meters => km * 1e3,
    }
}

/// Great-circle distance in kilometers.
pub fn haversine_km(a: GeoPoint, b: GeoPoint) -> Kilometers {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlat = lat2 - lat1;
    let dlon = (b.lon - a.lon).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    let h = h.clamp(0.0, 1.0);

    Kilometers(2.0 * EARTH_RADIUS_KM * h.sqrt().asin())
}
