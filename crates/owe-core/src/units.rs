//! Unit newtypes for the quantities that cross engine boundaries.
//!
//! Cable lengths are priced per meter while geodesic distances are produced
//! in kilometers, and capacities are stated in MW while the sizing engine
//! works in watts. Wrapping the values keeps those conversions explicit.
//!
//! ```
//! use owe_core::units::{Kilometers, Megawatts};
//!
//! let route = Kilometers(12.5) * 1.2;
//! assert!((route.to_meters().value() - 15_000.0).abs() < 1e-9);
//!
//! let total: Megawatts = [Megawatts(300.0), Megawatts(450.0)].iter().sum();
//! assert_eq!(total, Megawatts(750.0));
//! ```

use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Sub};

macro_rules! impl_unit_ops {
    ($type:ty, $unit_name:literal) => {
        impl Add for $type {
            type Output = Self;
            fn add(self, rhs: Self) -> Self::Output {
                Self(self.0 + rhs.0)
            }
        }

        impl Sub for $type {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self::Output {
                Self(self.0 - rhs.0)
            }
        }

        impl Mul<f64> for $type {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self::Output {
                Self(self.0 * rhs)
            }
        }

        impl Div<f64> for $type {
            type Output = Self;
            fn div(self, rhs: f64) -> Self::Output {
                Self(self.0 / rhs)
            }
        }

        impl Div<$type> for $type {
            type Output = f64;
            fn div(self, rhs: $type) -> Self::Output {
                self.0 / rhs.0
            }
        }

        impl std::fmt::Display for $type {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{:.3} {}", self.0, $unit_name)
            }
        }

        impl $type {
            #[inline]
            pub const fn new(value: f64) -> Self {
                Self(value)
            }

            /// Get the raw numeric value
            #[inline]
            pub const fn value(self) -> f64 {
                self.0
            }

            #[inline]
            pub fn is_finite(self) -> bool {
                self.0.is_finite()
            }
        }

        impl std::iter::Sum for $type {
            fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
                Self(iter.map(|x| x.0).sum())
            }
        }

        impl<'a> std::iter::Sum<&'a $type> for $type {
            fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
                Self(iter.map(|x| x.0).sum())
            }
        }
    };
}

/// Active power in megawatts (MW)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Megawatts(pub f64);

impl_unit_ops!(Megawatts, "MW");

impl Megawatts {
    #[inline]
    pub fn to_watts(self) -> f64 {
        self.0 * 1e6
    }
}

/// Distance in kilometers
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Kilometers(pub f64);

impl_unit_ops!(Kilometers, "km");

impl Kilometers {
    #[inline]
    pub fn to_meters(self) -> Meters {
        Meters(self.0 * 1e3)
    }
}

/// Length or depth in meters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Meters(pub f64);

impl_unit_ops!(Meters, "m");

impl Meters {
    #[inline]
    pub fn to_kilometers(self) -> Kilometers {
        Kilometers(self.0 / 1e3)
    }
}

/// Monetary amount in euros
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Euros(pub f64);

impl_unit_ops!(Euros, "EUR");

impl Euros {
    pub const ZERO: Self = Self(0.0);

    /// Value in millions of euros, the unit used in reports
    #[inline]
    pub fn millions(self) -> f64 {
        self.0 * 1e-6
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversions() {
        assert_eq!(Megawatts(800.0).to_watts(), 800e6);
        assert_eq!(Kilometers(5.0).to_meters(), Meters(5000.0));
        assert_eq!(Meters(2500.0).to_kilometers(), Kilometers(2.5));
        assert!((Euros(3_500_000.0).millions() - 3.5).abs() < 1e-12);
    }

    #[test]
    fn test_same_unit_arithmetic() {
        let a = Megawatts(100.0) + Megawatts(50.0) - Megawatts(25.0);
        assert_eq!(a, Megawatts(125.0));
        assert_eq!(Megawatts(300.0) / Megawatts(150.0), 2.0);
        assert_eq!(Kilometers(10.0) * 1.2, Kilometers(12.0));
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Kilometers(1.5)), "1.500 km");
        assert_eq!(format!("{}", Megawatts(10.0)), "10.000 MW");
    }

    #[test]
    fn test_serde_transparent() {
        let json = serde_json::to_string(&Megawatts(42.0)).unwrap();
        assert_eq!(json, "42.0");
        let back: Megawatts = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Megawatts(42.0));
    }
}
