//! Capacity tiers of an offshore substation.
//!
//! Substation and export cable costs are nonlinear in the aggregate capacity
//! a substation collects. The formulator prices a finite set of capacity
//! levels up front and lets one binary per (export edge, level) pick the
//! active one:
//!
//! - **exact**: every distinct non-empty subset sum of the reachable wind
//!   farm capacities. The aggregate always equals one of them, so capacity
//!   conservation is an equality.
//! - **grid**: `grid_tiers` uniform levels up to the reachable total, used
//!   once the subset enumeration gets too large. The active level only has
//!   to cover the aggregate.

use crate::config::TierConfig;
use serde::Serialize;

const LEVEL_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TierMode {
    Exact,
    Grid,
}

impl TierMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TierMode::Exact => "exact",
            TierMode::Grid => "grid",
        }
    }
}

/// Sorted, strictly increasing capacity levels (MW)
#[derive(Debug, Clone, Serialize)]
pub struct CapacityTiers {
    pub mode: TierMode,
    pub levels: Vec<f64>,
}

impl CapacityTiers {
    /// Levels for the capacities of the wind farms a substation can collect.
    ///
    /// Levels above `max_mw` are never offered.
    pub fn build(capacities: &[f64], config: &TierConfig, max_mw: Option<f64>) -> Self {
        let limit = max_mw.unwrap_or(f64::INFINITY);

        if capacities.len() <= config.exact_tier_limit {
            let levels = subset_sums(capacities)
                .into_iter()
                .filter(|level| *level <= limit + LEVEL_TOLERANCE)
                .collect();
            return Self {
                mode: TierMode::Exact,
                levels,
            };
        }

        let top = capacities.iter().sum::<f64>().min(limit);
        let steps = config.grid_tiers;
        let levels = (1..=steps).map(|k| top * k as f64 / steps as f64).collect();
        Self {
            mode: TierMode::Grid,
            levels,
        }
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

/// Distinct non-empty subset sums, ascending.
fn subset_sums(capacities: &[f64]) -> Vec<f64> {
    let mut sums = vec![0.0];
    for &capacity in capacities {
        let existing = sums.len();
        for i in 0..existing {
            sums.push(sums[i] + capacity);
        }
    }
    sums.remove(0);
    sums.sort_by(|a, b| a.total_cmp(b));
    sums.dedup_by(|a, b| (*a - *b).abs() <= LEVEL_TOLERANCE * b.abs().max(1.0));
    sums
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_levels_are_distinct_subset_sums() {
        let tiers = CapacityTiers::build(&[100.0, 200.0, 300.0], &TierConfig::default(), None);
        assert_eq!(tiers.mode, TierMode::Exact);
        assert_eq!(tiers.levels, vec![100.0, 200.0, 300.0, 400.0, 500.0, 600.0]);
    }

    #[test]
    fn test_equal_capacities_collapse() {
        let tiers = CapacityTiers::build(&[250.0; 4], &TierConfig::default(), None);
        assert_eq!(tiers.levels, vec![250.0, 500.0, 750.0, 1000.0]);
    }

    #[test]
    fn test_no_reachable_farms_has_no_levels() {
        let tiers = CapacityTiers::build(&[], &TierConfig::default(), None);
        assert!(tiers.is_empty());
    }

    #[test]
    fn test_max_capacity_filters_levels() {
        let tiers = CapacityTiers::build(&[100.0, 200.0, 300.0], &TierConfig::default(), Some(350.0));
        assert_eq!(tiers.levels, vec![100.0, 200.0, 300.0]);
    }

    #[test]
    fn test_grid_mode_beyond_limit() {
        let config = TierConfig {
            exact_tier_limit: 2,
            grid_tiers: 4,
        };
        let tiers = CapacityTiers::build(&[100.0, 100.0, 200.0], &config, None);
        assert_eq!(tiers.mode, TierMode::Grid);
        assert_eq!(tiers.levels, vec![100.0, 200.0, 300.0, 400.0]);

        let capped = CapacityTiers::build(&[100.0, 100.0, 200.0], &config, Some(200.0));
        assert_eq!(capped.levels, vec![50.0, 100.0, 150.0, 200.0]);
    }
}
