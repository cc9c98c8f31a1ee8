//! Run configuration file
//!
//! Design settings sit at the top level of the TOML file, next to the
//! `[solver]` and `[records]` tables used only by the CLI.

use anyhow::{Context, Result};
use owe_algo::config::DesignConfig;
use owe_algo::design::DesignSolverOptions;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RunConfig {
    #[serde(flatten)]
    pub design: DesignConfig,
    /// Solver backend and limits
    #[serde(default)]
    pub solver: DesignSolverOptions,
    /// Record loading options
    #[serde(default)]
    pub records: RecordOptions,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordOptions {
    /// Offshore `depth_m` columns hold GIS elevations (negative below sea
    /// level) and are negated on load
    #[serde(default = "default_invert_depth")]
    pub invert_depth: bool,
}

impl Default for RecordOptions {
    fn default() -> Self {
        Self {
            invert_depth: default_invert_depth(),
        }
    }
}

fn default_invert_depth() -> bool {
    true
}

impl RunConfig {
    /// Load and validate a configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading run configuration {}", path.display()))?;
        let config: RunConfig = toml::from_str(&text)
            .with_context(|| format!("parsing run configuration {}", path.display()))?;
        config
            .design
            .validate()
            .with_context(|| format!("validating run configuration {}", path.display()))?;
        Ok(config)
    }

    /// Load `path` if given, else the defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("serializing run configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_round_trips() {
        let text = RunConfig::default().to_toml().unwrap();
        let parsed: RunConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed.design.viability.export_max_km, 300.0);
        assert_eq!(parsed.design.cables.catalog.len(), 13);
        assert_eq!(parsed.solver.solver, "microlp");
        assert!(parsed.records.invert_depth);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let parsed: RunConfig = toml::from_str(
            r#"
            [capacity]
            min_fraction = 0.8

            [solver]
            time_limit_seconds = 30.0

            [records]
            invert_depth = false
            "#,
        )
        .unwrap();
        assert_eq!(parsed.design.capacity.min_fraction, 0.8);
        assert_eq!(parsed.design.viability.inter_array_max_km, 150.0);
        assert_eq!(parsed.solver.time_limit_seconds, Some(30.0));
        assert!(!parsed.records.invert_depth);
    }
}
