//! Entity record loading
//!
//! Tables are CSV (with headers) or JSON arrays of objects, chosen by file
//! extension. Columns:
//!
//! | Table | Required | Optional |
//! |-------|----------|----------|
//! | wind farms | `id`, `iso`, `lon`, `lat`, `capacity_mw` | `name`, `fixed_cost_eur` |
//! | offshore | `id`, `iso`, `lon`, `lat`, `depth_m`, `port_distance_km` | `name`, `ice_cover` |
//! | onshore | `id`, `iso`, `lon`, `lat` | `name`, `eligible` |
//!
//! Flags (`ice_cover`, `eligible`) accept `true`/`false` as well as `1`/`0`.
//!
//! A row that cannot be parsed, or that misses a required value, is reported
//! and skipped; it never stops the other rows from loading.

use anyhow::{bail, Context, Result};
use owe_core::{
    Diagnostics, Euros, GeoPoint, Kilometers, Megawatts, Meters, OffshoreSubstation,
    OffshoreSubstationId, OnshoreSubstation, OnshoreSubstationId, Scenario, WindFarm, WindFarmId,
};
use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::{debug, warn};

#[derive(Debug, Deserialize)]
struct WindFarmRow {
    id: usize,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    iso: Option<String>,
    #[serde(default)]
    lon: Option<f64>,
    #[serde(default)]
    lat: Option<f64>,
    #[serde(default)]
    capacity_mw: Option<f64>,
    #[serde(default)]
    fixed_cost_eur: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OffshoreRow {
    id: usize,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    iso: Option<String>,
    #[serde(default)]
    lon: Option<f64>,
    #[serde(default)]
    lat: Option<f64>,
    #[serde(default)]
    depth_m: Option<f64>,
    #[serde(default, deserialize_with = "flag")]
    ice_cover: Option<bool>,
    #[serde(default)]
    port_distance_km: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OnshoreRow {
    id: usize,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    iso: Option<String>,
    #[serde(default)]
    lon: Option<f64>,
    #[serde(default)]
    lat: Option<f64>,
    #[serde(default, deserialize_with = "flag")]
    eligible: Option<bool>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FlagValue {
    Bool(bool),
    Number(i64),
    Text(String),
}

/// Boolean column that also takes 0/1
fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<bool>, D::Error> {
    let value = match Option::<FlagValue>::deserialize(deserializer)? {
        None => return Ok(None),
        Some(value) => value,
    };
    match value {
        FlagValue::Bool(b) => Ok(Some(b)),
        FlagValue::Number(0) => Ok(Some(false)),
        FlagValue::Number(1) => Ok(Some(true)),
        FlagValue::Number(n) => Err(D::Error::custom(format!("flag must be 0 or 1, got {}", n))),
        FlagValue::Text(text) => match text.trim().to_ascii_lowercase().as_str() {
            "" => Ok(None),
            "true" | "1" => Ok(Some(true)),
            "false" | "0" => Ok(Some(false)),
            other => Err(D::Error::custom(format!("flag must be true/false or 1/0, got `{}`", other))),
        },
    }
}

/// Paths of the three entity tables
#[derive(Debug, Clone, Copy)]
pub struct RecordPaths<'a> {
    pub wind_farms: &'a Path,
    pub offshore: &'a Path,
    pub onshore: &'a Path,
}

/// Loaded records plus per-row load problems
#[derive(Debug, Clone, Default)]
pub struct LoadedRecords {
    pub scenario: Scenario,
    pub diagnostics: Diagnostics,
}

/// Load all three tables.
///
/// With `invert_depth`, offshore `depth_m` values are GIS elevations and are
/// negated so that depth is positive below sea level.
pub fn load_records(paths: RecordPaths<'_>, invert_depth: bool) -> Result<LoadedRecords> {
    let mut loaded = LoadedRecords::default();

    for row in read_rows::<WindFarmRow>(paths.wind_farms, &mut loaded.diagnostics)? {
        if let Some(farm) = wind_farm_from_row(row, &mut loaded.diagnostics) {
            loaded.scenario.wind_farms.push(farm);
        }
    }
    for row in read_rows::<OffshoreRow>(paths.offshore, &mut loaded.diagnostics)? {
        if let Some(site) = offshore_from_row(row, invert_depth, &mut loaded.diagnostics) {
            loaded.scenario.offshore.push(site);
        }
    }
    for row in read_rows::<OnshoreRow>(paths.onshore, &mut loaded.diagnostics)? {
        if let Some(site) = onshore_from_row(row, &mut loaded.diagnostics) {
            loaded.scenario.onshore.push(site);
        }
    }

    debug!(
        wind_farms = loaded.scenario.wind_farms.len(),
        offshore = loaded.scenario.offshore.len(),
        onshore = loaded.scenario.onshore.len(),
        "records loaded"
    );
    if loaded.diagnostics.has_errors() {
        warn!(
            skipped = loaded.diagnostics.error_count(),
            "unreadable or incomplete records were skipped"
        );
    }
    Ok(loaded)
}

/// Read every row of a table. Rows that fail to deserialize are reported
/// under `records` and left out; only an unreadable or empty file is fatal.
fn read_rows<T: DeserializeOwned>(path: &Path, diagnostics: &mut Diagnostics) -> Result<Vec<T>> {
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let mut rows = Vec::new();
    let mut seen = 0usize;
    let skip = |index: usize, err: &dyn std::fmt::Display, diagnostics: &mut Diagnostics| {
        diagnostics.add_error_with_entity(
            "records",
            &format!("unreadable row: {}", err),
            &format!("{} row {}", file_name, index + 1),
        );
    };

    if is_json {
        let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
        let values: Vec<serde_json::Value> = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("parsing JSON records in {}", path.display()))?;
        for (index, value) in values.into_iter().enumerate() {
            seen += 1;
            match serde_json::from_value::<T>(value) {
                Ok(row) => rows.push(row),
                Err(err) => skip(index, &err, diagnostics),
            }
        }
    } else {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(path)
            .with_context(|| format!("opening {}", path.display()))?;
        for (index, result) in reader.deserialize::<T>().enumerate() {
            seen += 1;
            match result {
                Ok(row) => rows.push(row),
                Err(err) if err.is_io_error() => {
                    return Err(err).with_context(|| format!("reading {}", path.display()));
                }
                Err(err) => skip(index, &err, diagnostics),
            }
        }
    }

    if seen == 0 {
        bail!("{} contains no records", path.display());
    }
    if rows.len() < seen {
        warn!(
            file = %file_name,
            skipped = seen - rows.len(),
            "rows could not be parsed"
        );
    }
    Ok(rows)
}

/// Collects missing required values for one row
struct RowCheck<'a> {
    label: String,
    diagnostics: &'a mut Diagnostics,
    missing: usize,
}

impl<'a> RowCheck<'a> {
    fn new(label: String, diagnostics: &'a mut Diagnostics) -> Self {
        Self {
            label,
            diagnostics,
            missing: 0,
        }
    }

    fn require<T>(&mut self, field: &str, value: Option<T>) -> Option<T> {
        if value.is_none() {
            self.diagnostics
                .add_error_with_entity("records", &format!("missing {}", field), &self.label);
            self.missing += 1;
        }
        value
    }

    fn complete(&self) -> bool {
        self.missing == 0
    }
}

fn wind_farm_from_row(row: WindFarmRow, diagnostics: &mut Diagnostics) -> Option<WindFarm> {
    let id = WindFarmId::new(row.id);
    let mut check = RowCheck::new(id.to_string(), diagnostics);
    let iso = check.require("iso", row.iso);
    let lon = check.require("lon", row.lon);
    let lat = check.require("lat", row.lat);
    let capacity = check.require("capacity_mw", row.capacity_mw);
    if !check.complete() {
        return None;
    }

    let mut farm = WindFarm::new(id, iso?, GeoPoint::new(lon?, lat?), Megawatts(capacity?))
        .with_fixed_cost(Euros(row.fixed_cost_eur.unwrap_or(0.0)));
    if let Some(name) = row.name {
        farm = farm.with_name(name);
    }
    Some(farm)
}

fn offshore_from_row(
    row: OffshoreRow,
    invert_depth: bool,
    diagnostics: &mut Diagnostics,
) -> Option<OffshoreSubstation> {
    let id = OffshoreSubstationId::new(row.id);
    let mut check = RowCheck::new(id.to_string(), diagnostics);
    let iso = check.require("iso", row.iso);
    let lon = check.require("lon", row.lon);
    let lat = check.require("lat", row.lat);
    let depth = check.require("depth_m", row.depth_m);
    let port = check.require("port_distance_km", row.port_distance_km);
    if !check.complete() {
        return None;
    }

    let depth = if invert_depth { -depth? } else { depth? };
    let mut site = OffshoreSubstation::new(
        id,
        iso?,
        GeoPoint::new(lon?, lat?),
        Meters(depth),
        Kilometers(port?),
    )
    .with_ice_cover(row.ice_cover.unwrap_or(false));
    if let Some(name) = row.name {
        site = site.with_name(name);
    }
    Some(site)
}

fn onshore_from_row(row: OnshoreRow, diagnostics: &mut Diagnostics) -> Option<OnshoreSubstation> {
    let id = OnshoreSubstationId::new(row.id);
    let mut check = RowCheck::new(id.to_string(), diagnostics);
    let iso = check.require("iso", row.iso);
    let lon = check.require("lon", row.lon);
    let lat = check.require("lat", row.lat);
    if !check.complete() {
        return None;
    }

    let mut site = OnshoreSubstation::new(id, iso?, GeoPoint::new(lon?, lat?))
        .with_eligible(row.eligible.unwrap_or(true));
    if let Some(name) = row.name {
        site = site.with_name(name);
    }
    Some(site)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn table(suffix: &str, contents: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_csv_rows_and_missing_values() {
        let farms = table(
            ".csv",
            "id,iso,lon,lat,capacity_mw,fixed_cost_eur\n1,NL,4.0,53.0,400,\n2,NL,4.2,,300,1000\n",
        );
        let offshore = table(
            ".csv",
            "id,iso,lon,lat,depth_m,ice_cover,port_distance_km\n1,NL,4.1,52.9,-25,false,50\n",
        );
        let onshore = table(".csv", "id,iso,lon,lat\n1,NL,4.6,52.5\n");

        let loaded = load_records(
            RecordPaths {
                wind_farms: farms.path(),
                offshore: offshore.path(),
                onshore: onshore.path(),
            },
            true,
        )
        .unwrap();

        assert_eq!(loaded.scenario.wind_farms.len(), 1);
        assert_eq!(loaded.scenario.wind_farms[0].fixed_cost, Euros(0.0));
        assert_eq!(loaded.scenario.offshore[0].water_depth, Meters(25.0));
        assert!(loaded.scenario.onshore[0].eligible);
        assert_eq!(loaded.diagnostics.issues_for("WindFarm 2").count(), 1);
    }

    #[test]
    fn test_json_rows() {
        let farms = table(
            ".json",
            r#"[{"id": 7, "name": "Borssele", "iso": "NL", "lon": 3.0, "lat": 51.7, "capacity_mw": 750}]"#,
        );
        let offshore = table(
            ".json",
            r#"[{"id": 1, "iso": "NL", "lon": 3.1, "lat": 51.6, "depth_m": 30, "port_distance_km": 40}]"#,
        );
        let onshore = table(
            ".json",
            r#"[{"id": 1, "iso": "NL", "lon": 3.6, "lat": 51.4, "eligible": false}]"#,
        );

        let loaded = load_records(
            RecordPaths {
                wind_farms: farms.path(),
                offshore: offshore.path(),
                onshore: onshore.path(),
            },
            false,
        )
        .unwrap();

        assert_eq!(loaded.scenario.wind_farms[0].name.as_deref(), Some("Borssele"));
        assert_eq!(loaded.scenario.offshore[0].water_depth, Meters(30.0));
        assert!(!loaded.scenario.onshore[0].eligible);
        assert!(!loaded.diagnostics.has_issues());
    }

    #[test]
    fn test_numeric_flags_and_malformed_row() {
        let farms = table(".csv", "id,iso,lon,lat,capacity_mw\n1,NL,4.0,53.0,400\n");
        let offshore = table(
            ".csv",
            "id,iso,lon,lat,depth_m,ice_cover,port_distance_km\n\
             1,FI,21.0,63.0,-20,1,50\n\
             2,FI,21.2,63.1,-35,0,60\n\
             3,FI,east,63.2,-40,0,70\n\
             4,FI,21.4,63.3,-40,2,70\n",
        );
        let onshore = table(".csv", "id,iso,lon,lat,eligible\n1,FI,21.5,63.5,0\n2,FI,21.6,63.6,TRUE\n");

        let loaded = load_records(
            RecordPaths {
                wind_farms: farms.path(),
                offshore: offshore.path(),
                onshore: onshore.path(),
            },
            true,
        )
        .unwrap();

        let sites = &loaded.scenario.offshore;
        assert_eq!(sites.len(), 2);
        assert!(sites[0].ice_cover);
        assert!(!sites[1].ice_cover);
        assert!(!loaded.scenario.onshore[0].eligible);
        assert!(loaded.scenario.onshore[1].eligible);

        // Rows 3 (text longitude) and 4 (flag out of range) are reported, not fatal
        assert_eq!(loaded.diagnostics.error_count(), 2);
        assert!(loaded
            .diagnostics
            .issues
            .iter()
            .all(|issue| issue.category == "records"));
    }

    #[test]
    fn test_json_numeric_flag_and_bad_row() {
        let farms = table(
            ".json",
            r#"[{"id": 1, "iso": "SE", "lon": 19.0, "lat": 60.0, "capacity_mw": 300},
                {"id": "two", "iso": "SE", "lon": 19.1, "lat": 60.1, "capacity_mw": 200}]"#,
        );
        let offshore = table(
            ".json",
            r#"[{"id": 1, "iso": "SE", "lon": 19.2, "lat": 60.0, "depth_m": 30, "ice_cover": 1, "port_distance_km": 40}]"#,
        );
        let onshore = table(".json", r#"[{"id": 1, "iso": "SE", "lon": 18.5, "lat": 60.2}]"#);

        let loaded = load_records(
            RecordPaths {
                wind_farms: farms.path(),
                offshore: offshore.path(),
                onshore: onshore.path(),
            },
            false,
        )
        .unwrap();

        assert_eq!(loaded.scenario.wind_farms.len(), 1);
        assert!(loaded.scenario.offshore[0].ice_cover);
        assert_eq!(loaded.diagnostics.error_count(), 1);
    }

    #[test]
    fn test_empty_csv_is_an_error() {
        let farms = table(".csv", "id,iso,lon,lat,capacity_mw\n");
        let other = table(".csv", "id,iso,lon,lat\n1,NL,4.6,52.5\n");
        let result = load_records(
            RecordPaths {
                wind_farms: farms.path(),
                offshore: other.path(),
                onshore: other.path(),
            },
            true,
        );
        assert!(result.is_err());
    }
}
