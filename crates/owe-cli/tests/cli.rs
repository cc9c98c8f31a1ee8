//! Integration tests for the `owe` binary

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

struct Records {
    _dir: TempDir,
    wind_farms: PathBuf,
    offshore: PathBuf,
    onshore: PathBuf,
    root: PathBuf,
}

fn write_records() -> Records {
    let dir = TempDir::new().unwrap();
    let root = dir.path().to_path_buf();
    let wind_farms = root.join("wind_farms.csv");
    let offshore = root.join("offshore.csv");
    let onshore = root.join("onshore.csv");

    fs::write(
        &wind_farms,
        "id,name,iso,lon,lat,capacity_mw,fixed_cost_eur\n\
         1,North,NL,4.0,53.0,300,0\n\
         2,South,NL,4.3,53.1,500,0\n\
         3,Remote,NL,12.0,58.0,100,0\n",
    )
    .unwrap();
    // GIS elevations, negative below sea level
    fs::write(
        &offshore,
        "id,iso,lon,lat,depth_m,ice_cover,port_distance_km\n\
         1,NL,4.1,52.9,-45,0,60\n",
    )
    .unwrap();
    fs::write(&onshore, "id,iso,lon,lat,eligible\n1,NL,4.6,52.5,true\n").unwrap();

    Records {
        _dir: dir,
        wind_farms,
        offshore,
        onshore,
        root,
    }
}

fn record_args<'a>(records: &'a Records) -> Vec<&'a str> {
    vec![
        "--wind-farms",
        path_str(&records.wind_farms),
        "--offshore",
        path_str(&records.offshore),
        "--onshore",
        path_str(&records.onshore),
    ]
}

fn path_str(path: &Path) -> &str {
    path.to_str().unwrap()
}

#[test]
fn test_help_lists_commands() {
    cargo_bin_cmd!("owe")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("optimize"))
        .stdout(predicate::str::contains("viability"))
        .stdout(predicate::str::contains("cost"));
}

#[test]
fn test_config_template_is_valid_toml() {
    let output = cargo_bin_cmd!("owe")
        .args(["config", "template"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[viability]"))
        .stdout(predicate::str::contains("export_max_km"))
        .get_output()
        .stdout
        .clone();

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("run.toml");
    fs::write(&path, output).unwrap();
    cargo_bin_cmd!("owe")
        .args(["config", "check", path_str(&path)])
        .assert()
        .success()
        .stdout(predicate::str::contains("ok"));
}

#[test]
fn test_config_check_rejects_bad_values() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("run.toml");
    fs::write(&path, "[capacity]\nmin_fraction = -1.0\n").unwrap();
    cargo_bin_cmd!("owe")
        .args(["config", "check", path_str(&path)])
        .assert()
        .failure()
        .stderr(predicate::str::contains("min_fraction"));
}

#[test]
fn test_cost_cable_json() {
    let output = cargo_bin_cmd!("owe")
        .args(["cost", "cable", "--distance-km", "40", "--power-mw", "300", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert!(value["count"].as_u64().unwrap() >= 1);
    assert!(value["cost"]["present_value"]["total"].as_f64().unwrap() > 0.0);
}

#[test]
fn test_cost_cable_rejects_zero_power() {
    cargo_bin_cmd!("owe")
        .args(["cost", "cable", "--distance-km", "40", "--power-mw", "0"])
        .assert()
        .failure();
}

#[test]
fn test_cost_substation_regime() {
    cargo_bin_cmd!("owe")
        .args([
            "cost",
            "substation",
            "--depth-m",
            "20",
            "--port-distance-km",
            "80",
            "--capacity-mw",
            "1000",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("sand_island"))
        .stdout(predicate::str::contains("Present value"));

    cargo_bin_cmd!("owe")
        .args([
            "cost",
            "substation",
            "--depth-m",
            "200",
            "--port-distance-km",
            "80",
            "--capacity-mw",
            "1000",
            "--polarity",
            "dc",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("floating"));
}

#[test]
fn test_viability_lists_edges_and_isolated() {
    let records = write_records();
    cargo_bin_cmd!("owe")
        .arg("viability")
        .args(record_args(&records))
        .assert()
        .success()
        .stdout(predicate::str::contains("inter-array"))
        .stdout(predicate::str::contains("WindFarm 1"))
        .stdout(predicate::str::contains("2 inter-array and 1 export clusters"))
        .stdout(predicate::str::contains("isolated: WindFarm 3"));
}

#[test]
fn test_optimize_writes_solution() {
    let records = write_records();
    let out = records.root.join("solution.json");
    cargo_bin_cmd!("owe")
        .arg("optimize")
        .args(record_args(&records))
        .args(["--out", path_str(&out)])
        .assert()
        .success()
        .stdout(predicate::str::contains("Status: optimal"));

    let solution: serde_json::Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(solution["status"]["status"], "optimal");
    let substations = solution["substations"].as_array().unwrap();
    assert_eq!(substations.len(), 1);
    assert_eq!(substations[0]["structure"], "jacket");
    let breakdown = &substations[0]["breakdown"];
    assert!(breakdown["equipment"].as_f64().unwrap() > 0.0);
    assert_eq!(breakdown["present_value"]["total"], substations[0]["cost"]);
    for link in solution["inter_array"].as_array().unwrap() {
        assert!(link["breakdown"]["installation"].as_f64().unwrap() > 0.0);
    }
}

#[test]
fn test_optimize_infeasible_exits_non_zero() {
    let records = write_records();
    let config = records.root.join("run.toml");
    fs::write(&config, "[capacity]\nmin_fraction = 1.5\n").unwrap();
    cargo_bin_cmd!("owe")
        .arg("optimize")
        .args(record_args(&records))
        .args(["--config", path_str(&config)])
        .assert()
        .failure()
        .stdout(predicate::str::contains("infeasible"));
}

#[test]
fn test_optimize_unknown_solver_fails() {
    let records = write_records();
    cargo_bin_cmd!("owe")
        .arg("optimize")
        .args(record_args(&records))
        .args(["--solver", "cplex"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown MILP solver"));
}
