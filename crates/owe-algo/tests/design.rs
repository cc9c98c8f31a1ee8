//! End-to-end design runs through the default microlp backend.

use owe_algo::config::DesignConfig;
use owe_algo::cost::{CableEngine, CableLink, PresentValueEngine, SubstationEngine};
use owe_algo::design::{
    solve_design, solve_design_with, DesignError, DesignProblem, DesignProblemBuilder,
    DesignSolverOptions,
};
use owe_algo::geodesic::haversine_km;
use owe_algo::milp::{GoodLpBackend, MilpModel, SolveStatus, SolverBackend, SolverOutcome};
use owe_core::*;
use std::time::Duration;

fn farm(id: usize, iso: &str, lon: f64, lat: f64, mw: f64) -> WindFarm {
    WindFarm::new(WindFarmId::new(id), iso, GeoPoint::new(lon, lat), Megawatts(mw))
}

fn offshore(id: usize, iso: &str, lon: f64, lat: f64, depth: f64) -> OffshoreSubstation {
    OffshoreSubstation::new(
        OffshoreSubstationId::new(id),
        iso,
        GeoPoint::new(lon, lat),
        Meters(depth),
        Kilometers(60.0),
    )
}

fn onshore(id: usize, iso: &str, lon: f64, lat: f64) -> OnshoreSubstation {
    OnshoreSubstation::new(OnshoreSubstationId::new(id), iso, GeoPoint::new(lon, lat))
}

struct Engines {
    cable: CableEngine,
    substation: SubstationEngine,
}

fn engines(config: &DesignConfig) -> Engines {
    let pv = PresentValueEngine::new(config.present_value.clone()).unwrap();
    Engines {
        cable: CableEngine::new(config.cables.clone(), pv.clone()).unwrap(),
        substation: SubstationEngine::new(config.substation.clone(), pv).unwrap(),
    }
}

fn solve(problem: &DesignProblem) -> owe_algo::design::DesignSolution {
    solve_design(problem, &DesignSolverOptions::default()).unwrap()
}

fn assert_close(actual: f64, expected: f64) {
    let tolerance = 1e-6 * expected.abs().max(1.0);
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {}, got {}",
        expected,
        actual
    );
}

#[test]
fn test_full_connection_matches_independent_costing() {
    let wf1 = farm(1, "NL", 4.0, 53.0, 300.0).with_fixed_cost(Euros(5.0e6));
    let wf2 = farm(2, "NL", 4.3, 53.1, 500.0);
    let oss = offshore(1, "NL", 4.1, 52.9, 25.0);
    let onss = onshore(1, "NL", 4.6, 52.5);

    let problem = DesignProblemBuilder::new()
        .wind_farm(wf1.clone())
        .wind_farm(wf2.clone())
        .offshore_substation(oss.clone())
        .onshore_substation(onss.clone())
        .min_capacity_fraction(1.0)
        .build();
    let solution = solve(&problem);

    assert_eq!(solution.status, SolveStatus::Optimal);
    assert_eq!(solution.selected_wind_farms, vec![WindFarmId::new(1), WindFarmId::new(2)]);
    assert_eq!(solution.selected_offshore, vec![OffshoreSubstationId::new(1)]);
    assert_eq!(solution.selected_onshore, vec![OnshoreSubstationId::new(1)]);
    assert_eq!(solution.inter_array.len(), 2);
    assert_eq!(solution.export.len(), 1);
    assert_eq!(solution.connected_capacity, Megawatts(800.0));
    assert_eq!(solution.substations[0].capacity, Megawatts(800.0));
    assert_eq!(solution.substations[0].tier_level, Megawatts(800.0));

    let e = engines(&problem.config);
    let expected = 5.0e6
        + e.cable
            .cost(haversine_km(wf1.location, oss.location), wf1.capacity, CableLink::InterArray)
            .unwrap()
            .value()
        + e.cable
            .cost(haversine_km(wf2.location, oss.location), wf2.capacity, CableLink::InterArray)
            .unwrap()
            .value()
        + e.substation.cost(&oss, Megawatts(800.0)).unwrap().value()
        + e.cable
            .cost(haversine_km(oss.location, onss.location), Megawatts(800.0), CableLink::Export)
            .unwrap()
            .value();

    assert_close(solution.objective.unwrap().value(), expected);
    assert!(solution.check_radial().is_ok());
}

#[test]
fn test_selected_entities_carry_cost_components() {
    let wf = farm(1, "NL", 4.0, 53.0, 300.0);
    let oss = offshore(1, "NL", 4.1, 52.9, 45.0);
    let onss = onshore(1, "NL", 4.6, 52.5);
    let problem = DesignProblemBuilder::new()
        .wind_farm(wf.clone())
        .offshore_substation(oss.clone())
        .onshore_substation(onss)
        .min_capacity_fraction(1.0)
        .build();
    let solution = solve(&problem);
    assert!(solution.has_solution());

    let costs = solution
        .inter_array
        .iter()
        .map(|l| (l.cost, l.breakdown))
        .chain(solution.export.iter().map(|l| (l.cost, l.breakdown)))
        .chain(solution.substations.iter().map(|s| (s.cost, s.breakdown)));
    for (cost, breakdown) in costs {
        let pv = breakdown.present_value;
        assert_close(
            (pv.equipment + pv.installation + pv.operational + pv.decommissioning).value(),
            cost.value(),
        );
        assert!(breakdown.capital().value() > 0.0);
        assert!(breakdown.operational_yearly.value() > 0.0);
    }

    let e = engines(&problem.config);
    let priced = e.substation.price_site(&oss, Megawatts(300.0)).unwrap();
    assert_eq!(solution.substations[0].breakdown, priced.cost);

    let combined = solution.cost_components().total().value();
    let fixed = solution.total_fixed_cost().value();
    assert_close(combined + fixed, solution.objective.unwrap().value());
}

#[test]
fn test_picks_cheaper_substation() {
    let wf = farm(1, "DK", 11.0, 55.2, 400.0);
    // Sand island in shallow water versus a jacket further out
    let near = offshore(1, "DK", 11.1, 55.3, 20.0);
    let far = offshore(2, "DK", 11.6, 55.0, 60.0);
    let onss = onshore(1, "DK", 11.5, 55.6);

    let problem = DesignProblemBuilder::new()
        .wind_farm(wf.clone())
        .offshore_substation(near.clone())
        .offshore_substation(far.clone())
        .onshore_substation(onss.clone())
        .min_capacity_fraction(1.0)
        .build();
    let solution = solve(&problem);
    assert!(solution.has_solution());

    let e = engines(&problem.config);
    let route_cost = |site: &OffshoreSubstation| {
        e.cable
            .cost(haversine_km(wf.location, site.location), wf.capacity, CableLink::InterArray)
            .unwrap()
            .value()
            + e.substation.cost(site, wf.capacity).unwrap().value()
            + e.cable
                .cost(haversine_km(site.location, onss.location), wf.capacity, CableLink::Export)
                .unwrap()
                .value()
    };
    let (near_cost, far_cost) = (route_cost(&near), route_cost(&far));
    let expected_site = if near_cost <= far_cost { near.id } else { far.id };

    assert_eq!(solution.selected_offshore, vec![expected_site]);
    assert_close(solution.objective.unwrap().value(), near_cost.min(far_cost));
}

#[test]
fn test_unreachable_minimum_is_infeasible() {
    let problem = DesignProblemBuilder::new()
        .wind_farm(farm(1, "NL", 4.0, 53.0, 300.0))
        .offshore_substation(offshore(1, "NL", 4.1, 52.9, 25.0))
        .onshore_substation(onshore(1, "NL", 4.6, 52.5))
        .min_capacity_fraction(1.5)
        .build();
    let solution = solve(&problem);

    assert_eq!(solution.status, SolveStatus::Infeasible);
    assert!(solution.objective.is_none());
    assert!(solution.selected_wind_farms.is_empty());
}

#[test]
fn test_zero_minimum_selects_nothing() {
    let problem = DesignProblemBuilder::new()
        .wind_farm(farm(1, "NL", 4.0, 53.0, 300.0))
        .offshore_substation(offshore(1, "NL", 4.1, 52.9, 25.0))
        .onshore_substation(onshore(1, "NL", 4.6, 52.5))
        .min_capacity_fraction(0.0)
        .build();
    let solution = solve(&problem);

    assert!(solution.has_solution());
    assert!(solution.selected_wind_farms.is_empty());
    assert!(solution.selected_offshore.is_empty());
    assert_close(solution.objective.unwrap().value(), 0.0);
}

#[test]
fn test_iso_mismatch_never_connects() {
    let problem = DesignProblemBuilder::new()
        .wind_farm(farm(1, "NL", 4.0, 53.0, 600.0))
        .wind_farm(farm(2, "DE", 4.1, 53.0, 200.0))
        .offshore_substation(offshore(1, "NL", 4.1, 52.9, 25.0))
        .onshore_substation(onshore(1, "NL", 4.6, 52.5))
        .min_capacity_fraction(0.5)
        .build();
    let solution = solve(&problem);

    assert!(solution.has_solution());
    assert_eq!(solution.selected_wind_farms, vec![WindFarmId::new(1)]);
    assert!(solution.inter_array.iter().all(|l| l.wind_farm != WindFarmId::new(2)));
}

#[test]
fn test_ineligible_onshore_is_never_used() {
    let problem = DesignProblemBuilder::new()
        .wind_farm(farm(1, "BE", 2.8, 51.6, 400.0))
        .offshore_substation(offshore(1, "BE", 2.9, 51.5, 25.0))
        .onshore_substation(onshore(1, "BE", 3.0, 51.3).with_eligible(false))
        .onshore_substation(onshore(2, "BE", 3.4, 51.2))
        .min_capacity_fraction(1.0)
        .build();
    let solution = solve(&problem);

    assert!(solution.has_solution());
    assert_eq!(solution.selected_onshore, vec![OnshoreSubstationId::new(2)]);
}

#[test]
fn test_max_substation_capacity_splits_collection() {
    let mut problem = DesignProblemBuilder::new()
        .wind_farm(farm(1, "NL", 4.0, 53.0, 400.0))
        .wind_farm(farm(2, "NL", 4.2, 53.0, 400.0))
        .offshore_substation(offshore(1, "NL", 4.05, 52.9, 25.0))
        .offshore_substation(offshore(2, "NL", 4.25, 52.9, 25.0))
        .onshore_substation(onshore(1, "NL", 4.6, 52.5))
        .min_capacity_fraction(1.0)
        .build();
    problem.config.capacity.max_substation_mw = Some(500.0);
    let solution = solve(&problem);

    assert!(solution.has_solution());
    assert_eq!(solution.selected_offshore.len(), 2);
    assert!(solution.substations.iter().all(|s| s.capacity.value() <= 500.0));
}

#[test]
fn test_grid_tiers_cover_aggregate() {
    let mut problem = DesignProblemBuilder::new()
        .wind_farm(farm(1, "NL", 4.0, 53.0, 300.0))
        .wind_farm(farm(2, "NL", 4.3, 53.1, 500.0))
        .offshore_substation(offshore(1, "NL", 4.1, 52.9, 25.0))
        .onshore_substation(onshore(1, "NL", 4.6, 52.5))
        .min_capacity_fraction(1.0)
        .build();
    problem.config.tiers.exact_tier_limit = 0;
    problem.config.tiers.grid_tiers = 4;
    let solution = solve(&problem);

    assert!(solution.has_solution());
    let sub = &solution.substations[0];
    assert_eq!(sub.capacity, Megawatts(800.0));
    assert!(sub.tier_level.value() >= 800.0 - 1e-9);
}

#[test]
fn test_isolated_and_invalid_records_are_reported() {
    let mut bad = farm(3, "NL", 4.1, 53.0, 100.0);
    bad.location.lat = f64::NAN;

    let problem = DesignProblemBuilder::new()
        .wind_farm(farm(1, "NL", 4.0, 53.0, 300.0))
        .wind_farm(farm(2, "NL", 12.0, 58.0, 100.0))
        .wind_farm(bad)
        .offshore_substation(offshore(1, "NL", 4.1, 52.9, 25.0))
        .onshore_substation(onshore(1, "NL", 4.6, 52.5))
        .min_capacity_fraction(0.5)
        .build();
    let solution = solve(&problem);

    assert!(solution.has_solution());
    assert_eq!(solution.selected_wind_farms, vec![WindFarmId::new(1)]);
    assert!(solution.diagnostics.issues_for("WindFarm 2").count() >= 1);
    assert!(solution.diagnostics.issues_for("WindFarm 3").count() >= 1);
    assert!(solution.diagnostics.has_errors());
    // Invalid records do not count towards the potential
    assert_eq!(solution.total_capacity, Megawatts(400.0));
}

#[test]
fn test_no_valid_wind_farm_is_an_error() {
    let problem = DesignProblemBuilder::new()
        .wind_farm(farm(1, "NL", 4.0, 53.0, -10.0))
        .offshore_substation(offshore(1, "NL", 4.1, 52.9, 25.0))
        .onshore_substation(onshore(1, "NL", 4.6, 52.5))
        .build();
    let err = solve_design(&problem, &DesignSolverOptions::default()).unwrap_err();
    assert!(matches!(err, DesignError::NoValidConfiguration(_)));
}

#[test]
fn test_invalid_config_fails_before_solving() {
    let mut problem = DesignProblemBuilder::new()
        .wind_farm(farm(1, "NL", 4.0, 53.0, 300.0))
        .offshore_substation(offshore(1, "NL", 4.1, 52.9, 25.0))
        .onshore_substation(onshore(1, "NL", 4.6, 52.5))
        .build();
    problem.config.present_value.discount_rate = -1.5;

    struct Unreachable;
    impl SolverBackend for Unreachable {
        fn name(&self) -> &'static str {
            "unreachable"
        }
        fn solve(&self, _model: &MilpModel) -> SolverOutcome {
            panic!("solver must not run for an invalid configuration")
        }
    }

    assert!(solve_design_with(&problem, &Unreachable).is_err());
}

#[test]
fn test_backend_failure_is_reported_as_status() {
    struct Failing;
    impl SolverBackend for Failing {
        fn name(&self) -> &'static str {
            "failing"
        }
        fn solve(&self, _model: &MilpModel) -> SolverOutcome {
            SolverOutcome {
                status: SolveStatus::Error("license expired".to_string()),
                values: Vec::new(),
                solve_time: Duration::from_millis(1),
            }
        }
    }

    let problem = DesignProblemBuilder::new()
        .wind_farm(farm(1, "NL", 4.0, 53.0, 300.0))
        .offshore_substation(offshore(1, "NL", 4.1, 52.9, 25.0))
        .onshore_substation(onshore(1, "NL", 4.6, 52.5))
        .build();
    let solution = solve_design_with(&problem, &Failing).unwrap();
    assert_eq!(solution.status, SolveStatus::Error("license expired".to_string()));
    assert_eq!(solution.solver, "failing");
}

#[test]
fn test_infeasible_assignment_from_backend_is_rejected() {
    // Claims optimality with everything off, which breaks the minimum
    struct Lying;
    impl SolverBackend for Lying {
        fn name(&self) -> &'static str {
            "lying"
        }
        fn solve(&self, model: &MilpModel) -> SolverOutcome {
            SolverOutcome {
                status: SolveStatus::Optimal,
                values: vec![0.0; model.num_variables()],
                solve_time: Duration::ZERO,
            }
        }
    }

    let problem = DesignProblemBuilder::new()
        .wind_farm(farm(1, "NL", 4.0, 53.0, 300.0))
        .offshore_substation(offshore(1, "NL", 4.1, 52.9, 25.0))
        .onshore_substation(onshore(1, "NL", 4.6, 52.5))
        .min_capacity_fraction(1.0)
        .build();
    let solution = solve_design_with(&problem, &Lying).unwrap();
    match solution.status {
        SolveStatus::Error(message) => assert!(message.contains("minimum_capacity"), "{}", message),
        other => panic!("expected error status, got {}", other),
    }
}

#[test]
fn test_incumbent_from_time_limit_is_feasible() {
    // Wraps microlp and reports its answer as a limit-stopped incumbent
    struct Stopped;
    impl SolverBackend for Stopped {
        fn name(&self) -> &'static str {
            "stopped"
        }
        fn solve(&self, model: &MilpModel) -> SolverOutcome {
            let outcome = GoodLpBackend::default().solve(model);
            SolverOutcome {
                status: SolveStatus::Feasible,
                ..outcome
            }
        }
    }

    let problem = DesignProblemBuilder::new()
        .wind_farm(farm(1, "NL", 4.0, 53.0, 300.0))
        .offshore_substation(offshore(1, "NL", 4.1, 52.9, 25.0))
        .onshore_substation(onshore(1, "NL", 4.6, 52.5))
        .min_capacity_fraction(1.0)
        .build();
    let solution = solve_design_with(&problem, &Stopped).unwrap();
    assert_eq!(solution.status, SolveStatus::Feasible);
    assert!(solution.has_solution());
    assert_eq!(solution.selected_wind_farms, vec![WindFarmId::new(1)]);
    assert!(solution.summary().contains("Status: feasible"));
}
