//! # owe-algo: Offshore Grid Design Algorithms
//!
//! Cost engines and the topology optimiser for radial offshore wind grids.
//!
//! ## Pipeline
//!
//! ```text
//!   Scenario ──▶ viability ──▶ cost engines ──▶ design::formulate ──▶ SolverBackend ──▶ DesignSolution
//!                (edges)       (cable, OSS, PV)   (MilpModel)          (good_lp)
//! ```
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`geodesic`] | Haversine distances on a spherical Earth |
//! | [`viability`] | Candidate edges under distance ceilings |
//! | [`cost`] | Cable sizing, substation pricing, present value |
//! | [`milp`] | Solver-independent model arena and good_lp backends |
//! | [`design`] | Radial design formulation, solve and extraction |
//! | [`config`] | Run configuration with defaults for every section |
//!
//! ## Example
//!
//! ```no_run
//! use owe_algo::design::{solve_design, DesignProblemBuilder, DesignSolverOptions};
//! use owe_core::*;
//!
//! let problem = DesignProblemBuilder::new()
//!     .wind_farm(WindFarm::new(WindFarmId::new(1), "NL", GeoPoint::new(4.0, 53.0), Megawatts(400.0)))
//!     .offshore_substation(OffshoreSubstation::new(
//!         OffshoreSubstationId::new(1),
//!         "NL",
//!         GeoPoint::new(4.1, 52.9),
//!         Meters(25.0),
//!         Kilometers(50.0),
//!     ))
//!     .onshore_substation(OnshoreSubstation::new(OnshoreSubstationId::new(1), "NL", GeoPoint::new(4.6, 52.5)))
//!     .build();
//!
//! let solution = solve_design(&problem, &DesignSolverOptions::default())?;
//! println!("{}", solution.summary());
//! # Ok::<(), owe_algo::design::DesignError>(())
//! ```

pub mod config;
pub mod cost;
pub mod design;
pub mod geodesic;
pub mod milp;
pub mod viability;

pub use config::DesignConfig;
pub use cost::{CableEngine, CostError, PresentValueEngine, SubstationEngine};
pub use design::{
    formulate, solve_design, solve_design_with, DesignError, DesignProblem, DesignProblemBuilder,
    DesignSolution, DesignSolverOptions,
};
pub use geodesic::{haversine_distance, haversine_km, DistanceUnit};
pub use milp::{GoodLpBackend, MilpModel, MilpSolverKind, SolveStatus, SolverBackend};
pub use viability::{find_viable_edges, ViabilityGraph};
