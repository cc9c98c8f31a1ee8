//! `owe optimize`

use anyhow::{bail, Context, Result};
use owe_algo::design::{solve_design, DesignProblem};
use owe_cli::cli::RecordArgs;
use owe_cli::records::{load_records, RecordPaths};
use owe_cli::run_config::RunConfig;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use tracing::info;

pub fn handle(
    records: &RecordArgs,
    out: Option<&Path>,
    solver: Option<&str>,
    time_limit: Option<f64>,
) -> Result<()> {
    let config = RunConfig::load_or_default(records.config.as_deref())?;
    let loaded = load_records(
        RecordPaths {
            wind_farms: &records.wind_farms,
            offshore: &records.offshore,
            onshore: &records.onshore,
        },
        config.records.invert_depth,
    )?;

    let mut options = config.solver.clone();
    if let Some(name) = solver {
        options.solver = name.to_string();
    }
    if let Some(seconds) = time_limit {
        options.time_limit_seconds = Some(seconds);
    }

    let problem = DesignProblem::new(loaded.scenario, config.design);
    info!(
        wind_farms = problem.num_wind_farms(),
        offshore = problem.num_offshore_substations(),
        onshore = problem.num_onshore_substations(),
        solver = %options.solver,
        "optimizing grid topology"
    );

    let mut solution = solve_design(&problem, &options).context("running design optimization")?;
    let mut diagnostics = loaded.diagnostics;
    diagnostics.merge(solution.diagnostics);
    solution.diagnostics = diagnostics;

    if let Some(path) = out {
        let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
        serde_json::to_writer_pretty(BufWriter::new(file), &solution)
            .with_context(|| format!("writing solution to {}", path.display()))?;
        info!("solution written to {}", path.display());
    }

    print!("{}", solution.summary());

    if !solution.has_solution() {
        bail!("design run ended with status {}", solution.status);
    }
    Ok(())
}
