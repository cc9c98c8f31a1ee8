//! `owe viability`

use anyhow::Result;
use owe_algo::viability::ViabilityGraph;
use owe_cli::cli::RecordArgs;
use owe_cli::records::{load_records, RecordPaths};
use owe_cli::run_config::RunConfig;
use std::io::{self, Write};
use tabwriter::TabWriter;

pub fn handle(records: &RecordArgs) -> Result<()> {
    let config = RunConfig::load_or_default(records.config.as_deref())?;
    let loaded = load_records(
        RecordPaths {
            wind_farms: &records.wind_farms,
            offshore: &records.offshore,
            onshore: &records.onshore,
        },
        config.records.invert_depth,
    )?;
    let (scenario, validation) = loaded.scenario.sanitize();
    let mut all = loaded.diagnostics;
    all.merge(validation);

    let graph = ViabilityGraph::build(&scenario, &config.design.viability);

    let mut writer = TabWriter::new(io::stdout());
    writeln!(writer, "KIND\tSOURCE\tDESTINATION\tDISTANCE_KM")?;
    for edge in &graph.inter_array.edges {
        writeln!(
            writer,
            "inter-array\t{}\t{}\t{:.2}",
            edge.source,
            edge.destination,
            edge.distance.value()
        )?;
    }
    for edge in &graph.export.edges {
        writeln!(
            writer,
            "export\t{}\t{}\t{:.2}",
            edge.source,
            edge.destination,
            edge.distance.value()
        )?;
    }
    writer.flush()?;

    println!(
        "\n{} inter-array and {} export candidates",
        graph.inter_array.len(),
        graph.export.len()
    );
    println!(
        "{} inter-array and {} export clusters",
        graph.inter_array.cluster_count(),
        graph.export.cluster_count()
    );
    for id in &graph.inter_array.isolated_sources {
        println!("isolated: {} (no offshore substation in range)", id);
    }
    for id in &graph.inter_array.isolated_destinations {
        println!("isolated: {} (no wind farm in range)", id);
    }
    for id in &graph.export.isolated_sources {
        println!("isolated: {} (no onshore substation in range)", id);
    }
    for id in &graph.export.isolated_destinations {
        println!("isolated: {} (no offshore substation in range)", id);
    }
    for issue in &all.issues {
        eprintln!("{}", issue);
    }
    Ok(())
}
