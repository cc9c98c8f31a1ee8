//! `owe cost cable|substation`

use anyhow::{Context, Result};
use owe_algo::cost::{
    CableEngine, CableLink, CostBreakdown, PresentValueEngine, SubstationEngine,
};
use owe_cli::cli::{CableKind, CostCommands};
use owe_cli::run_config::RunConfig;
use owe_core::{Kilometers, Megawatts, Meters, Polarity};
use std::io::{self, Write};
use tabwriter::TabWriter;

pub fn handle(command: &CostCommands) -> Result<()> {
    match command {
        CostCommands::Cable {
            distance_km,
            power_mw,
            kind,
            polarity,
            config,
            json,
        } => {
            let config = RunConfig::load_or_default(config.as_deref())?;
            cable(&config, *distance_km, *power_mw, *kind, polarity.map(Polarity::from), *json)
        }
        CostCommands::Substation {
            depth_m,
            port_distance_km,
            capacity_mw,
            ice,
            polarity,
            config,
            json,
        } => {
            let config = RunConfig::load_or_default(config.as_deref())?;
            substation(
                &config,
                *depth_m,
                *port_distance_km,
                *capacity_mw,
                *ice,
                polarity.map(Polarity::from),
                *json,
            )
        }
    }
}

fn cable(
    config: &RunConfig,
    distance_km: f64,
    power_mw: f64,
    kind: CableKind,
    polarity: Option<Polarity>,
    json: bool,
) -> Result<()> {
    let present_value = PresentValueEngine::new(config.design.present_value.clone())?;
    let engine = CableEngine::new(config.design.cables.clone(), present_value)?;
    let link = CableLink::from(kind);
    let settings = engine.link(link);
    let selection = engine
        .size_with(
            Kilometers(distance_km),
            Megawatts(power_mw),
            polarity.unwrap_or(settings.polarity),
            settings.min_voltage_kv,
        )
        .with_context(|| format!("sizing {} cable", link))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&selection)?);
        return Ok(());
    }

    let mut writer = TabWriter::new(io::stdout());
    writeln!(writer, "Link\t{}", link)?;
    writeln!(writer, "Cable\t{:.0} kV {:.0} mm²", selection.cable.voltage_kv, selection.cable.section_mm2)?;
    writeln!(writer, "Count\t{}", selection.count)?;
    writeln!(writer, "Route length\t{:.2} km", selection.route_length.to_kilometers().value())?;
    writeln!(
        writer,
        "Capacity\t{:.1} of {:.1} MW",
        selection.required_capacity, selection.installed_capacity
    )?;
    writeln!(
        writer,
        "Losses\t{:.2} MW ({:.2}%)",
        selection.resistive_losses.value(),
        selection.loss_ratio * 100.0
    )?;
    write_breakdown(&mut writer, &selection.cost)?;
    writer.flush()?;
    Ok(())
}

fn substation(
    config: &RunConfig,
    depth_m: f64,
    port_distance_km: f64,
    capacity_mw: f64,
    ice: bool,
    polarity: Option<Polarity>,
    json: bool,
) -> Result<()> {
    let present_value = PresentValueEngine::new(config.design.present_value.clone())?;
    let engine = SubstationEngine::new(config.design.substation.clone(), present_value)?;
    let cost = engine
        .price(
            Meters(depth_m),
            ice,
            Kilometers(port_distance_km),
            Megawatts(capacity_mw),
            polarity.unwrap_or(engine.config().polarity),
        )
        .context("pricing offshore substation")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&cost)?);
        return Ok(());
    }

    let mut writer = TabWriter::new(io::stdout());
    writeln!(writer, "Structure\t{}", cost.structure)?;
    writeln!(writer, "Polarity\t{}", cost.polarity)?;
    writeln!(
        writer,
        "Capacity\t{:.1} MW (equivalent {:.1} MW)",
        cost.capacity.value(),
        cost.equivalent_capacity.value()
    )?;
    writeln!(writer, "Foundation\t{:.2} M€", cost.foundation.millions())?;
    writeln!(writer, "Converter\t{:.2} M€", cost.converter.millions())?;
    write_breakdown(&mut writer, &cost.cost)?;
    writer.flush()?;
    Ok(())
}

fn write_breakdown<W: Write>(writer: &mut W, cost: &CostBreakdown) -> io::Result<()> {
    writeln!(writer, "Equipment\t{:.2} M€", cost.equipment.millions())?;
    writeln!(writer, "Installation\t{:.2} M€", cost.installation.millions())?;
    writeln!(writer, "Operation (yearly)\t{:.3} M€", cost.operational_yearly.millions())?;
    writeln!(writer, "Decommissioning\t{:.2} M€", cost.decommissioning.millions())?;
    writeln!(writer, "Present value\t{:.2} M€", cost.total().millions())
}
