use clap::{CommandFactory, Parser, Subcommand, ValueEnum, ValueHint};
use owe_algo::cost::CableLink;
use owe_core::Polarity;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "owe", author, version, about = "Offshore wind grid topology optimizer", long_about = None)]
pub struct Cli {
    /// Set the logging level (overridden by RUST_LOG when set)
    #[arg(long, default_value = "info", global = true)]
    pub log_level: tracing::Level,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Entity record files shared by the topology commands
#[derive(clap::Args, Debug, Clone)]
pub struct RecordArgs {
    /// Wind farm records (CSV or JSON)
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub wind_farms: PathBuf,
    /// Offshore substation records (CSV or JSON)
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub offshore: PathBuf,
    /// Onshore substation records (CSV or JSON)
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub onshore: PathBuf,
    /// Run configuration (TOML); defaults apply when omitted
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Optimize the radial grid topology
    Optimize {
        #[command(flatten)]
        records: RecordArgs,
        /// Write the solution as JSON
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        out: Option<PathBuf>,
        /// MILP solver (microlp, highs)
        #[arg(long)]
        solver: Option<String>,
        /// Solver time limit in seconds
        #[arg(long)]
        time_limit: Option<f64>,
    },
    /// List candidate edges under the distance ceilings
    Viability {
        #[command(flatten)]
        records: RecordArgs,
    },
    /// Price single components
    Cost {
        #[command(subcommand)]
        command: CostCommands,
    },
    /// Run configuration helpers
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum CostCommands {
    /// Size and price the cheapest cable for a route
    Cable {
        /// Geodesic distance (km)
        #[arg(long)]
        distance_km: f64,
        /// Power to carry (MW)
        #[arg(long)]
        power_mw: f64,
        /// Link role, selects the voltage floor
        #[arg(long, value_enum, default_value_t = CableKind::Export)]
        kind: CableKind,
        /// Override the configured polarity of the link
        #[arg(long, value_enum)]
        polarity: Option<PolarityArg>,
        /// Run configuration (TOML)
        #[arg(long, value_hint = ValueHint::FilePath)]
        config: Option<PathBuf>,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Price an offshore substation
    Substation {
        /// Water depth (m, positive below sea level)
        #[arg(long, allow_negative_numbers = true)]
        depth_m: f64,
        /// Distance to the installation port (km)
        #[arg(long)]
        port_distance_km: f64,
        /// Aggregate capacity (MW)
        #[arg(long)]
        capacity_mw: f64,
        /// Site is exposed to sea ice
        #[arg(long)]
        ice: bool,
        /// Override the configured substation polarity
        #[arg(long, value_enum)]
        polarity: Option<PolarityArg>,
        /// Run configuration (TOML)
        #[arg(long, value_hint = ValueHint::FilePath)]
        config: Option<PathBuf>,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the default run configuration as TOML
    Template,
    /// Load and validate a run configuration
    Check {
        #[arg(value_hint = ValueHint::FilePath)]
        path: PathBuf,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CableKind {
    InterArray,
    Export,
}

impl From<CableKind> for CableLink {
    fn from(kind: CableKind) -> Self {
        match kind {
            CableKind::InterArray => CableLink::InterArray,
            CableKind::Export => CableLink::Export,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolarityArg {
    Ac,
    Dc,
}

impl From<PolarityArg> for Polarity {
    fn from(arg: PolarityArg) -> Self {
        match arg {
            PolarityArg::Ac => Polarity::Ac,
            PolarityArg::Dc => Polarity::Dc,
        }
    }
}

pub fn build_cli_command() -> clap::Command {
    Cli::command()
}
