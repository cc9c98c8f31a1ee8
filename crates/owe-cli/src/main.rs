use clap::Parser;
use owe_cli::cli::{Cli, Commands};
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod commands;

use crate::commands::{config, cost, optimize, viability};

fn main() -> ExitCode {
    let cli = Cli::parse();

    // RUST_LOG wins over --log-level so module filters stay available
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_level.as_str().to_ascii_lowercase()));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("failed to install log subscriber: {}", err);
    }

    let result = match &cli.command {
        Some(Commands::Optimize {
            records,
            out,
            solver,
            time_limit,
        }) => optimize::handle(records, out.as_deref(), solver.as_deref(), *time_limit),
        Some(Commands::Viability { records }) => viability::handle(records),
        Some(Commands::Cost { command }) => cost::handle(command),
        Some(Commands::Config { command }) => config::handle(command),
        None => {
            info!("No subcommand provided. Use `owe --help` for more information.");
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
