//! `owe config template|check`

use anyhow::Result;
use owe_cli::cli::ConfigCommands;
use owe_cli::run_config::RunConfig;
use tracing::info;

pub fn handle(command: &ConfigCommands) -> Result<()> {
    match command {
        ConfigCommands::Template => {
            print!("{}", RunConfig::default().to_toml()?);
            Ok(())
        }
        ConfigCommands::Check { path } => {
            let config = RunConfig::load(path)?;
            config.solver.backend()?;
            info!("{} is valid", path.display());
            println!("{}: ok", path.display());
            Ok(())
        }
    }
}
