pub mod cli;
pub mod records;
pub mod run_config;

pub use cli::{build_cli_command, Cli, Commands, ConfigCommands, CostCommands, RecordArgs};
