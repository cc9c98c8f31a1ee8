pub mod config;
pub mod cost;
pub mod optimize;
pub mod viability;
