//! CLI module for the entitlements service
//!
//! Subcommands:
//! - `serve`: run the HTTP API (default)
//! - `migrate`: apply PostgreSQL schema migrations and exit

pub mod migrate;
pub mod serve;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::infrastructure::logging;

/// Plan & Feature entitlements service
#[derive(Parser)]
#[command(name = "plan-entitlements")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// Run the HTTP API (default)
    Serve,

    /// Apply database migrations and exit
    Migrate,
}

impl Cli {
    /// Run the selected subcommand
    pub async fn run(self) -> anyhow::Result<()> {
        let config = load_config()?;

        match self.command.unwrap_or(Command::Serve) {
            Command::Serve => serve::run(config).await,
            Command::Migrate => migrate::run(config).await,
        }
    }
}

/// Load `.env`, the layered configuration, and install the log subscriber
fn load_config() -> anyhow::Result<AppConfig> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    logging::init_logging(&config.logging);

    Ok(config)
}
