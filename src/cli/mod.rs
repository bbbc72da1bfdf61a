//! CLI interface for stonks-poller
//!
//! Provides subcommands for:
//! - `run`: Poll continuously and print a price readout
//! - `fetch`: Poll once and print the snapshot as JSON
//! - `config`: Show the effective configuration

mod fetch;
mod run;

pub use fetch::FetchArgs;
pub use run::{format_readout, RunArgs};

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "stonks")]
#[command(about = "Polls an intraday stock-quote API and prints the latest candles")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Poll continuously and print a price readout
    Run(RunArgs),
    /// Poll once and print the snapshot
    Fetch(FetchArgs),
    /// Show the effective configuration
    Config,
}
