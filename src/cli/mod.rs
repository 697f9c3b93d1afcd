//! Command-line interface wiring for lyon-stories.

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::config::Settings;

pub mod analyze;
pub mod rank;
pub mod serve;

/// Top-level CLI definition.
#[derive(Debug, Parser)]
#[command(author, version, about = "Bowler-vs-batter dismissal narratives", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Parse CLI arguments from the environment.
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Dispatch the selected sub-command.
    pub async fn dispatch(self, settings: Settings) -> Result<()> {
        match self.command {
            Commands::Serve(args) => serve::run(args, settings).await,
            Commands::Rank(args) => rank::run(args, settings).await,
            Commands::Analyze(args) => analyze::run(args, settings).await,
        }
    }
}

/// Supported sub-commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Serve the `/analyze` and `/download` HTTP API.
    Serve(serve::Args),
    /// Print the top batters of a local CSV without generating stories.
    Rank(rank::Args),
    /// Generate stories for a local CSV and optionally write the report.
    Analyze(analyze::Args),
}
