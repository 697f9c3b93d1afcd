//! CLI entry-point for ranking a local table.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args as ClapArgs;
use tracing::{info, instrument};

use crate::{config::Settings, data};

/// Args for the `rank` command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// CSV with Batter, DisDescending, Ave and Span columns.
    #[arg(long)]
    pub csv: PathBuf,
}

#[instrument(skip(_settings))]
pub async fn run(args: Args, _settings: Settings) -> Result<()> {
    let table = tokio::fs::read(&args.csv)
        .await
        .with_context(|| format!("read {}", args.csv.display()))?;
    let ranked = data::rank(&table)?;
    info!(rows = ranked.len(), "ranked table");
    println!("{}", serde_json::to_string_pretty(&ranked)?);
    Ok(())
}
