//! CLI entry-point for generating stories from a local table.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args as ClapArgs;
use tracing::{info, instrument};

use crate::{
    api::types::StoriesPayload,
    config::Settings,
    data,
    narrative::{self, GroqClient},
    report,
};

/// Args for the `analyze` command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// CSV with Batter, DisDescending, Ave and Span columns.
    #[arg(long)]
    pub csv: PathBuf,
    /// Also write the plain-text report here.
    #[arg(long)]
    pub report: Option<PathBuf>,
}

#[instrument(skip(settings))]
pub async fn run(args: Args, settings: Settings) -> Result<()> {
    let table = tokio::fs::read(&args.csv)
        .await
        .with_context(|| format!("read {}", args.csv.display()))?;
    let ranked = data::rank(&table)?;
    let client = GroqClient::from_settings(&settings)?;
    let stories = narrative::generate(&ranked, &settings.prompt, &client, &settings.model).await?;

    if let Some(path) = &args.report {
        report::write_report(path, &stories)
            .with_context(|| format!("write report {}", path.display()))?;
        info!(path = %path.display(), "report written");
    }
    println!(
        "{}",
        serde_json::to_string_pretty(&StoriesPayload { stories })?
    );
    Ok(())
}
