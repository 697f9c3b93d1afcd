//! Narrative generation over a ranked set.

pub mod client;
pub mod mock;
pub mod prompt;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::data::RankedSet;

pub use client::{CompletionClient, CompletionRequest, GroqClient};
pub use prompt::PromptTemplate;

/// Sampling temperature for every narrative call.
pub const TEMPERATURE: f32 = 0.7;

/// A ranked row's identifying stats plus its generated story.
///
/// Field names follow the JSON contract shared by `/analyze` and `/download`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NarrativeRecord {
    #[serde(rename = "batsman")]
    pub subject: String,
    #[serde(rename = "dismissals")]
    pub dismissal_count: i64,
    pub average: f64,
    #[serde(rename = "story")]
    pub text: String,
}

/// Generate one narrative per row, strictly in ranked order.
///
/// The first failing call aborts the whole batch; no partial output is
/// returned and nothing is retried.
#[instrument(skip_all, fields(rows = ranked.len(), model = %model))]
pub async fn generate(
    ranked: &RankedSet,
    template: &PromptTemplate,
    client: &dyn CompletionClient,
    model: &str,
) -> anyhow::Result<Vec<NarrativeRecord>> {
    let mut records = Vec::with_capacity(ranked.len());
    for row in ranked {
        let request = CompletionRequest {
            model: model.to_string(),
            prompt: template.render(row),
            temperature: TEMPERATURE,
        };
        let text = client
            .complete(&request)
            .await
            .with_context(|| format!("generating narrative for {}", row.subject))?;
        records.push(NarrativeRecord {
            subject: row.subject.clone(),
            dismissal_count: row.dismissal_count,
            average: row.average,
            text,
        });
    }
    info!(stories = records.len(), "narratives generated");
    Ok(records)
}
