//! Runtime configuration utilities for lyon-stories.

use std::{env, path::PathBuf};

use anyhow::Context;

use crate::narrative::prompt::PromptTemplate;

/// Default OpenAI-compatible endpoint hosting the completion model.
pub const DEFAULT_API_BASE: &str = "https://api.groq.com/openai/v1";
/// Default completion model identifier.
pub const DEFAULT_MODEL: &str = "llama3-8b-8192";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Application configuration resolved from `.env` and defaults.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Bearer credential for the completion service.
    pub api_key: Option<String>,
    /// Base URL of the chat-completions API, without trailing slash.
    pub api_base: String,
    /// Model identifier sent with every completion request.
    pub model: String,
    /// Prompt rendered once per ranked row.
    pub prompt: PromptTemplate,
    /// Optional directory served to browser clients.
    pub static_dir: Option<PathBuf>,
    /// Upper bound on request bodies accepted by `/analyze`.
    pub max_upload_bytes: usize,
}

impl Settings {
    /// Load configuration from environment with reasonable defaults.
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let api_key = env::var("GROQ_API_KEY").ok().filter(|k| !k.trim().is_empty());
        let api_base = env::var("COMPLETION_API_BASE")
            .map(|base| base.trim_end_matches('/').to_string())
            .unwrap_or_else(|_| DEFAULT_API_BASE.to_string());
        let model = env::var("COMPLETION_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let prompt = match env::var("PROMPT_TEMPLATE_PATH") {
            Ok(path) => {
                let text = std::fs::read_to_string(&path)
                    .with_context(|| format!("reading prompt template {path}"))?;
                PromptTemplate::new(text)
            }
            Err(_) => PromptTemplate::default(),
        };
        let static_dir = env::var("STATIC_DIR").ok().map(PathBuf::from);
        let max_upload_bytes = env::var("MAX_UPLOAD_BYTES")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES);

        Ok(Self {
            api_key,
            api_base,
            model,
            prompt,
            static_dir,
            max_upload_bytes,
        })
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base: DEFAULT_API_BASE.to_string(),
            model: DEFAULT_MODEL.to_string(),
            prompt: PromptTemplate::default(),
            static_dir: None,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}
