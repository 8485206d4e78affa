//! # config: agent settings from environment variables

use std::time::Duration;

use anyhow::{bail, Context};

pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
pub const DEFAULT_MODEL: &str = "mistral:7b-instruct";

/// Everything the agent needs to talk to the model and post-process its output.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the Ollama server, without trailing slash
    pub ollama_url:       String,
    /// Model tag, e.g. "mistral:7b-instruct"
    pub model:            String,
    /// Sampling temperature for strategy generation
    pub temperature:      f32,
    /// Per-request timeout; generation may include model load time
    pub timeout:          Duration,
    /// Repair invalid strategies instead of rejecting them
    pub auto_fix:         bool,
    /// Ask the model for a plain-English explanation (falls back to a basic one)
    pub explain_with_llm: bool,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let temperature: f32 = lookup("LLM_TEMPERATURE")
            .unwrap_or_else(|| "0.1".to_string())
            .parse()
            .context("LLM_TEMPERATURE must be a number")?;

        let timeout_secs: u64 = lookup("LLM_TIMEOUT_SECS")
            .unwrap_or_else(|| "300".to_string())  // model load can take minutes
            .parse()
            .context("LLM_TIMEOUT_SECS must be a number")?;

        Ok(Self {
            ollama_url:       lookup("OLLAMA_URL")
                .unwrap_or_else(|| DEFAULT_OLLAMA_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            model:            lookup("OLLAMA_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            temperature,
            timeout:          Duration::from_secs(timeout_secs),
            auto_fix:         flag(lookup("AUTO_FIX"), "AUTO_FIX")?,
            explain_with_llm: flag(lookup("EXPLAIN_WITH_LLM"), "EXPLAIN_WITH_LLM")?,
        })
    }
}

/// Boolean switch; unset means on.
fn flag(raw: Option<String>, name: &str) -> anyhow::Result<bool> {
    let Some(raw) = raw else { return Ok(true) };
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => bail!("{name} must be true or false, got '{other}'"),
    }
}
