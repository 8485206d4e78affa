//! # ollama: local LLM over the Ollama HTTP API
//!
//! Non-streaming `/api/generate` for completions, `/api/tags` for the list
//! of installed models.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::config::Config;

/// Upper bound on generated tokens per request.
const MAX_TOKENS: u32 = 2048;
const TAGS_TIMEOUT: Duration = Duration::from_secs(5);

// ─── Errors ───────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum OllamaError {
    #[error("Cannot connect to Ollama at {url}. Please ensure it's running (ollama serve)")]
    Unreachable {
        url:    String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Request timed out. The model might be loading or the query is too complex")]
    Timeout,

    #[error("Ollama error: {status} - {body}")]
    Status {
        status: reqwest::StatusCode,
        body:   String,
    },

    #[error("Unexpected response from Ollama: {0}")]
    Decode(#[source] reqwest::Error),
}

/// Whether the configured model is installed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelStatus {
    Available,
    Missing { installed: Vec<String> },
}

// ─── Wire types ───────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model:   &'a str,
    prompt:  &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    system:  Option<&'a str>,
    stream:  bool,
    options: GenerateOptions,
}

#[derive(Serialize)]
struct GenerateOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    num_predict: u32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

#[derive(Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<TagEntry>,
}

#[derive(Deserialize)]
struct TagEntry {
    #[serde(default)]
    name: String,
}

// ─── Client ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct OllamaClient {
    http:     reqwest::Client,
    base_url: String,
    model:    String,
    timeout:  Duration,
}

impl OllamaClient {
    pub fn new(config: &Config) -> Self {
        Self {
            http:     reqwest::Client::new(),
            base_url: config.ollama_url.trim_end_matches('/').to_string(),
            model:    config.model.clone(),
            timeout:  config.timeout,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// One completion. Returns the raw generated text.
    pub async fn generate(
        &self,
        system: Option<&str>,
        prompt: &str,
        temperature: f32,
    ) -> Result<String, OllamaError> {
        debug!(model = %self.model, chars = prompt.len(), "Calling Ollama generate...");

        let body = GenerateRequest {
            model: &self.model,
            prompt,
            system,
            stream: false,
            options: GenerateOptions { temperature: Some(temperature), num_predict: MAX_TOKENS },
        };

        let data: GenerateResponse = self.post_generate(&body).await?;
        Ok(data.response)
    }

    /// Generates a single token so the model is loaded into memory before the
    /// first real request.
    pub async fn warmup(&self) -> Result<(), OllamaError> {
        let body = GenerateRequest {
            model:   &self.model,
            prompt:  "Hello",
            system:  None,
            stream:  false,
            options: GenerateOptions { temperature: None, num_predict: 1 },
        };
        let _: GenerateResponse = self.post_generate(&body).await?;
        Ok(())
    }

    /// Names of every installed model.
    pub async fn list_models(&self) -> Result<Vec<String>, OllamaError> {
        let url = format!("{}/api/tags", self.base_url);

        let resp = self
            .http
            .get(&url)
            .timeout(TAGS_TIMEOUT)
            .send()
            .await
            .map_err(|e| self.send_error(e))?;

        let data: TagsResponse = Self::decode(resp).await?;
        Ok(data.models.into_iter().map(|m| m.name).collect())
    }

    /// Matches on the model family (the part before `:`), so `mistral:7b-instruct`
    /// is satisfied by any installed `mistral` tag.
    pub async fn check_model(&self) -> Result<ModelStatus, OllamaError> {
        let installed = self.list_models().await?;
        let family = self.model.split(':').next().unwrap_or(&self.model);

        if installed.iter().any(|name| name.contains(family)) {
            Ok(ModelStatus::Available)
        } else {
            Ok(ModelStatus::Missing { installed })
        }
    }

    // ── internals ────────────────────────────────────────────────────────────

    async fn post_generate(&self, body: &GenerateRequest<'_>) -> Result<GenerateResponse, OllamaError> {
        let resp = self
            .http
            .post(format!("{}/api/generate", self.base_url))
            .json(body)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| self.send_error(e))?;

        Self::decode(resp).await
    }

    fn send_error(&self, err: reqwest::Error) -> OllamaError {
        if err.is_timeout() {
            OllamaError::Timeout
        } else {
            OllamaError::Unreachable { url: self.base_url.clone(), source: err }
        }
    }

    async fn decode<T: for<'de> Deserialize<'de>>(resp: reqwest::Response) -> Result<T, OllamaError> {
        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(OllamaError::Status { status, body });
        }
        resp.json().await.map_err(|e| {
            if e.is_timeout() {
                OllamaError::Timeout
            } else {
                OllamaError::Decode(e)
            }
        })
    }
}
