//! # convert: natural language → validated strategy
//!
//! ```text
//! text ─▶ ollama::generate ─▶ extract_json ─▶ pipeline (auto-fix or strict) ─▶ explain
//! ```

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use strategist::{
    models::Strategy,
    pipeline::{validate_and_autofix_if_invalid, validate_as_is, PipelineError},
    schema::DroppedCondition,
};

use crate::{
    config::Config,
    document::{self, ExtractError},
    explain,
    extract::extract_json,
    ollama::{OllamaClient, OllamaError},
    prompt,
};

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error(transparent)]
    Llm(#[from] OllamaError),

    #[error("Could not extract JSON from LLM response")]
    EmptyResponse,

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error(transparent)]
    Document(#[from] ExtractError),
}

/// One successful conversion.
#[derive(Debug, Clone, Serialize)]
pub struct ConvertedStrategy {
    pub conversion_id: Uuid,
    pub created_at:    DateTime<Utc>,
    pub model:         String,
    pub strategy:      Strategy,
    pub explanation:   String,
    /// The model's output only became valid through sanitization.
    pub repaired:      bool,
    pub warnings:      Vec<String>,
    pub dropped:       Vec<DroppedCondition>,
}

pub async fn convert_natural_language(
    client: &OllamaClient,
    config: &Config,
    text: &str,
) -> Result<ConvertedStrategy, ConvertError> {
    let system = prompt::system_prompt();
    let response = client.generate(Some(&system), text, config.temperature).await?;

    info!("LLM response received ({} chars)", response.len());

    let json = extract_json(&response);
    if json.is_empty() {
        return Err(ConvertError::EmptyResponse);
    }

    let accepted = if config.auto_fix {
        validate_and_autofix_if_invalid(json)?
    } else {
        validate_as_is(json)?
    };

    let explanation = explain::explain(client, config, &accepted.strategy).await;

    let converted = ConvertedStrategy {
        conversion_id: Uuid::new_v4(),
        created_at:    Utc::now(),
        model:         client.model().to_string(),
        warnings:      accepted.report.warning_messages(),
        strategy:      accepted.strategy,
        explanation,
        repaired:      accepted.repaired,
        dropped:       accepted.dropped,
    };

    info!(
        conversion_id = %converted.conversion_id,
        conditions    = converted.strategy.conditions.len(),
        repaired      = converted.repaired,
        "✅ Strategy converted"
    );

    Ok(converted)
}

/// The whole document is treated as one strategy description.
pub async fn convert_document(
    client: &OllamaClient,
    config: &Config,
    path: &Path,
) -> Result<Vec<ConvertedStrategy>, ConvertError> {
    let text = document::extract_text(path).await?;
    let converted = convert_natural_language(client, config, &text).await?;
    Ok(vec![converted])
}
