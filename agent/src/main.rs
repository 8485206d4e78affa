//! # Strategist Agent: natural language → screening strategy
//!
//! One-shot converter that runs next to a local Ollama server.
//!
//! ## Flow
//! ```text
//!   1. Read the description (document path argument, or stdin)
//!   2. Check the model is installed (/api/tags)
//!   3. Generate strategy JSON with the registry-aware system prompt
//!   4. Extract → validate → auto-fix (or reject in strict mode)
//!   5. Explain, print the result as pretty JSON
//! ```
//!
//! ## Environment Variables
//!
//! | Variable           | Default                  | Description                        |
//! |--------------------|--------------------------|------------------------------------|
//! | `OLLAMA_URL`       | `http://localhost:11434` | Ollama server                      |
//! | `OLLAMA_MODEL`     | `mistral:7b-instruct`    | Model tag                          |
//! | `LLM_TEMPERATURE`  | `0.1`                    | Generation temperature             |
//! | `LLM_TIMEOUT_SECS` | `300`                    | Per-request timeout                |
//! | `AUTO_FIX`         | `true`                   | Repair invalid output              |
//! | `EXPLAIN_WITH_LLM` | `true`                   | LLM explanation (else basic)       |

use std::path::PathBuf;

use anyhow::Context;
use tokio::io::AsyncReadExt;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod config;
mod convert;
mod document;
mod explain;
mod extract;
mod ollama;
mod prompt;

use config::Config;
use ollama::{ModelStatus, OllamaClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env()
            .add_directive("strategist_agent=debug".parse()?)
            .add_directive("reqwest=warn".parse()?))
        .init();

    info!(r#"

  ╔═══════════════════════════════════════════╗
  ║   STRATEGIST AGENT                        ║
  ║   Natural language → screening strategy   ║
  ╚═══════════════════════════════════════════╝"#);

    let config = Config::from_env().context("Failed to load config")?;
    let client = OllamaClient::new(&config);

    info!(
        model    = %config.model,
        ollama   = %config.ollama_url,
        auto_fix = config.auto_fix,
        "Agent started"
    );

    // ── Model availability ────────────────────────────────────────────────────
    match client.check_model().await {
        Ok(ModelStatus::Available) => {
            info!(model = %config.model, "Model available — warming up...");
            if let Err(e) = client.warmup().await {
                warn!(error = %e, "Warm-up failed — continuing anyway");
            }
        }
        Ok(ModelStatus::Missing { installed }) => {
            warn!(model = %config.model, ?installed, "Ollama is running but the model was not found");
        }
        Err(e) => warn!(error = %e, "Could not query Ollama models"),
    }

    // ── Convert ───────────────────────────────────────────────────────────────
    let results = match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => {
            info!(path = %path.display(), "📄 Converting document");
            convert::convert_document(&client, &config, &path).await?
        }
        None => {
            let mut text = String::new();
            tokio::io::stdin()
                .read_to_string(&mut text)
                .await
                .context("Failed to read description from stdin")?;
            vec![convert::convert_natural_language(&client, &config, text.trim()).await?]
        }
    };

    let out = serde_json::to_string_pretty(&results).context("Failed to render result")?;
    println!("{out}");

    Ok(())
}
