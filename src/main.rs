//! # Strategist: Strategy Schema Service
//!
//! ## Architecture Overview
//!
//! ```text
//!  ┌──────────────┐  POST /api/strategy/autofix  ┌──────────────────────────┐
//!  │  Strategist  │ ────────────────────────────▶│  pipeline                │
//!  │  Agent (LLM) │                              │   ├─ schema::validator   │
//!  └──────────────┘                              │   ├─ schema::sanitizer   │
//!                                                │   └─ schema::suggest     │
//!  ┌──────────────┐  POST /api/strategy/validate │                          │
//!  │  Dashboard / │ ────────────────────────────▶│  AppState (counters)     │
//!  │  curl        │  GET  /api/indicators        └──────────────────────────┘
//!  └──────────────┘  GET  /api/health
//! ```
//!
//! ## Environment Variables
//!
//! | Variable         | Default            | Description                      |
//! |------------------|--------------------|----------------------------------|
//! | `BIND_ADDR`      | `0.0.0.0:3000`     | Address Axum listens on          |
//! | `API_KEY`        | *(empty)*          | Required `X-API-Key` header      |
//! | `MAX_BODY_BYTES` | `65536`            | Request body limit               |
//! | `RUST_LOG`       | `strategist=debug` | Tracing filter                   |

use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use strategist::{config::ServerConfig, routes::router, schema::registry, state::build_state};

// ─── Entry Point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Load .env (optional, CI/prod can use real env vars) ──────────────
    dotenvy::dotenv().ok();

    // ── 2. Initialise structured logging ─────────────────────────────────────
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::from_default_env()
                .add_directive("strategist=debug".parse()?)
                .add_directive("tower_http=info".parse()?),
        )
        .init();

    info!(
        r#"

  ╔═══════════════════════════════════════════════╗
  ║        STRATEGIST — Strategy Schema           ║
  ║     Validate  ·  Sanitize  ·  Suggest         ║
  ╚═══════════════════════════════════════════════╝"#
    );

    // ── 3. Configuration ─────────────────────────────────────────────────────
    let config = ServerConfig::from_env()?;
    if config.api_key.is_none() {
        info!("🔓 API_KEY not set — running in dev mode (no auth)");
    }

    // ── 4. Build shared state ────────────────────────────────────────────────
    let state = build_state(&config);

    // ── 5. Build CORS layer ──────────────────────────────────────────────────
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // ── 6. Build the Axum router ─────────────────────────────────────────────
    let app = router(state, &config)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    info!(
        addr       = %config.bind_addr,
        indicators = registry::all().len(),
        "🚀 Strategist server starting"
    );

    // ── 7. Start the server ──────────────────────────────────────────────────
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
