//! MoodyBot HTTP server binary.
//!
//! # Environment Variables
//!
//! - `OPENROUTER_API_KEY` — API key (falls back to `OPENAI_API_KEY`)
//! - `OPENROUTER_BASE_URL` — API base URL
//! - `OPENROUTER_MODEL_DYNAMIC`, `OPENROUTER_MODEL_VALIDATION` — model ids
//! - `OPENROUTER_HTTP_REFERER`, `OPENROUTER_X_TITLE` — attribution headers
//! - `HOST`, `PORT` — bind address (default: 0.0.0.0:5000)
//! - `MOODYBOT_ALLOWED_ORIGINS` — comma-separated CORS origins
//! - `MOODYBOT_ENV` — `production` selects the moodybot.ai origins when no
//!   list is given; otherwise the localhost dev origins
//! - `RUST_LOG` — Tracing filter (default: "info,moodybot=debug")
//!
//! A `.env` file in the working directory is loaded first if present.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin server
//! ```

use anyhow::Context;
use moodybot::server::{app_router, AppState};
use moodybot::utilities::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,moodybot=debug".into()),
        )
        .init();

    let config = AppConfig::from_env();
    if !config.has_api_key() {
        tracing::warn!("OPENROUTER_API_KEY not set; chat replies will report missing configuration");
    }
    let bind_addr = config.bind_addr();

    let state = AppState::new(config).context("failed to build LLM client")?;
    let app = app_router(state);

    tracing::info!("MoodyBot server starting on {}", bind_addr);
    tracing::info!("  GET  /health  — liveness probe");
    tracing::info!("  /api/*        — chat, journal, quotes, mood, validation, persona");

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    axum::serve(listener, app).await.context("server failed")?;
    Ok(())
}
