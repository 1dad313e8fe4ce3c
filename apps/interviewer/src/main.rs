mod config;
mod errors;
mod interview;
mod llm_client;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::interview::agents::Agents;
use crate::llm_client::{LlmClient, RateLimiter};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Interviewer v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM clients, each behind its own rate limiter
    let pro = LlmClient::new(
        config.anthropic_api_key.clone(),
        config.pro_model.clone(),
        Arc::new(RateLimiter::new(
            config.pro_rate_limit,
            config.rate_limit_window,
        )),
        config.llm_max_attempts,
    );
    let lite = LlmClient::new(
        config.anthropic_api_key.clone(),
        config.lite_model.clone(),
        Arc::new(RateLimiter::new(
            config.lite_rate_limit,
            config.rate_limit_window,
        )),
        config.llm_max_attempts,
    );
    info!(
        "LLM clients initialized (pro: {} at {}/{:?}, lite: {} at {}/{:?})",
        pro.model(),
        config.pro_rate_limit,
        config.rate_limit_window,
        lite.model(),
        config.lite_rate_limit,
        config.rate_limit_window
    );

    let agents = Agents::from_generators(Arc::new(pro), Arc::new(lite));
    info!(
        "Skill catalogue: {} skills, default max {} questions",
        config.skill_catalogue.len(),
        config.max_questions
    );

    // Build app state
    let state = AppState::new(config.clone(), agents);

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
