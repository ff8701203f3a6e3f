mod advisory;
mod config;
mod errors;
mod llm_client;
mod routes;
mod security;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::advisory::composer::AdvisoryComposer;
use crate::advisory::fetcher::WebPageLoader;
use crate::advisory::locator::AdvisoryLocator;
use crate::advisory::pipeline::AdvisoryPipeline;
use crate::config::Config;
use crate::llm_client::{ChatModel, LlmClient};
use crate::routes::build_router;
use crate::security::injection::injection_phrases;
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

    info!("Starting travel adviser v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client
    let llm: Arc<dyn ChatModel> = Arc::new(LlmClient::new(
        config.openai_api_key.clone(),
        config.openai_base_url.clone(),
    ));
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    // Initialize advisory page loader
    let loader = Arc::new(WebPageLoader::new()?);
    info!("Advisory pages served from {}", config.advisory_base_url);

    info!(
        "Injection filter loaded ({} phrases)",
        injection_phrases().count()
    );

    let pipeline = AdvisoryPipeline::new(
        AdvisoryLocator::new(llm.clone(), config.advisory_base_url.clone()),
        loader,
        AdvisoryComposer::new(llm),
    );

    // Build app state
    let state = AppState {
        adviser: Arc::new(pipeline),
    };

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
