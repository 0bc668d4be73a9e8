mod agents;
mod config;
mod errors;
mod llm_client;
mod routes;
mod session;
mod state;
mod tools;
mod trace;
mod workflow;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::{LlmClient, ProviderKeys};
use crate::routes::build_router;
use crate::session::SessionStore;
use crate::state::AppState;
use crate::tools::job_search::JobSearchClient;
use crate::tools::scrape::ScrapeClient;
use crate::tools::web_search::WebSearchClient;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on malformed values)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Compass API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client
    let llm = Arc::new(LlmClient::new(ProviderKeys {
        deepseek: config.deepseek_api_key.clone(),
        openai: config.openai_api_key.clone(),
        groq: config.groq_api_key.clone(),
    }));
    info!(
        "LLM client initialized (default provider: {})",
        config.default_provider.name()
    );

    // One HTTP client shared by all outbound tool adapters
    let http = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(30))
        .build()
        .expect("Failed to build HTTP client");

    let web_search = Arc::new(WebSearchClient::new(
        http.clone(),
        config.serper_api_key.clone(),
    ));
    let scrape = Arc::new(ScrapeClient::new(
        http.clone(),
        config.firecrawl_api_key.clone(),
    ));
    let job_search = Arc::new(JobSearchClient::new(http, config.jsearch_api_key.clone()));

    // Session store with its staging root for resume uploads
    tokio::fs::create_dir_all(&config.staging_dir).await?;
    let sessions = Arc::new(SessionStore::new(&config.staging_dir));
    info!("session staging root: {}", config.staging_dir.display());

    // Build app state
    let state = AppState {
        llm,
        web_search,
        scrape,
        job_search,
        sessions,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
