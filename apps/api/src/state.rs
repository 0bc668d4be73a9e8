use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::session::SessionStore;
use crate::tools::job_search::JobSearchClient;
use crate::tools::scrape::ScrapeClient;
use crate::tools::web_search::WebSearchClient;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub llm: Arc<LlmClient>,
    pub web_search: Arc<WebSearchClient>,
    pub scrape: Arc<ScrapeClient>,
    pub job_search: Arc<JobSearchClient>,
    pub sessions: Arc<SessionStore>,
    pub config: Config,
}
