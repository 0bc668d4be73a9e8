//! POST /api/v1/chat — one workflow run per user turn.

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::agents::{AgentDispatcher, WorkerContext};
use crate::errors::AppError;
use crate::llm_client::{ModelConfig, Provider};
use crate::state::AppState;
use crate::tools::job_search::JobSearchTool;
use crate::tools::resume_extractor::ResumeExtractor;
use crate::tools::save_letter::SaveCoverLetter;
use crate::tools::scrape::ScrapeWebsiteTool;
use crate::tools::web_search::GoogleSearchTool;
use crate::trace::BufferedTrace;
use crate::workflow::intent::KeywordClassifier;
use crate::workflow::runner;
use crate::workflow::state::{RunState, Turn, TurnRole};

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub session_id: Option<Uuid>,
    pub message: String,
    /// Optional per-session provider override: "deepseek", "openai", "groq".
    pub provider: Option<String>,
    /// Optional model override within the selected provider.
    pub model: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub session_id: Uuid,
    pub reply: String,
    /// Which agents ran, in order.
    pub agents: Vec<String>,
    pub trace: Vec<String>,
}

pub async fn handle_chat(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    if req.message.trim().is_empty() {
        return Err(AppError::Validation("message must not be empty".to_string()));
    }

    let config = resolve_model_config(&state, req.provider.as_deref(), req.model.as_deref())?;
    let session = state
        .sessions
        .get_or_create(req.session_id, config.clone())
        .await;

    // A model override sticks to the session; otherwise keep what it had.
    let config = if req.provider.is_some() || req.model.is_some() {
        config
    } else {
        session.config.clone()
    };

    let trace = Arc::new(BufferedTrace::new());
    let ctx = WorkerContext {
        llm: state.llm.clone(),
        resume_extractor: Arc::new(ResumeExtractor::new(&session.staging_dir)),
        job_search: Arc::new(JobSearchTool::new(state.job_search.clone())),
        web_search: Arc::new(GoogleSearchTool::new(state.web_search.clone())),
        scrape: Arc::new(ScrapeWebsiteTool::new(state.scrape.clone())),
        save_letter: Arc::new(SaveCoverLetter::new(&session.staging_dir)),
        trace: trace.clone(),
    };
    let dispatcher = AgentDispatcher::new(ctx);

    info!(session = %session.id, "chat query: {}", req.message);

    // Fresh sessions start empty and let the Supervisor seed the first turn;
    // continuing sessions carry their history plus the new user turn.
    let run_state = if session.messages.is_empty() {
        RunState::new(req.message, config.clone())
    } else {
        let mut seeded =
            RunState::with_history(session.messages.clone(), req.message.clone(), config.clone());
        seeded.push_turn(Turn::user(req.message));
        seeded
    };

    let final_state = runner::run(run_state, &dispatcher, &KeywordClassifier, trace.as_ref()).await;

    let reply = final_state
        .messages
        .iter()
        .rev()
        .find(|turn| turn.role != TurnRole::User)
        .map(|turn| turn.content.clone())
        .unwrap_or_else(|| "I wasn't able to make progress on that request.".to_string());

    state
        .sessions
        .finish_query(session.id, final_state.messages.clone(), config)
        .await;

    Ok(Json(ChatResponse {
        session_id: session.id,
        reply,
        agents: trace.agent_sequence(),
        trace: trace.lines(),
    }))
}

fn resolve_model_config(
    state: &AppState,
    provider: Option<&str>,
    model: Option<&str>,
) -> Result<ModelConfig, AppError> {
    let provider = match provider {
        Some(name) => name.parse::<Provider>().map_err(|_| {
            AppError::Validation(format!(
                "unknown provider '{name}' (expected deepseek, openai or groq)"
            ))
        })?,
        None => state.config.default_provider,
    };

    let mut config = ModelConfig::for_provider(provider);
    if let Some(model) = model {
        config = config.with_model(model);
    }
    Ok(config)
}
