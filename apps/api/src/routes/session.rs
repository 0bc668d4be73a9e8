//! GET /api/v1/session/:id — session metadata and conversation history,
//! used by the front end to restore a chat view.

use axum::extract::{Path, State};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;
use crate::workflow::state::Turn;

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub session_id: Uuid,
    pub provider: String,
    pub model: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub messages: Vec<Turn>,
}

pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>, AppError> {
    let session = state
        .sessions
        .get(id)
        .await
        .ok_or(AppError::SessionNotFound(id))?;

    Ok(Json(SessionResponse {
        session_id: session.id,
        provider: session.config.provider.name().to_string(),
        model: session.config.model,
        created_at: session.created_at,
        updated_at: session.updated_at,
        messages: session.messages,
    }))
}
