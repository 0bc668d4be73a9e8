pub mod chat;
pub mod health;
pub mod resume;
pub mod session;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/chat", post(chat::handle_chat))
        .route("/api/v1/resume", post(resume::handle_resume_upload))
        .route("/api/v1/session/:id", get(session::handle_get_session))
        .with_state(state)
}
