//! POST /api/v1/resume — multipart résumé upload, staged for extraction.
//!
//! The uploaded PDF always lands at `<session staging>/resume.pdf`,
//! overwriting any earlier upload: the analyzer reads a fixed location.

use axum::extract::{Multipart, State};
use axum::Json;
use bytes::Bytes;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::llm_client::ModelConfig;
use crate::state::AppState;
use crate::tools::resume_extractor::RESUME_FILENAME;

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub session_id: Uuid,
    pub filename: String,
    pub bytes: usize,
}

pub async fn handle_resume_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let mut session_id: Option<Uuid> = None;
    let mut upload: Option<(String, Bytes)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Upload(format!("invalid multipart request: {e}")))?
    {
        // `name()` borrows the field that `text()`/`bytes()` consume.
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("session_id") => {
                let raw = field
                    .text()
                    .await
                    .map_err(|e| AppError::Upload(format!("unreadable session_id: {e}")))?;
                let id = raw
                    .parse::<Uuid>()
                    .map_err(|_| AppError::Validation(format!("invalid session id '{raw}'")))?;
                session_id = Some(id);
            }
            Some("file") => {
                let filename = field
                    .file_name()
                    .unwrap_or(RESUME_FILENAME)
                    .to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Upload(format!("unreadable file field: {e}")))?;
                upload = Some((filename, data));
            }
            _ => {}
        }
    }

    let (filename, data) = upload.ok_or_else(|| {
        AppError::Validation("multipart field 'file' with the resume PDF is required".to_string())
    })?;
    if data.is_empty() {
        return Err(AppError::Upload("uploaded resume file is empty".to_string()));
    }

    let config = ModelConfig::for_provider(state.config.default_provider);
    let session = state.sessions.get_or_create(session_id, config).await;

    tokio::fs::create_dir_all(&session.staging_dir)
        .await
        .map_err(|e| AppError::Internal(e.into()))?;
    let staged_path = session.staging_dir.join(RESUME_FILENAME);
    tokio::fs::write(&staged_path, &data)
        .await
        .map_err(|e| AppError::Internal(e.into()))?;

    info!(
        session = %session.id,
        "staged resume '{}' ({} bytes) at {}",
        filename,
        data.len(),
        staged_path.display()
    );

    Ok(Json(UploadResponse {
        session_id: session.id,
        filename,
        bytes: data.len(),
    }))
}
