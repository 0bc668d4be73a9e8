//! Sessions — the only state that outlives a single query.
//!
//! A session owns the conversation history (append-only between queries,
//! replaced wholesale when a query finishes), the staging directory holding
//! the uploaded résumé, and the sticky model configuration.

use std::collections::HashMap;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::llm_client::ModelConfig;
use crate::workflow::state::Turn;

#[derive(Debug, Clone)]
pub struct Session {
    pub id: Uuid,
    pub messages: Vec<Turn>,
    pub config: ModelConfig,
    pub staging_dir: PathBuf,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// In-memory session store. Each session stages its uploads under its own
/// subdirectory of the configured staging root.
pub struct SessionStore {
    staging_root: PathBuf,
    sessions: RwLock<HashMap<Uuid, Session>>,
}

impl SessionStore {
    pub fn new(staging_root: impl Into<PathBuf>) -> Self {
        Self {
            staging_root: staging_root.into(),
            sessions: RwLock::new(HashMap::new()),
        }
    }

    pub async fn create(&self, config: ModelConfig) -> Session {
        let id = Uuid::new_v4();
        let now = Utc::now();
        let session = Session {
            id,
            messages: Vec::new(),
            config,
            staging_dir: self.staging_root.join(id.to_string()),
            created_at: now,
            updated_at: now,
        };
        self.sessions.write().await.insert(id, session.clone());
        session
    }

    pub async fn get(&self, id: Uuid) -> Option<Session> {
        self.sessions.read().await.get(&id).cloned()
    }

    /// Resolves the session for a request: an existing one when the id is
    /// known, otherwise a fresh session with the given configuration.
    pub async fn get_or_create(&self, id: Option<Uuid>, config: ModelConfig) -> Session {
        if let Some(id) = id {
            if let Some(session) = self.get(id).await {
                return session;
            }
        }
        self.create(config).await
    }

    /// Replaces the session's conversation wholesale at query end, along
    /// with the model configuration the query ran under.
    pub async fn finish_query(&self, id: Uuid, messages: Vec<Turn>, config: ModelConfig) {
        let mut sessions = self.sessions.write().await;
        if let Some(session) = sessions.get_mut(&id) {
            session.messages = messages;
            session.config = config;
            session.updated_at = Utc::now();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::Provider;

    fn config() -> ModelConfig {
        ModelConfig::for_provider(Provider::Deepseek)
    }

    #[tokio::test]
    async fn test_sessions_are_isolated_and_staged_separately() {
        let store = SessionStore::new("staging");
        let a = store.create(config()).await;
        let b = store.create(config()).await;

        assert_ne!(a.id, b.id);
        assert_ne!(a.staging_dir, b.staging_dir);
        assert!(a.staging_dir.starts_with("staging"));
    }

    #[tokio::test]
    async fn test_get_or_create_falls_back_to_fresh_session() {
        let store = SessionStore::new("staging");
        let unknown = Uuid::new_v4();
        let session = store.get_or_create(Some(unknown), config()).await;
        // Unknown ids are not resurrected; the caller gets a new session.
        assert_ne!(session.id, unknown);

        let same = store.get_or_create(Some(session.id), config()).await;
        assert_eq!(same.id, session.id);
    }

    #[tokio::test]
    async fn test_finish_query_replaces_history_wholesale() {
        let store = SessionStore::new("staging");
        let session = store.create(config()).await;

        let first = vec![Turn::user("hello"), Turn::assistant("ChatBot", "hi")];
        store
            .finish_query(session.id, first.clone(), config())
            .await;
        assert_eq!(store.get(session.id).await.unwrap().messages.len(), 2);

        let second = vec![Turn::user("hello"), Turn::assistant("ChatBot", "hi"),
            Turn::user("more"), Turn::assistant("ChatBot", "sure")];
        store.finish_query(session.id, second, config()).await;

        let reloaded = store.get(session.id).await.unwrap();
        assert_eq!(reloaded.messages.len(), 4);
        assert_eq!(reloaded.messages[3].content, "sure");
    }
}
