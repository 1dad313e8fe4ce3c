use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::config::Config;
use crate::errors::AppError;
use crate::interview::agents::Agents;
use crate::interview::orchestrator::InterviewOrchestrator;

/// One live session. The mutex is the single-writer lock every orchestrator
/// call runs under.
pub type SessionHandle = Arc<Mutex<InterviewOrchestrator>>;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Collaborators handed to each new session. Built once at startup.
    pub agents: Agents,
    /// In-memory only; sessions do not survive a restart.
    pub sessions: Arc<RwLock<HashMap<Uuid, SessionHandle>>>,
}

impl AppState {
    pub fn new(config: Config, agents: Agents) -> Self {
        Self {
            config,
            agents,
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub async fn insert_session(&self, orchestrator: InterviewOrchestrator) -> Uuid {
        let id = orchestrator.session_id();
        self.sessions
            .write()
            .await
            .insert(id, Arc::new(Mutex::new(orchestrator)));
        id
    }

    pub async fn session(&self, id: Uuid) -> Result<SessionHandle, AppError> {
        self.sessions
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Interview session {id} not found")))
    }

    pub async fn remove_session(&self, id: Uuid) -> Option<SessionHandle> {
        self.sessions.write().await.remove(&id)
    }
}
