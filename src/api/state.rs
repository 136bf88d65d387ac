use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::SessionState;
use crate::services::{Recommender, DEFAULT_TOP_K};

/// Largest `k` accepted over HTTP unless configured otherwise
const DEFAULT_MAX_TOP_K: usize = 50;

/// Shared application state
///
/// The recommender is frozen after startup and read without locking. Each
/// client session keeps its own history and watchlist, keyed by session id.
#[derive(Clone)]
pub struct AppState {
    pub recommender: Arc<Recommender>,
    pub sessions: Arc<RwLock<HashMap<Uuid, SessionState>>>,
    pub default_top_k: usize,
    pub max_top_k: usize,
}

impl AppState {
    /// Creates state around a prepared recommender with no open sessions
    pub fn new(recommender: Arc<Recommender>) -> Self {
        Self {
            recommender,
            sessions: Arc::new(RwLock::new(HashMap::new())),
            default_top_k: DEFAULT_TOP_K,
            max_top_k: DEFAULT_MAX_TOP_K,
        }
    }

    /// Creates state using the limits from configuration
    pub fn from_config(recommender: Arc<Recommender>, config: &Config) -> Self {
        Self {
            default_top_k: config.default_top_k,
            max_top_k: config.max_top_k,
            ..Self::new(recommender)
        }
    }

    /// Opens an empty session and returns its id
    pub async fn open_session(&self) -> Uuid {
        let id = Uuid::new_v4();
        self.sessions.write().await.insert(id, SessionState::new());
        id
    }

    /// Runs `f` against one session, failing with `NotFound` for an unknown id
    pub async fn with_session<T>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut SessionState) -> T,
    ) -> AppResult<T> {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("session {}", id)))?;
        Ok(f(session))
    }
}
