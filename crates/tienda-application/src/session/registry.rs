use std::collections::HashMap;
use std::sync::Arc;

use tienda_core::session::ShopSession;
use tokio::sync::RwLock;

/// In-memory registry of live shopping sessions.
///
/// Sessions are never persisted: ending one (or dropping the registry)
/// discards its cart and transcript.
pub struct SessionRegistry {
    sessions: Arc<RwLock<HashMap<String, Arc<ShopSession>>>>,
    greeting: String,
}

impl SessionRegistry {
    /// Creates an empty registry whose sessions open with `greeting`.
    pub fn new(greeting: impl Into<String>) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            greeting: greeting.into(),
        }
    }

    /// Starts a new session with an empty cart and the greeting as its only
    /// message.
    pub async fn create(&self) -> Arc<ShopSession> {
        let session = Arc::new(ShopSession::new(self.greeting.clone()));
        let mut sessions = self.sessions.write().await;
        sessions.insert(session.id().to_string(), Arc::clone(&session));
        tracing::info!(
            session_id = %session.id(),
            active = sessions.len(),
            "[SessionRegistry] Session created"
        );
        session
    }

    /// Gets a live session by ID.
    pub async fn get(&self, session_id: &str) -> Option<Arc<ShopSession>> {
        let sessions = self.sessions.read().await;
        sessions.get(session_id).cloned()
    }

    /// Ends a session, returning it if it was live.
    pub async fn end(&self, session_id: &str) -> Option<Arc<ShopSession>> {
        let mut sessions = self.sessions.write().await;
        let removed = sessions.remove(session_id);
        if removed.is_some() {
            tracing::info!(
                session_id,
                active = sessions.len(),
                "[SessionRegistry] Session ended"
            );
        }
        removed
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}
