use crate::session::{Session, SessionKey};
use async_trait::async_trait;
use std::collections::HashMap;
use todobot_core::TodoResult;
use tokio::sync::RwLock;

#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, key: SessionKey) -> TodoResult<Option<Session>>;
    async fn put(&self, session: &Session) -> TodoResult<()>;
    async fn remove(&self, key: SessionKey) -> TodoResult<Option<Session>>;
}

/// Volatile session store. Everything is lost when the process exits.
#[derive(Default)]
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<SessionKey, Session>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn get(&self, key: SessionKey) -> TodoResult<Option<Session>> {
        Ok(self.sessions.read().await.get(&key).cloned())
    }

    async fn put(&self, session: &Session) -> TodoResult<()> {
        self.sessions
            .write()
            .await
            .insert(session.key, session.clone());
        Ok(())
    }

    async fn remove(&self, key: SessionKey) -> TodoResult<Option<Session>> {
        Ok(self.sessions.write().await.remove(&key))
    }
}
