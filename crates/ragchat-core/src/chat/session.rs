//! Session manager for the active chat session id.
//!
//! Reads the id from the durable store on first use, creates one when the
//! store has none, and rotates it on reset. The id is cached after the
//! first lookup so repeated calls never touch the store.

use ragchat_types::error::RepositoryError;
use ragchat_types::session::SessionId;
use tracing::{debug, info, warn};

use crate::storage::kv_store::{KvOp, KvStore};

/// Durable store key holding the session id.
pub const SESSION_KEY: &str = "chat_session_id";

/// Manages the lifecycle of the single active session id.
pub struct SessionManager<S: KvStore> {
    store: S,
    current: Option<SessionId>,
}

impl<S: KvStore> SessionManager<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            current: None,
        }
    }

    /// The cached id, if one has been loaded or created yet.
    pub fn current(&self) -> Option<&SessionId> {
        self.current.as_ref()
    }

    /// Return the active session id, creating and persisting one if the
    /// store has none.
    ///
    /// Idempotent until the next rotation. A blank stored value counts as
    /// absent.
    pub async fn get_or_create_session_id(&mut self) -> Result<SessionId, RepositoryError> {
        if let Some(id) = &self.current {
            return Ok(id.clone());
        }

        if let Some(raw) = self.store.get(SESSION_KEY).await? {
            match raw.parse::<SessionId>() {
                Ok(id) => {
                    debug!(session_id = %id, "Restored session id");
                    self.current = Some(id.clone());
                    return Ok(id);
                }
                Err(_) => warn!("Stored session id is blank, generating a new one"),
            }
        }

        let id = SessionId::generate();
        self.store.set(SESSION_KEY, id.as_str()).await?;
        info!(session_id = %id, "Created session");
        self.current = Some(id.clone());
        Ok(id)
    }

    /// Replace the active id with a freshly generated one and persist it.
    pub async fn rotate_session_id(&mut self) -> Result<SessionId, RepositoryError> {
        self.rotate_with(Vec::new()).await
    }

    /// Rotate the id, committing `extra` in the same atomic batch.
    ///
    /// The new id always differs from the previous one.
    pub async fn rotate_with(&mut self, extra: Vec<KvOp>) -> Result<SessionId, RepositoryError> {
        let mut next = SessionId::generate();
        while self.current.as_ref() == Some(&next) {
            next = SessionId::generate();
        }

        let mut ops = Vec::with_capacity(extra.len() + 1);
        ops.push(KvOp::set(SESSION_KEY, next.as_str()));
        ops.extend(extra);
        self.store.commit(ops).await?;

        info!(
            previous = self.current.as_ref().map(SessionId::short).unwrap_or("-"),
            session_id = %next,
            "Rotated session"
        );
        self.current = Some(next.clone());
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::memory::MemoryKvStore;

    #[tokio::test]
    async fn test_creates_and_persists_when_store_empty() {
        let store = MemoryKvStore::new();
        let mut mgr = SessionManager::new(store.clone());
        assert!(mgr.current().is_none());

        let id = mgr.get_or_create_session_id().await.unwrap();
        assert_eq!(store.raw(SESSION_KEY).as_deref(), Some(id.as_str()));
        assert_eq!(mgr.current(), Some(&id));
    }

    #[tokio::test]
    async fn test_get_or_create_is_idempotent() {
        let store = MemoryKvStore::new();
        let mut mgr = SessionManager::new(store);

        let first = mgr.get_or_create_session_id().await.unwrap();
        let second = mgr.get_or_create_session_id().await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_restores_existing_id() {
        let store = MemoryKvStore::new().with_entry(SESSION_KEY, "existing-session");
        let mut mgr = SessionManager::new(store);

        let id = mgr.get_or_create_session_id().await.unwrap();
        assert_eq!(id.as_str(), "existing-session");
    }

    #[tokio::test]
    async fn test_same_id_across_managers() {
        let store = MemoryKvStore::new();
        let first = SessionManager::new(store.clone())
            .get_or_create_session_id()
            .await
            .unwrap();
        let second = SessionManager::new(store)
            .get_or_create_session_id()
            .await
            .unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_blank_stored_id_is_replaced() {
        let store = MemoryKvStore::new().with_entry(SESSION_KEY, "   ");
        let mut mgr = SessionManager::new(store.clone());

        let id = mgr.get_or_create_session_id().await.unwrap();
        assert!(!id.as_str().trim().is_empty());
        assert_eq!(store.raw(SESSION_KEY).as_deref(), Some(id.as_str()));
    }

    #[tokio::test]
    async fn test_rotate_produces_new_persisted_id() {
        let store = MemoryKvStore::new();
        let mut mgr = SessionManager::new(store.clone());

        let before = mgr.get_or_create_session_id().await.unwrap();
        let after = mgr.rotate_session_id().await.unwrap();

        assert_ne!(before, after);
        assert_eq!(store.raw(SESSION_KEY).as_deref(), Some(after.as_str()));
        assert_eq!(mgr.get_or_create_session_id().await.unwrap(), after);
    }

    #[tokio::test]
    async fn test_rotate_with_commits_extra_ops() {
        let store = MemoryKvStore::new().with_entry("chat_messages", "[]");
        let mut mgr = SessionManager::new(store.clone());
        mgr.get_or_create_session_id().await.unwrap();

        mgr.rotate_with(vec![KvOp::delete("chat_messages")])
            .await
            .unwrap();
        assert!(store.raw("chat_messages").is_none());
    }

    #[tokio::test]
    async fn test_failed_rotation_keeps_current_id() {
        let store = MemoryKvStore::new();
        let mut mgr = SessionManager::new(store.clone());
        let before = mgr.get_or_create_session_id().await.unwrap();

        store.fail_writes(true);
        assert!(mgr.rotate_session_id().await.is_err());
        assert_eq!(mgr.current(), Some(&before));
        assert_eq!(store.raw(SESSION_KEY).as_deref(), Some(before.as_str()));
    }
}
