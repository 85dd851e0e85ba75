//! Explicit persistence step for the conversation transcript.

use ragchat_types::error::RepositoryError;

use crate::chat::conversation::ConversationState;
use crate::storage::kv_store::{KvOp, KvStore};

/// Durable store key holding the serialized transcript.
pub const MESSAGES_KEY: &str = "chat_messages";

/// Loads and saves a `ConversationState` under [`MESSAGES_KEY`].
pub struct TranscriptStore<S: KvStore> {
    store: S,
}

impl<S: KvStore> TranscriptStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Load the last persisted transcript. Malformed data loads as empty.
    pub async fn load(&self) -> Result<ConversationState, RepositoryError> {
        let raw = self.store.get(MESSAGES_KEY).await?;
        Ok(ConversationState::restore(raw.as_deref()))
    }

    /// Overwrite the persisted transcript with `state`.
    pub async fn save(&self, state: &ConversationState) -> Result<(), RepositoryError> {
        let json = state.to_json()?;
        self.store.set(MESSAGES_KEY, &json).await
    }

    /// Removal of the persisted transcript, for inclusion in an atomic batch.
    pub fn clear_op(&self) -> KvOp {
        KvOp::delete(MESSAGES_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::memory::MemoryKvStore;
    use ragchat_types::message::Message;

    #[tokio::test]
    async fn test_save_then_load() {
        let store = MemoryKvStore::new();
        let transcripts = TranscriptStore::new(store.clone());

        let state = ConversationState::from_messages(vec![
            Message::user("hello"),
            Message::bot("hi there"),
        ]);
        transcripts.save(&state).await.unwrap();

        assert_eq!(
            store.raw(MESSAGES_KEY).as_deref(),
            Some(r#"[{"sender":"user","text":"hello"},{"sender":"bot","text":"hi there"}]"#)
        );
        assert_eq!(transcripts.load().await.unwrap(), state);
    }

    #[tokio::test]
    async fn test_load_empty_store() {
        let transcripts = TranscriptStore::new(MemoryKvStore::new());
        assert!(transcripts.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_load_malformed_does_not_fail() {
        let store = MemoryKvStore::new().with_entry(MESSAGES_KEY, "[{\"sender\":");
        let transcripts = TranscriptStore::new(store);
        assert!(transcripts.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_clear_op_targets_messages_key() {
        let store = MemoryKvStore::new().with_entry(MESSAGES_KEY, "[]");
        let transcripts = TranscriptStore::new(store.clone());

        store.commit(vec![transcripts.clear_op()]).await.unwrap();
        assert!(store.raw(MESSAGES_KEY).is_none());
    }
}
