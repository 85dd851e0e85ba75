//! In-memory conversation transcript.
//!
//! `ConversationState` is a plain value: mutators change the sequence and
//! hand back the new state, nothing more. Writing it to the durable store
//! is a separate, explicit step (see `TranscriptStore`).

use ragchat_types::error::RepositoryError;
use ragchat_types::message::Message;
use tracing::warn;

/// Ordered, append-only list of transcript messages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversationState {
    messages: Vec<Message>,
}

impl ConversationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_messages(messages: Vec<Message>) -> Self {
        Self { messages }
    }

    /// Rebuild a transcript from its persisted JSON form.
    ///
    /// Missing, blank, or malformed data yields an empty transcript; this
    /// never fails.
    pub fn restore(raw: Option<&str>) -> Self {
        let Some(raw) = raw.map(str::trim).filter(|r| !r.is_empty()) else {
            return Self::default();
        };

        match serde_json::from_str::<Vec<Message>>(raw) {
            Ok(messages) => Self { messages },
            Err(e) => {
                warn!(error = %e, "Discarding malformed stored transcript");
                Self::default()
            }
        }
    }

    /// Serialize to the persisted JSON form.
    pub fn to_json(&self) -> Result<String, RepositoryError> {
        serde_json::to_string(&self.messages).map_err(|e| {
            RepositoryError::Serialization(format!("failed to serialize transcript: {e}"))
        })
    }

    /// Add a message at the end and return the updated transcript.
    pub fn append(&mut self, message: Message) -> &[Message] {
        self.messages.push(message);
        &self.messages
    }

    /// Drop every message and return the (empty) transcript.
    pub fn clear(&mut self) -> &[Message] {
        self.messages.clear();
        &self.messages
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_preserves_order() {
        let mut state = ConversationState::new();
        state.append(Message::user("hello"));
        let after = state.append(Message::bot("hi there"));

        assert_eq!(after, &[Message::user("hello"), Message::bot("hi there")]);
        assert_eq!(state.last(), Some(&Message::bot("hi there")));
        assert_eq!(state.len(), 2);
    }

    #[test]
    fn test_clear_empties() {
        let mut state =
            ConversationState::from_messages(vec![Message::user("a"), Message::bot("b")]);
        assert!(state.clear().is_empty());
        assert!(state.is_empty());
        assert!(state.last().is_none());
    }

    #[test]
    fn test_persist_then_restore_is_identical() {
        let state = ConversationState::from_messages(vec![
            Message::user("What are the library hours?"),
            Message::bot("The library is open **8am-10pm**.\n\n- Source: https://lib.example.edu"),
            Message::user("and on weekends?"),
            Message::bot("Error getting response."),
        ]);

        let json = state.to_json().unwrap();
        let restored = ConversationState::restore(Some(&json));
        assert_eq!(restored, state);
    }

    #[test]
    fn test_restore_missing_or_blank_is_empty() {
        assert!(ConversationState::restore(None).is_empty());
        assert!(ConversationState::restore(Some("")).is_empty());
        assert!(ConversationState::restore(Some("  \n")).is_empty());
    }

    #[test]
    fn test_restore_malformed_is_empty() {
        assert!(ConversationState::restore(Some("{not json")).is_empty());
        assert!(ConversationState::restore(Some("null")).is_empty());
        assert!(ConversationState::restore(Some(r#"{"sender":"user"}"#)).is_empty());
        assert!(ConversationState::restore(Some(r#"[{"sender":"robot","text":"x"}]"#)).is_empty());
    }

    #[test]
    fn test_restore_empty_array() {
        assert!(ConversationState::restore(Some("[]")).is_empty());
    }
}
