//! Chat session and transcript lifecycle for ragchat.
//!
//! `SessionManager` owns the session id, `ConversationState` the ordered
//! transcript, `TranscriptStore` its persistence, and `ChatController`
//! wires them to a `ChatBackend` one exchange at a time.

pub mod controller;
pub mod conversation;
pub mod exchange;
pub mod session;
pub mod transcript;
pub mod view;
