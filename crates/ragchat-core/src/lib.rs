//! Conversation lifecycle and port trait definitions for ragchat.
//!
//! This crate defines the "ports" (`KvStore`, `ChatBackend`) that the
//! infrastructure layer implements, and the logic that keeps the session
//! id, the transcript, and the remote service consistent. It depends only
//! on `ragchat-types` -- never on `ragchat-infra` or any database/IO crate.

pub mod chat;
pub mod client;
pub mod storage;
