//! Shared domain types for ragchat.
//!
//! This crate contains the types used across the ragchat workspace:
//! chat messages, session identifiers, client configuration, and the
//! error enums shared by the core and infrastructure layers.
//!
//! Zero infrastructure dependencies -- only serde, uuid, thiserror.

pub mod config;
pub mod error;
pub mod message;
pub mod session;
