//! Durable storage abstractions for ragchat.
//!
//! Defines the key-value store trait the session and transcript live in.
//! Implementations live in ragchat-infra.

pub mod kv_store;

#[cfg(test)]
pub(crate) mod memory;
