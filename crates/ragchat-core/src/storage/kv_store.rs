//! Key-value store trait.
//!
//! The durable store holds exactly two entries per profile: the session id
//! and the serialized transcript. Values are plain strings, mirroring the
//! browser `localStorage` the client was modelled on.

use ragchat_types::error::RepositoryError;

/// A single write inside an atomic [`KvStore::commit`] batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KvOp {
    Set { key: String, value: String },
    Delete { key: String },
}

impl KvOp {
    pub fn set(key: impl Into<String>, value: impl Into<String>) -> Self {
        KvOp::Set {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn delete(key: impl Into<String>) -> Self {
        KvOp::Delete { key: key.into() }
    }

    /// The key this operation touches.
    pub fn key(&self) -> &str {
        match self {
            KvOp::Set { key, .. } | KvOp::Delete { key } => key,
        }
    }
}

/// Trait for scoped key-value persistent storage.
///
/// An implementation is bound to one scope (profile) at construction, so
/// keys never collide across profiles.
/// Uses RPITIT (native async fn in traits, Rust 2024 edition).
pub trait KvStore: Send + Sync {
    /// Get a value by key. Returns None if the key does not exist.
    fn get(
        &self,
        key: &str,
    ) -> impl std::future::Future<Output = Result<Option<String>, RepositoryError>> + Send;

    /// Set a value for a key (upsert).
    fn set(
        &self,
        key: &str,
        value: &str,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Delete a key. No-op if key does not exist.
    fn delete(
        &self,
        key: &str,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// List all keys in this scope, sorted.
    fn list_keys(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<String>, RepositoryError>> + Send;

    /// Apply a batch of writes atomically: either every op lands or none do.
    fn commit(
        &self,
        ops: Vec<KvOp>,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;
}
