use thiserror::Error;

/// Errors from durable store operations (used by trait definitions in ragchat-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Errors from the remote chat service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChatServiceError {
    #[error("invalid service endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("request failed: {0}")]
    Transport(String),

    #[error("service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("unexpected response body: {0}")]
    Deserialization(String),
}

/// Errors surfaced by the chat controller.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error(transparent)]
    Store(#[from] RepositoryError),

    #[error("another request is still in flight")]
    ExchangeInFlight,

    #[error("chat service did not acknowledge the reset: {0}")]
    ResetRejected(#[source] ChatServiceError),
}
