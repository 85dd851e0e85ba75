//! ChatBackend trait definition.
//!
//! The chat service exposes two operations: answer a query within a
//! session, and discard a session's server-side history. Uses RPITIT like
//! the `KvStore` port.

use ragchat_types::error::ChatServiceError;
use ragchat_types::session::SessionId;

/// Trait for the remote chat service.
///
/// Implementations do not retry and do not substitute fallbacks; the
/// controller decides what a failure means for the transcript.
pub trait ChatBackend: Send + Sync {
    /// Ask the service a question and return its answer text.
    fn send_query(
        &self,
        query: &str,
        session_id: &SessionId,
    ) -> impl std::future::Future<Output = Result<String, ChatServiceError>> + Send;

    /// Tell the service to forget everything it holds for `session_id`.
    fn reset_session(
        &self,
        session_id: &SessionId,
    ) -> impl std::future::Future<Output = Result<(), ChatServiceError>> + Send;
}
