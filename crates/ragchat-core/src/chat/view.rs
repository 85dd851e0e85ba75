//! Observer hook for whatever displays the transcript.

use ragchat_types::message::Message;

/// Receives the full transcript after every change.
///
/// Called with the new state right after it has been persisted. The view
/// is expected to bring the most recent message into sight; on a reset it
/// receives an empty slice.
pub trait TranscriptView: Send + Sync {
    fn transcript_changed(&self, transcript: &[Message]);
}
