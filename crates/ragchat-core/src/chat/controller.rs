//! Chat controller orchestrating session, transcript, and chat service.
//!
//! ChatController owns the `SessionManager`, the in-memory
//! `ConversationState`, and the `TranscriptStore`, and runs each exchange
//! through the `ExchangeGate`:
//!
//! 1. persist the transcript with the user message appended, then adopt it
//!    in memory and notify the view
//! 2. call the chat service with the active session id
//! 3. same as step 1 for the answer (or the fallback reply)
//!
//! The in-memory transcript only changes after the store accepted it. The
//! state lock is never held across a chat service call.

use std::sync::Arc;
use std::time::Instant;

use ragchat_types::config::{ClientConfig, ExchangeMode, ResetPolicy};
use ragchat_types::error::{ChatError, ChatServiceError};
use ragchat_types::message::Message;
use ragchat_types::session::SessionId;
use tokio::sync::{watch, Mutex};
use tracing::{debug, info, warn};

use crate::chat::conversation::ConversationState;
use crate::chat::exchange::{ExchangeGate, ExchangeState};
use crate::chat::session::SessionManager;
use crate::chat::transcript::TranscriptStore;
use crate::chat::view::TranscriptView;
use crate::client::ChatBackend;
use crate::storage::kv_store::KvStore;

/// Bot message appended when the chat service cannot produce an answer.
pub const FALLBACK_REPLY: &str = "Error getting response.";

/// Behavior knobs for the controller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControllerSettings {
    pub reset_policy: ResetPolicy,
    pub exchange_mode: ExchangeMode,
}

impl From<&ClientConfig> for ControllerSettings {
    fn from(config: &ClientConfig) -> Self {
        Self {
            reset_policy: config.reset_policy,
            exchange_mode: config.exchange_mode,
        }
    }
}

/// A completed exchange.
#[derive(Debug, Clone)]
pub struct Exchange {
    pub session_id: SessionId,
    pub user: Message,
    pub reply: Message,
    /// `Resolved` if `reply` came from the service, `Failed` if it is the fallback.
    pub state: ExchangeState,
    pub response_ms: u64,
}

#[derive(Debug, Clone)]
pub enum SendOutcome {
    /// Blank input; nothing was appended or sent.
    Ignored,
    Completed(Exchange),
}

/// Result of a reset that rotated the local session.
#[derive(Debug, Clone)]
pub struct ResetReport {
    pub previous: SessionId,
    pub current: SessionId,
    /// Set when the chat service did not acknowledge the reset.
    pub remote_error: Option<ChatServiceError>,
}

impl ResetReport {
    pub fn acknowledged(&self) -> bool {
        self.remote_error.is_none()
    }
}

struct ControllerState<S: KvStore> {
    sessions: SessionManager<S>,
    conversation: ConversationState,
}

/// Keeps the session id, the transcript, and the chat service consistent.
pub struct ChatController<S: KvStore + Clone, B: ChatBackend> {
    backend: B,
    transcripts: TranscriptStore<S>,
    state: Mutex<ControllerState<S>>,
    gate: ExchangeGate,
    reset_policy: ResetPolicy,
    view: Option<Arc<dyn TranscriptView>>,
}

impl<S: KvStore + Clone, B: ChatBackend> ChatController<S, B> {
    /// Restore the persisted transcript and get-or-create the session id.
    pub async fn open(
        store: S,
        backend: B,
        settings: ControllerSettings,
    ) -> Result<Self, ChatError> {
        let transcripts = TranscriptStore::new(store.clone());
        let conversation = transcripts.load().await?;

        let mut sessions = SessionManager::new(store);
        let session_id = sessions.get_or_create_session_id().await?;

        info!(
            session_id = %session_id,
            messages = conversation.len(),
            "Chat controller ready"
        );

        Ok(Self {
            backend,
            transcripts,
            state: Mutex::new(ControllerState {
                sessions,
                conversation,
            }),
            gate: ExchangeGate::new(settings.exchange_mode),
            reset_policy: settings.reset_policy,
            view: None,
        })
    }

    /// Install the transcript observer.
    pub fn with_view(mut self, view: Arc<dyn TranscriptView>) -> Self {
        self.view = Some(view);
        self
    }

    pub fn reset_policy(&self) -> ResetPolicy {
        self.reset_policy
    }

    pub fn exchange_state(&self) -> ExchangeState {
        self.gate.state()
    }

    pub fn subscribe_exchange_state(&self) -> watch::Receiver<ExchangeState> {
        self.gate.subscribe()
    }

    /// The active session id.
    pub async fn session_id(&self) -> Result<SessionId, ChatError> {
        let mut state = self.state.lock().await;
        Ok(state.sessions.get_or_create_session_id().await?)
    }

    /// Snapshot of the transcript in display order.
    pub async fn transcript(&self) -> Vec<Message> {
        self.state.lock().await.conversation.messages().to_vec()
    }

    /// Run one exchange for `text`.
    ///
    /// Blank input is ignored; anything else is stored and sent exactly as
    /// typed. A chat service failure never surfaces as an error: the fallback
    /// reply is appended instead. Errors returned here come from the gate or
    /// from the durable store, and leave the in-memory transcript as it was
    /// before the exchange.
    pub async fn send(&self, text: &str) -> Result<SendOutcome, ChatError> {
        if text.trim().is_empty() {
            debug!("Ignoring blank input");
            return Ok(SendOutcome::Ignored);
        }

        let permit = self.gate.acquire().await?;
        let user = Message::user(text);

        let (session_id, before) = {
            let mut state = self.state.lock().await;
            let session_id = state.sessions.get_or_create_session_id().await?;
            let before = state.conversation.clone();
            let mut next = before.clone();
            next.append(user.clone());
            self.commit(&mut state, next).await?;
            (session_id, before)
        };

        permit.begin();
        let started = Instant::now();
        let (reply, outcome) = match self.backend.send_query(text, &session_id).await {
            Ok(answer) => (Message::bot(answer), ExchangeState::Resolved),
            Err(e) => {
                warn!(
                    session_id = %session_id,
                    error = %e,
                    "Chat request failed, using fallback reply"
                );
                (Message::bot(FALLBACK_REPLY), ExchangeState::Failed)
            }
        };
        let response_ms = started.elapsed().as_millis() as u64;

        {
            let mut state = self.state.lock().await;
            let mut next = state.conversation.clone();
            next.append(reply.clone());
            if let Err(e) = self.commit(&mut state, next).await {
                self.roll_back(&mut state, before).await;
                return Err(e);
            }
        }
        permit.settle(outcome);

        debug!(
            session_id = %session_id,
            outcome = %outcome,
            response_ms,
            "Exchange finished"
        );

        Ok(SendOutcome::Completed(Exchange {
            session_id,
            user,
            reply,
            state: outcome,
            response_ms,
        }))
    }

    /// End the current session.
    ///
    /// Notifies the chat service with the *current* id first. Then, per the
    /// reset policy, rotates the id and clears the transcript in one atomic
    /// store commit.
    pub async fn reset(&self) -> Result<ResetReport, ChatError> {
        let _permit = self.gate.acquire().await?;
        let previous = self.session_id().await?;

        let remote_error = match self.backend.reset_session(&previous).await {
            Ok(()) => None,
            Err(e) if self.reset_policy == ResetPolicy::RequireAck => {
                warn!(
                    session_id = %previous,
                    error = %e,
                    "Reset not acknowledged, keeping session"
                );
                return Err(ChatError::ResetRejected(e));
            }
            Err(e) => {
                warn!(
                    session_id = %previous,
                    error = %e,
                    "Reset not acknowledged, rotating anyway"
                );
                Some(e)
            }
        };

        let mut state = self.state.lock().await;
        let clear = self.transcripts.clear_op();
        let current = state.sessions.rotate_with(vec![clear]).await?;
        state.conversation.clear();
        self.notify(&state.conversation);

        Ok(ResetReport {
            previous,
            current,
            remote_error,
        })
    }

    /// Persist `next`, then make it the in-memory transcript and let the
    /// view catch up. On a store error the in-memory transcript is untouched.
    async fn commit(
        &self,
        state: &mut ControllerState<S>,
        next: ConversationState,
    ) -> Result<(), ChatError> {
        self.transcripts.save(&next).await?;
        state.conversation = next;
        self.notify(&state.conversation);
        Ok(())
    }

    /// Drop an unanswered user message after its reply could not be saved.
    ///
    /// The in-memory transcript always returns to `before`. The store is
    /// rewritten on a best-effort basis; if that also fails, the next
    /// successful save overwrites the stale entry.
    async fn roll_back(&self, state: &mut ControllerState<S>, before: ConversationState) {
        if let Err(e) = self.transcripts.save(&before).await {
            warn!(error = %e, "Could not roll back unanswered message in store");
        }
        state.conversation = before;
        self.notify(&state.conversation);
    }

    fn notify(&self, conversation: &ConversationState) {
        if let Some(view) = &self.view {
            view.transcript_changed(conversation.messages());
        }
    }
}
