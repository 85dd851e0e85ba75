//! Exchange state machine and the single-slot gate that serializes
//! exchanges.
//!
//! One exchange is one user query plus its reply (or fallback). Exchanges
//! never overlap: a second send either waits for the slot or is refused,
//! depending on [`ExchangeMode`]. Resets take the same slot so a reply can
//! never arrive after the transcript it belongs to has been cleared.

use std::fmt;
use std::sync::Arc;

use ragchat_types::config::ExchangeMode;
use ragchat_types::error::ChatError;
use tokio::sync::{watch, Mutex, OwnedMutexGuard};

/// Where the current exchange is in its lifecycle.
///
/// `Idle -> AwaitingResponse -> {Resolved | Failed} -> Idle`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExchangeState {
    Idle,
    AwaitingResponse,
    Resolved,
    Failed,
}

impl ExchangeState {
    /// Whether this is an end state of a single exchange.
    pub fn is_settled(self) -> bool {
        matches!(self, ExchangeState::Resolved | ExchangeState::Failed)
    }
}

impl fmt::Display for ExchangeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExchangeState::Idle => write!(f, "idle"),
            ExchangeState::AwaitingResponse => write!(f, "awaiting_response"),
            ExchangeState::Resolved => write!(f, "resolved"),
            ExchangeState::Failed => write!(f, "failed"),
        }
    }
}

/// Single-slot gate that admits one exchange (or reset) at a time.
pub struct ExchangeGate {
    mode: ExchangeMode,
    slot: Arc<Mutex<()>>,
    state: Arc<watch::Sender<ExchangeState>>,
}

impl ExchangeGate {
    pub fn new(mode: ExchangeMode) -> Self {
        let (state, _) = watch::channel(ExchangeState::Idle);
        Self {
            mode,
            slot: Arc::new(Mutex::new(())),
            state: Arc::new(state),
        }
    }

    pub fn mode(&self) -> ExchangeMode {
        self.mode
    }

    /// Current state of the exchange holding the slot (or `Idle`).
    pub fn state(&self) -> ExchangeState {
        *self.state.borrow()
    }

    /// Watch state transitions, e.g. to drive a spinner.
    pub fn subscribe(&self) -> watch::Receiver<ExchangeState> {
        self.state.subscribe()
    }

    /// Take the slot.
    ///
    /// In `Reject` mode this fails with [`ChatError::ExchangeInFlight`] when
    /// the slot is taken; in `Queue` mode it waits.
    pub async fn acquire(&self) -> Result<ExchangePermit, ChatError> {
        let guard = match self.mode {
            ExchangeMode::Reject => self
                .slot
                .clone()
                .try_lock_owned()
                .map_err(|_| ChatError::ExchangeInFlight)?,
            ExchangeMode::Queue => self.slot.clone().lock_owned().await,
        };

        Ok(ExchangePermit {
            _guard: guard,
            state: Arc::clone(&self.state),
        })
    }
}

/// Proof of holding the gate's slot. Dropping it frees the slot and
/// returns the state machine to `Idle`.
pub struct ExchangePermit {
    _guard: OwnedMutexGuard<()>,
    state: Arc<watch::Sender<ExchangeState>>,
}

impl ExchangePermit {
    /// The request has been issued.
    pub fn begin(&self) {
        self.state.send_replace(ExchangeState::AwaitingResponse);
    }

    /// The exchange reached an end state.
    pub fn settle(&self, outcome: ExchangeState) {
        debug_assert!(outcome.is_settled());
        self.state.send_replace(outcome);
    }
}

impl Drop for ExchangePermit {
    fn drop(&mut self) {
        self.state.send_replace(ExchangeState::Idle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_state_transitions() {
        let gate = ExchangeGate::new(ExchangeMode::Reject);
        let mut rx = gate.subscribe();
        assert_eq!(gate.state(), ExchangeState::Idle);

        let permit = gate.acquire().await.unwrap();
        permit.begin();
        assert_eq!(gate.state(), ExchangeState::AwaitingResponse);
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), ExchangeState::AwaitingResponse);

        permit.settle(ExchangeState::Resolved);
        assert_eq!(gate.state(), ExchangeState::Resolved);

        drop(permit);
        assert_eq!(gate.state(), ExchangeState::Idle);
    }

    #[tokio::test]
    async fn test_reject_mode_refuses_second_permit() {
        let gate = ExchangeGate::new(ExchangeMode::Reject);
        let first = gate.acquire().await.unwrap();

        let second = gate.acquire().await;
        assert!(matches!(second, Err(ChatError::ExchangeInFlight)));

        drop(first);
        assert!(gate.acquire().await.is_ok());
    }

    #[tokio::test]
    async fn test_queue_mode_waits_for_slot() {
        let gate = Arc::new(ExchangeGate::new(ExchangeMode::Queue));
        let first = gate.acquire().await.unwrap();

        let waiter = {
            let gate = Arc::clone(&gate);
            tokio::spawn(async move { gate.acquire().await.map(|_| ()) })
        };

        tokio::task::yield_now().await;
        assert!(!waiter.is_finished());

        drop(first);
        waiter.await.unwrap().unwrap();
    }

    #[test]
    fn test_display_and_settled() {
        assert_eq!(ExchangeState::AwaitingResponse.to_string(), "awaiting_response");
        assert!(ExchangeState::Failed.is_settled());
        assert!(!ExchangeState::Idle.is_settled());
    }
}
