//! Client configuration types for ragchat.
//!
//! `ClientConfig` represents the `config.toml` in the data directory that
//! controls which chat service to talk to and how the client behaves when
//! requests overlap or a reset is not acknowledged.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Top-level client configuration.
///
/// Loaded from `~/.ragchat/config.toml`. All fields have sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the chat service (`/chat` and `/reset-session` live under it).
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Title shown in the chat banner.
    #[serde(default = "default_title")]
    pub title: String,

    /// Per-request timeout. Unset means requests wait indefinitely.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,

    /// What to do locally when the service fails to acknowledge a reset.
    #[serde(default)]
    pub reset_policy: ResetPolicy,

    /// What to do with a send issued while another exchange is in flight.
    #[serde(default)]
    pub exchange_mode: ExchangeMode,
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_title() -> String {
    "Chat with UTK".to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            title: default_title(),
            request_timeout_secs: None,
            reset_policy: ResetPolicy::default(),
            exchange_mode: ExchangeMode::default(),
        }
    }
}

impl ClientConfig {
    /// The configured request timeout. Zero counts as unset.
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }
}

/// Local behavior when `reset-session` fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResetPolicy {
    /// Rotate the session id and clear the transcript regardless of the
    /// remote result. The failure is still reported to the user.
    #[default]
    AlwaysRotate,
    /// Keep the current session and transcript unless the service
    /// acknowledged the reset.
    RequireAck,
}

/// Handling of a send that arrives while an exchange is in flight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExchangeMode {
    /// Refuse the new send immediately.
    #[default]
    Reject,
    /// Wait for the in-flight exchange to finish, then run.
    Queue,
}
