//! Chat transcript message types.
//!
//! A transcript is an append-only, ordered list of [`Message`]s. The JSON
//! shape (`{"sender":"user","text":"..."}`) is also the durable storage
//! format, so exported transcripts can be read back without conversion.

use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// Who authored a transcript message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sender::User => write!(f, "user"),
            Sender::Bot => write!(f, "bot"),
        }
    }
}

impl FromStr for Sender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(Sender::User),
            "bot" => Ok(Sender::Bot),
            other => Err(format!("invalid sender: '{other}'")),
        }
    }
}

/// A single transcript entry.
///
/// Messages are never mutated after creation. `text` is raw and may contain
/// markdown; rendering is left to the view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub sender: Sender,
    pub text: String,
}

impl Message {
    /// A message typed by the user.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::User,
            text: text.into(),
        }
    }

    /// A message produced by the chat service (or the fallback placeholder).
    pub fn bot(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::Bot,
            text: text.into(),
        }
    }

    pub fn is_user(&self) -> bool {
        self.sender == Sender::User
    }

    pub fn is_bot(&self) -> bool {
        self.sender == Sender::Bot
    }
}
