//! Chat service wire types.

use serde::{Deserialize, Serialize};

/// Body of `POST /chat`.
#[derive(Debug, Serialize)]
pub struct ChatRequest<'a> {
    pub query: &'a str,
    pub session_id: &'a str,
}

/// Response of `POST /chat`. Fields other than `answer` are ignored.
#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    pub answer: String,
}

/// Body of `POST /reset-session`.
#[derive(Debug, Serialize)]
pub struct ResetRequest<'a> {
    pub session_id: &'a str,
}
