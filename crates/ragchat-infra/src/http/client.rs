//! HttpChatClient -- concrete [`ChatBackend`] implementation over HTTP.
//!
//! Posts JSON to `{base}/chat` and `{base}/reset-session`. No retries and
//! no fallbacks: every failure is reported as a [`ChatServiceError`] and
//! the controller decides what it means for the transcript.

use std::time::Duration;

use ragchat_core::client::ChatBackend;
use ragchat_types::error::ChatServiceError;
use ragchat_types::session::SessionId;
use reqwest::Url;
use serde::Serialize;
use tracing::debug;

use super::types::{ChatRequest, ChatResponse, ResetRequest};

/// reqwest-backed chat service client.
#[derive(Debug, Clone)]
pub struct HttpChatClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpChatClient {
    /// Create a client for the service at `base_url`.
    ///
    /// Trailing slashes are trimmed. The URL must be absolute `http` or
    /// `https`. `timeout` bounds each whole request; `None` waits forever.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, ChatServiceError> {
        let base_url = base_url.trim().trim_end_matches('/').to_string();

        let parsed = Url::parse(&base_url)
            .map_err(|e| ChatServiceError::InvalidEndpoint(format!("{base_url}: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ChatServiceError::InvalidEndpoint(format!(
                "{base_url}: unsupported scheme '{}'",
                parsed.scheme()
            )));
        }

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ChatServiceError::Transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post_json<T: Serialize>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<reqwest::Response, ChatServiceError> {
        let url = self.url(path);
        debug!(url = %url, "POST");

        let response = self
            .client
            .post(&url)
            .header("content-type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| ChatServiceError::Transport(format!("HTTP request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ChatServiceError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response)
    }
}

impl ChatBackend for HttpChatClient {
    async fn send_query(
        &self,
        query: &str,
        session_id: &SessionId,
    ) -> Result<String, ChatServiceError> {
        let body = ChatRequest {
            query,
            session_id: session_id.as_str(),
        };
        let response = self.post_json("/chat", &body).await?;

        let text = response
            .text()
            .await
            .map_err(|e| ChatServiceError::Transport(format!("failed to read response: {e}")))?;
        let parsed: ChatResponse = serde_json::from_str(&text).map_err(|e| {
            ChatServiceError::Deserialization(format!("failed to parse response: {e}"))
        })?;

        Ok(parsed.answer)
    }

    async fn reset_session(&self, session_id: &SessionId) -> Result<(), ChatServiceError> {
        let body = ResetRequest {
            session_id: session_id.as_str(),
        };
        self.post_json("/reset-session", &body).await?;
        Ok(())
    }
}
