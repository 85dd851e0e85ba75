//! Application state wiring the concrete store and chat client together.
//!
//! AppState resolves the data directory, loads `config.toml`, opens the
//! SQLite database, and pins the generic `ChatController` to the SQLite
//! store and the HTTP client.

use std::path::PathBuf;

use anyhow::Context;
use tracing::debug;

use ragchat_core::chat::controller::{ChatController, ControllerSettings};
use ragchat_core::chat::transcript::TranscriptStore;
use ragchat_infra::config::{apply_overrides, load_client_config};
use ragchat_infra::http::HttpChatClient;
use ragchat_infra::paths::resolve_data_dir;
use ragchat_infra::sqlite::kv::SqliteKvStore;
use ragchat_infra::sqlite::pool::DatabasePool;
use ragchat_types::config::ClientConfig;

/// Controller pinned to the infra implementations.
pub type ConcreteChatController = ChatController<SqliteKvStore, HttpChatClient>;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ClientConfig,
    pub data_dir: PathBuf,
    pub profile: String,
    pub store: SqliteKvStore,
}

impl AppState {
    /// Initialize the application state: load config, connect to the DB.
    pub async fn init(profile: &str, base_url_flag: Option<&str>) -> anyhow::Result<Self> {
        let profile = profile.trim();
        anyhow::ensure!(!profile.is_empty(), "Profile name must not be empty");

        let data_dir = resolve_data_dir();
        let config = apply_overrides(load_client_config(&data_dir).await, base_url_flag);

        let pool = DatabasePool::open_in(&data_dir)
            .await
            .with_context(|| format!("Failed to open database in {}", data_dir.display()))?;
        let store = SqliteKvStore::new(pool, profile);

        debug!(
            data_dir = %data_dir.display(),
            profile,
            base_url = %config.base_url,
            "Application state ready"
        );

        Ok(Self {
            config,
            data_dir,
            profile: profile.to_string(),
            store,
        })
    }

    /// HTTP client for the configured chat service.
    pub fn backend(&self) -> anyhow::Result<HttpChatClient> {
        HttpChatClient::new(&self.config.base_url, self.config.request_timeout())
            .with_context(|| format!("Invalid chat service URL '{}'", self.config.base_url))
    }

    /// Restore the profile's transcript and session into a controller.
    pub async fn controller(&self) -> anyhow::Result<ConcreteChatController> {
        let settings = ControllerSettings::from(&self.config);
        ChatController::open(self.store.clone(), self.backend()?, settings)
            .await
            .context("Failed to restore chat session")
    }

    /// Read-only access to the persisted transcript.
    pub fn transcripts(&self) -> TranscriptStore<SqliteKvStore> {
        TranscriptStore::new(self.store.clone())
    }
}
