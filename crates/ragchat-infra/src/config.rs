//! Client configuration loader for ragchat.
//!
//! Reads `config.toml` from the data directory and deserializes it into
//! [`ClientConfig`]. Falls back to defaults when the file is missing or
//! malformed, then layers environment and CLI overrides on top.

use std::path::Path;

use ragchat_types::config::ClientConfig;

/// Environment variable overriding the chat service base URL.
pub const BASE_URL_ENV: &str = "RAGCHAT_BASE_URL";

/// Load client configuration from `{data_dir}/config.toml`.
///
/// - Missing file: [`ClientConfig::default()`].
/// - Unreadable or unparsable file: a warning, then the default.
pub async fn load_client_config(data_dir: &Path) -> ClientConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return ClientConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return ClientConfig::default();
        }
    };

    match toml::from_str::<ClientConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            ClientConfig::default()
        }
    }
}

/// Pick the base URL.
///
/// Priority: CLI flag, then `RAGCHAT_BASE_URL`, then the config file (which
/// already holds the default when the file is silent). Blank values are
/// skipped.
pub fn resolve_base_url(flag: Option<&str>, env: Option<&str>, config: &ClientConfig) -> String {
    [flag, env]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|url| !url.is_empty())
        .unwrap_or(config.base_url.as_str())
        .to_string()
}

/// Apply the CLI flag and environment on top of the loaded config.
pub fn apply_overrides(mut config: ClientConfig, base_url_flag: Option<&str>) -> ClientConfig {
    let env = std::env::var(BASE_URL_ENV).ok();
    config.base_url = resolve_base_url(base_url_flag, env.as_deref(), &config);
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use ragchat_types::config::{ExchangeMode, ResetPolicy};
    use tempfile::TempDir;

    #[tokio::test]
    async fn load_client_config_missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config = load_client_config(tmp.path()).await;
        assert_eq!(config, ClientConfig::default());
    }

    #[tokio::test]
    async fn load_client_config_valid_toml_returns_parsed() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(
            tmp.path().join("config.toml"),
            r#"
base_url = "https://chat.example.edu"
reset_policy = "require_ack"
exchange_mode = "queue"
"#,
        )
        .await
        .unwrap();

        let config = load_client_config(tmp.path()).await;
        assert_eq!(config.base_url, "https://chat.example.edu");
        assert_eq!(config.title, "Chat with UTK");
        assert_eq!(config.reset_policy, ResetPolicy::RequireAck);
        assert_eq!(config.exchange_mode, ExchangeMode::Queue);
    }

    #[tokio::test]
    async fn load_client_config_invalid_toml_returns_default() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(tmp.path().join("config.toml"), "this is not { valid toml !!!")
            .await
            .unwrap();

        let config = load_client_config(tmp.path()).await;
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn resolve_base_url_precedence() {
        let config = ClientConfig {
            base_url: "http://from-file".to_string(),
            ..ClientConfig::default()
        };

        assert_eq!(
            resolve_base_url(Some("http://flag"), Some("http://env"), &config),
            "http://flag"
        );
        assert_eq!(resolve_base_url(None, Some("http://env"), &config), "http://env");
        assert_eq!(resolve_base_url(None, None, &config), "http://from-file");
        assert_eq!(resolve_base_url(Some(" "), Some(""), &config), "http://from-file");
    }

    #[test]
    fn resolve_base_url_defaults_without_file() {
        let config = ClientConfig::default();
        assert_eq!(resolve_base_url(None, None, &config), "http://localhost:8000");
    }
}
