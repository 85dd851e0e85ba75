//! Data directory resolution.

use std::path::PathBuf;

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "RAGCHAT_DATA_DIR";

/// Resolve the data directory from environment or platform defaults.
///
/// Priority:
/// 1. `RAGCHAT_DATA_DIR` environment variable
/// 2. `~/.ragchat`
/// 3. `.ragchat` in the current directory
pub fn resolve_data_dir() -> PathBuf {
    data_dir_from(std::env::var(DATA_DIR_ENV).ok(), dirs::home_dir())
}

fn data_dir_from(env: Option<String>, home: Option<PathBuf>) -> PathBuf {
    if let Some(dir) = env.filter(|d| !d.trim().is_empty()) {
        return PathBuf::from(dir);
    }

    if let Some(home) = home {
        return home.join(".ragchat");
    }

    PathBuf::from(".ragchat")
}
