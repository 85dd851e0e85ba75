//! Infrastructure layer for ragchat.
//!
//! Contains implementations of the ports defined in `ragchat-core`: the
//! SQLite-backed `KvStore` and the reqwest-backed `ChatBackend`. Also loads
//! `config.toml` and resolves the data directory.

pub mod config;
pub mod http;
pub mod paths;
pub mod sqlite;
