//! HTTP client for the remote chat service.

pub mod client;
pub mod types;

pub use client::HttpChatClient;
