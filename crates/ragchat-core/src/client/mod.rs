//! Remote chat service abstraction.
//!
//! Re-exports the `ChatBackend` port. The HTTP implementation lives in
//! ragchat-infra.

pub mod backend;

pub use backend::ChatBackend;
