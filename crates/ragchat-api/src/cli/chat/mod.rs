//! Interactive terminal chat.
//!
//! Welcome banner, transcript replay, markdown rendering of replies, a
//! waiting spinner, and slash commands. Entry point:
//! `loop_runner::run_chat_loop`.

pub mod banner;
pub mod commands;
pub mod input;
pub mod loop_runner;
pub mod renderer;
pub mod view;
