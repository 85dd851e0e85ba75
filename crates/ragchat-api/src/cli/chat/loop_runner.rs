//! Main chat loop orchestration.
//!
//! Restores the session, prints the banner and the saved transcript, then
//! reads lines until Ctrl+D or `/exit`. Every line that is not a slash
//! command becomes one exchange through the `ChatController`.

use std::sync::Arc;

use console::style;
use tracing::{info, warn};

use ragchat_core::chat::controller::SendOutcome;
use ragchat_types::error::ChatError;

use crate::cli::session::reset_in_chat;
use crate::state::AppState;

use super::banner::print_welcome_banner;
use super::commands::{self, ChatCommand};
use super::input::{ChatInput, InputEvent};
use super::view::TerminalView;

/// Run the interactive chat loop for the active profile.
pub async fn run_chat_loop(state: &AppState) -> anyhow::Result<()> {
    let view = Arc::new(TerminalView::new(Box::new(std::io::stdout()), false));
    let controller = state.controller().await?.with_view(view.clone());

    let session_id = controller.session_id().await?;
    let transcript = controller.transcript().await;
    info!(session_id = %session_id, profile = %state.profile, "Starting chat loop");

    print_welcome_banner(
        &state.config.title,
        &state.config.base_url,
        session_id.short(),
        transcript.len(),
    );
    view.replay(&transcript);

    let prompt = format!("  {} ", style("You >").green().bold());
    let (mut chat_input, writer) =
        ChatInput::new(prompt).map_err(|e| anyhow::anyhow!("Failed to initialize input: {e}"))?;
    view.set_writer(Box::new(writer));

    loop {
        let text = match chat_input.read_line().await {
            InputEvent::Eof => {
                view.notice(&format!("\n  {}", style("Session saved. Bye!").dim()));
                break;
            }
            InputEvent::Interrupted => {
                view.notice(&format!(
                    "\n  {}",
                    style("Press Ctrl+D to exit, or keep chatting.").dim()
                ));
                continue;
            }
            InputEvent::Message(text) if text.trim().is_empty() => continue,
            InputEvent::Message(text) => text,
        };

        if let Some(cmd) = commands::parse(&text) {
            match cmd {
                ChatCommand::Help => commands::print_help(),
                ChatCommand::Clear => chat_input.clear(),
                ChatCommand::Exit => {
                    view.notice(&format!("\n  {}", style("Session saved. Bye!").dim()));
                    break;
                }
                ChatCommand::Reset => {
                    for line in reset_in_chat(&controller).await {
                        view.notice(&line);
                    }
                }
                ChatCommand::History => {
                    let transcript = controller.transcript().await;
                    if transcript.is_empty() {
                        view.notice(&format!("\n  {}\n", style("No messages yet.").dim()));
                    } else {
                        view.notice("");
                        view.replay(&transcript);
                        view.notice("");
                    }
                }
                ChatCommand::Session => match controller.session_id().await {
                    Ok(id) => view.notice(&format!(
                        "\n  {}  {}\n",
                        style("Session:").bold(),
                        style(id).cyan()
                    )),
                    Err(e) => view.notice(&format!("\n  {} {e}\n", style("!").red().bold())),
                },
                ChatCommand::Unknown(name) => view.notice(&format!(
                    "\n  {} Unknown command: {}. Type /help for available commands.\n",
                    style("?").yellow().bold(),
                    style(name).dim()
                )),
            }
            continue;
        }

        view.begin_wait();
        let outcome = controller.send(&text).await;
        view.end_wait();

        match outcome {
            Ok(SendOutcome::Completed(exchange)) => {
                view.notice(&format!(
                    "\n{}\n",
                    view.renderer().stats_footer(exchange.response_ms, exchange.state)
                ));
            }
            Ok(SendOutcome::Ignored) => {}
            Err(ChatError::ExchangeInFlight) => view.notice(&format!(
                "\n  {} Still waiting for the previous reply.\n",
                style("!").yellow().bold()
            )),
            Err(e) => {
                warn!(error = %e, "Exchange failed");
                view.notice(&format!("\n  {} {e}\n", style("!").red().bold()));
            }
        }
    }

    chat_input.flush();
    Ok(())
}
