//! Session CLI commands: show the active session, end it.

use anyhow::Result;
use console::style;
use dialoguer::Confirm;

use ragchat_core::chat::controller::ResetReport;
use ragchat_core::chat::session::SessionManager;
use ragchat_types::error::ChatError;

use crate::state::{AppState, ConcreteChatController};

/// Notice shown when the chat service does not acknowledge a reset.
pub const RESET_FAILED: &str = "Failed to reset session";

/// Show the active session id and transcript size.
///
/// Creates the session id if the profile has none yet.
pub async fn show_session(state: &AppState, json: bool) -> Result<()> {
    let mut sessions = SessionManager::new(state.store.clone());
    let session_id = sessions.get_or_create_session_id().await?;
    let messages = state.transcripts().load().await?.len();

    if json {
        let info = serde_json::json!({
            "session_id": session_id,
            "profile": state.profile,
            "messages": messages,
            "base_url": state.config.base_url,
            "data_dir": state.data_dir.display().to_string(),
        });
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    println!();
    println!("  {}  {}", style("Session:").bold(), style(&session_id).cyan());
    println!("  {}  {}", style("Profile:").bold(), state.profile);
    println!("  {} {}", style("Messages:").bold(), messages);
    println!("  {}  {}", style("Service:").bold(), style(&state.config.base_url).dim());
    println!();
    Ok(())
}

/// End the current session after confirmation (unless `force`).
pub async fn reset_session(state: &AppState, force: bool, json: bool) -> Result<()> {
    let controller = state.controller().await?;

    if !force && !json {
        let count = controller.transcript().await.len();
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "End the current session and delete its {count} message(s)?"
            ))
            .default(false)
            .interact()?;

        if !confirmed {
            println!("  Cancelled.");
            return Ok(());
        }
    }

    let result = controller.reset().await;

    if json {
        let (ok, report) = match &result {
            Ok(report) => (true, serde_json::json!({
                "previous_session_id": report.previous,
                "session_id": report.current,
                "acknowledged": report.acknowledged(),
                "remote_error": report.remote_error.as_ref().map(|e| e.to_string()),
            })),
            Err(e) => (false, serde_json::json!({ "error": e.to_string() })),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        if !ok {
            anyhow::bail!(RESET_FAILED);
        }
        return Ok(());
    }

    for line in reset_notices(&result) {
        println!("{line}");
    }
    result.map(|_| ()).map_err(|e| anyhow::anyhow!("{RESET_FAILED}: {e}"))
}

/// Run a reset from the chat loop and describe the outcome.
pub async fn reset_in_chat(controller: &ConcreteChatController) -> Vec<String> {
    reset_notices(&controller.reset().await)
}

/// User-facing lines describing a reset outcome.
pub fn reset_notices(result: &Result<ResetReport, ChatError>) -> Vec<String> {
    match result {
        Ok(report) if report.acknowledged() => vec![format!(
            "\n  {} Session ended. New session {}\n",
            style("*").cyan().bold(),
            style(report.current.short()).dim()
        )],
        Ok(report) => vec![
            format!("\n  {} {RESET_FAILED}", style("!").yellow().bold()),
            format!(
                "  {} Started new session {} locally\n",
                style("*").cyan().bold(),
                style(report.current.short()).dim()
            ),
        ],
        Err(ChatError::ResetRejected(e)) => vec![format!(
            "\n  {} {RESET_FAILED}: {e}. Keeping the current session.\n",
            style("!").red().bold()
        )],
        Err(ChatError::ExchangeInFlight) => vec![format!(
            "\n  {} Wait for the current reply before resetting.\n",
            style("!").yellow().bold()
        )],
        Err(e) => vec![format!("\n  {} {RESET_FAILED}: {e}\n", style("!").red().bold())],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ragchat_types::error::ChatServiceError;
    use ragchat_types::session::SessionId;

    fn plain(lines: Vec<String>) -> String {
        console::strip_ansi_codes(&lines.join("\n")).into_owned()
    }

    fn report(remote_error: Option<ChatServiceError>) -> ResetReport {
        ResetReport {
            previous: "11111111-old".parse::<SessionId>().unwrap(),
            current: "22222222-new".parse::<SessionId>().unwrap(),
            remote_error,
        }
    }

    #[test]
    fn test_acknowledged_reset_notice() {
        let text = plain(reset_notices(&Ok(report(None))));
        assert!(text.contains("Session ended"));
        assert!(text.contains("22222222"));
        assert!(!text.contains(RESET_FAILED));
    }

    #[test]
    fn test_unacknowledged_reset_still_reports_failure() {
        let err = ChatServiceError::Transport("connection refused".to_string());
        let text = plain(reset_notices(&Ok(report(Some(err)))));
        assert!(text.contains(RESET_FAILED));
        assert!(text.contains("22222222"));
    }

    #[test]
    fn test_rejected_reset_keeps_session() {
        let err = ChatError::ResetRejected(ChatServiceError::Status {
            status: 500,
            body: "boom".to_string(),
        });
        let text = plain(reset_notices(&Err(err)));
        assert!(text.contains(RESET_FAILED));
        assert!(text.contains("Keeping the current session"));
    }
}
