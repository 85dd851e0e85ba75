//! Transcript export as Markdown or JSON.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use console::style;

use ragchat_core::chat::session::SESSION_KEY;
use ragchat_core::storage::kv_store::KvStore;
use ragchat_types::message::{Message, Sender};

use crate::cli::ExportFormat;
use crate::state::AppState;

/// Export the profile's transcript to stdout or a file.
///
/// Never creates a session id; an untouched profile exports an empty
/// transcript.
pub async fn export_transcript(
    state: &AppState,
    format: ExportFormat,
    output: Option<&Path>,
) -> Result<()> {
    let transcript = state.transcripts().load().await?;
    let session_id = state.store.get(SESSION_KEY).await?;
    let now = Utc::now();

    let rendered = match format {
        ExportFormat::Markdown => to_markdown(
            &state.config.title,
            session_id.as_deref(),
            transcript.messages(),
            now,
        ),
        ExportFormat::Json => {
            let export = serde_json::json!({
                "session_id": session_id,
                "exported_at": now.to_rfc3339(),
                "messages": transcript.messages(),
            });
            serde_json::to_string_pretty(&export)?
        }
    };

    match output {
        Some(path) => {
            tokio::fs::write(path, &rendered)
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!(
                "  {} Exported {} message(s) to {}",
                style("*").cyan().bold(),
                transcript.len(),
                style(path.display()).yellow()
            );
        }
        None => println!("{rendered}"),
    }
    Ok(())
}

fn to_markdown(
    title: &str,
    session_id: Option<&str>,
    messages: &[Message],
    exported_at: DateTime<Utc>,
) -> String {
    let mut out = format!("# {title}\n\n");
    out.push_str(&format!("- **Session:** {}\n", session_id.unwrap_or("none")));
    out.push_str(&format!("- **Messages:** {}\n", messages.len()));
    out.push_str(&format!(
        "- **Exported:** {}\n\n---\n\n",
        exported_at.format("%Y-%m-%d %H:%M UTC")
    ));

    for message in messages {
        let label = match message.sender {
            Sender::User => "**You**",
            Sender::Bot => "**Bot**",
        };
        out.push_str(&format!("{label}:\n\n{}\n\n", message.text.trim_end()));
    }

    out
}
