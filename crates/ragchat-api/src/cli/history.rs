//! Transcript display command.

use anyhow::Result;
use comfy_table::{presets, Cell, Color, ContentArrangement, Table};
use console::style;

use ragchat_types::message::{Message, Sender};

use crate::state::AppState;

const PREVIEW_CHARS: usize = 120;

/// Print the transcript as a table (or JSON), optionally only the tail.
pub async fn show_history(state: &AppState, limit: Option<usize>, json: bool) -> Result<()> {
    let transcript = state.transcripts().load().await?;
    let messages = tail(transcript.messages(), limit);

    if json {
        println!("{}", serde_json::to_string_pretty(messages)?);
        return Ok(());
    }

    if messages.is_empty() {
        println!();
        println!(
            "  {} No messages yet. Start with: {}",
            style("i").blue().bold(),
            style("ragchat chat").yellow()
        );
        println!();
        return Ok(());
    }

    let offset = transcript.len() - messages.len();
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("#").fg(Color::White),
        Cell::new("From").fg(Color::White),
        Cell::new("Message").fg(Color::White),
    ]);

    for (i, message) in messages.iter().enumerate() {
        let from = match message.sender {
            Sender::User => Cell::new("You").fg(Color::Green),
            Sender::Bot => Cell::new("Bot").fg(Color::Cyan),
        };
        table.add_row(vec![
            Cell::new(offset + i + 1),
            from,
            Cell::new(preview(&message.text, PREVIEW_CHARS)),
        ]);
    }

    println!();
    println!("{table}");
    println!();
    Ok(())
}

fn tail(messages: &[Message], limit: Option<usize>) -> &[Message] {
    match limit {
        Some(n) if n < messages.len() => &messages[messages.len() - n..],
        _ => messages,
    }
}

/// Single-line preview, cut on a char boundary.
fn preview(text: &str, max_chars: usize) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= max_chars {
        return flat;
    }
    let cut: String = flat.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{cut}...")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tail() {
        let messages = vec![Message::user("a"), Message::bot("b"), Message::user("c")];
        assert_eq!(tail(&messages, None).len(), 3);
        assert_eq!(tail(&messages, Some(10)).len(), 3);
        assert_eq!(tail(&messages, Some(1)), &[Message::user("c")]);
        assert!(tail(&messages, Some(0)).is_empty());
    }

    #[test]
    fn test_preview_flattens_and_truncates() {
        assert_eq!(preview("line one\n\nline two", 50), "line one line two");

        let long = "é".repeat(200);
        let short = preview(&long, 10);
        assert_eq!(short.chars().count(), 10);
        assert!(short.ends_with("..."));
    }
}
