//! Slash command parsing for the chat loop.

use console::style;

/// Available slash commands in the chat loop.
#[derive(Debug, PartialEq)]
pub enum ChatCommand {
    /// Show available commands.
    Help,
    /// Clear the terminal screen.
    Clear,
    /// Exit the chat loop (the session stays active).
    Exit,
    /// End the session: notify the service, rotate the id, clear history.
    Reset,
    /// Replay the transcript.
    History,
    /// Show the active session id.
    Session,
    /// Unknown command.
    Unknown(String),
}

/// Parse user input as a slash command.
///
/// Returns `None` if the input doesn't start with `/`.
pub fn parse(input: &str) -> Option<ChatCommand> {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return None;
    }

    let cmd = trimmed
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .to_lowercase();

    match cmd.as_str() {
        "/help" | "/h" | "/?" => Some(ChatCommand::Help),
        "/clear" | "/cls" => Some(ChatCommand::Clear),
        "/exit" | "/quit" | "/q" => Some(ChatCommand::Exit),
        "/reset" | "/end" | "/new" => Some(ChatCommand::Reset),
        "/history" => Some(ChatCommand::History),
        "/session" => Some(ChatCommand::Session),
        other => Some(ChatCommand::Unknown(other.to_string())),
    }
}

/// Print the help text listing all available commands.
pub fn print_help() {
    println!();
    println!("  {}", style("Available commands:").bold());
    println!();
    println!("  {}     {}", style("/help").cyan(), "Show this help message");
    println!("  {}    {}", style("/clear").cyan(), "Clear the screen");
    println!(
        "  {}    {}",
        style("/reset").cyan(),
        "End the session and start a new one (alias /end)"
    );
    println!("  {}  {}", style("/history").cyan(), "Show the conversation so far");
    println!("  {}  {}", style("/session").cyan(), "Show the active session id");
    println!("  {}     {}", style("/exit").cyan(), "Leave the chat (the session is kept)");
    println!();
    println!("  {}", style("Ctrl+D to exit").dim());
    println!();
}
