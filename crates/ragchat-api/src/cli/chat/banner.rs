//! Welcome banner display for chat sessions.

use console::style;

/// Print the welcome banner at the start of a chat session.
///
/// `session_short` is the abbreviated session id.
pub fn print_welcome_banner(
    title: &str,
    base_url: &str,
    session_short: &str,
    message_count: usize,
) {
    println!();
    println!("  {}", style(title).cyan().bold());
    println!();
    println!("  {}  {}", style("Service:").bold(), style(base_url).dim());
    println!(
        "  {}  {}",
        style("Session:").bold(),
        style(session_short).dim()
    );
    if message_count > 0 {
        println!(
            "  {}  {}",
            style("History:").bold(),
            style(format!("{message_count} messages restored")).dim()
        );
    }
    println!();
    println!(
        "  {}",
        style("Type /help for commands, /reset to end the session, Ctrl+D to exit").dim()
    );
    println!("  {}", style("---").dim());
    println!();
}
