//! One-shot `send` command.

use std::sync::Arc;

use anyhow::Result;

use ragchat_core::chat::controller::SendOutcome;

use crate::cli::chat::view::TerminalView;
use crate::state::AppState;

/// Run one exchange and print the reply.
///
/// `--json` prints the exchange as an object, `--quiet` prints the raw
/// reply text only.
pub async fn send_message(state: &AppState, text: &str, json: bool, quiet: bool) -> Result<()> {
    let styled = !json && !quiet;
    let mut view = TerminalView::new(Box::new(std::io::stdout()), false);
    if !console::user_attended_stderr() {
        view = view.without_spinner();
    }
    let view = Arc::new(view);
    let controller = if styled {
        state.controller().await?.with_view(view.clone())
    } else {
        state.controller().await?
    };

    if styled {
        view.set_position(controller.transcript().await.len());
        view.begin_wait();
    }
    let outcome = controller.send(text).await;
    view.end_wait();

    let exchange = match outcome? {
        SendOutcome::Completed(exchange) => exchange,
        SendOutcome::Ignored => anyhow::bail!("Message is empty"),
    };

    if json {
        let out = serde_json::json!({
            "session_id": exchange.session_id,
            "query": exchange.user.text,
            "answer": exchange.reply.text,
            "state": exchange.state.to_string(),
            "response_ms": exchange.response_ms,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else if quiet {
        println!("{}", exchange.reply.text);
    } else {
        println!();
        println!("{}", view.renderer().stats_footer(exchange.response_ms, exchange.state));
        println!();
    }
    Ok(())
}
