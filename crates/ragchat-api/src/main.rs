//! ragchat entry point.
//!
//! Binary name: `ragchat`
//!
//! Parses CLI arguments and answers `completions` directly. Every other
//! command sets up tracing, opens the local store, then dispatches to the
//! command handler.

mod cli;
mod state;

use clap::Parser;

use ragchat_observe::tracing_setup::{init_tracing, shutdown_tracing, verbosity_filter};

use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Shell completions need neither tracing nor app state
    if let Commands::Completions { shell } = &cli.command {
        cli::write_completions(*shell, &mut std::io::stdout());
        return Ok(());
    }

    init_tracing(verbosity_filter(cli.verbose, cli.quiet), cli.otel)
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))?;

    let result = run(cli).await;
    shutdown_tracing();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let state = AppState::init(&cli.profile, cli.base_url.as_deref()).await?;

    match cli.command {
        Commands::Chat => cli::chat::loop_runner::run_chat_loop(&state).await,
        Commands::Send { text } => {
            cli::send::send_message(&state, &text.join(" "), cli.json, cli.quiet).await
        }
        Commands::History { limit } => cli::history::show_history(&state, limit, cli.json).await,
        Commands::Reset { force } => cli::session::reset_session(&state, force, cli.json).await,
        Commands::Session => cli::session::show_session(&state, cli.json).await,
        Commands::Export { format, output } => {
            cli::export::export_transcript(&state, format, output.as_deref()).await
        }
        Commands::Completions { .. } => unreachable!("handled above"),
    }
}
