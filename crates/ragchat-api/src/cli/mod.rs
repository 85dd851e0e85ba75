//! CLI command definitions for the `ragchat` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod chat;
pub mod export;
pub mod history;
pub mod send;
pub mod session;

use std::io::Write;
use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};

/// Chat with a retrieval-augmented assistant from the terminal.
#[derive(Parser)]
#[command(name = "ragchat", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Local profile; each profile keeps its own session and transcript.
    #[arg(long, global = true, default_value = "default")]
    pub profile: String,

    /// Chat service base URL (overrides RAGCHAT_BASE_URL and config.toml).
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Export tracing spans to stdout via OpenTelemetry.
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start an interactive chat session.
    Chat,

    /// Send a single message and print the reply.
    Send {
        /// Message text (multiple words are joined with spaces).
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// Show the conversation transcript.
    #[command(alias = "log")]
    History {
        /// Only show the last N messages.
        #[arg(long, short = 'n')]
        limit: Option<usize>,
    },

    /// End the current session: notify the service, start a fresh one.
    #[command(alias = "end")]
    Reset {
        /// Skip the confirmation prompt.
        #[arg(long, short)]
        force: bool,
    },

    /// Show the active session.
    Session,

    /// Export the transcript.
    Export {
        /// Output format.
        #[arg(long, value_enum, default_value_t = ExportFormat::Markdown)]
        format: ExportFormat,

        /// Write to a file instead of stdout.
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Markdown,
    Json,
}

/// Write the completion script for `shell`.
pub fn write_completions(shell: Shell, out: &mut impl Write) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "ragchat", out);
}
