//! Terminal implementation of the transcript observer.
//!
//! The controller hands over the whole transcript after every change;
//! `TerminalView` prints only the messages it has not shown yet, so the
//! newest message always ends up at the bottom of the terminal.

use std::io::Write;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use ragchat_core::chat::view::TranscriptView;
use ragchat_types::message::{Message, Sender};

use super::renderer::ChatRenderer;

struct ViewState {
    out: Box<dyn Write + Send>,
    shown: usize,
    spinner: Option<ProgressBar>,
}

/// Prints transcript changes to a terminal writer.
pub struct TerminalView {
    renderer: ChatRenderer,
    state: Mutex<ViewState>,
    echo_user: bool,
    spinner_enabled: bool,
}

impl TerminalView {
    /// `echo_user`: print user messages as they are appended. Off when a
    /// line editor has already echoed the input.
    pub fn new(out: Box<dyn Write + Send>, echo_user: bool) -> Self {
        Self {
            renderer: ChatRenderer::new(),
            state: Mutex::new(ViewState {
                out,
                shown: 0,
                spinner: None,
            }),
            echo_user,
            spinner_enabled: true,
        }
    }

    pub fn without_spinner(mut self) -> Self {
        self.spinner_enabled = false;
        self
    }

    pub fn renderer(&self) -> &ChatRenderer {
        &self.renderer
    }

    /// Redirect output, e.g. to a readline `SharedWriter`.
    pub fn set_writer(&self, out: Box<dyn Write + Send>) {
        self.lock().out = out;
    }

    /// Print the full transcript, user messages included.
    pub fn replay(&self, transcript: &[Message]) {
        let mut state = self.lock();
        for message in transcript {
            self.print_message(&mut state.out, message);
        }
        state.shown = transcript.len();
    }

    /// Print a line outside the transcript (notices, footers).
    pub fn notice(&self, line: &str) {
        let mut state = self.lock();
        let _ = writeln!(state.out, "{line}");
    }

    /// Show the waiting spinner until the next bot message arrives.
    pub fn begin_wait(&self) {
        if !self.spinner_enabled {
            return;
        }
        let spinner = ProgressBar::new_spinner();
        if let Ok(spinner_style) =
            ProgressStyle::default_spinner().template("  {spinner:.cyan} {msg}")
        {
            spinner.set_style(spinner_style);
        }
        spinner.set_message("thinking...");
        spinner.enable_steady_tick(Duration::from_millis(80));
        self.lock().spinner = Some(spinner);
    }

    pub fn end_wait(&self) {
        if let Some(spinner) = self.lock().spinner.take() {
            spinner.finish_and_clear();
        }
    }

    /// Treat the first `shown` messages as already on screen.
    pub fn set_position(&self, shown: usize) {
        self.lock().shown = shown;
    }

    fn lock(&self) -> MutexGuard<'_, ViewState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn print_message(&self, out: &mut Box<dyn Write + Send>, message: &Message) {
        let _ = match message.sender {
            Sender::User => writeln!(out, "  {} {}", style("You >").green().bold(), message.text),
            Sender::Bot => writeln!(
                out,
                "\n  {}\n{}",
                style("Bot").cyan().bold(),
                self.renderer.render_final(&message.text).trim_end()
            ),
        };
    }
}

impl TranscriptView for TerminalView {
    fn transcript_changed(&self, transcript: &[Message]) {
        let mut state = self.lock();

        // A shorter transcript means it was cleared.
        if transcript.len() < state.shown {
            state.shown = 0;
        }

        let start = state.shown;
        for message in &transcript[start..] {
            if message.is_user() && !self.echo_user {
                continue;
            }
            if message.is_bot() {
                if let Some(spinner) = state.spinner.take() {
                    spinner.finish_and_clear();
                }
            }
            self.print_message(&mut state.out, message);
        }
        state.shown = transcript.len();
        let _ = state.out.flush();
    }
}
