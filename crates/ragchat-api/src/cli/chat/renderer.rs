//! Terminal markdown rendering with syntax-highlighted code blocks.
//!
//! Bot replies are raw markdown. `ChatRenderer` renders prose through
//! `termimad` and fenced code through `syntect`.

use std::fmt::Write as _;

use syntect::easy::HighlightLines;
use syntect::highlighting::{Style, ThemeSet};
use syntect::parsing::SyntaxSet;
use syntect::util::as_24_bit_terminal_escaped;
use termimad::crossterm::style::Color;
use termimad::MadSkin;

use ragchat_core::chat::exchange::ExchangeState;

/// Terminal markdown renderer with syntax highlighting.
pub struct ChatRenderer {
    skin: MadSkin,
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
}

impl Default for ChatRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatRenderer {
    pub fn new() -> Self {
        let mut skin = MadSkin::default_dark();
        skin.bold.set_fg(Color::Cyan);
        skin.headers[0].set_fg(Color::Cyan);
        skin.headers[1].set_fg(Color::Cyan);
        skin.inline_code.set_fg(Color::Yellow);

        Self {
            skin,
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
        }
    }

    /// Render a complete markdown reply.
    ///
    /// Code fences are highlighted via syntect; everything else goes
    /// through termimad. An unclosed fence is highlighted up to the end.
    pub fn render_final(&self, markdown: &str) -> String {
        let mut output = String::new();
        let mut in_code_block = false;
        let mut code_lang = String::new();
        let mut code_buf = String::new();

        for line in markdown.lines() {
            let is_fence = line.trim_start().starts_with("```");
            if is_fence && !in_code_block {
                in_code_block = true;
                code_lang = line.trim().trim_start_matches('`').trim().to_string();
                code_buf.clear();
            } else if is_fence {
                in_code_block = false;
                output.push_str(&self.highlight_code(&code_buf, &code_lang));
            } else if in_code_block {
                code_buf.push_str(line);
                code_buf.push('\n');
            } else {
                let _ = write!(output, "{}", self.skin.term_text(line));
            }
        }

        if in_code_block && !code_buf.is_empty() {
            output.push_str(&self.highlight_code(&code_buf, &code_lang));
        }

        output
    }

    /// Footer printed under a reply: `| 1.2s · resolved`.
    pub fn stats_footer(&self, response_ms: u64, state: ExchangeState) -> String {
        let seconds = response_ms as f64 / 1000.0;
        let state = match state {
            ExchangeState::Failed => console::style(state.to_string()).red(),
            _ => console::style(state.to_string()).dim(),
        };
        format!(
            "  {} {} {} {}",
            console::style("|").dim(),
            console::style(format!("{seconds:.1}s")).dim(),
            console::style("\u{00b7}").dim(),
            state,
        )
    }

    fn highlight_code(&self, code: &str, lang: &str) -> String {
        let syntax = if lang.is_empty() {
            self.syntax_set.find_syntax_plain_text()
        } else {
            self.syntax_set
                .find_syntax_by_token(lang)
                .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text())
        };

        let mut output = format!("  {}\n", console::style(format!("--- {lang} ---")).dim());

        let Some(theme) = self.theme_set.themes.get("base16-ocean.dark") else {
            for line in code.lines() {
                let _ = writeln!(output, "  {line}");
            }
            return output;
        };

        let mut h = HighlightLines::new(syntax, theme);
        for line in code.lines() {
            let ranges: Vec<(Style, &str)> = h
                .highlight_line(line, &self.syntax_set)
                .unwrap_or_default();
            let escaped = as_24_bit_terminal_escaped(&ranges[..], false);
            let _ = writeln!(output, "  {escaped}\x1b[0m");
        }

        output
    }
}
