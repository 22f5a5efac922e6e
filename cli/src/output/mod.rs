//! Terminal presentation: styles, spinner, reporter, and the consent prompt.

pub mod progress;
pub mod prompt;
pub mod reporter;
pub mod styles;

use console::Term;
use owo_colors::{OwoColorize as _, Style};
pub use prompt::DialoguerConfirmer;
pub use reporter::TerminalReporter;
pub use styles::Styles;

/// Styling and terminal state for one invocation.
pub struct OutputContext {
    pub styles: Styles,
    /// Whether stdout is a terminal.
    pub is_tty: bool,
    /// Suppress everything except errors and the change preview.
    pub quiet: bool,
}

impl OutputContext {
    /// Colors are used only on a terminal, and never with `--no-color` or
    /// `NO_COLOR` set.
    #[must_use]
    pub fn new(no_color: bool, quiet: bool) -> Self {
        let is_tty = Term::stdout().is_term();
        let colors = is_tty && !no_color && std::env::var_os("NO_COLOR").is_none();
        Self {
            styles: Styles::for_terminal(colors),
            is_tty,
            quiet,
        }
    }

    /// Spinners need a terminal and a non-quiet run.
    #[must_use]
    pub fn show_progress(&self) -> bool {
        self.is_tty && !self.quiet
    }

    pub fn success(&self, msg: &str) {
        self.line("✓", self.styles.success, msg);
    }

    pub fn warn(&self, msg: &str) {
        self.line("⚠", self.styles.warning, msg);
    }

    pub fn info(&self, msg: &str) {
        self.line("ℹ", self.styles.note, msg);
    }

    /// Indented `symbol msg` on stdout unless quiet.
    fn line(&self, symbol: &str, style: Style, msg: &str) {
        if !self.quiet {
            println!("  {} {msg}", symbol.style(style));
        }
    }
}
