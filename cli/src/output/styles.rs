//! Terminal palette.

use owo_colors::Style;

/// One style per kind of output. Every field is plain unless colors are on.
#[derive(Default, Clone)]
pub struct Styles {
    pub success: Style,
    pub warning: Style,
    /// Progress arrows and informational notes.
    pub note: Style,
    pub dim: Style,
    pub bundle: Style,
    pub header: Style,
    /// Preview lines listing packages to install.
    pub install: Style,
    /// Preview lines listing packages to remove.
    pub remove: Style,
}

impl Styles {
    /// Palette for a color terminal, or all-plain when `enabled` is false.
    #[must_use]
    pub fn for_terminal(enabled: bool) -> Self {
        if !enabled {
            return Self::default();
        }
        Self {
            success: Style::new().green(),
            warning: Style::new().yellow(),
            note: Style::new().blue(),
            dim: Style::new().dimmed(),
            bundle: Style::new().bold().cyan(),
            header: Style::new().bold(),
            install: Style::new().green(),
            remove: Style::new().red(),
        }
    }

    /// Style for one line of a package-change preview.
    #[must_use]
    pub fn preview_line(&self, line: &str) -> Style {
        if line.starts_with("Install") {
            self.install
        } else if line.starts_with("Remove") {
            self.remove
        } else {
            self.dim
        }
    }
}
