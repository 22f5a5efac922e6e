//! Parsing of package-manager preview output and target naming.
//!
//! Preview output is not a stable interface of the package manager, so the
//! parsers only pick out lines they recognize and ignore everything else.

use std::fmt;

/// Marker for a package the preview would install or upgrade.
pub const INSTALL_MARKER: &str = "Inst";

/// Marker for a package the preview would remove.
pub const REMOVE_MARKER: &str = "Remv";

/// Suffix that turns an install target into a removal request.
pub const REMOVAL_SUFFIX: char = '-';

/// Target that asks the package manager to remove `package`.
#[must_use]
pub fn removal_target(package: &str) -> String {
    format!("{package}{REMOVAL_SUFFIX}")
}

/// Second whitespace-separated field of every line whose first field is `marker`.
fn marked_packages(output: &str, marker: &str) -> Vec<String> {
    output
        .lines()
        .filter_map(|line| {
            let mut fields = line.split_whitespace();
            (fields.next()? == marker)
                .then(|| fields.next())
                .flatten()
                .map(str::to_string)
        })
        .collect()
}

/// Packages the preview reports as newly installed or upgraded.
#[must_use]
pub fn parse_dry_run_installs(output: &str) -> Vec<String> {
    marked_packages(output, INSTALL_MARKER)
}

/// Packages the preview reports as removed.
#[must_use]
pub fn parse_dry_run_removals(output: &str) -> Vec<String> {
    marked_packages(output, REMOVE_MARKER)
}

/// Human-readable summary of an effective preview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DryRunSummary {
    pub installs: Vec<String>,
    pub removals: Vec<String>,
    /// The package manager's own totals line, e.g.
    /// `1 upgraded, 2 newly installed, 0 to remove and 3 not upgraded.`
    pub totals: Option<String>,
}

impl DryRunSummary {
    /// Summarize preview output. `None` means the preview reports no change.
    #[must_use]
    pub fn from_output(output: &str) -> Option<Self> {
        let installs = parse_dry_run_installs(output);
        let removals = parse_dry_run_removals(output);
        if installs.is_empty() && removals.is_empty() {
            return None;
        }
        let totals = output
            .lines()
            .map(str::trim)
            .find(|l| l.contains(" newly installed, "))
            .map(str::to_string);
        Some(Self {
            installs,
            removals,
            totals,
        })
    }
}

impl fmt::Display for DryRunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut sections = Vec::new();
        if !self.installs.is_empty() {
            sections.push(format!(
                "Install ({}): {}",
                self.installs.len(),
                self.installs.join(", ")
            ));
        }
        if !self.removals.is_empty() {
            sections.push(format!(
                "Remove ({}): {}",
                self.removals.len(),
                self.removals.join(", ")
            ));
        }
        if let Some(totals) = &self.totals {
            sections.push(totals.clone());
        }
        f.write_str(&sections.join("\n"))
    }
}
