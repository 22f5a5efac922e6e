//! Spinner shown while a pipeline step runs.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"];
const RUNNING: &str = "  {spinner:.cyan} {msg}";
const DONE: &str = "  {prefix:.green} {msg}";

fn style(template: &str) -> ProgressStyle {
    ProgressStyle::default_spinner()
        .template(template)
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

/// Start a ticking spinner labelled `msg`.
#[must_use]
pub fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(style(RUNNING).tick_strings(TICKS));
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

/// Replace the spinner line with `✓ msg`.
pub fn finish_ok(pb: &ProgressBar, msg: &str) {
    pb.set_style(style(DONE));
    pb.set_prefix("✓");
    pb.finish_with_message(msg.to_string());
}
