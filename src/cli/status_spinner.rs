use console::style;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

use std::time::Duration;

/// Spinner shown on stderr while a request is in flight
pub struct StatusSpinner<'a> {
    multi: &'a MultiProgress,
    bar: ProgressBar,
}

impl<'a> StatusSpinner<'a> {
    pub fn new(loading: &str, multi: &'a MultiProgress) -> Self {
        let bar = multi.add(ProgressBar::new_spinner());
        bar.enable_steady_tick(Duration::from_millis(100));
        bar.set_message(style(loading).yellow().bright().to_string());
        Self { bar, multi }
    }

    /// Replace the spinner with a check mark or cross and a final message
    pub fn finish(&self, message: &str, success: bool) {
        if let Ok(template) = ProgressStyle::default_spinner().template("{prefix} {msg}") {
            self.bar.set_style(template);
        }

        let (mark, message) = if success {
            (style("✓").green(), style(message).green())
        } else {
            (style("✕").red(), style(message).red())
        };
        self.bar.set_prefix(mark.bold().to_string());
        self.bar.finish_with_message(message.bright().to_string());

        self.multi.remove(&self.bar);
    }

    pub fn fail(&self, message: &str) {
        self.finish(message, false);
    }
}
