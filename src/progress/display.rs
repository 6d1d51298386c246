//! Progress bar and progress line output.

use crate::progress::ProgressBarOpts;

use console::Style;
use indicatif::ProgressBar;
use std::sync::Arc;

/// Receives every progress line as plain text.
pub type LineSink = Box<dyn Fn(&str) + Send + Sync>;

/// Reports the download loop's progress to the user.
///
/// Text lines go through the bar while it is drawn so they do not tear it;
/// when the terminal cannot draw a bar (output redirected) they are printed
/// directly. A display built from [`ProgressBarOpts::hidden`] prints nothing.
///
/// With a sink set, lines go to the sink instead of the terminal, whether or
/// not the bar is shown.
pub struct ProgressDisplay {
    bar: ProgressBar,
    opts: ProgressBarOpts,
    sink: Option<Arc<LineSink>>,
}

impl ProgressDisplay {
    /// Create a display for a run of `total_pages` pages.
    pub fn new(opts: ProgressBarOpts, total_pages: u32) -> Self {
        let bar = opts.clone().to_progress_bar(u64::from(total_pages));
        if opts.enabled {
            bar.tick();
        }
        Self {
            bar,
            opts,
            sink: None,
        }
    }

    /// Send the lines to `sink` rather than the terminal.
    pub fn with_sink(mut self, sink: Arc<LineSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Announce that `page` is being retried.
    pub fn retry_notice(&self, page: u32, attempt: u32, max_attempts: u32) {
        self.line(
            &format!(
                "Failed to download page {}, retrying (attempt {} of {})...",
                page, attempt, max_attempts
            ),
            None,
        );
    }

    /// Report a written page: `done` of `total` pages attempted.
    pub fn page_written(&self, percent: u32, done: u32, total: u32) {
        self.bar.set_position(u64::from(done));
        self.line(&format!("{}% ({}/{}) done", percent, done, total), None);
    }

    /// Report a page given up on.
    pub fn page_failed(&self, page: u32, done: u32) {
        self.bar.set_position(u64::from(done));
        self.line(
            &format!("Failed to download page {}", page),
            Some(Style::new().red()),
        );
    }

    /// List every page that could not be downloaded, in failure order.
    pub fn failure_report(&self, failed_pages: &[u32]) {
        if failed_pages.is_empty() {
            return;
        }
        self.line(
            "Failed to download the following pages:",
            Some(Style::new().red().bold()),
        );
        self.line(&format!("{:?}", failed_pages), None);
    }

    /// Finish the bar, clearing it if configured to.
    pub fn finish(self) {
        if !self.opts.enabled {
            return;
        }
        if self.opts.clear {
            self.bar.finish_and_clear();
        } else {
            self.bar.finish();
        }
    }

    fn line(&self, text: &str, emphasis: Option<Style>) {
        if let Some(ref sink) = self.sink {
            sink(text);
            return;
        }
        if !self.opts.enabled {
            return;
        }
        let text = match emphasis {
            Some(style) => style.apply_to(text).to_string(),
            None => text.to_string(),
        };
        if self.bar.is_hidden() {
            println!("{}", text);
        } else {
            self.bar.println(text);
        }
    }
}
