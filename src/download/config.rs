//! Configuration for the download orchestrator.

use super::fetcher::RetryPolicy;
use super::summary::PageReport;
use crate::progress::{LineSink, ProgressBarOpts};

use std::env::current_dir;
use std::path::PathBuf;
use std::sync::Arc;

/// Callback invoked after each page.
pub type PageCallback = Box<dyn Fn(&PageReport) + Send + Sync>;

/// Configuration structure for the orchestrator.
#[derive(Clone)]
pub struct OrchestratorConfig {
    /// Directory the page files are written to.
    pub directory: PathBuf,
    /// Scale hint passed with every page request.
    pub scale: u32,
    /// Retry policy per page.
    pub retry_policy: RetryPolicy,
    /// Progress bar options.
    pub style: ProgressBarOpts,
    /// Callback for when each page is handled.
    pub on_page: Option<Arc<PageCallback>>,
    /// Where progress lines go instead of the terminal.
    pub on_line: Option<Arc<LineSink>>,
}

impl std::fmt::Debug for OrchestratorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrchestratorConfig")
            .field("directory", &self.directory)
            .field("scale", &self.scale)
            .field("retry_policy", &self.retry_policy)
            .field("style", &self.style)
            .field("on_page", &self.on_page.is_some())
            .field("on_line", &self.on_line.is_some())
            .finish()
    }
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            directory: current_dir().unwrap_or_default(),
            scale: 0,
            retry_policy: RetryPolicy::default(),
            style: ProgressBarOpts::default(),
            on_page: None,
            on_line: None,
        }
    }
}
