//! Builder for [`DownloadOrchestrator`].
//!
//! ```rust
//! use folio::download::DownloadOrchestratorBuilder;
//! use std::path::PathBuf;
//!
//! let orchestrator = DownloadOrchestratorBuilder::new()
//!     .directory(PathBuf::from("./mybook"))
//!     .scale(2)
//!     .on_page(|report| println!("page {} -> {:?}", report.page(), report.status()))
//!     .build();
//! assert_eq!(orchestrator.scale(), 2);
//! ```

use super::config::OrchestratorConfig;
use super::fetcher::RetryPolicy;
use super::orchestrator::DownloadOrchestrator;
use super::summary::PageReport;
use crate::progress::ProgressBarOpts;

use std::{path::PathBuf, sync::Arc};

/// A builder used to create a [`DownloadOrchestrator`].
#[derive(Default)]
pub struct DownloadOrchestratorBuilder {
    config: OrchestratorConfig,
}

impl DownloadOrchestratorBuilder {
    /// Creates a builder with the default options.
    pub fn new() -> Self {
        DownloadOrchestratorBuilder::default()
    }

    /// Convenience function to hide the progress bar and lines.
    pub fn hidden() -> Self {
        DownloadOrchestratorBuilder::default().style(ProgressBarOpts::hidden())
    }

    /// Sets the directory the pages are written to.
    pub fn directory(mut self, directory: PathBuf) -> Self {
        self.config.directory = directory;
        self
    }

    /// Set the scale hint sent with every page request.
    pub fn scale(mut self, scale: u32) -> Self {
        self.config.scale = scale;
        self
    }

    /// Set the number of attempts per page.
    pub fn attempts(mut self, max_attempts: u32) -> Self {
        self.config.retry_policy.max_attempts = max_attempts;
        self
    }

    /// Set the whole retry policy.
    pub fn retry_policy(mut self, retry_policy: RetryPolicy) -> Self {
        self.config.retry_policy = retry_policy;
        self
    }

    /// Set the progress bar options.
    pub fn style(mut self, style: ProgressBarOpts) -> Self {
        self.config.style = style;
        self
    }

    /// Set callback for when each page is handled.
    ///
    /// The callback runs after the page is written or given up on, before
    /// the next page is requested.
    pub fn on_page<F>(mut self, callback: F) -> Self
    where
        F: Fn(&PageReport) + Send + Sync + 'static,
    {
        self.config.on_page = Some(Arc::new(Box::new(callback)));
        self
    }

    /// Send the progress lines to `sink` instead of the terminal.
    pub fn on_line<F>(mut self, sink: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.config.on_line = Some(Arc::new(Box::new(sink)));
        self
    }

    /// Create the [`DownloadOrchestrator`] with the specified options.
    pub fn build(self) -> DownloadOrchestrator {
        DownloadOrchestrator::new(self.config)
    }
}
