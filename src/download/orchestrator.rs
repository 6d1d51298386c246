//! The sequential page download loop.

use super::config::OrchestratorConfig;
use super::fetcher::{RetryPolicy, RetryingPageFetcher};
use super::summary::{PageReport, PageStatus, RunSummary};
use crate::error::Result;
use crate::output::page_path;
use crate::pages::PageRange;
use crate::progress::ProgressDisplay;
use crate::service::PageSource;

use std::fmt;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Walks a [`PageRange`] and writes every page it can get.
///
/// Pages are handled one at a time in increasing order. A page that cannot
/// be fetched after all retries is recorded and skipped; the pass always
/// covers the whole range.
#[derive(Clone)]
pub struct DownloadOrchestrator {
    config: OrchestratorConfig,
}

impl fmt::Debug for DownloadOrchestrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DownloadOrchestrator")
            .field("config", &self.config)
            .finish()
    }
}

impl DownloadOrchestrator {
    pub(crate) fn new(config: OrchestratorConfig) -> Self {
        Self { config }
    }

    /// Gets the directory pages are written to.
    pub fn directory(&self) -> &PathBuf {
        &self.config.directory
    }

    /// Gets the scale hint.
    pub fn scale(&self) -> u32 {
        self.config.scale
    }

    /// Gets the retry policy.
    pub fn retry_policy(&self) -> RetryPolicy {
        self.config.retry_policy
    }

    /// Download every page of `range` from `source`.
    pub async fn run<S: PageSource + ?Sized>(&self, source: &S, range: PageRange) -> RunSummary {
        let total = range.count();
        let mut display = ProgressDisplay::new(self.config.style.clone(), total);
        if let Some(ref sink) = self.config.on_line {
            display = display.with_sink(sink.clone());
        }
        let fetcher = RetryingPageFetcher::new(source, self.config.retry_policy);
        let mut summary = RunSummary::new(total);

        info!("Downloading {} into {:?}", range, self.config.directory);
        for index in range.indices() {
            let page = index + 1;
            let done = page - range.start();
            debug!("Downloading page {} (index {})", page, index);

            let status = match fetcher.fetch(index, self.config.scale, &display).await {
                Ok(bytes) => match self.write_page(page, &bytes).await {
                    Ok(size) => PageStatus::Success { size },
                    Err(e) => PageStatus::Fail(format!("could not write page {}: {}", page, e)),
                },
                Err(e) => PageStatus::Fail(e.to_string()),
            };

            let report = PageReport::new(page, done, total, status);
            match report.status() {
                PageStatus::Success { size } => {
                    summary.record_success(*size);
                    display.page_written(report.percent(), done, total);
                }
                PageStatus::Fail(reason) => {
                    debug!("Giving up on page {}: {}", page, reason);
                    summary.record_failure(page);
                    display.page_failed(page, done);
                }
            }

            if let Some(ref callback) = self.config.on_page {
                callback(&report);
            }
        }

        display.failure_report(summary.failed_pages());
        display.finish();
        info!(
            "Wrote {} of {} pages ({} bytes)",
            summary.completed(),
            summary.total(),
            summary.bytes_written()
        );
        summary
    }

    /// Write a page image so that `<page>.jpg` only ever appears complete.
    async fn write_page(&self, page: u32, bytes: &[u8]) -> Result<u64> {
        let target = page_path(&self.config.directory, page);
        let partial = target.with_extension("jpg.part");

        if let Err(e) = write_then_rename(&partial, &target, bytes).await {
            let _ = fs::remove_file(&partial).await;
            return Err(e);
        }
        Ok(bytes.len() as u64)
    }
}

async fn write_then_rename(partial: &Path, target: &Path, bytes: &[u8]) -> Result<()> {
    fs::write(partial, bytes).await?;
    fs::rename(partial, target).await?;
    Ok(())
}
