//! Per-page and per-run outcomes.
//!
//! A [`PageReport`] describes one page as soon as the loop is done with it;
//! the [`RunSummary`] accumulates the whole pass and is what the caller gets
//! back.
//!
//! # Examples
//!
//! ```rust
//! use folio::download::{percent_done, PageStatus};
//!
//! assert_eq!(percent_done(1, 3), 33);
//! assert_eq!(percent_done(3, 3), 100);
//! assert!(PageStatus::Success { size: 10 }.is_success());
//! ```

/// What happened to a single page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageStatus {
    /// The image was written to disk.
    Success {
        /// Bytes written.
        size: u64,
    },
    /// Every attempt failed, or the image could not be written.
    Fail(String),
}

impl PageStatus {
    /// Whether the page was written.
    pub fn is_success(&self) -> bool {
        matches!(self, PageStatus::Success { .. })
    }
}

/// Report for one page, delivered right after the page was handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageReport {
    /// One-based page number.
    page: u32,
    /// Pages attempted so far in this run, this one included.
    done: u32,
    /// Pages in the run.
    total: u32,
    /// `done` as a floored percentage of `total`.
    percent: u32,
    /// Status.
    status: PageStatus,
}

impl PageReport {
    /// Create a report for `page` once `done` of `total` pages were attempted.
    pub fn new(page: u32, done: u32, total: u32, status: PageStatus) -> Self {
        Self {
            page,
            done,
            total,
            percent: percent_done(done, total),
            status,
        }
    }

    /// Get the one-based page number.
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Get the number of pages attempted so far.
    pub fn done(&self) -> u32 {
        self.done
    }

    /// Get the number of pages in the run.
    pub fn total(&self) -> u32 {
        self.total
    }

    /// Get the floored completion percentage.
    pub fn percent(&self) -> u32 {
        self.percent
    }

    /// Get a reference to the page's status.
    pub fn status(&self) -> &PageStatus {
        &self.status
    }
}

/// Floored percentage of `done` out of `total`, using integer arithmetic.
pub fn percent_done(done: u32, total: u32) -> u32 {
    if total == 0 {
        return 100;
    }
    (u64::from(done) * 100 / u64::from(total)) as u32
}

/// Outcome of one download pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Pages written.
    completed: u32,
    /// Pages in the run.
    total: u32,
    /// One-based numbers of the pages given up on, in the order they failed.
    failed_pages: Vec<u32>,
    /// Bytes written across all pages.
    bytes_written: u64,
}

impl RunSummary {
    /// Create an empty summary for a run of `total` pages.
    pub fn new(total: u32) -> Self {
        Self {
            total,
            ..Self::default()
        }
    }

    pub(crate) fn record_success(&mut self, size: u64) {
        self.completed += 1;
        self.bytes_written += size;
    }

    pub(crate) fn record_failure(&mut self, page: u32) {
        self.failed_pages.push(page);
    }

    /// Get the number of pages written.
    pub fn completed(&self) -> u32 {
        self.completed
    }

    /// Get the number of pages in the run.
    pub fn total(&self) -> u32 {
        self.total
    }

    /// Get the pages given up on, in failure order.
    pub fn failed_pages(&self) -> &[u32] {
        &self.failed_pages
    }

    /// Get the number of bytes written.
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// Whether every page of the run was written.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failed_pages.is_empty() && self.completed == self.total
    }
}
