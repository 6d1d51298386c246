//! Page download pipeline.
//!
//! - [`fetcher`] - bounded retry around a single page request
//! - [`orchestrator`] - the sequential loop over a page range
//! - [`builder`] - configuration of the orchestrator
//! - [`summary`] - per-page reports and the run summary
//!
//! # Examples
//!
//! ```rust,no_run
//! use folio::download::DownloadOrchestratorBuilder;
//! use folio::pages::PageRange;
//! use folio::service::PageSource;
//! use std::path::PathBuf;
//!
//! # async fn example(source: &dyn PageSource) -> folio::Result<()> {
//! let orchestrator = DownloadOrchestratorBuilder::new()
//!     .directory(PathBuf::from("./mybook"))
//!     .build();
//! let summary = orchestrator.run(source, PageRange::all(40)?).await;
//! println!("{} of {} pages written", summary.completed(), summary.total());
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod config;
pub mod fetcher;
pub mod orchestrator;
pub mod summary;

pub use builder::DownloadOrchestratorBuilder;
pub use config::{OrchestratorConfig, PageCallback};
pub use fetcher::{RetryPolicy, RetryingPageFetcher};
pub use orchestrator::DownloadOrchestrator;
pub use summary::{percent_done, PageReport, PageStatus, RunSummary};
