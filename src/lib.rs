//! folio downloads the page images of a book borrowed from the archive.org
//! lending library and stitches them into a single PDF.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use folio::{ArchiveClient, HttpClientConfig, Job, JobOptions, PdfAssembler, TerminalPrompt};
//! use folio::ARCHIVE_BASE_URL;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), folio::Error> {
//! let client = ArchiveClient::new(ARCHIVE_BASE_URL, HttpClientConfig::default())?;
//! let assembler = PdfAssembler::new();
//! let prompt = TerminalPrompt::new();
//!
//! let options = JobOptions {
//!     book_id: Some("mybook00auth".into()),
//!     ..JobOptions::default()
//! };
//! let report = Job::new(&client, &client, &assembler, &prompt).run(options).await?;
//! println!("{:?}", report.summary.failed_pages());
//! # Ok(())
//! # }
//! ```
//!
//! # Module Organization
//!
//! - [`pages`] - Turning the user's page selection into a [`PageRange`]
//! - [`download`] - The retrying fetcher and the sequential download loop
//! - [`output`] - Preparing the directory pages are written to
//! - [`prompt`] - Interactive input behind the [`PromptProvider`] trait
//! - [`service`] - Traits for the lending service, page source, assembler and credential store
//! - [`archive`] - The archive.org HTTP client
//! - [`assemble`] - PDF assembly of the downloaded pages
//! - [`config`] - Credentials and their persistence
//! - [`job`] - One complete run, wiring everything together
//! - [`http`] - HTTP client construction
//! - [`progress`] - Progress bar and progress lines
//! - [`error`] - Centralized error handling with the `Error` enum

pub mod archive;
pub mod assemble;
pub mod config;
pub mod download;
pub mod error;
pub mod http;
pub mod job;
pub mod output;
pub mod pages;
pub mod progress;
pub mod prompt;
pub mod service;

pub use archive::{ArchiveClient, ARCHIVE_BASE_URL};
pub use assemble::PdfAssembler;
pub use config::{CredentialFile, Credentials};
pub use download::{
    DownloadOrchestrator, DownloadOrchestratorBuilder, PageReport, PageStatus, RetryPolicy,
    RunSummary,
};
pub use error::{Error, Result};
pub use http::{create_http_client, HttpClientConfig};
pub use job::{Job, JobOptions, JobReport};
pub use output::OutputDirectory;
pub use pages::{PageRange, PageSelection};
pub use progress::ProgressBarOpts;
pub use prompt::{PromptProvider, ScriptedPrompt, TerminalPrompt};
pub use service::{Assembler, CredentialStore, LendingService, PageSource};
