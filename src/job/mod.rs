//! One complete run: from a book identifier to an assembled document.
//!
//! A [`Job`] holds the collaborators; [`Job::run`] walks the steps in order:
//!
//! 1. resolve the book identifier and credentials
//! 2. sign in and borrow the book
//! 3. prepare the output directory
//! 4. look up the page count and resolve the page range
//! 5. download the pages
//! 6. assemble whatever was downloaded
//! 7. offer to store the credentials
//!
//! Any failure before step 5 ends the run. Pages that cannot be downloaded
//! do not: they are listed in the returned [`RunSummary`] and assembly runs
//! anyway.

use crate::config::{offer_to_store, resolve_credentials, Credentials};
use crate::download::{DownloadOrchestratorBuilder, RunSummary};
use crate::error::Result;
use crate::output::{self, default_output_dir};
use crate::pages::{resolve_range, PageRange, PageSelection};
use crate::progress::ProgressBarOpts;
use crate::prompt::PromptProvider;
use crate::service::{Assembler, CredentialStore, LendingService, PageSource};

use std::path::PathBuf;
use tracing::{debug, info};

/// What the user asked for.
#[derive(Debug, Clone, Default)]
pub struct JobOptions {
    /// Book identifier, asked for when missing.
    pub book_id: Option<String>,
    /// Account email given on the command line.
    pub email: Option<String>,
    /// Account password given on the command line.
    pub password: Option<String>,
    /// Credentials remembered from an earlier run.
    pub stored_credentials: Option<Credentials>,
    /// Which pages to download.
    pub selection: PageSelection,
    /// Output directory, `./<book id>` when missing.
    pub output_dir: Option<PathBuf>,
    /// Scale hint, `0` for full resolution.
    pub scale: u32,
    /// Progress bar options.
    pub style: ProgressBarOpts,
}

/// Outcome of a [`Job`].
#[derive(Debug, Clone)]
pub struct JobReport {
    /// Book that was downloaded.
    pub book_id: String,
    /// Directory holding the page files.
    pub output_dir: PathBuf,
    /// Pages that were requested.
    pub range: PageRange,
    /// Outcome of the download pass.
    pub summary: RunSummary,
    /// Assembled document, if anything was assembled.
    pub artifact: Option<PathBuf>,
    /// Whether the credentials were stored.
    pub credentials_saved: bool,
}

/// The collaborators of a run.
pub struct Job<'a> {
    service: &'a dyn LendingService,
    pages: &'a dyn PageSource,
    assembler: &'a dyn Assembler,
    prompt: &'a dyn PromptProvider,
    store: Option<&'a dyn CredentialStore>,
}

impl<'a> Job<'a> {
    /// Create a job. Credentials are not offered for storage unless a store
    /// is set with [`Job::credential_store`].
    pub fn new(
        service: &'a dyn LendingService,
        pages: &'a dyn PageSource,
        assembler: &'a dyn Assembler,
        prompt: &'a dyn PromptProvider,
    ) -> Self {
        Self {
            service,
            pages,
            assembler,
            prompt,
            store: None,
        }
    }

    /// Offer to keep the credentials in `store` at the end of the run.
    pub fn credential_store(mut self, store: &'a dyn CredentialStore) -> Self {
        self.store = Some(store);
        self
    }

    /// Run every step.
    pub async fn run(&self, options: JobOptions) -> Result<JobReport> {
        let book_id = match options.book_id.filter(|id| !id.trim().is_empty()) {
            Some(id) => id.trim().to_string(),
            None => {
                self.prompt.message(
                    "Look for the book's identifier (the part of the url immediately after \
                     \"https://archive.org/details/\").",
                );
                self.prompt.input("Enter it here", false)?.trim().to_string()
            }
        };
        debug!("Received book ID: {}", book_id);

        let credentials = resolve_credentials(
            options.email,
            options.password,
            options.stored_credentials.as_ref(),
            self.prompt,
        )?;

        debug!("Attempting login with user-supplied credentials");
        self.service.login(&credentials).await?;
        debug!("Attempting to borrow {}", book_id);
        self.service.reserve(&book_id).await?;

        let requested_dir = options
            .output_dir
            .unwrap_or_else(|| default_output_dir(&book_id));
        let output_dir = output::prepare(&requested_dir, self.prompt).await?;

        let page_count = self.service.page_count(&book_id).await?;
        let range = resolve_range(page_count, &options.selection, self.prompt)?;
        info!("Planning on fetching {} of {}", range, page_count);

        let orchestrator = DownloadOrchestratorBuilder::new()
            .directory(output_dir.path().to_path_buf())
            .scale(options.scale)
            .style(options.style)
            .build();
        let summary = orchestrator.run(self.pages, range).await;

        let artifact = self.assembler.assemble(output_dir.path(), &book_id).await?;
        if let Some(ref path) = artifact {
            self.prompt
                .message(&format!("Saved {}", path.display()));
        }

        let credentials_saved = match self.store {
            Some(store) => offer_to_store(store, &credentials, self.prompt)?,
            None => false,
        };

        self.prompt.message("done");
        Ok(JobReport {
            book_id,
            output_dir: output_dir.path().to_path_buf(),
            range,
            summary,
            artifact,
            credentials_saved,
        })
    }
}
