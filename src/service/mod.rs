//! Collaborator interfaces.
//!
//! The download pipeline reaches the outside world only through these
//! traits: the lending service that signs in, borrows the book and reports
//! its length, the page source that hands out images, the assembler that
//! stitches the result, and the store that remembers credentials.
//!
//! [`ArchiveClient`](crate::archive::ArchiveClient),
//! [`PdfAssembler`](crate::assemble::PdfAssembler) and
//! [`CredentialFile`](crate::config::CredentialFile) are the implementations
//! the binary wires together.

use crate::config::Credentials;
use crate::error::Result;

use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Session, loan and metadata calls that precede any page download.
#[async_trait]
pub trait LendingService: Send + Sync {
    /// Sign in. Rejected credentials are an
    /// [`Error::AuthenticationFailed`](crate::Error::AuthenticationFailed).
    async fn login(&self, credentials: &Credentials) -> Result<()>;

    /// Borrow the book so its pages become readable. Failure is an
    /// [`Error::LoanFailed`](crate::Error::LoanFailed).
    async fn reserve(&self, book_id: &str) -> Result<()>;

    /// Number of pages in the book.
    async fn page_count(&self, book_id: &str) -> Result<u32>;
}

/// Hands out the image of a single page.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetch the image of the page at zero-based `index`. A non-zero `scale`
    /// asks for a smaller rendition.
    async fn page_image(&self, index: u32, scale: u32) -> Result<Vec<u8>>;
}

/// Combines the downloaded pages into one document.
#[async_trait]
pub trait Assembler: Send + Sync {
    /// Assemble the pages found in `pages_dir`. Returns the path of the
    /// artifact, or `None` when there was nothing to assemble.
    async fn assemble(&self, pages_dir: &Path, book_id: &str) -> Result<Option<PathBuf>>;
}

/// Somewhere to keep credentials between runs.
pub trait CredentialStore: Send + Sync {
    /// The stored credentials, if any.
    fn load(&self) -> Result<Option<Credentials>>;

    /// Whether credentials are already stored.
    fn exists(&self) -> bool;

    /// Replace the stored credentials.
    fn save(&self, credentials: &Credentials) -> Result<()>;
}
