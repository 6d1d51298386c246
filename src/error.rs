//! Error handling for folio.
//!
//! This module provides centralized error handling for every stage of a run:
//! the session and loan handshake, output preparation, page retrieval and
//! assembly. Errors that end the run early are distinct variants so callers
//! can report them precisely; page-level failures are contained by the
//! download loop and only surface in the [`RunSummary`](crate::RunSummary).

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can happen when using folio.
#[derive(Error, Debug)]
pub enum Error {
    /// Error from an underlying system.
    ///
    /// Captures internal failures that don't fit into other categories, such
    /// as a blocking task that panicked.
    #[error("Internal error: {0}")]
    Internal(String),

    /// A URL could not be parsed or built.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// I/O Error.
    ///
    /// Wraps standard I/O errors raised while creating the output directory,
    /// writing pages or reading them back for assembly.
    #[error("I/O error")]
    IOError {
        #[from]
        source: io::Error,
    },

    /// Error from the Reqwest library.
    #[error("Reqwest Error")]
    Reqwest {
        #[from]
        source: reqwest::Error,
    },

    /// Error raised by the HTTP middleware stack.
    #[error("HTTP middleware error")]
    Middleware {
        #[from]
        source: reqwest_middleware::Error,
    },

    /// Malformed JSON, from the remote service or the credential file.
    #[error("JSON error")]
    Json {
        #[from]
        source: serde_json::Error,
    },

    /// A page image could not be decoded or re-encoded.
    #[error("Image error")]
    Image {
        #[from]
        source: image::ImageError,
    },

    /// The remote service rejected the supplied credentials.
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The book could not be borrowed, so its pages are not readable.
    #[error("Loan failed: {0}")]
    LoanFailed(String),

    /// The book metadata was missing or unusable.
    #[error("Metadata error: {0}")]
    Metadata(String),

    /// The user chose not to write into an existing output directory.
    #[error("Output folder {} already exists and was not reused", .0.display())]
    UserDeclinedOverwrite(PathBuf),

    /// The output path exists but is not a directory.
    #[error("{} exists and is not a directory", .0.display())]
    NotADirectory(PathBuf),

    /// The requested pages do not overlap the book.
    #[error("Invalid page range {start}-{end} for a book of {page_count} pages")]
    InvalidRange {
        /// One-based first page that was asked for.
        start: u32,
        /// Last page that was asked for.
        end: u32,
        /// Number of pages in the book.
        page_count: u32,
    },

    /// Every attempt to fetch a page failed.
    #[error("Page {page} unavailable after {attempts} attempts: {reason}")]
    PageUnavailable {
        /// One-based display number of the page.
        page: u32,
        /// Number of attempts made.
        attempts: u32,
        /// Message of the last failure.
        reason: String,
    },

    /// Interactive input could not be read.
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// The page images could not be combined.
    #[error("Assembly error: {0}")]
    Assembly(String),
}

impl From<dialoguer::Error> for Error {
    fn from(err: dialoguer::Error) -> Self {
        Error::Prompt(err.to_string())
    }
}

/// Result type alias for operations that can fail with a folio [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
