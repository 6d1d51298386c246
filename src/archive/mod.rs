//! archive.org lending library client.
//!
//! - [`client`] - [`ArchiveClient`], the HTTP implementation of
//!   [`LendingService`](crate::service::LendingService) and
//!   [`PageSource`](crate::service::PageSource)
//! - [`metadata`] - the JSON documents the service replies with

pub mod client;
pub mod metadata;

pub use client::{ArchiveClient, ARCHIVE_BASE_URL};
