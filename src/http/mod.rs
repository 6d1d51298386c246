//! HTTP client construction.
//!
//! - [`client`] - HTTP client creation and middleware configuration
//!
//! # Examples
//!
//! ```rust
//! use folio::http::{create_http_client, HttpClientConfig};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = HttpClientConfig {
//!     retries: 5,
//!     ..HttpClientConfig::default()
//! };
//! let client = create_http_client(config)?;
//! # Ok(())
//! # }
//! ```

pub mod client;

pub use client::{create_http_client, HttpClientConfig, USER_AGENT};
