//! Progress reporting for the download loop.
//!
//! The loop reports through a [`ProgressDisplay`]: a page counter bar drawn
//! with indicatif plus the plain text lines a user reads after the fact
//! (percentage per page, retry notices, the list of failed pages).
//!
//! # Examples
//!
//! ```rust
//! use folio::progress::{ProgressBarOpts, ProgressDisplay};
//!
//! // A display that draws and prints nothing, as used in tests.
//! let display = ProgressDisplay::new(ProgressBarOpts::hidden(), 12);
//! display.finish();
//! ```

pub(crate) mod display;
pub(crate) mod style;

pub use display::{LineSink, ProgressDisplay};
pub use style::ProgressBarOpts;
