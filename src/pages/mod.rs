//! Page selection.
//!
//! Turns what the user asked for (the all-pages flag, explicit one-based
//! page numbers, or an answer typed at a prompt) into the zero-based,
//! half-open [`PageRange`] the download loop walks.
//!
//! # Examples
//!
//! ```rust
//! use folio::pages::{resolve_range, PageSelection};
//! use folio::prompt::ScriptedPrompt;
//!
//! # fn example() -> folio::Result<()> {
//! let selection = PageSelection { start: Some(3), end: Some(10), ..Default::default() };
//! let range = resolve_range(120, &selection, &ScriptedPrompt::default())?;
//! assert_eq!((range.start(), range.end()), (2, 10));
//! # Ok(())
//! # }
//! ```

pub mod range;

pub use range::{parse_range_input, resolve_range, PageRange, PageSelection};
