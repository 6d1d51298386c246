//! Page range resolution.

use crate::error::{Error, Result};
use crate::prompt::PromptProvider;

use std::fmt;
use std::ops::Range;
use tracing::{debug, warn};

/// Prompt shown when asking for a range interactively.
pub const RANGE_PROMPT: &str = "Enter a range (eg. 1-15) or leave blank for all";

/// A half-open interval of zero-based page indices.
///
/// Always non-empty and within the book it was resolved against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRange {
    start: u32,
    end: u32,
}

impl PageRange {
    /// Create the range `[start, end)` for a book of `page_count` pages.
    ///
    /// Fails unless `start < end <= page_count`.
    pub fn new(start: u32, end: u32, page_count: u32) -> Result<Self> {
        if start >= end || end > page_count {
            return Err(Error::InvalidRange {
                start: start.saturating_add(1),
                end,
                page_count,
            });
        }
        Ok(Self { start, end })
    }

    /// Every page of a book of `page_count` pages.
    pub fn all(page_count: u32) -> Result<Self> {
        Self::new(0, page_count, page_count)
    }

    /// Index of the first page.
    pub fn start(&self) -> u32 {
        self.start
    }

    /// Index one past the last page.
    pub fn end(&self) -> u32 {
        self.end
    }

    /// Number of pages in the range.
    pub fn count(&self) -> u32 {
        self.end - self.start
    }

    /// The page indices, in increasing order.
    pub fn indices(&self) -> Range<u32> {
        self.start..self.end
    }
}

impl fmt::Display for PageRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pages {} thru {}", self.start + 1, self.end)
    }
}

/// What the user asked for on the command line.
///
/// `start` and `end` are one-based page numbers, both inclusive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageSelection {
    /// Download every page, ignoring `start` and `end`.
    pub all_pages: bool,
    /// First page to download.
    pub start: Option<u32>,
    /// Last page to download.
    pub end: Option<u32>,
}

/// Resolve a [`PageSelection`] against a book of `page_count` pages.
///
/// With neither bound given (and no all-pages flag) the user is asked for a
/// range through `prompt` until the answer is blank or parses. Bounds that
/// fall outside the book are clamped to it; a selection that does not
/// overlap the book at all is an [`Error::InvalidRange`].
pub fn resolve_range(
    page_count: u32,
    selection: &PageSelection,
    prompt: &dyn PromptProvider,
) -> Result<PageRange> {
    if selection.all_pages {
        return PageRange::all(page_count);
    }

    if selection.start.is_none() && selection.end.is_none() {
        return ask_for_range(page_count, prompt);
    }

    let start = selection.start.map_or(0, |first| first.saturating_sub(1));
    let end = selection.end.unwrap_or(page_count);
    clamp(start, end, page_count).ok_or(Error::InvalidRange {
        start: start + 1,
        end,
        page_count,
    })
}

fn ask_for_range(page_count: u32, prompt: &dyn PromptProvider) -> Result<PageRange> {
    prompt.message(&format!(
        "The book is {} pages long. Which pages do you want?",
        page_count
    ));

    loop {
        let answer = prompt.input(RANGE_PROMPT, true)?;
        let answer = answer.trim();
        if answer.is_empty() {
            return PageRange::all(page_count);
        }

        if let Some((first, last)) = parse_range_input(answer) {
            if let Some(range) = clamp(first - 1, last, page_count) {
                return Ok(range);
            }
        }
        debug!("Rejected range input {:?}", answer);
    }
}

/// Parse `"<first>-<last>"` into one-based page numbers.
///
/// Returns `None` for anything else, including a first page of `0`.
///
/// ```rust
/// use folio::pages::parse_range_input;
///
/// assert_eq!(parse_range_input("1-15"), Some((1, 15)));
/// assert_eq!(parse_range_input(" 4 - 9 "), Some((4, 9)));
/// assert_eq!(parse_range_input("abc"), None);
/// ```
pub fn parse_range_input(input: &str) -> Option<(u32, u32)> {
    let (first, last) = input.split_once('-')?;
    let first: u32 = first.trim().parse().ok()?;
    let last: u32 = last.trim().parse().ok()?;
    if first == 0 {
        return None;
    }
    Some((first, last))
}

fn clamp(start: u32, end: u32, page_count: u32) -> Option<PageRange> {
    let clamped_start = start.min(page_count);
    let clamped_end = end.min(page_count);
    if (clamped_start, clamped_end) != (start, end) {
        warn!(
            "Requested pages {}-{} clamped to {}-{} ({} pages in book)",
            start + 1,
            end,
            clamped_start + 1,
            clamped_end,
            page_count
        );
    }
    PageRange::new(clamped_start, clamped_end, page_count).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::ScriptedPrompt;

    fn explicit(start: Option<u32>, end: Option<u32>) -> PageSelection {
        PageSelection {
            all_pages: false,
            start,
            end,
        }
    }

    #[test]
    fn test_all_pages_ignores_bounds() {
        let selection = PageSelection {
            all_pages: true,
            start: Some(4),
            end: Some(6),
        };
        let range = resolve_range(50, &selection, &ScriptedPrompt::default()).unwrap();
        assert_eq!(range, PageRange::all(50).unwrap());
    }

    #[test]
    fn test_explicit_bounds() {
        let prompt = ScriptedPrompt::default();
        for (start, end) in [(0u32, 1u32), (0, 20), (7, 8), (19, 20), (3, 12)] {
            let range = resolve_range(20, &explicit(Some(start + 1), Some(end)), &prompt).unwrap();
            assert_eq!((range.start(), range.end()), (start, end));
        }
        assert!(prompt.asked().is_empty());
    }

    #[test]
    fn test_single_bound_defaults() {
        let prompt = ScriptedPrompt::default();
        let from = resolve_range(30, &explicit(Some(10), None), &prompt).unwrap();
        assert_eq!((from.start(), from.end()), (9, 30));

        let upto = resolve_range(30, &explicit(None, Some(5)), &prompt).unwrap();
        assert_eq!((upto.start(), upto.end()), (0, 5));
    }

    #[test]
    fn test_explicit_end_is_clamped() {
        let range =
            resolve_range(10, &explicit(Some(5), Some(400)), &ScriptedPrompt::default()).unwrap();
        assert_eq!((range.start(), range.end()), (4, 10));
    }

    #[test]
    fn test_explicit_range_outside_book() {
        let result = resolve_range(10, &explicit(Some(11), None), &ScriptedPrompt::default());
        assert!(matches!(
            result,
            Err(Error::InvalidRange {
                start: 11,
                page_count: 10,
                ..
            })
        ));
    }

    #[test]
    fn test_inverted_explicit_range() {
        let result = resolve_range(10, &explicit(Some(6), Some(2)), &ScriptedPrompt::default());
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_book() {
        let selection = PageSelection {
            all_pages: true,
            ..Default::default()
        };
        assert!(resolve_range(0, &selection, &ScriptedPrompt::default()).is_err());
    }

    #[test]
    fn test_interactive_range() {
        let prompt = ScriptedPrompt::new(["1-15"]);
        let range = resolve_range(100, &PageSelection::default(), &prompt).unwrap();
        assert_eq!((range.start(), range.end()), (0, 15));
        assert_eq!(
            prompt.messages(),
            vec!["The book is 100 pages long. Which pages do you want?"]
        );
    }

    #[test]
    fn test_interactive_blank_means_all() {
        let prompt = ScriptedPrompt::new([""]);
        let range = resolve_range(42, &PageSelection::default(), &prompt).unwrap();
        assert_eq!((range.start(), range.end()), (0, 42));
    }

    #[test]
    fn test_interactive_reprompts_on_garbage() {
        let prompt = ScriptedPrompt::new(["abc", "2-5"]);
        let range = resolve_range(42, &PageSelection::default(), &prompt).unwrap();
        assert_eq!((range.start(), range.end()), (1, 5));
        assert_eq!(prompt.asked(), vec![RANGE_PROMPT, RANGE_PROMPT]);
    }

    #[test]
    fn test_interactive_reprompts_on_range_outside_book() {
        let prompt = ScriptedPrompt::new(["50-60", "9-3", "0-4", "3-4"]);
        let range = resolve_range(10, &PageSelection::default(), &prompt).unwrap();
        assert_eq!((range.start(), range.end()), (2, 4));
        assert_eq!(prompt.asked().len(), 4);
    }

    #[test]
    fn test_parse_range_input_rejects() {
        for input in ["", "12", "-4", "4-", "a-b", "1-2-3", "0-5", "1.5-3"] {
            assert_eq!(parse_range_input(input), None, "{:?}", input);
        }
    }

    #[test]
    fn test_page_range_accessors() {
        let range = PageRange::new(3, 9, 9).unwrap();
        assert_eq!(range.count(), 6);
        assert_eq!(range.indices().collect::<Vec<_>>(), vec![3, 4, 5, 6, 7, 8]);
        assert_eq!(range.to_string(), "pages 4 thru 9");
        assert!(PageRange::new(4, 4, 9).is_err());
        assert!(PageRange::new(0, 10, 9).is_err());
    }
}
