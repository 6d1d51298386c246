//! Interactive input.
//!
//! Everything folio asks the user goes through a [`PromptProvider`], so the
//! pipeline never touches stdin itself. [`TerminalPrompt`] talks to a real
//! terminal; [`ScriptedPrompt`] replays canned answers and is what the tests
//! use.

mod scripted;
mod terminal;

pub use scripted::ScriptedPrompt;
pub use terminal::TerminalPrompt;

use crate::error::Result;

/// Source of interactive answers.
pub trait PromptProvider: Send + Sync {
    /// Ask for a line of text. An empty answer is only accepted when
    /// `allow_empty` is set.
    fn input(&self, prompt: &str, allow_empty: bool) -> Result<String>;

    /// Ask for a secret without echoing it.
    fn secret(&self, prompt: &str) -> Result<String>;

    /// Ask a yes/no question. Anything but an explicit yes is a no.
    fn confirm(&self, prompt: &str) -> Result<bool>;

    /// Show an informational line.
    fn message(&self, text: &str);
}
