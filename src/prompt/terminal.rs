use super::PromptProvider;
use crate::error::Result;

use dialoguer::{Confirm, Input, Password};

/// Prompts on the controlling terminal.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalPrompt;

impl TerminalPrompt {
    /// Create a terminal prompt.
    pub fn new() -> Self {
        Self
    }
}

impl PromptProvider for TerminalPrompt {
    fn input(&self, prompt: &str, allow_empty: bool) -> Result<String> {
        let answer = Input::<String>::new()
            .with_prompt(prompt)
            .allow_empty(allow_empty)
            .interact_text()?;
        Ok(answer)
    }

    fn secret(&self, prompt: &str) -> Result<String> {
        Ok(Password::new().with_prompt(prompt).interact()?)
    }

    fn confirm(&self, prompt: &str) -> Result<bool> {
        let yes = Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()?;
        Ok(yes)
    }

    fn message(&self, text: &str) {
        println!("{}", text);
    }
}
