use super::PromptProvider;
use crate::error::{Error, Result};

use std::collections::VecDeque;
use std::sync::Mutex;

/// Replays a fixed list of answers, in order, to whatever is asked.
///
/// Confirmations read the next answer and accept it when it starts with `y`
/// (case-insensitive). Every prompt and message is recorded so tests can
/// check what the user would have seen.
///
/// ```rust
/// use folio::prompt::{PromptProvider, ScriptedPrompt};
///
/// let prompt = ScriptedPrompt::new(["abc", "y"]);
/// assert_eq!(prompt.input("Range", true).unwrap(), "abc");
/// assert!(prompt.confirm("Continue?").unwrap());
/// assert_eq!(prompt.asked(), vec!["Range", "Continue?"]);
/// ```
#[derive(Debug, Default)]
pub struct ScriptedPrompt {
    answers: Mutex<VecDeque<String>>,
    asked: Mutex<Vec<String>>,
    messages: Mutex<Vec<String>>,
}

impl ScriptedPrompt {
    /// Create a prompt that answers with `answers`, one per question.
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: Mutex::new(answers.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }

    /// Prompts shown so far, in order.
    pub fn asked(&self) -> Vec<String> {
        lock(&self.asked).clone()
    }

    /// Messages shown so far, in order.
    pub fn messages(&self) -> Vec<String> {
        lock(&self.messages).clone()
    }

    /// Number of answers not consumed yet.
    pub fn remaining(&self) -> usize {
        lock(&self.answers).len()
    }

    fn next(&self, prompt: &str) -> Result<String> {
        lock(&self.asked).push(prompt.to_string());
        lock(&self.answers)
            .pop_front()
            .ok_or_else(|| Error::Prompt(format!("no scripted answer for {:?}", prompt)))
    }
}

fn lock<T>(m: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl PromptProvider for ScriptedPrompt {
    fn input(&self, prompt: &str, allow_empty: bool) -> Result<String> {
        loop {
            let answer = self.next(prompt)?;
            if allow_empty || !answer.is_empty() {
                return Ok(answer);
            }
        }
    }

    fn secret(&self, prompt: &str) -> Result<String> {
        self.next(prompt)
    }

    fn confirm(&self, prompt: &str) -> Result<bool> {
        Ok(self.next(prompt)?.to_lowercase().starts_with('y'))
    }

    fn message(&self, text: &str) {
        lock(&self.messages).push(text.to_string());
    }
}
