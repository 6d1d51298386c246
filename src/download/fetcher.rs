//! Bounded retry around a [`PageSource`].
//!
//! A page gets a fixed number of attempts. Any error from an attempt, of any
//! kind, triggers the next one; once the attempts are used up the page is
//! reported unavailable exactly once.

use crate::error::{Error, Result};
use crate::progress::ProgressDisplay;
use crate::service::PageSource;

use std::time::Duration;
use tracing::debug;

/// How often, and how patiently, a page is retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts per page, the first one included.
    pub max_attempts: u32,
    /// Pause between attempts.
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::ZERO,
        }
    }
}

impl RetryPolicy {
    /// A policy of `max_attempts` attempts without pause. Zero is treated as
    /// one attempt.
    pub fn attempts(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            ..Self::default()
        }
    }
}

/// Fetches pages from a [`PageSource`], retrying per [`RetryPolicy`].
pub struct RetryingPageFetcher<'a, S: PageSource + ?Sized> {
    source: &'a S,
    policy: RetryPolicy,
}

impl<'a, S: PageSource + ?Sized> RetryingPageFetcher<'a, S> {
    /// Wrap `source`.
    pub fn new(source: &'a S, policy: RetryPolicy) -> Self {
        Self { source, policy }
    }

    /// Get the retry policy.
    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Fetch the page at zero-based `index`.
    ///
    /// Each retry is announced on `display`. After the last failed attempt
    /// the error is [`Error::PageUnavailable`] carrying the last failure.
    pub async fn fetch(
        &self,
        index: u32,
        scale: u32,
        display: &ProgressDisplay,
    ) -> Result<Vec<u8>> {
        let page = index + 1;
        let max_attempts = self.policy.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            match self.source.page_image(index, scale).await {
                Ok(bytes) => return Ok(bytes),
                Err(e) if attempt < max_attempts => {
                    debug!("Attempt {} for page {} failed: {}", attempt, page, describe(&e));
                    attempt += 1;
                    display.retry_notice(page, attempt, max_attempts);
                    if !self.policy.delay.is_zero() {
                        tokio::time::sleep(self.policy.delay).await;
                    }
                }
                Err(e) => {
                    return Err(Error::PageUnavailable {
                        page,
                        attempts: attempt,
                        reason: describe(&e),
                    })
                }
            }
        }
    }
}

/// The error's message followed by the messages of its sources.
fn describe(err: &Error) -> String {
    let mut message = err.to_string();
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
