/*!
 * Mock provider implementations for testing.
 *
 * This module provides mock providers that simulate different behaviors:
 * - `MockProvider::working()` - Always succeeds with translated text
 * - `MockProvider::echoing()` - Succeeds but returns the input unchanged
 * - `MockProvider::failing()` - Always fails with an error
 * - `MockProvider::flaky(n)` - Fails the first n calls, then succeeds
 */

use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::errors::ProviderError;
use crate::providers::Provider;

/// Behavior mode for the mock provider
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds with a marked translation
    Working,
    /// Succeeds but returns the input text unchanged (verification bait)
    Echoing,
    /// Always fails with an error
    Failing,
    /// Fails the first `failures` calls, then behaves like `Working`
    FlakyThenWorking { failures: usize },
}

/// Mock provider for testing translation behavior
#[derive(Debug)]
pub struct MockProvider {
    /// Behavior mode
    behavior: MockBehavior,
    /// Number of translate calls seen so far
    call_count: Arc<AtomicUsize>,
}

impl MockProvider {
    /// Create a new mock provider with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Create a working mock provider that always succeeds
    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    /// Create a mock provider that returns input unchanged
    pub fn echoing() -> Self {
        Self::new(MockBehavior::Echoing)
    }

    /// Create a mock provider that always fails
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Create a mock provider that fails `failures` times before working
    pub fn flaky(failures: usize) -> Self {
        Self::new(MockBehavior::FlakyThenWorking { failures })
    }

    /// Number of translate calls this provider has received
    pub fn calls(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Shared handle to the call counter, for assertions after a move
    pub fn call_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.call_count)
    }

    /// Line-wise marking keeps markdown structure intact, so heading lines
    /// stay heading lines and structural verification still passes.
    fn translated(text: &str, target_language: &str) -> String {
        text.lines()
            .map(|line| {
                if line.trim().is_empty() {
                    line.to_string()
                } else {
                    format!("{} [{}]", line, target_language)
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[async_trait]
impl Provider for MockProvider {
    async fn translate(
        &self,
        text: &str,
        target_language: &str,
        _context: &str,
    ) -> Result<String, ProviderError> {
        let call = self.call_count.fetch_add(1, Ordering::SeqCst);

        match self.behavior {
            MockBehavior::Working => Ok(Self::translated(text, target_language)),
            MockBehavior::Echoing => Ok(text.to_string()),
            MockBehavior::Failing => {
                Err(ProviderError::RequestFailed("mock provider failure".to_string()))
            }
            MockBehavior::FlakyThenWorking { failures } => {
                if call < failures {
                    Err(ProviderError::RequestFailed(format!(
                        "mock transient failure {}",
                        call + 1
                    )))
                } else {
                    Ok(Self::translated(text, target_language))
                }
            }
        }
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        match self.behavior {
            MockBehavior::Failing => {
                Err(ProviderError::RequestFailed("mock provider failure".to_string()))
            }
            _ => Ok(()),
        }
    }
}
