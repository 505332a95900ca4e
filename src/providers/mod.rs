/*!
 * Provider implementations for the translation capability.
 *
 * The translation backend is opaque to the rest of the tool: anything that
 * can turn (text, target language, context) into translated text works.
 * This module contains:
 * - `chat`: client for OpenAI-compatible chat-completions endpoints
 * - `mock`: scripted provider used by the test suite
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::errors::ProviderError;

/// Common trait for all translation providers
///
/// Implementations must be safe to call sequentially from the retry
/// controller; every call is independent.
#[async_trait]
pub trait Provider: Send + Sync + Debug {
    /// Translate a piece of text into the target language.
    ///
    /// # Arguments
    /// * `text` - The text to translate
    /// * `target_language` - Target language code (e.g. `ar`, `zh-hant`)
    /// * `context` - Extra instruction describing what the text is
    ///
    /// # Returns
    /// * `Result<String, ProviderError>` - The translated text or an error
    async fn translate(
        &self,
        text: &str,
        target_language: &str,
        context: &str,
    ) -> Result<String, ProviderError>;

    /// Test the connection to the provider
    async fn test_connection(&self) -> Result<(), ProviderError>;
}

pub mod chat;
pub mod mock;
