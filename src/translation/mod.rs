/*!
 * Translation pipeline: document translation and the retry controller.
 *
 * - `engine`: translates a document's header fields and body through an
 *   injected provider, and rewrites URL fields deterministically
 * - `retry`: the per-task translate → save → verify → retry state machine
 *   and its async driver
 */

// Re-export main types for easier usage
pub use self::engine::TranslationEngine;
pub use self::retry::{Effect, RetryController, TaskEvent, TaskState, TranslationOutcome, TranslationTask};

// Submodules
pub mod engine;
pub mod retry;
