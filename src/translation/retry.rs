/*!
 * Per-task translate → save → verify → retry state machine.
 *
 * The transition function is pure, so the whole failure-recovery logic is
 * testable without a provider or a filesystem; the [`RetryController`]
 * driver executes the effects (translate, save, verify, cleanup, delay)
 * against real collaborators.
 *
 * States: `Start → Translating → Saving → Verifying →
 * {Succeeded | RetryDelay → Translating | Failed}`. The source document is
 * loaded once in `Start`; a failure there is immediately `Failed` because
 * the source does not change between attempts. Rejected artifacts are
 * deleted best-effort, including on the final rejection, so a failed task
 * leaves no file behind.
 */

use log::{debug, info, warn};
use std::path::PathBuf;
use std::time::Duration;

use crate::document::Document;
use crate::file_utils::FileManager;
use crate::translation::engine::TranslationEngine;
use crate::verification::VerificationEngine;

/// Fixed pause between retry attempts. Deliberately not a configuration
/// knob; tests inject a shorter duration through the constructor.
pub const RETRY_DELAY: Duration = Duration::from_secs(2);

/// One unit of translation work: a post and a single target language
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationTask {
    /// Post path as reported by the scanner
    pub path: String,
    /// Post directory on disk
    pub post_dir: PathBuf,
    /// Target language code
    pub language: String,
}

/// Terminal record of one resolved task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationOutcome {
    pub path: String,
    pub language: String,
    pub succeeded: bool,
    /// Attempts actually used (0 when the source could not be loaded)
    pub attempts: u32,
}

/// State of a task inside the retry loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    /// Source document not loaded yet
    Start,
    /// Attempt `attempt` is calling the translation engine
    Translating { attempt: u32 },
    /// Attempt `attempt` is writing the artifact
    Saving { attempt: u32 },
    /// Attempt `attempt` is verifying the written artifact
    Verifying { attempt: u32 },
    /// Waiting out the fixed pause before the next attempt
    RetryDelay { attempt: u32 },
    /// Terminal: artifact saved and verified
    Succeeded { attempts: u32 },
    /// Terminal: attempts exhausted or source unavailable
    Failed { attempts: u32 },
}

impl TaskState {
    /// Whether the task is resolved
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded { .. } | Self::Failed { .. })
    }

    /// Attempt number the state belongs to, for logging
    pub fn attempt(&self) -> u32 {
        match self {
            Self::Start => 0,
            Self::Translating { attempt }
            | Self::Saving { attempt }
            | Self::Verifying { attempt }
            | Self::RetryDelay { attempt } => *attempt,
            Self::Succeeded { attempts } | Self::Failed { attempts } => *attempts,
        }
    }
}

/// Events fed into the state machine by the driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskEvent {
    SourceReady,
    SourceMissing,
    Translated,
    TranslationFailed,
    Saved,
    SaveFailed,
    VerifyAccepted,
    VerifyRejected,
    DelayElapsed,
}

/// Side effect the driver must execute after a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Nothing to do (terminal, or ignored event)
    None,
    /// Run the translation engine
    Translate,
    /// Write the artifact
    Save,
    /// Verify the written artifact
    Verify,
    /// Pause before the next attempt
    Delay,
    /// Delete the rejected artifact, then pause
    CleanupThenDelay,
    /// Delete the rejected artifact (final rejection, no further attempt)
    Cleanup,
}

/// Pure transition function of the retry state machine.
///
/// Unknown (state, event) pairs leave the state unchanged with no effect,
/// so a buggy driver cannot corrupt a task's lifecycle.
pub fn advance(state: &TaskState, event: &TaskEvent, max_retries: u32) -> (TaskState, Effect) {
    match (state, event) {
        (TaskState::Start, TaskEvent::SourceReady) => {
            (TaskState::Translating { attempt: 1 }, Effect::Translate)
        }
        (TaskState::Start, TaskEvent::SourceMissing) => {
            (TaskState::Failed { attempts: 0 }, Effect::None)
        }

        (TaskState::Translating { attempt }, TaskEvent::Translated) => {
            (TaskState::Saving { attempt: *attempt }, Effect::Save)
        }
        (TaskState::Translating { attempt }, TaskEvent::TranslationFailed) => {
            retry_or_fail(*attempt, max_retries, Effect::Delay, Effect::None)
        }

        (TaskState::Saving { attempt }, TaskEvent::Saved) => {
            (TaskState::Verifying { attempt: *attempt }, Effect::Verify)
        }
        (TaskState::Saving { attempt }, TaskEvent::SaveFailed) => {
            retry_or_fail(*attempt, max_retries, Effect::Delay, Effect::None)
        }

        (TaskState::Verifying { attempt }, TaskEvent::VerifyAccepted) => {
            (TaskState::Succeeded { attempts: *attempt }, Effect::None)
        }
        (TaskState::Verifying { attempt }, TaskEvent::VerifyRejected) => {
            retry_or_fail(*attempt, max_retries, Effect::CleanupThenDelay, Effect::Cleanup)
        }

        (TaskState::RetryDelay { attempt }, TaskEvent::DelayElapsed) => {
            (TaskState::Translating { attempt: attempt + 1 }, Effect::Translate)
        }

        _ => (*state, Effect::None),
    }
}

fn retry_or_fail(
    attempt: u32,
    max_retries: u32,
    retry_effect: Effect,
    fail_effect: Effect,
) -> (TaskState, Effect) {
    if attempt >= max_retries {
        (TaskState::Failed { attempts: attempt }, fail_effect)
    } else {
        (TaskState::RetryDelay { attempt }, retry_effect)
    }
}

/// Drives tasks through the state machine against real collaborators
pub struct RetryController {
    engine: TranslationEngine,
    verifier: VerificationEngine,
    max_retries: u32,
    retry_delay: Duration,
}

impl RetryController {
    pub fn new(
        engine: TranslationEngine,
        verifier: VerificationEngine,
        max_retries: u32,
        retry_delay: Duration,
    ) -> Self {
        Self {
            engine,
            verifier,
            max_retries,
            retry_delay,
        }
    }

    /// Resolve one task completely, retries included.
    pub async fn run_task(&self, task: &TranslationTask) -> TranslationOutcome {
        let artifact = FileManager::variant_path(&task.post_dir, &task.language);

        // The source is invariant across attempts, so it is loaded and
        // parsed exactly once.
        let source = FileManager::read_to_string(FileManager::canonical_path(&task.post_dir))
            .ok()
            .map(|content| Document::parse(&content))
            .filter(Document::has_front_matter);

        let mut event = if source.is_some() {
            TaskEvent::SourceReady
        } else {
            warn!("Cannot load source document for {}", task.path);
            TaskEvent::SourceMissing
        };

        let mut state = TaskState::Start;
        let mut translated: Option<Document> = None;

        loop {
            let (next_state, effect) = advance(&state, &event, self.max_retries);
            debug!(
                "Task {} [{}]: {:?} --{:?}--> {:?} (attempt {}/{})",
                task.path,
                task.language,
                state,
                event,
                next_state,
                next_state.attempt(),
                self.max_retries
            );
            state = next_state;

            let next_event = match effect {
                Effect::None => None,
                Effect::Cleanup => {
                    FileManager::remove_file_best_effort(&artifact);
                    None
                }
                Effect::Translate => Some(self.do_translate(task, &source, &mut translated).await),
                Effect::Save => Some(Self::do_save(&artifact, translated.as_ref())),
                Effect::Verify => Some(self.do_verify(task, &artifact, source.as_ref(), state.attempt())),
                Effect::Delay => {
                    tokio::time::sleep(self.retry_delay).await;
                    Some(TaskEvent::DelayElapsed)
                }
                Effect::CleanupThenDelay => {
                    FileManager::remove_file_best_effort(&artifact);
                    tokio::time::sleep(self.retry_delay).await;
                    Some(TaskEvent::DelayElapsed)
                }
            };

            match next_event {
                Some(e) => event = e,
                None => break,
            }
        }

        let succeeded = matches!(state, TaskState::Succeeded { .. });
        if succeeded {
            info!(
                "Translated {} to {} in {} attempt(s)",
                task.path,
                task.language,
                state.attempt()
            );
        } else {
            warn!(
                "Giving up on {} [{}] after {} attempt(s)",
                task.path,
                task.language,
                state.attempt()
            );
        }

        TranslationOutcome {
            path: task.path.clone(),
            language: task.language.clone(),
            succeeded,
            attempts: state.attempt(),
        }
    }

    async fn do_translate(
        &self,
        task: &TranslationTask,
        source: &Option<Document>,
        translated: &mut Option<Document>,
    ) -> TaskEvent {
        let Some(source) = source.as_ref() else {
            return TaskEvent::TranslationFailed;
        };

        match self.engine.translate_document(source, &task.language).await {
            Ok(document) => {
                *translated = Some(document);
                TaskEvent::Translated
            }
            Err(e) => {
                warn!("Translation failed for {} [{}]: {}", task.path, task.language, e);
                TaskEvent::TranslationFailed
            }
        }
    }

    fn do_save(artifact: &std::path::Path, translated: Option<&Document>) -> TaskEvent {
        let Some(document) = translated else {
            return TaskEvent::SaveFailed;
        };

        match FileManager::write_to_file(artifact, &document.serialize()) {
            Ok(()) => TaskEvent::Saved,
            Err(e) => {
                warn!("Failed to save artifact {:?}: {}", artifact, e);
                TaskEvent::SaveFailed
            }
        }
    }

    fn do_verify(
        &self,
        task: &TranslationTask,
        artifact: &std::path::Path,
        source: Option<&Document>,
        attempt: u32,
    ) -> TaskEvent {
        let verdict = self.verifier.verify(artifact, source);
        if verdict.is_accepted() {
            TaskEvent::VerifyAccepted
        } else {
            warn!(
                "Verification rejected {} [{}] on attempt {}: {:?}",
                task.path, task.language, attempt, verdict
            );
            TaskEvent::VerifyRejected
        }
    }
}
