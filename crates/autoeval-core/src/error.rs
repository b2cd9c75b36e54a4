//! Error taxonomy for the assessment engine.
//!
//! Validation and state errors carry enough detail for the caller to
//! self-correct (which question, the current point total, how many answers
//! are missing). Grading itself never errors: malformed answers degrade to
//! "incorrect" so one bad value cannot block scoring the rest of a session.

use thiserror::Error;
use uuid::Uuid;

/// Errors surfaced by the bank, composer, and session engine.
#[derive(Debug, Error)]
pub enum AssessmentError {
    /// A question failed per-type validation. The message identifies the
    /// offending question by its (truncated) text.
    #[error("invalid question '{question}': {reason}")]
    InvalidQuestion { question: String, reason: String },

    /// A template's point weights do not sum to 100.
    #[error("template points must sum to 100, got {total}")]
    PointSum { total: u32 },

    /// Composition or finalization selected zero questions.
    #[error("a template must contain at least one question")]
    EmptyTemplate,

    /// `submit` was called with unanswered template questions.
    #[error("cannot submit: {missing} question(s) unanswered")]
    MissingAnswers { missing: usize },

    /// The persistence layer rejected the write or the record is missing.
    /// State errors (completed session, template in use) surface here since
    /// the store is what detects them.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl AssessmentError {
    /// True for lifecycle-state rejections: writes against a completed
    /// session or an in-use template.
    pub fn is_state_error(&self) -> bool {
        matches!(
            self,
            AssessmentError::Store(StoreError::SessionCompleted(_))
                | AssessmentError::Store(StoreError::TemplateInUse(_))
        )
    }
}

/// Errors from the persistence seam.
///
/// Defined in `autoeval-core` so the engine can classify failures without
/// string matching; concrete stores live in `autoeval-store`.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("question not found: {0}")]
    QuestionNotFound(Uuid),

    #[error("template not found: {0}")]
    TemplateNotFound(Uuid),

    #[error("session not found: {0}")]
    SessionNotFound(Uuid),

    /// A write was attempted against an already-completed session.
    #[error("session {0} is completed and can no longer be modified")]
    SessionCompleted(Uuid),

    /// An edit was attempted on a template already referenced by sessions.
    /// Templates are immutable once any session exists; a change means a new
    /// template.
    #[error("template {0} has sessions and is immutable")]
    TemplateInUse(Uuid),

    /// Any other write conflicting with the record's current state.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Backend failure (connection, serialization, ...). Retry policy belongs
    /// to the caller, not the engine.
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Truncate a question text for error messages.
pub(crate) fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars).collect();
    format!("{cut}...")
}
