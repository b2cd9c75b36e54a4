//! Persistence seam for the assessment engine.
//!
//! The engine issues reads and writes through this trait and stays agnostic
//! of the backend; `autoeval-store` provides implementations. Writes follow
//! the value-replace convention: template questions and session answers are
//! swapped wholesale, never patched field by field.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::StoreError;
use crate::model::{AnswerMap, GradedAnswer, Question, ScoreSummary, Session, Template};

/// Filter for bank question listings.
#[derive(Debug, Clone, Default)]
pub struct QuestionFilter {
    /// Restrict to one subject area.
    pub area: Option<String>,
    /// Include retired questions (excluded by default).
    pub include_retired: bool,
}

/// Storage contract for bank questions, templates, and sessions.
#[async_trait]
pub trait AssessmentStore: Send + Sync {
    // -- question bank -----------------------------------------------------

    /// List bank questions, ordered by area then `order`.
    async fn list_questions(&self, filter: &QuestionFilter) -> Result<Vec<Question>, StoreError>;

    async fn get_question(&self, id: Uuid) -> Result<Question, StoreError>;

    /// Insert a batch of bank questions. All-or-nothing.
    async fn insert_questions(&self, questions: &[Question]) -> Result<(), StoreError>;

    async fn update_question(&self, question: &Question) -> Result<(), StoreError>;

    /// Remove a question; its options live inside the question value, so
    /// they go with it.
    async fn delete_question(&self, id: Uuid) -> Result<(), StoreError>;

    // -- templates ---------------------------------------------------------

    /// Load a template with its ordered questions and options.
    async fn get_template(&self, id: Uuid) -> Result<Template, StoreError>;

    /// Create or replace a template as a whole value.
    ///
    /// Replacing a template that already has sessions must fail with
    /// [`StoreError::TemplateInUse`]: templates are immutable once
    /// referenced, a new version means a new template id.
    async fn save_template(&self, template: &Template) -> Result<(), StoreError>;

    async fn template_has_sessions(&self, template_id: Uuid) -> Result<bool, StoreError>;

    // -- sessions ----------------------------------------------------------

    /// The one non-completed session for a (respondent, template) pair, if
    /// any. The store must never hold more than one.
    async fn find_open_session(
        &self,
        respondent_id: &str,
        template_id: Uuid,
    ) -> Result<Option<Session>, StoreError>;

    async fn get_session(&self, id: Uuid) -> Result<Session, StoreError>;

    async fn create_session(&self, session: &Session) -> Result<(), StoreError>;

    /// Replace the full answer set of an in-progress session (delete all,
    /// reinsert). Fails with [`StoreError::SessionCompleted`] on a completed
    /// session.
    async fn replace_answers(&self, session_id: Uuid, answers: &AnswerMap)
        -> Result<(), StoreError>;

    /// Atomically persist the final answers, graded results, and score, and
    /// mark the session completed. Fails with [`StoreError::SessionCompleted`]
    /// if the session already is; on failure nothing changes.
    async fn complete_session(
        &self,
        session_id: Uuid,
        answers: &AnswerMap,
        graded: &[GradedAnswer],
        score: &ScoreSummary,
    ) -> Result<(), StoreError>;
}
