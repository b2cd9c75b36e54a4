//! Assessment session state machine.
//!
//! States: none -> in_progress -> completed (terminal, no reopening).
//! Drafts replace the stored answer set wholesale: a save that omits a
//! previously-answered question loses that answer. That replace-not-merge
//! contract is what keeps overlapping saves from a single client
//! self-contained; there is no server-side locking because writes are
//! respondent-scoped.

use std::sync::Arc;

use uuid::Uuid;

use crate::error::AssessmentError;
use crate::grading::{answered_count, grade_all};
use crate::model::{AnswerMap, Session, Template};
use crate::score::aggregate;
use crate::store::AssessmentStore;

/// Respondent-facing operations for one attempt at one template.
pub struct SessionEngine {
    store: Arc<dyn AssessmentStore>,
}

impl SessionEngine {
    pub fn new(store: Arc<dyn AssessmentStore>) -> Self {
        Self { store }
    }

    /// Save a draft answer set for a (respondent, template) pair.
    ///
    /// The first save creates the session; later saves reuse the one open
    /// session for the pair (never a duplicate) and replace its stored
    /// answers in full.
    pub async fn save_draft(
        &self,
        respondent_id: &str,
        template_id: Uuid,
        answers: AnswerMap,
    ) -> Result<Session, AssessmentError> {
        // Template must exist; also anchors answers to real question ids.
        let _template = self.store.get_template(template_id).await?;

        let mut session = self.open_or_create(respondent_id, template_id).await?;
        self.store.replace_answers(session.id, &answers).await?;
        session.answers = answers;

        tracing::debug!(
            session = %session.id,
            respondent = respondent_id,
            answers = session.answers.len(),
            "draft saved"
        );
        Ok(session)
    }

    /// Submit a final answer set, grading and completing the session.
    ///
    /// Every template question must have an answer entry; otherwise nothing
    /// changes and the error reports how many are missing. Without a prior
    /// draft, the session is created and completed in the same operation.
    /// Grading, score, and the state flip persist through one store call.
    pub async fn submit(
        &self,
        respondent_id: &str,
        template_id: Uuid,
        answers: AnswerMap,
    ) -> Result<Session, AssessmentError> {
        let template = self.store.get_template(template_id).await?;

        let answered = answered_count(&template, &answers);
        let total = template.questions.len();
        if answered < total {
            return Err(AssessmentError::MissingAnswers {
                missing: total - answered,
            });
        }

        let session = self.open_or_create(respondent_id, template_id).await?;

        let graded = grade_all(&template, &answers);
        let score = aggregate(&graded);
        self.store
            .complete_session(session.id, &answers, &graded, &score)
            .await?;

        tracing::info!(
            session = %session.id,
            respondent = respondent_id,
            score_percent = score.score_percent,
            manual_review = score.manual_review_count,
            "session submitted"
        );

        Ok(self.store.get_session(session.id).await?)
    }

    /// The open session with its prior answers, for resuming a draft across
    /// sittings. `None` when no draft exists.
    pub async fn resume(
        &self,
        respondent_id: &str,
        template_id: Uuid,
    ) -> Result<Option<Session>, AssessmentError> {
        Ok(self
            .store
            .find_open_session(respondent_id, template_id)
            .await?)
    }

    /// Load a session (draft or completed) by id, e.g. to display results.
    pub async fn load(&self, session_id: Uuid) -> Result<Session, AssessmentError> {
        Ok(self.store.get_session(session_id).await?)
    }

    /// Load the template a session grades against.
    pub async fn template(&self, template_id: Uuid) -> Result<Template, AssessmentError> {
        Ok(self.store.get_template(template_id).await?)
    }

    async fn open_or_create(
        &self,
        respondent_id: &str,
        template_id: Uuid,
    ) -> Result<Session, AssessmentError> {
        if let Some(existing) = self
            .store
            .find_open_session(respondent_id, template_id)
            .await?
        {
            return Ok(existing);
        }

        let session = Session::new(respondent_id, template_id);
        self.store.create_session(&session).await?;
        tracing::debug!(session = %session.id, respondent = respondent_id, "session created");
        Ok(session)
    }
}
