//! In-memory assessment store.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use autoeval_core::error::StoreError;
use autoeval_core::model::{
    AnswerMap, GradedAnswer, Question, ScoreSummary, Session, SessionState, Template,
};
use autoeval_core::store::{AssessmentStore, QuestionFilter};

#[derive(Default)]
struct Inner {
    questions: HashMap<Uuid, Question>,
    templates: HashMap<Uuid, Template>,
    sessions: HashMap<Uuid, Session>,
}

/// An `AssessmentStore` backed by in-process maps.
///
/// A single lock guards all three collections so multi-record writes
/// (notably `complete_session`) are atomic with respect to readers.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of sessions held, across all states. Test helper.
    pub async fn session_count(&self) -> usize {
        self.inner.read().await.sessions.len()
    }
}

#[async_trait]
impl AssessmentStore for MemoryStore {
    async fn list_questions(&self, filter: &QuestionFilter) -> Result<Vec<Question>, StoreError> {
        let inner = self.inner.read().await;
        let mut questions: Vec<Question> = inner
            .questions
            .values()
            .filter(|q| filter.include_retired || q.is_active())
            .filter(|q| filter.area.as_deref().is_none_or(|a| q.area == a))
            .cloned()
            .collect();
        questions.sort_by(|a, b| a.area.cmp(&b.area).then(a.order.cmp(&b.order)));
        Ok(questions)
    }

    async fn get_question(&self, id: Uuid) -> Result<Question, StoreError> {
        self.inner
            .read()
            .await
            .questions
            .get(&id)
            .cloned()
            .ok_or(StoreError::QuestionNotFound(id))
    }

    async fn insert_questions(&self, questions: &[Question]) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        for question in questions {
            if inner.questions.contains_key(&question.id) {
                return Err(StoreError::Conflict(format!(
                    "question {} already exists",
                    question.id
                )));
            }
        }
        for question in questions {
            inner.questions.insert(question.id, question.clone());
        }
        Ok(())
    }

    async fn update_question(&self, question: &Question) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        if !inner.questions.contains_key(&question.id) {
            return Err(StoreError::QuestionNotFound(question.id));
        }
        inner.questions.insert(question.id, question.clone());
        Ok(())
    }

    async fn delete_question(&self, id: Uuid) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        inner
            .questions
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::QuestionNotFound(id))
    }

    async fn get_template(&self, id: Uuid) -> Result<Template, StoreError> {
        self.inner
            .read()
            .await
            .templates
            .get(&id)
            .cloned()
            .ok_or(StoreError::TemplateNotFound(id))
    }

    async fn save_template(&self, template: &Template) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        let referenced = inner
            .sessions
            .values()
            .any(|s| s.template_id == template.id);
        if inner.templates.contains_key(&template.id) && referenced {
            return Err(StoreError::TemplateInUse(template.id));
        }
        inner.templates.insert(template.id, template.clone());
        Ok(())
    }

    async fn template_has_sessions(&self, template_id: Uuid) -> Result<bool, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .sessions
            .values()
            .any(|s| s.template_id == template_id))
    }

    async fn find_open_session(
        &self,
        respondent_id: &str,
        template_id: Uuid,
    ) -> Result<Option<Session>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .sessions
            .values()
            .find(|s| {
                s.respondent_id == respondent_id
                    && s.template_id == template_id
                    && s.state == SessionState::InProgress
            })
            .cloned())
    }

    async fn get_session(&self, id: Uuid) -> Result<Session, StoreError> {
        self.inner
            .read()
            .await
            .sessions
            .get(&id)
            .cloned()
            .ok_or(StoreError::SessionNotFound(id))
    }

    async fn create_session(&self, session: &Session) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        let duplicate = inner.sessions.values().any(|s| {
            s.respondent_id == session.respondent_id
                && s.template_id == session.template_id
                && s.state == SessionState::InProgress
        });
        if duplicate {
            return Err(StoreError::Conflict(format!(
                "an open session already exists for respondent {} and template {}",
                session.respondent_id, session.template_id
            )));
        }
        inner.sessions.insert(session.id, session.clone());
        Ok(())
    }

    async fn replace_answers(
        &self,
        session_id: Uuid,
        answers: &AnswerMap,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        let session = inner
            .sessions
            .get_mut(&session_id)
            .ok_or(StoreError::SessionNotFound(session_id))?;
        if session.state == SessionState::Completed {
            return Err(StoreError::SessionCompleted(session_id));
        }
        // Delete-then-reinsert: the stored set is exactly what was sent.
        session.answers = answers.clone();
        Ok(())
    }

    async fn complete_session(
        &self,
        session_id: Uuid,
        answers: &AnswerMap,
        graded: &[GradedAnswer],
        score: &ScoreSummary,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        let session = inner
            .sessions
            .get_mut(&session_id)
            .ok_or(StoreError::SessionNotFound(session_id))?;
        if session.state == SessionState::Completed {
            return Err(StoreError::SessionCompleted(session_id));
        }
        session.answers = answers.clone();
        session.graded = graded.to_vec();
        session.score = Some(score.clone());
        session.state = SessionState::Completed;
        session.completed_at = Some(Utc::now());
        tracing::debug!(session = %session_id, "session completed");
        Ok(())
    }
}
