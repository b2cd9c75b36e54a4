//! Question bank: per-type validation and the CRUD service.
//!
//! Validation runs before anything is written; a batch create validates every
//! question first and commits nothing if any of them fails, identifying the
//! offender by its truncated text.

use std::sync::Arc;

use uuid::Uuid;

use crate::error::{truncate_text, AssessmentError};
use crate::model::{Question, QuestionStatus, QuestionType};
use crate::store::{AssessmentStore, QuestionFilter};

const ERROR_TEXT_CHARS: usize = 40;

/// Normalize and validate one question, returning the cleaned value.
///
/// Normalization trims text fields and derives the `word_order` canonical
/// answer (`words` joined with `|`) when it is blank.
pub fn prepare_question(mut question: Question) -> Result<Question, AssessmentError> {
    question.text = question.text.trim().to_string();
    question.correct_answer = question.correct_answer.trim().to_string();

    if question.text.is_empty() {
        return Err(invalid(&question, "question text is empty"));
    }

    match question.question_type {
        QuestionType::MultipleChoice | QuestionType::ImageChoice => {
            if question.options.len() < 2 {
                return Err(invalid(&question, "needs at least 2 options"));
            }
            if question.options.iter().any(|o| o.text.trim().is_empty()) {
                return Err(invalid(&question, "option text must not be empty"));
            }
            let correct = question.options.iter().filter(|o| o.is_correct).count();
            if correct != 1 {
                return Err(invalid(
                    &question,
                    &format!("exactly one option must be correct, found {correct}"),
                ));
            }
            if question.question_type == QuestionType::ImageChoice
                && question
                    .image_url
                    .as_deref()
                    .map(str::trim)
                    .unwrap_or("")
                    .is_empty()
            {
                return Err(invalid(&question, "image_choice requires an image URL"));
            }
        }
        QuestionType::WordOrder => {
            let words: Vec<&str> = question
                .words
                .iter()
                .map(|w| w.trim())
                .filter(|w| !w.is_empty())
                .collect();
            if words.len() < 2 {
                return Err(invalid(&question, "word_order needs at least 2 words"));
            }
            if question.correct_answer.is_empty() {
                question.correct_answer = words.join("|");
            }
        }
        QuestionType::FreeText => {} // no canonical answer, graded manually
        QuestionType::Scale1To5 | QuestionType::YesNo => {
            if question.correct_answer.is_empty() {
                return Err(invalid(&question, "missing correct answer"));
            }
        }
    }

    Ok(question)
}

/// Validate a whole batch up front; no partial results on failure.
pub fn prepare_batch(questions: Vec<Question>) -> Result<Vec<Question>, AssessmentError> {
    questions.into_iter().map(prepare_question).collect()
}

fn invalid(question: &Question, reason: &str) -> AssessmentError {
    AssessmentError::InvalidQuestion {
        question: truncate_text(&question.text, ERROR_TEXT_CHARS),
        reason: reason.to_string(),
    }
}

/// CRUD service over the persisted bank.
pub struct QuestionBank {
    store: Arc<dyn AssessmentStore>,
}

impl QuestionBank {
    pub fn new(store: Arc<dyn AssessmentStore>) -> Self {
        Self { store }
    }

    /// List bank questions, optionally scoped to one area. Retired questions
    /// are excluded unless asked for.
    pub async fn list(&self, filter: &QuestionFilter) -> Result<Vec<Question>, AssessmentError> {
        Ok(self.store.list_questions(filter).await?)
    }

    /// Validate and persist one question.
    pub async fn create(&self, question: Question) -> Result<Question, AssessmentError> {
        let question = prepare_question(question)?;
        self.store
            .insert_questions(std::slice::from_ref(&question))
            .await?;
        tracing::debug!(id = %question.id, area = %question.area, "bank question created");
        Ok(question)
    }

    /// Validate and persist a batch; any invalid question fails the whole
    /// batch before the first write.
    pub async fn create_batch(
        &self,
        questions: Vec<Question>,
    ) -> Result<Vec<Question>, AssessmentError> {
        let questions = prepare_batch(questions)?;
        self.store.insert_questions(&questions).await?;
        tracing::debug!(count = questions.len(), "bank questions created");
        Ok(questions)
    }

    /// Replace a bank question, re-validating the new value.
    pub async fn update(&self, question: Question) -> Result<Question, AssessmentError> {
        let question = prepare_question(question)?;
        self.store.update_question(&question).await?;
        Ok(question)
    }

    /// Soft-deactivate: the question stops appearing in composition pools but
    /// stays persisted so historical templates remain gradable.
    pub async fn retire(&self, id: Uuid) -> Result<(), AssessmentError> {
        let mut question = self.store.get_question(id).await?;
        question.status = QuestionStatus::Retired;
        self.store.update_question(&question).await?;
        tracing::info!(%id, "bank question retired");
        Ok(())
    }

    /// Hard delete. Options are part of the question value and go with it.
    pub async fn delete(&self, id: Uuid) -> Result<(), AssessmentError> {
        self.store.delete_question(id).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AnswerOption;

    fn question(question_type: QuestionType) -> Question {
        Question {
            id: Uuid::new_v4(),
            text: "¿Pregunta de prueba?".into(),
            question_type,
            area: "language".into(),
            points: 10,
            status: QuestionStatus::Active,
            correct_answer: "true".into(),
            options: vec![],
            image_url: None,
            words: vec![],
            order: 0,
        }
    }

    fn option(text: &str, is_correct: bool) -> AnswerOption {
        AnswerOption {
            text: text.into(),
            is_correct,
            order: 0,
        }
    }

    #[test]
    fn choice_requires_two_options_and_one_flag() {
        let mut q = question(QuestionType::MultipleChoice);
        q.options = vec![option("A", true)];
        assert!(prepare_question(q.clone()).is_err());

        q.options = vec![option("A", true), option("B", false)];
        assert!(prepare_question(q.clone()).is_ok());

        q.options = vec![option("A", true), option("B", true)];
        let err = prepare_question(q.clone()).unwrap_err();
        assert!(err.to_string().contains("exactly one"));

        q.options = vec![option("A", false), option("B", false)];
        assert!(prepare_question(q.clone()).is_err());

        q.options = vec![option("A", true), option("  ", false)];
        assert!(prepare_question(q).is_err());
    }

    #[test]
    fn image_choice_requires_image_url() {
        let mut q = question(QuestionType::ImageChoice);
        q.options = vec![option("gato", true), option("perro", false)];
        assert!(prepare_question(q.clone()).is_err());

        q.image_url = Some("https://example.org/animales.png".into());
        assert!(prepare_question(q).is_ok());
    }

    #[test]
    fn word_order_derives_canonical_answer() {
        let mut q = question(QuestionType::WordOrder);
        q.correct_answer = String::new();
        q.words = vec!["rojo".into(), "azul".into(), "verde".into()];
        let prepared = prepare_question(q).unwrap();
        assert_eq!(prepared.correct_answer, "rojo|azul|verde");
    }

    #[test]
    fn word_order_keeps_explicit_canonical_answer() {
        let mut q = question(QuestionType::WordOrder);
        q.correct_answer = "uno|dos".into();
        q.words = vec!["uno".into(), "dos".into()];
        let prepared = prepare_question(q).unwrap();
        assert_eq!(prepared.correct_answer, "uno|dos");
    }

    #[test]
    fn word_order_needs_two_nonblank_words() {
        let mut q = question(QuestionType::WordOrder);
        q.correct_answer = String::new();
        q.words = vec!["solo".into(), "   ".into()];
        assert!(prepare_question(q).is_err());
    }

    #[test]
    fn gradable_types_need_correct_answer() {
        let mut q = question(QuestionType::Scale1To5);
        q.correct_answer = "  ".into();
        let err = prepare_question(q).unwrap_err();
        assert!(err.to_string().contains("missing correct answer"));

        let mut q = question(QuestionType::YesNo);
        q.correct_answer = String::new();
        assert!(prepare_question(q).is_err());

        // free_text is the exception.
        let mut q = question(QuestionType::FreeText);
        q.correct_answer = String::new();
        assert!(prepare_question(q).is_ok());
    }

    #[test]
    fn batch_fails_whole_and_names_offender() {
        let good = question(QuestionType::YesNo);
        let mut bad = question(QuestionType::YesNo);
        bad.text = "Una pregunta con un texto realmente largo que debe truncarse".into();
        bad.correct_answer = String::new();

        let err = prepare_batch(vec![good, bad]).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("Una pregunta con un texto"));
        assert!(msg.contains("..."), "long text should be truncated: {msg}");
    }
}
