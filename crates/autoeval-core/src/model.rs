//! Core data model types for autoeval.
//!
//! These are the fundamental types the entire autoeval system uses to
//! represent bank questions, gradable templates, and assessment sessions.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The point total every finalized template must carry.
pub const TEMPLATE_TOTAL_POINTS: u32 = 100;

/// How a question is answered and graded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    /// Numeric 1–5 scale.
    #[serde(rename = "scale_1_5")]
    Scale1To5,
    /// Yes/no, accepting the Spanish truthy vocabulary on the wire.
    YesNo,
    /// Free text; cannot be auto-graded.
    FreeText,
    /// Pick one option by its text.
    MultipleChoice,
    /// Reorder a shuffled word list.
    WordOrder,
    /// Pick one option, options rendered as images.
    ImageChoice,
}

impl QuestionType {
    /// True for the option-based types that require an `options` list.
    pub fn uses_options(self) -> bool {
        matches!(self, QuestionType::MultipleChoice | QuestionType::ImageChoice)
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            QuestionType::Scale1To5 => "scale_1_5",
            QuestionType::YesNo => "yes_no",
            QuestionType::FreeText => "free_text",
            QuestionType::MultipleChoice => "multiple_choice",
            QuestionType::WordOrder => "word_order",
            QuestionType::ImageChoice => "image_choice",
        };
        write!(f, "{s}")
    }
}

impl FromStr for QuestionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "scale_1_5" => Ok(QuestionType::Scale1To5),
            "yes_no" => Ok(QuestionType::YesNo),
            "free_text" => Ok(QuestionType::FreeText),
            "multiple_choice" => Ok(QuestionType::MultipleChoice),
            "word_order" => Ok(QuestionType::WordOrder),
            "image_choice" => Ok(QuestionType::ImageChoice),
            other => Err(format!("unknown question type: {other}")),
        }
    }
}

/// Whether a bank question is still offered for new templates.
///
/// Retired questions stay persisted so historical templates built from them
/// remain gradable; `points` is a pure weight and never doubles as a status
/// flag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionStatus {
    #[default]
    Active,
    Retired,
}

/// One selectable option of a `multiple_choice` / `image_choice` question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerOption {
    /// Text shown to (and submitted by) the respondent.
    pub text: String,
    /// Exactly one option per question carries this flag.
    #[serde(default)]
    pub is_correct: bool,
    /// Display position.
    #[serde(default)]
    pub order: u32,
}

/// One bank or template item.
///
/// A question belongs either to the bank or to exactly one template; template
/// questions are owned copies with their own ids, never shared rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    /// Unique identifier.
    pub id: Uuid,
    /// Prompt shown to the respondent.
    pub text: String,
    /// How this question is answered and graded.
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    /// Subject tag, e.g. "language", "fine_motor", "literacy", "math".
    pub area: String,
    /// Point weight within a template (template sums must equal 100).
    pub points: u32,
    /// Active/retired status for bank questions.
    #[serde(default)]
    pub status: QuestionStatus,
    /// Canonical answer; empty only for `free_text` (derived for `word_order`).
    #[serde(default)]
    pub correct_answer: String,
    /// Options for the option-based types, empty otherwise.
    #[serde(default)]
    pub options: Vec<AnswerOption>,
    /// Required for `image_choice`, optional metadata otherwise.
    #[serde(default)]
    pub image_url: Option<String>,
    /// `word_order` payload: the words in correct order (shown shuffled).
    #[serde(default)]
    pub words: Vec<String>,
    /// Position within the bank area or template.
    #[serde(default)]
    pub order: u32,
}

impl Question {
    /// True if this question may be picked for new templates.
    pub fn is_active(&self) -> bool {
        self.status == QuestionStatus::Active
    }

    /// The option flagged correct, if any.
    pub fn correct_option(&self) -> Option<&AnswerOption> {
        self.options.iter().find(|o| o.is_correct)
    }
}

/// Subject area of a template: a single dominant area or mixed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TemplateArea {
    Mixed,
    Single(String),
}

impl TemplateArea {
    /// The dominant area of a question list, or `Mixed`.
    pub fn dominant(questions: &[Question]) -> Self {
        let mut areas = questions.iter().map(|q| q.area.as_str());
        match areas.next() {
            None => TemplateArea::Mixed,
            Some(first) => {
                if areas.all(|a| a == first) {
                    TemplateArea::Single(first.to_string())
                } else {
                    TemplateArea::Mixed
                }
            }
        }
    }
}

impl From<String> for TemplateArea {
    fn from(s: String) -> Self {
        if s.is_empty() || s == "mixed" {
            TemplateArea::Mixed
        } else {
            TemplateArea::Single(s)
        }
    }
}

impl From<TemplateArea> for String {
    fn from(area: TemplateArea) -> Self {
        match area {
            TemplateArea::Mixed => "mixed".to_string(),
            TemplateArea::Single(s) => s,
        }
    }
}

impl fmt::Display for TemplateArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateArea::Mixed => write!(f, "mixed"),
            TemplateArea::Single(s) => write!(f, "{s}"),
        }
    }
}

/// A finalized, gradable questionnaire: fixed ordered questions whose point
/// weights sum to exactly 100.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Template {
    /// Unique identifier.
    pub id: Uuid,
    /// Human-readable title.
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Dominant subject area, or mixed.
    pub area: TemplateArea,
    /// Ordered questions.
    pub questions: Vec<Question>,
}

impl Template {
    /// Sum of question point weights.
    pub fn total_points(&self) -> u32 {
        self.questions.iter().map(|q| q.points).sum()
    }

    /// Look a question up by id.
    pub fn question(&self, id: Uuid) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

/// Lifecycle state of a session. `Completed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    InProgress,
    Completed,
}

/// Raw submitted answers, keyed by question id.
///
/// Values are the wire-level strings: a number for `scale_1_5`, a truthy or
/// falsy literal for `yes_no`, option text for the choice types, and a
/// `|`-joined token list for `word_order`.
pub type AnswerMap = HashMap<Uuid, String>;

/// One respondent's attempt (draft or completed) at one template.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: Uuid,
    pub respondent_id: String,
    pub template_id: Uuid,
    pub state: SessionState,
    /// Raw submitted values; replaced wholesale on every draft save.
    #[serde(default)]
    pub answers: AnswerMap,
    /// Per-question grading results; populated only at `Completed`.
    #[serde(default)]
    pub graded: Vec<GradedAnswer>,
    /// Aggregate score; present only at `Completed`.
    #[serde(default)]
    pub score: Option<ScoreSummary>,
    pub started_at: DateTime<Utc>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Session {
    /// A fresh in-progress session for a (respondent, template) pair.
    pub fn new(respondent_id: &str, template_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            respondent_id: respondent_id.to_string(),
            template_id,
            state: SessionState::InProgress,
            answers: AnswerMap::new(),
            graded: Vec::new(),
            score: None,
            started_at: Utc::now(),
            completed_at: None,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.state == SessionState::Completed
    }
}

/// Grading outcome for one question. `is_correct = None` means the answer
/// needs manual review (free text).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradedAnswer {
    pub question_id: Uuid,
    pub is_correct: Option<bool>,
    pub points_earned: u32,
    pub points_max: u32,
}

/// Session-level aggregate computed from the graded answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreSummary {
    pub points_earned_total: u32,
    pub points_max_total: u32,
    /// `round(earned / max * 100)`.
    pub score_percent: u32,
    /// `round(earned / max * 10)`.
    pub score_out_of_ten: u32,
    pub correct_count: usize,
    pub incorrect_count: usize,
    /// Questions graded `None` (free text awaiting a human reviewer).
    pub manual_review_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(area: &str) -> Question {
        Question {
            id: Uuid::new_v4(),
            text: "¿Cuánto es 2 + 2?".into(),
            question_type: QuestionType::Scale1To5,
            area: area.into(),
            points: 10,
            status: QuestionStatus::Active,
            correct_answer: "4".into(),
            options: vec![],
            image_url: None,
            words: vec![],
            order: 0,
        }
    }

    #[test]
    fn question_type_display_and_parse() {
        assert_eq!(QuestionType::Scale1To5.to_string(), "scale_1_5");
        assert_eq!(QuestionType::YesNo.to_string(), "yes_no");
        assert_eq!(
            "word_order".parse::<QuestionType>().unwrap(),
            QuestionType::WordOrder
        );
        assert_eq!(
            "Multiple_Choice".parse::<QuestionType>().unwrap(),
            QuestionType::MultipleChoice
        );
        assert!("essay".parse::<QuestionType>().is_err());
    }

    #[test]
    fn question_type_serde_names() {
        let json = serde_json::to_string(&QuestionType::Scale1To5).unwrap();
        assert_eq!(json, "\"scale_1_5\"");
        let parsed: QuestionType = serde_json::from_str("\"image_choice\"").unwrap();
        assert_eq!(parsed, QuestionType::ImageChoice);
    }

    #[test]
    fn template_area_dominant() {
        let qs = vec![question("math"), question("math")];
        assert_eq!(
            TemplateArea::dominant(&qs),
            TemplateArea::Single("math".into())
        );

        let mixed = vec![question("math"), question("language")];
        assert_eq!(TemplateArea::dominant(&mixed), TemplateArea::Mixed);
        assert_eq!(TemplateArea::dominant(&[]), TemplateArea::Mixed);
    }

    #[test]
    fn template_area_serde_uses_plain_string() {
        let json = serde_json::to_string(&TemplateArea::Single("math".into())).unwrap();
        assert_eq!(json, "\"math\"");
        let mixed: TemplateArea = serde_json::from_str("\"mixed\"").unwrap();
        assert_eq!(mixed, TemplateArea::Mixed);
    }

    #[test]
    fn question_serde_roundtrip() {
        let q = question("literacy");
        let json = serde_json::to_string(&q).unwrap();
        assert!(json.contains("\"type\":\"scale_1_5\""));
        let back: Question = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, q.id);
        assert_eq!(back.status, QuestionStatus::Active);
    }

    #[test]
    fn new_session_starts_in_progress() {
        let s = Session::new("vol-1", Uuid::new_v4());
        assert_eq!(s.state, SessionState::InProgress);
        assert!(s.answers.is_empty());
        assert!(s.score.is_none());
        assert!(!s.is_completed());
    }
}
