//! Graded-session reports with JSON persistence and markdown rendering.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{ScoreSummary, Session, Template};

/// A persisted record of one completed session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionReport {
    /// Unique report identifier.
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub respondent_id: String,
    pub template: TemplateSummary,
    /// Per-question outcomes, in template order.
    pub entries: Vec<ReportEntry>,
    pub score: ScoreSummary,
}

/// Summary of the template graded against (without the full question list).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateSummary {
    pub id: Uuid,
    pub title: String,
    pub question_count: usize,
}

/// One question's grading outcome together with the submitted value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportEntry {
    pub question_text: String,
    pub submitted: String,
    /// `None` = manual review.
    pub is_correct: Option<bool>,
    pub points_earned: u32,
    pub points_max: u32,
}

impl SessionReport {
    /// Build a report from a completed session and its template.
    ///
    /// Returns `None` for a session that has not been submitted yet.
    pub fn from_session(template: &Template, session: &Session) -> Option<Self> {
        let score = session.score.clone()?;

        let entries = session
            .graded
            .iter()
            .map(|g| {
                let text = template
                    .question(g.question_id)
                    .map(|q| q.text.clone())
                    .unwrap_or_default();
                let submitted = session
                    .answers
                    .get(&g.question_id)
                    .cloned()
                    .unwrap_or_default();
                ReportEntry {
                    question_text: text,
                    submitted,
                    is_correct: g.is_correct,
                    points_earned: g.points_earned,
                    points_max: g.points_max,
                }
            })
            .collect();

        Some(Self {
            id: Uuid::new_v4(),
            created_at: session.completed_at.unwrap_or_else(Utc::now),
            respondent_id: session.respondent_id.clone(),
            template: TemplateSummary {
                id: template.id,
                title: template.title.clone(),
                question_count: template.questions.len(),
            },
            entries,
            score,
        })
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: SessionReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }

    /// Format the report as markdown.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str(&format!(
            "## {} ({})\n\n",
            self.template.title, self.respondent_id
        ));
        md.push_str(&format!(
            "**Score:** {}/{} points ({}%, {}/10); {} correct, {} incorrect, {} for manual review\n\n",
            self.score.points_earned_total,
            self.score.points_max_total,
            self.score.score_percent,
            self.score.score_out_of_ten,
            self.score.correct_count,
            self.score.incorrect_count,
            self.score.manual_review_count,
        ));

        md.push_str("| Question | Answer | Result | Points |\n");
        md.push_str("|----------|--------|--------|--------|\n");
        for entry in &self.entries {
            let result = match entry.is_correct {
                Some(true) => "correct",
                Some(false) => "incorrect",
                None => "manual review",
            };
            md.push_str(&format!(
                "| {} | {} | {} | {}/{} |\n",
                entry.question_text, entry.submitted, result, entry.points_earned, entry.points_max
            ));
        }

        md
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grading::grade_all;
    use crate::model::{
        AnswerMap, Question, QuestionStatus, QuestionType, SessionState, TemplateArea,
    };
    use crate::score::aggregate;

    fn template() -> Template {
        let q1 = Question {
            id: Uuid::new_v4(),
            text: "¿Reconoce los números?".into(),
            question_type: QuestionType::YesNo,
            area: "math".into(),
            points: 60,
            status: QuestionStatus::Active,
            correct_answer: "true".into(),
            options: vec![],
            image_url: None,
            words: vec![],
            order: 0,
        };
        let mut q2 = q1.clone();
        q2.id = Uuid::new_v4();
        q2.text = "Describe su actitud".into();
        q2.question_type = QuestionType::FreeText;
        q2.points = 40;
        q2.correct_answer = String::new();
        q2.order = 1;

        Template {
            id: Uuid::new_v4(),
            title: "Informe trimestral".into(),
            description: String::new(),
            area: TemplateArea::Mixed,
            questions: vec![q1, q2],
        }
    }

    fn completed_session(template: &Template) -> Session {
        let mut answers = AnswerMap::new();
        answers.insert(template.questions[0].id, "sí".into());
        answers.insert(template.questions[1].id, "muy atento".into());
        let graded = grade_all(template, &answers);
        let score = aggregate(&graded);

        let mut session = Session::new("vol-7", template.id);
        session.answers = answers;
        session.graded = graded;
        session.score = Some(score);
        session.state = SessionState::Completed;
        session.completed_at = Some(Utc::now());
        session
    }

    #[test]
    fn report_from_completed_session() {
        let template = template();
        let session = completed_session(&template);

        let report = SessionReport::from_session(&template, &session).unwrap();
        assert_eq!(report.template.question_count, 2);
        assert_eq!(report.entries.len(), 2);
        assert_eq!(report.entries[0].is_correct, Some(true));
        assert_eq!(report.entries[1].is_correct, None);
        assert_eq!(report.score.points_earned_total, 60);
        assert_eq!(report.score.manual_review_count, 1);
    }

    #[test]
    fn draft_session_yields_no_report() {
        let template = template();
        let draft = Session::new("vol-7", template.id);
        assert!(SessionReport::from_session(&template, &draft).is_none());
    }

    #[test]
    fn json_roundtrip() {
        let template = template();
        let session = completed_session(&template);
        let report = SessionReport::from_session(&template, &session).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        report.save_json(&path).unwrap();
        let loaded = SessionReport::load_json(&path).unwrap();

        assert_eq!(loaded.respondent_id, "vol-7");
        assert_eq!(loaded.entries.len(), 2);
        assert_eq!(loaded.score.score_percent, report.score.score_percent);
    }

    #[test]
    fn markdown_output() {
        let template = template();
        let session = completed_session(&template);
        let report = SessionReport::from_session(&template, &session).unwrap();

        let md = report.to_markdown();
        assert!(md.contains("Informe trimestral"));
        assert!(md.contains("manual review"));
        assert!(md.contains("60/60"));
    }
}
