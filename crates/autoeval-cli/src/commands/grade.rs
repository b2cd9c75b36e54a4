//! The `autoeval grade` command.
//!
//! Loads a template and a positional answers file, drives a full submission
//! through the session engine against an in-memory store, and renders the
//! graded report.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use comfy_table::{presets::UTF8_FULL, Cell, Table};
use serde::Deserialize;

use autoeval_core::model::AnswerMap;
use autoeval_core::parser;
use autoeval_core::report::SessionReport;
use autoeval_core::session::SessionEngine;
use autoeval_core::store::AssessmentStore;
use autoeval_store::MemoryStore;

/// Submitted answers, positional by template question order.
#[derive(Debug, Deserialize)]
struct AnswersFile {
    respondent_id: String,
    answers: Vec<String>,
}

pub async fn execute(
    template_path: PathBuf,
    answers_path: PathBuf,
    output: Option<PathBuf>,
    format: String,
) -> Result<()> {
    let template = parser::parse_template_file(&template_path)?;

    let content = std::fs::read_to_string(&answers_path)
        .with_context(|| format!("failed to read answers from {}", answers_path.display()))?;
    let answers_file: AnswersFile =
        serde_json::from_str(&content).context("failed to parse answers JSON")?;

    anyhow::ensure!(
        answers_file.answers.len() <= template.questions.len(),
        "{} answers given but the template has {} questions",
        answers_file.answers.len(),
        template.questions.len()
    );

    let answers: AnswerMap = template
        .questions
        .iter()
        .zip(answers_file.answers.iter())
        .map(|(q, a)| (q.id, a.clone()))
        .collect();

    let store = Arc::new(MemoryStore::new());
    store.save_template(&template).await?;
    let engine = SessionEngine::new(store);

    let session = engine
        .submit(&answers_file.respondent_id, template.id, answers)
        .await?;

    let report = SessionReport::from_session(&template, &session)
        .context("submitted session has no score")?;

    match format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&report)?),
        "markdown" | "md" => println!("{}", report.to_markdown()),
        _ => print_table(&report),
    }

    if let Some(path) = output {
        report.save_json(&path)?;
        println!("Report saved to {}", path.display());
    }

    Ok(())
}

fn print_table(report: &SessionReport) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Question", "Answer", "Result", "Points"]);

    for entry in &report.entries {
        let result = match entry.is_correct {
            Some(true) => "correct",
            Some(false) => "incorrect",
            None => "manual review",
        };
        table.add_row(vec![
            Cell::new(&entry.question_text),
            Cell::new(&entry.submitted),
            Cell::new(result),
            Cell::new(format!("{}/{}", entry.points_earned, entry.points_max)),
        ]);
    }

    println!("{table}");
    println!(
        "Score: {}/{} points, {}% ({}/10)",
        report.score.points_earned_total,
        report.score.points_max_total,
        report.score.score_percent,
        report.score.score_out_of_ten,
    );
    println!(
        "{} correct, {} incorrect, {} for manual review",
        report.score.correct_count,
        report.score.incorrect_count,
        report.score.manual_review_count,
    );
}
