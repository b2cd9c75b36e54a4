//! TOML question bank and template files.
//!
//! Banks and templates are authored as TOML; this module loads, validates,
//! and (for composed templates) writes them.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::bank::prepare_question;
use crate::composer::finalize;
use crate::model::{AnswerOption, Question, QuestionStatus, QuestionType, Template};

/// A named pool of reusable bank questions.
#[derive(Debug, Clone)]
pub struct QuestionBankFile {
    pub id: String,
    pub name: String,
    pub description: String,
    pub questions: Vec<Question>,
}

/// Intermediate TOML structure for bank files.
#[derive(Debug, Deserialize)]
struct TomlBankFile {
    bank: TomlBankHeader,
    #[serde(default)]
    questions: Vec<TomlQuestion>,
}

#[derive(Debug, Deserialize)]
struct TomlBankHeader {
    id: String,
    name: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct TomlQuestion {
    text: String,
    #[serde(rename = "type")]
    question_type: String,
    area: String,
    #[serde(default)]
    points: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    status: Option<String>,
    #[serde(default)]
    correct_answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    words: Vec<String>,
    // Array-of-tables, kept last so serialized TOML stays well-formed.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    options: Vec<TomlOption>,
}

#[derive(Debug, Serialize, Deserialize)]
struct TomlOption {
    text: String,
    #[serde(default)]
    is_correct: bool,
}

/// Intermediate TOML structure for template files.
#[derive(Debug, Serialize, Deserialize)]
struct TomlTemplateFile {
    template: TomlTemplateHeader,
    #[serde(default)]
    questions: Vec<TomlQuestion>,
}

#[derive(Debug, Serialize, Deserialize)]
struct TomlTemplateHeader {
    title: String,
    #[serde(default)]
    description: String,
}

fn question_from_toml(toml: TomlQuestion, order: u32) -> Result<Question> {
    let question_type: QuestionType = toml
        .question_type
        .parse()
        .map_err(|e: String| anyhow::anyhow!("{e}"))?;

    let status = match toml.status.as_deref() {
        None | Some("active") => QuestionStatus::Active,
        Some("retired") => QuestionStatus::Retired,
        Some(other) => anyhow::bail!("unknown question status: {other}"),
    };

    Ok(Question {
        id: Uuid::new_v4(),
        text: toml.text,
        question_type,
        area: toml.area,
        points: toml.points,
        status,
        correct_answer: toml.correct_answer,
        options: toml
            .options
            .into_iter()
            .enumerate()
            .map(|(i, o)| AnswerOption {
                text: o.text,
                is_correct: o.is_correct,
                order: i as u32,
            })
            .collect(),
        image_url: toml.image_url,
        words: toml.words,
        order,
    })
}

fn question_to_toml(question: &Question) -> TomlQuestion {
    TomlQuestion {
        text: question.text.clone(),
        question_type: question.question_type.to_string(),
        area: question.area.clone(),
        points: question.points,
        status: None,
        correct_answer: question.correct_answer.clone(),
        image_url: question.image_url.clone(),
        words: question.words.clone(),
        options: question
            .options
            .iter()
            .map(|o| TomlOption {
                text: o.text.clone(),
                is_correct: o.is_correct,
            })
            .collect(),
    }
}

/// Parse a bank TOML file.
pub fn parse_bank_file(path: &Path) -> Result<QuestionBankFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read bank file: {}", path.display()))?;
    parse_bank_str(&content, path)
}

/// Parse a bank TOML string (useful for testing).
pub fn parse_bank_str(content: &str, source_path: &Path) -> Result<QuestionBankFile> {
    let parsed: TomlBankFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let questions = parsed
        .questions
        .into_iter()
        .enumerate()
        .map(|(i, q)| question_from_toml(q, i as u32))
        .collect::<Result<Vec<_>>>()?;

    Ok(QuestionBankFile {
        id: parsed.bank.id,
        name: parsed.bank.name,
        description: parsed.bank.description,
        questions,
    })
}

/// Parse a template TOML file, enforcing the finalize-time invariants
/// (non-empty, 100-point sum).
pub fn parse_template_file(path: &Path) -> Result<Template> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read template file: {}", path.display()))?;
    parse_template_str(&content, path)
}

/// Parse a template TOML string.
pub fn parse_template_str(content: &str, source_path: &Path) -> Result<Template> {
    let parsed: TomlTemplateFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let questions = parsed
        .questions
        .into_iter()
        .enumerate()
        .map(|(i, q)| question_from_toml(q, i as u32))
        .collect::<Result<Vec<_>>>()?;

    let template = finalize(
        &parsed.template.title,
        &parsed.template.description,
        questions,
    )
    .with_context(|| format!("invalid template: {}", source_path.display()))?;
    Ok(template)
}

/// Write a template as TOML, the same shape `parse_template_file` reads.
pub fn write_template_file(template: &Template, path: &Path) -> Result<()> {
    let file = TomlTemplateFile {
        template: TomlTemplateHeader {
            title: template.title.clone(),
            description: template.description.clone(),
        },
        questions: template.questions.iter().map(question_to_toml).collect(),
    };

    let content = toml::to_string_pretty(&file).context("failed to serialize template")?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)
        .with_context(|| format!("failed to write template to {}", path.display()))?;
    Ok(())
}

/// Recursively load all `.toml` bank files from a directory, skipping (and
/// logging) files that fail to parse.
pub fn load_bank_directory(dir: &Path) -> Result<Vec<QuestionBankFile>> {
    let mut banks = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
    {
        let entry = entry?;
        let path = entry.path();

        if path.is_dir() {
            banks.extend(load_bank_directory(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            match parse_bank_file(&path) {
                Ok(bank) => banks.push(bank),
                Err(e) => {
                    tracing::warn!("skipping {}: {}", path.display(), e);
                }
            }
        }
    }

    Ok(banks)
}

/// A warning from bank validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// Truncated text of the question concerned, if any.
    pub question: Option<String>,
    pub message: String,
}

/// Validate a bank's questions for common issues without rejecting the file.
pub fn validate_bank(bank: &QuestionBankFile) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    let mut seen = std::collections::HashSet::new();
    for question in &bank.questions {
        if !seen.insert(question.text.trim().to_lowercase()) {
            warnings.push(ValidationWarning {
                question: Some(question.text.clone()),
                message: "duplicate question text".into(),
            });
        }
    }

    for question in &bank.questions {
        if let Err(e) = prepare_question(question.clone()) {
            warnings.push(ValidationWarning {
                question: Some(question.text.clone()),
                message: e.to_string(),
            });
        }
    }

    if bank.questions.is_empty() {
        warnings.push(ValidationWarning {
            question: None,
            message: "bank contains no questions".into(),
        });
    }

    warnings
}
