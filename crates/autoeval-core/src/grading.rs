//! Per-question grading rules.
//!
//! Grading is a pure, total function: it never fails. An unparseable or
//! type-mismatched answer scores as incorrect rather than aborting, so one
//! bad value never blocks the rest of a session. `points_max` is always the
//! question's weight.
//!
//! Every auto-graded type is binary (full points or zero) with one
//! deliberate asymmetry: a `scale_1_5` question *without* a canonical answer
//! awards proportional points unconditionally, even when classified
//! incorrect. Historical data depends on these exact rules.

use std::collections::HashMap;

use uuid::Uuid;

use crate::model::{AnswerMap, GradedAnswer, Question, QuestionType, Template};

/// Truthy vocabulary accepted on both sides of a `yes_no` comparison.
///
/// Stored answer data uses these literals; the set must not change.
const TRUTHY: [&str; 5] = ["true", "si", "sí", "verdadero", "1"];

/// Grade one submitted answer against its question.
pub fn grade_question(question: &Question, answer: &str) -> GradedAnswer {
    let points_max = question.points;

    let (is_correct, points_earned) = match question.question_type {
        QuestionType::FreeText => (None, 0),
        QuestionType::Scale1To5 => grade_scale(question, answer),
        QuestionType::YesNo => grade_yes_no(question, answer),
        QuestionType::MultipleChoice | QuestionType::ImageChoice => grade_choice(question, answer),
        QuestionType::WordOrder => grade_word_order(question, answer),
    };

    GradedAnswer {
        question_id: question.id,
        is_correct,
        points_earned,
        points_max,
    }
}

/// Grade a whole answer set in template order.
///
/// A question with no submitted entry grades as an empty submission.
pub fn grade_all(template: &Template, answers: &AnswerMap) -> Vec<GradedAnswer> {
    template
        .questions
        .iter()
        .map(|q| {
            let raw = answers.get(&q.id).map(String::as_str).unwrap_or("");
            grade_question(q, raw)
        })
        .collect()
}

/// Count of template questions with a submitted entry.
pub fn answered_count(template: &Template, answers: &HashMap<Uuid, String>) -> usize {
    template
        .questions
        .iter()
        .filter(|q| answers.contains_key(&q.id))
        .count()
}

fn parse_scale(value: &str) -> Option<u32> {
    value
        .trim()
        .parse::<u32>()
        .ok()
        .filter(|v| (1..=5).contains(v))
}

fn grade_scale(question: &Question, answer: &str) -> (Option<bool>, u32) {
    let submitted = parse_scale(answer);

    match parse_scale(&question.correct_answer) {
        // Canonical answer defined: strict equality, full or zero.
        Some(expected) => match submitted {
            Some(s) if s == expected => (Some(true), question.points),
            _ => (Some(false), 0),
        },
        // No canonical answer: "correct" means >= 4, but points are
        // proportional either way.
        None => match submitted {
            Some(s) => {
                let earned = (s as f64 / 5.0 * question.points as f64).round() as u32;
                (Some(s >= 4), earned)
            }
            None => (Some(false), 0),
        },
    }
}

/// Normalize a yes/no wire value to a boolean via the truthy vocabulary.
fn truthy(value: &str) -> bool {
    let v = value.trim().to_lowercase();
    TRUTHY.contains(&v.as_str())
}

fn grade_yes_no(question: &Question, answer: &str) -> (Option<bool>, u32) {
    if truthy(answer) == truthy(&question.correct_answer) {
        (Some(true), question.points)
    } else {
        (Some(false), 0)
    }
}

fn grade_choice(question: &Question, answer: &str) -> (Option<bool>, u32) {
    // Compare against the flagged-correct option; fall back to the canonical
    // answer when no option carries the flag.
    let expected = question
        .correct_option()
        .map(|o| o.text.as_str())
        .unwrap_or(question.correct_answer.as_str());

    if answer.trim().to_lowercase() == expected.trim().to_lowercase() {
        (Some(true), question.points)
    } else {
        (Some(false), 0)
    }
}

/// Split a `|`-joined word list into normalized tokens.
fn word_tokens(value: &str) -> Vec<String> {
    value
        .split('|')
        .map(|t| t.trim().to_lowercase())
        .collect()
}

fn grade_word_order(question: &Question, answer: &str) -> (Option<bool>, u32) {
    if word_tokens(answer) == word_tokens(&question.correct_answer) {
        (Some(true), question.points)
    } else {
        (Some(false), 0)
    }
}
