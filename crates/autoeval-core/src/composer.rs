//! Template composition: manual authoring and random sampling from the bank.
//!
//! Both construction modes end at [`finalize`], which enforces the 100-point
//! invariant. Point distribution always restarts from scratch when the
//! question count changes; it never adjusts incrementally, so visible point
//! values may reshuffle on every edit.

use rand::seq::SliceRandom;
use rand::Rng;
use uuid::Uuid;

use crate::error::AssessmentError;
use crate::model::{Question, Template, TemplateArea, TEMPLATE_TOTAL_POINTS};

/// How many questions to draw from one subject area.
#[derive(Debug, Clone)]
pub struct AreaQuota {
    pub area: String,
    pub count: usize,
}

/// Split 100 points over `n` questions: every question gets `floor(100/n)`,
/// the first additionally absorbs the remainder. Exact for any `n >= 1`.
pub fn distribute_points(n: usize) -> Vec<u32> {
    if n == 0 {
        return Vec::new();
    }
    let n32 = n as u32;
    let base = TEMPLATE_TOTAL_POINTS / n32;
    let remainder = TEMPLATE_TOTAL_POINTS - base * n32;

    let mut points = vec![base; n];
    points[0] += remainder;
    points
}

/// Redistribute points over the current question list, from scratch.
///
/// Idempotent for a fixed question count; safe to call at any time before
/// finalizing, including after manual point edits.
pub fn redistribute(questions: &mut [Question]) {
    let points = distribute_points(questions.len());
    for (question, points) in questions.iter_mut().zip(points) {
        question.points = points;
    }
}

/// Randomly compose a question list from the bank, quota by quota.
///
/// For each area the active pool is shuffled (Fisher–Yates) and the first
/// `count` taken; the requested count is re-clamped to the pool size here
/// even though the UI already clamps. A zero quota skips its area. Selections
/// concatenate in quota order, get fresh ids and order indices (a question
/// belongs to the bank or to one template, never both), and points are
/// redistributed over the result.
pub fn compose_random<R: Rng>(
    bank: &[Question],
    quotas: &[AreaQuota],
    rng: &mut R,
) -> Result<Vec<Question>, AssessmentError> {
    let mut selected = Vec::new();

    for quota in quotas {
        if quota.count == 0 {
            continue;
        }

        let mut pool: Vec<&Question> = bank
            .iter()
            .filter(|q| q.is_active() && q.area == quota.area)
            .collect();
        pool.shuffle(rng);

        let take = quota.count.min(pool.len());
        if take < quota.count {
            tracing::debug!(
                area = %quota.area,
                requested = quota.count,
                available = pool.len(),
                "clamping area quota to available active questions"
            );
        }
        selected.extend(pool.into_iter().take(take).cloned());
    }

    if selected.is_empty() {
        return Err(AssessmentError::EmptyTemplate);
    }

    for (i, question) in selected.iter_mut().enumerate() {
        question.id = Uuid::new_v4();
        question.order = i as u32;
    }
    redistribute(&mut selected);

    Ok(selected)
}

/// Finalize a question list into a template.
///
/// Rejects an empty list and any point sum other than 100 — the error carries
/// the current total. Manual per-question point overrides are allowed, but
/// the invariant is always re-checked here, never silently repaired.
pub fn finalize(
    title: &str,
    description: &str,
    questions: Vec<Question>,
) -> Result<Template, AssessmentError> {
    if questions.is_empty() {
        return Err(AssessmentError::EmptyTemplate);
    }

    let total: u32 = questions.iter().map(|q| q.points).sum();
    if total != TEMPLATE_TOTAL_POINTS {
        return Err(AssessmentError::PointSum { total });
    }

    let area = TemplateArea::dominant(&questions);
    Ok(Template {
        id: Uuid::new_v4(),
        title: title.to_string(),
        description: description.to_string(),
        area,
        questions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{QuestionStatus, QuestionType};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn bank_question(area: &str, text: &str) -> Question {
        Question {
            id: Uuid::new_v4(),
            text: text.into(),
            question_type: QuestionType::YesNo,
            area: area.into(),
            points: 0,
            status: QuestionStatus::Active,
            correct_answer: "true".into(),
            options: vec![],
            image_url: None,
            words: vec![],
            order: 0,
        }
    }

    fn bank() -> Vec<Question> {
        let mut qs = Vec::new();
        for i in 0..5 {
            qs.push(bank_question("language", &format!("lang {i}")));
        }
        for i in 0..3 {
            qs.push(bank_question("math", &format!("math {i}")));
        }
        qs
    }

    #[test]
    fn distribution_sums_to_100_for_all_n() {
        for n in 1..=50 {
            let points = distribute_points(n);
            assert_eq!(points.iter().sum::<u32>(), 100, "n = {n}");
            let base = 100 / n as u32;
            let remainder = 100 - base * n as u32;
            assert_eq!(points[0], base + remainder);
            assert!(points[1..].iter().all(|&p| p == base));
        }
    }

    #[test]
    fn distribution_examples() {
        assert_eq!(distribute_points(1), vec![100]);
        assert_eq!(distribute_points(3), vec![34, 33, 33]);
        assert_eq!(distribute_points(4), vec![25, 25, 25, 25]);
        assert_eq!(distribute_points(7), vec![16, 14, 14, 14, 14, 14, 14]);
        assert!(distribute_points(0).is_empty());
    }

    #[test]
    fn redistribute_is_idempotent() {
        let mut qs: Vec<Question> = (0..3).map(|i| bank_question("math", &format!("{i}"))).collect();
        redistribute(&mut qs);
        let first: Vec<u32> = qs.iter().map(|q| q.points).collect();
        redistribute(&mut qs);
        let second: Vec<u32> = qs.iter().map(|q| q.points).collect();
        assert_eq!(first, second);
        assert_eq!(first, vec![34, 33, 33]);
    }

    #[test]
    fn redistribute_overwrites_manual_edits() {
        let mut qs: Vec<Question> = (0..4).map(|i| bank_question("math", &format!("{i}"))).collect();
        redistribute(&mut qs);
        qs[2].points = 99;
        redistribute(&mut qs);
        assert_eq!(qs.iter().map(|q| q.points).sum::<u32>(), 100);
        assert_eq!(qs[2].points, 25);
    }

    #[test]
    fn compose_respects_quotas_and_never_repeats() {
        let mut rng = StdRng::seed_from_u64(7);
        let quotas = vec![
            AreaQuota {
                area: "language".into(),
                count: 3,
            },
            AreaQuota {
                area: "math".into(),
                count: 2,
            },
        ];
        let selected = compose_random(&bank(), &quotas, &mut rng).unwrap();
        assert_eq!(selected.len(), 5);
        assert_eq!(
            selected.iter().filter(|q| q.area == "language").count(),
            3
        );
        assert_eq!(selected.iter().filter(|q| q.area == "math").count(), 2);

        let mut texts: Vec<&str> = selected.iter().map(|q| q.text.as_str()).collect();
        texts.sort_unstable();
        texts.dedup();
        assert_eq!(texts.len(), 5, "no question may repeat");

        // Language questions come first: quota order is template order.
        assert!(selected[..3].iter().all(|q| q.area == "language"));
        assert_eq!(selected.iter().map(|q| q.points).sum::<u32>(), 100);
    }

    #[test]
    fn compose_clamps_to_available_pool() {
        let mut rng = StdRng::seed_from_u64(1);
        let quotas = vec![AreaQuota {
            area: "math".into(),
            count: 10,
        }];
        let selected = compose_random(&bank(), &quotas, &mut rng).unwrap();
        assert_eq!(selected.len(), 3);
    }

    #[test]
    fn compose_skips_retired_questions() {
        let mut questions = bank();
        for q in questions.iter_mut().filter(|q| q.area == "math") {
            q.status = QuestionStatus::Retired;
        }
        let mut rng = StdRng::seed_from_u64(1);
        let quotas = vec![
            AreaQuota {
                area: "math".into(),
                count: 3,
            },
            AreaQuota {
                area: "language".into(),
                count: 1,
            },
        ];
        let selected = compose_random(&questions, &quotas, &mut rng).unwrap();
        assert!(selected.iter().all(|q| q.area == "language"));
        assert_eq!(selected.len(), 1);
    }

    #[test]
    fn compose_zero_quota_excludes_area() {
        let mut rng = StdRng::seed_from_u64(3);
        let quotas = vec![
            AreaQuota {
                area: "language".into(),
                count: 0,
            },
            AreaQuota {
                area: "math".into(),
                count: 2,
            },
        ];
        let selected = compose_random(&bank(), &quotas, &mut rng).unwrap();
        assert!(selected.iter().all(|q| q.area == "math"));
    }

    #[test]
    fn compose_rejects_empty_selection() {
        let mut rng = StdRng::seed_from_u64(3);
        let quotas = vec![AreaQuota {
            area: "music".into(),
            count: 4,
        }];
        let err = compose_random(&bank(), &quotas, &mut rng).unwrap_err();
        assert!(matches!(err, AssessmentError::EmptyTemplate));
    }

    #[test]
    fn compose_assigns_fresh_ids() {
        let source = bank();
        let mut rng = StdRng::seed_from_u64(9);
        let quotas = vec![AreaQuota {
            area: "math".into(),
            count: 3,
        }];
        let selected = compose_random(&source, &quotas, &mut rng).unwrap();
        for q in &selected {
            assert!(source.iter().all(|b| b.id != q.id));
        }
    }

    #[test]
    fn seeded_compose_is_deterministic() {
        let source = bank();
        let quotas = vec![AreaQuota {
            area: "language".into(),
            count: 3,
        }];
        let a = compose_random(&source, &quotas, &mut StdRng::seed_from_u64(42)).unwrap();
        let b = compose_random(&source, &quotas, &mut StdRng::seed_from_u64(42)).unwrap();
        let texts = |qs: &[Question]| qs.iter().map(|q| q.text.clone()).collect::<Vec<_>>();
        assert_eq!(texts(&a), texts(&b));
    }

    #[test]
    fn finalize_checks_point_sum() {
        let mut qs: Vec<Question> = (0..3).map(|i| bank_question("math", &format!("{i}"))).collect();
        redistribute(&mut qs);

        // Manual override that keeps the sum intact is fine.
        qs[0].points = 50;
        qs[1].points = 25;
        qs[2].points = 25;
        let template = finalize("Mates", "", qs.clone()).unwrap();
        assert_eq!(template.total_points(), 100);
        assert_eq!(template.area, TemplateArea::Single("math".into()));

        // A broken sum is rejected with the current total, never repaired.
        qs[0].points = 60;
        let err = finalize("Mates", "", qs).unwrap_err();
        match err {
            AssessmentError::PointSum { total } => assert_eq!(total, 110),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn finalize_rejects_empty_template() {
        let err = finalize("Vacía", "", Vec::new()).unwrap_err();
        assert!(matches!(err, AssessmentError::EmptyTemplate));
    }
}
