//! Session-level score aggregation.

use crate::model::{GradedAnswer, ScoreSummary};

/// Sum per-question results into the session score.
///
/// The three classification counts always sum to the number of graded
/// answers. Manual-review items contribute zero earned points but their full
/// `points_max`; a session completes with its auto-gradable-only score even
/// when some answers await a human reviewer.
pub fn aggregate(graded: &[GradedAnswer]) -> ScoreSummary {
    let points_earned_total: u32 = graded.iter().map(|g| g.points_earned).sum();
    let points_max_total: u32 = graded.iter().map(|g| g.points_max).sum();

    let ratio = if points_max_total == 0 {
        0.0
    } else {
        points_earned_total as f64 / points_max_total as f64
    };

    ScoreSummary {
        points_earned_total,
        points_max_total,
        score_percent: (ratio * 100.0).round() as u32,
        score_out_of_ten: (ratio * 10.0).round() as u32,
        correct_count: graded.iter().filter(|g| g.is_correct == Some(true)).count(),
        incorrect_count: graded
            .iter()
            .filter(|g| g.is_correct == Some(false))
            .count(),
        manual_review_count: graded.iter().filter(|g| g.is_correct.is_none()).count(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn graded(is_correct: Option<bool>, earned: u32, max: u32) -> GradedAnswer {
        GradedAnswer {
            question_id: Uuid::new_v4(),
            is_correct,
            points_earned: earned,
            points_max: max,
        }
    }

    #[test]
    fn totals_and_percent() {
        let results = vec![
            graded(Some(true), 34, 34),
            graded(Some(true), 33, 33),
            graded(None, 0, 33),
        ];
        let s = aggregate(&results);
        assert_eq!(s.points_earned_total, 67);
        assert_eq!(s.points_max_total, 100);
        assert_eq!(s.score_percent, 67);
        assert_eq!(s.score_out_of_ten, 7);
        assert_eq!(s.correct_count, 2);
        assert_eq!(s.incorrect_count, 0);
        assert_eq!(s.manual_review_count, 1);
    }

    #[test]
    fn counts_partition_all_answers() {
        let results = vec![
            graded(Some(true), 25, 25),
            graded(Some(false), 0, 25),
            graded(Some(false), 0, 25),
            graded(None, 0, 25),
        ];
        let s = aggregate(&results);
        assert_eq!(
            s.correct_count + s.incorrect_count + s.manual_review_count,
            results.len()
        );
        assert!(s.score_percent <= 100);
    }

    #[test]
    fn rounding_is_nearest() {
        // 1/3 of 100 -> 33%, 3/10.
        let results = vec![
            graded(Some(true), 33, 33),
            graded(Some(false), 0, 33),
            graded(Some(false), 0, 34),
        ];
        let s = aggregate(&results);
        assert_eq!(s.score_percent, 33);
        assert_eq!(s.score_out_of_ten, 3);

        // 2/3 -> 67%, 7/10.
        let results = vec![
            graded(Some(true), 33, 33),
            graded(Some(true), 34, 34),
            graded(Some(false), 0, 33),
        ];
        let s = aggregate(&results);
        assert_eq!(s.score_percent, 67);
        assert_eq!(s.score_out_of_ten, 7);
    }

    #[test]
    fn empty_input_is_all_zero() {
        let s = aggregate(&[]);
        assert_eq!(s.points_max_total, 0);
        assert_eq!(s.score_percent, 0);
        assert_eq!(s.score_out_of_ten, 0);
    }

    #[test]
    fn proportional_scale_points_count_toward_percent() {
        // A no-canonical scale answer classified incorrect still earns.
        let results = vec![graded(Some(false), 8, 20), graded(Some(true), 80, 80)];
        let s = aggregate(&results);
        assert_eq!(s.points_earned_total, 88);
        assert_eq!(s.score_percent, 88);
    }
}
