use std::collections::HashSet;
use std::hash::Hash;

use crate::error::{MetricError, Result, Side};
use crate::score::Score;

/// Deduplicated items of one side of an example.
pub type ItemSet<T> = HashSet<T>;

// Exact-match overlap: order and repetition are ignored, so
// Reference: ["cat", "dog", "dog"]
// Candidate: ["dog", "cat"]
// is a perfect score.
pub fn set_f1_score<T: Hash + Eq>(reference: &ItemSet<T>, candidate: &ItemSet<T>) -> Result<Score> {
    // An empty side leaves precision or recall undefined; the caller decides
    // whether to skip, zero-fill or abort.
    if candidate.is_empty() {
        return Err(MetricError::DegenerateInput {
            side: Side::Candidate,
        });
    }
    if reference.is_empty() {
        return Err(MetricError::DegenerateInput {
            side: Side::Reference,
        });
    }

    let num_common = reference.intersection(candidate).count();
    let precision = num_common as f64 / candidate.len() as f64;
    let recall = num_common as f64 / reference.len() as f64;

    let f = if num_common == 0 {
        0.0
    } else {
        2.0 * precision * recall / (precision + recall)
    };
    Ok(Score::new(precision, recall, f))
}

/// Collects both sides into sets and scores them.
pub fn score_items<T, R, C>(reference: R, candidate: C) -> Result<Score>
where
    T: Hash + Eq,
    R: IntoIterator<Item = T>,
    C: IntoIterator<Item = T>,
{
    let reference: ItemSet<T> = reference.into_iter().collect();
    let candidate: ItemSet<T> = candidate.into_iter().collect();
    set_f1_score(&reference, &candidate)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close_enough(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_perfect_match() {
        let score = score_items(["cat", "dog"], ["cat", "dog"]).unwrap();
        assert_eq!(score.f, 1.0);
        assert_eq!(score.precision, 1.0);
        assert_eq!(score.recall, 1.0);
    }

    #[test]
    fn test_full_overlap_different_order_and_repeats() {
        let score = score_items(["cat", "dog", "dog"], ["dog", "cat", "cat"]).unwrap();
        assert_eq!(score.f, 1.0);
    }

    #[test]
    fn test_partial_overlap() {
        let score = score_items(["cat", "dog"], ["dog", "bird"]).unwrap();
        assert!(close_enough(score.precision, 0.5));
        assert!(close_enough(score.recall, 0.5));
        assert!(close_enough(score.f, 0.5));
    }

    #[test]
    fn test_precision_and_recall_use_their_own_denominators() {
        // common: "the", "fox"
        // precision = 2/3
        // recall = 2/4
        // f1 = 2 * (2/3 * 2/4) / (2/3 + 2/4) = 4/7
        let score = score_items(
            ["the", "quick", "brown", "fox"],
            ["the", "fox", "jumps"],
        )
        .unwrap();
        assert!(close_enough(score.precision, 2.0 / 3.0));
        assert!(close_enough(score.recall, 0.5));
        assert!(close_enough(score.f, 4.0 / 7.0));
    }

    #[test]
    fn test_no_overlap() {
        let score = score_items(["apples", "oranges"], ["pears"]).unwrap();
        assert_eq!(score.f, 0.0);
        assert_eq!(score.precision, 0.0);
        assert_eq!(score.recall, 0.0);
    }

    #[test]
    fn test_empty_candidate() {
        let err = score_items(vec!["something"], Vec::<&str>::new()).unwrap_err();
        assert!(matches!(
            err,
            MetricError::DegenerateInput {
                side: Side::Candidate
            }
        ));
    }

    #[test]
    fn test_empty_reference() {
        let err = score_items(Vec::<&str>::new(), vec!["something"]).unwrap_err();
        assert!(matches!(
            err,
            MetricError::DegenerateInput {
                side: Side::Reference
            }
        ));
        assert_eq!(
            err.to_string(),
            "degenerate input: reference item set is empty"
        );
    }

    #[test]
    fn test_works_with_non_string_items() {
        let score = score_items([1, 2, 3, 4], [2, 4]).unwrap();
        assert!(close_enough(score.precision, 1.0));
        assert!(close_enough(score.recall, 0.5));
    }
}
