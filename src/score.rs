use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::AggregationMode;
use crate::error::{MetricError, Result};
use crate::rouge::RougeScorer;
use crate::tokf1::score_items;

/// Precision, recall and F of one comparison, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Score {
    pub precision: f64,
    pub recall: f64,
    pub f: f64,
}

impl Score {
    pub fn new(precision: f64, recall: f64, f: f64) -> Self {
        Self {
            precision,
            recall,
            f,
        }
    }
}

/// Anything that carries a corpus-level F value.
pub trait FValue {
    fn f_value(&self) -> f64;
}

impl FValue for Score {
    fn f_value(&self) -> f64 {
        self.f
    }
}

impl FValue for f64 {
    fn f_value(&self) -> f64 {
        *self
    }
}

/// Combines the scores of one candidate against each of its references.
pub fn aggregate_references(per_reference: &[Score], mode: AggregationMode) -> Result<Score> {
    if per_reference.is_empty() {
        return Err(MetricError::config("an example needs at least one reference"));
    }
    match mode {
        AggregationMode::Average => Ok(mean_score(per_reference)),
        AggregationMode::Best => {
            let mut best = per_reference[0];
            for score in &per_reference[1..] {
                // strict comparison keeps the first of equal scores
                if score.f > best.f {
                    best = *score;
                }
            }
            Ok(best)
        }
    }
}

fn mean_score(scores: &[Score]) -> Score {
    let n = scores.len() as f64;
    Score {
        precision: scores.iter().map(|s| s.precision).sum::<f64>() / n,
        recall: scores.iter().map(|s| s.recall).sum::<f64>() / n,
        f: scores.iter().map(|s| s.f).sum::<f64>() / n,
    }
}

/// Macro average of the F values: every example weighs the same.
pub fn aggregate_corpus<T: FValue>(per_example: &[T]) -> Result<f64> {
    if per_example.is_empty() {
        return Err(MetricError::EmptyCorpus);
    }
    let total: f64 = per_example.iter().map(FValue::f_value).sum();
    Ok(total / per_example.len() as f64)
}

/// Component-wise macro average of full scores.
pub fn aggregate_scores(per_example: &[Score]) -> Result<Score> {
    if per_example.is_empty() {
        return Err(MetricError::EmptyCorpus);
    }
    Ok(mean_score(per_example))
}

/// One ROUGE evaluation unit: a candidate and its references.
#[derive(Debug, Clone)]
pub struct TextExample {
    pub references: Vec<String>,
    pub candidate: String,
}

impl TextExample {
    pub fn new(references: Vec<String>, candidate: String) -> Self {
        Self {
            references,
            candidate,
        }
    }

    pub fn score(&self, scorer: &RougeScorer, n: usize) -> Result<Score> {
        scorer.score(&self.references, &self.candidate, n)
    }

    pub fn score_orders(&self, scorer: &RougeScorer) -> Result<BTreeMap<usize, Score>> {
        scorer.score_orders(&self.references, &self.candidate)
    }
}

/// Scores every example on the runtime's worker threads. Output order
/// follows input order.
pub async fn score_text_batch(
    scorer: Arc<RougeScorer>,
    examples: Vec<TextExample>,
    n: usize,
) -> Result<Vec<Score>> {
    let tasks = examples.into_iter().map(|example| {
        let scorer = Arc::clone(&scorer);
        tokio::spawn(async move { example.score(&scorer, n) })
    });
    futures::future::join_all(tasks)
        .await
        .into_iter()
        .map(|joined| joined.map_err(MetricError::from).and_then(|scored| scored))
        .collect()
}

/// Like [`score_text_batch`], but scores every configured order per example.
pub async fn score_text_orders_batch(
    scorer: Arc<RougeScorer>,
    examples: Vec<TextExample>,
) -> Result<Vec<BTreeMap<usize, Score>>> {
    let tasks = examples.into_iter().map(|example| {
        let scorer = Arc::clone(&scorer);
        tokio::spawn(async move { example.score_orders(&scorer) })
    });
    futures::future::join_all(tasks)
        .await
        .into_iter()
        .map(|joined| joined.map_err(MetricError::from).and_then(|scored| scored))
        .collect()
}

/// Macro average per order over per-example order maps.
pub fn aggregate_orders(per_example: &[BTreeMap<usize, Score>]) -> Result<BTreeMap<usize, Score>> {
    let first = per_example.first().ok_or(MetricError::EmptyCorpus)?;
    first
        .keys()
        .map(|&n| {
            let scores: Vec<Score> = per_example
                .iter()
                .map(|orders| orders.get(&n).copied().unwrap_or_default())
                .collect();
            Ok((n, aggregate_scores(&scores)?))
        })
        .collect()
}

/// Set-F1 counterpart of [`score_text_batch`].
pub async fn score_item_sets_batch<T>(pairs: Vec<(Vec<T>, Vec<T>)>) -> Vec<Result<Score>>
where
    T: std::hash::Hash + Eq + Send + 'static,
{
    let tasks = pairs
        .into_iter()
        .map(|(reference, candidate)| tokio::spawn(async move { score_items(reference, candidate) }));
    futures::future::join_all(tasks)
        .await
        .into_iter()
        .map(|joined| joined.map_err(MetricError::from).and_then(|scored| scored))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RougeConfig;
    use crate::error::Side;
    use tokio::runtime::Runtime;

    fn close_enough(a: f64, b: f64, eps: f64) -> bool {
        (a - b).abs() < eps
    }

    fn f_only(f: f64) -> Score {
        Score::new(f, f, f)
    }

    #[test]
    fn test_average_mode() {
        let scores = [f_only(0.2), f_only(0.8)];
        let avg = aggregate_references(&scores, AggregationMode::Average).unwrap();
        assert!(close_enough(avg.f, 0.5, 1e-9), "Expected 0.5, got {}", avg.f);
    }

    #[test]
    fn test_best_mode() {
        let scores = [f_only(0.2), f_only(0.8)];
        let best = aggregate_references(&scores, AggregationMode::Best).unwrap();
        assert_eq!(best.f, 0.8);
    }

    #[test]
    fn test_best_mode_keeps_first_of_ties() {
        let scores = [
            Score::new(0.1, 0.9, 0.5),
            Score::new(0.9, 0.1, 0.5),
        ];
        let best = aggregate_references(&scores, AggregationMode::Best).unwrap();
        assert_eq!(best, scores[0]);
    }

    #[test]
    fn test_average_mode_is_component_wise() {
        let scores = [Score::new(1.0, 0.0, 0.0), Score::new(0.0, 1.0, 0.0)];
        let avg = aggregate_references(&scores, AggregationMode::Average).unwrap();
        assert_eq!(avg, Score::new(0.5, 0.5, 0.0));
    }

    #[test]
    fn test_corpus_mean() {
        let macro_f = aggregate_corpus(&[0.5, 1.0]).unwrap();
        assert!(close_enough(macro_f, 0.75, 1e-9));

        let macro_f = aggregate_corpus(&[f_only(0.5), f_only(1.0)]).unwrap();
        assert!(close_enough(macro_f, 0.75, 1e-9));
    }

    #[test]
    fn test_empty_corpus() {
        let empty: [f64; 0] = [];
        assert!(matches!(
            aggregate_corpus(&empty),
            Err(MetricError::EmptyCorpus)
        ));
        assert!(matches!(aggregate_scores(&[]), Err(MetricError::EmptyCorpus)));
    }

    #[test]
    fn test_text_example_debug_output() {
        let example = TextExample::new(vec![String::from("the cat")], String::from("a cat"));
        let shown = format!("{:?}", example);
        assert!(shown.contains("the cat") && shown.contains("a cat"), "got {}", shown);
    }

    #[test]
    fn test_aggregate_orders() {
        let per_example = vec![
            BTreeMap::from([(1, f_only(1.0)), (2, f_only(0.5))]),
            BTreeMap::from([(1, f_only(0.5)), (2, f_only(0.0))]),
        ];
        let corpus = aggregate_orders(&per_example).unwrap();
        assert!(close_enough(corpus[&1].f, 0.75, 1e-9));
        assert!(close_enough(corpus[&2].f, 0.25, 1e-9));

        assert!(matches!(aggregate_orders(&[]), Err(MetricError::EmptyCorpus)));
    }

    #[test]
    fn test_batch_scorer() {
        let examples = vec![
            TextExample::new(vec![String::from("the cat sat")], String::from("the cat sat")),
            TextExample::new(
                vec![String::from("the dog barked loudly")],
                String::from("a dog barked"),
            ),
        ];
        let scorer = Arc::new(RougeScorer::new(RougeConfig::default()).unwrap());

        let rt = Runtime::new().expect("Failed to create async runtime");
        let scores = rt.block_on(score_text_batch(scorer, examples, 1)).unwrap();

        assert_eq!(scores.len(), 2);
        assert_eq!(scores[0].f, 1.0);
        // overlap 2, precision 2/3, recall 2/4
        assert!(close_enough(scores[1].f, 4.0 / 7.0, 1e-9));
    }

    #[test]
    fn test_item_set_batch_keeps_errors_per_example() {
        let pairs = vec![
            (vec!["cat", "dog"], vec!["dog", "bird"]),
            (vec!["cat"], vec![]),
        ];
        let rt = Runtime::new().expect("Failed to create async runtime");
        let results = rt.block_on(score_item_sets_batch(pairs));

        assert_eq!(results.len(), 2);
        assert!(close_enough(results[0].as_ref().unwrap().f, 0.5, 1e-9));
        assert!(matches!(
            results[1],
            Err(MetricError::DegenerateInput {
                side: Side::Candidate
            })
        ));
    }
}
