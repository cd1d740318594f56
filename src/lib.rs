//! Corpus-level text similarity metrics: exact-match set F1 and ROUGE-N.
//!
//! Each example pairs a candidate with one or more references. Per-example
//! scores are macro-averaged into a single corpus value.
//!
//! ```
//! use corpus_eval::{aggregate_corpus, score_item_sets, score_text, AggregationMode};
//!
//! let f1 = score_item_sets(["cat", "dog"], ["dog", "bird"]).unwrap();
//! assert_eq!(f1.f, 0.5);
//!
//! let rouge = score_text(&["the cat sat"], "the cat sat", 1, Some(100), 0.5, AggregationMode::Average).unwrap();
//! assert_eq!(rouge.f, 1.0);
//!
//! assert_eq!(aggregate_corpus(&[f1, rouge]).unwrap(), 0.75);
//! ```

pub mod config;
pub mod data;
mod error;
pub mod ngram;
pub mod observe;
#[cfg(feature = "python")]
mod python;
pub mod rouge;
pub mod score;
pub mod tokf1;
pub mod utils;

use std::collections::BTreeMap;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub use config::{AggregationMode, LengthUnit, RougeConfig, TruncationTarget};
pub use error::{MetricError, Result, Side};
pub use observe::{Observer, TracingObserver};
pub use rouge::RougeScorer;
pub use score::{aggregate_corpus, aggregate_scores, FValue, Score, TextExample};
pub use utils::{CaseMode, Tokenizer};

/// Exact-match F1 between two item collections (deduplicated).
pub fn score_item_sets<T, R, C>(reference_items: R, candidate_items: C) -> Result<Score>
where
    T: Hash + Eq,
    R: IntoIterator<Item = T>,
    C: IntoIterator<Item = T>,
{
    tokf1::score_items(reference_items, candidate_items)
}

/// ROUGE-`n` of `candidate_text` against one or more references, with the
/// remaining options at their defaults.
pub fn score_text<S: AsRef<str>>(
    reference_texts: &[S],
    candidate_text: &str,
    n: usize,
    length_limit: Option<usize>,
    alpha: f64,
    multi_ref_mode: AggregationMode,
) -> Result<Score> {
    let scorer = RougeScorer::new(RougeConfig {
        max_n: n,
        length_limit,
        alpha,
        aggregation: multi_ref_mode,
        ..RougeConfig::default()
    })?;
    scorer.score(reference_texts, candidate_text, n)
}

/// What to do with a set-F1 example whose reference or candidate is empty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DegeneratePolicy {
    /// Fail the whole run.
    #[default]
    Abort,
    /// Leave the example out of the corpus average.
    Skip,
    /// Count the example as a score of 0.
    Zero,
}

/// Corpus driver: scores examples concurrently and reports timings to an
/// optional [`Observer`]. Holds no metric configuration; ROUGE runs take a
/// validated [`RougeScorer`].
#[derive(Default)]
pub struct Evaluator {
    observer: Option<Arc<dyn Observer>>,
}

impl Evaluator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_observer(mut self, observer: Arc<dyn Observer>) -> Self {
        self.observer = Some(observer);
        self
    }

    fn record(&self, operation: &str, start: Instant) {
        if let Some(observer) = &self.observer {
            observer.record(operation, start.elapsed());
        }
    }

    /// Macro-averaged ROUGE for every order `1..=max_n`.
    pub async fn rouge_corpus(
        &self,
        scorer: Arc<RougeScorer>,
        examples: Vec<TextExample>,
    ) -> Result<BTreeMap<usize, Score>> {
        let start = Instant::now();
        debug!(examples = examples.len(), "scoring ROUGE corpus");
        let per_example = score::score_text_orders_batch(scorer, examples).await?;
        let corpus = observe::timed(self.observer.as_deref(), "aggregate_orders", || {
            score::aggregate_orders(&per_example)
        })?;
        self.record("rouge_corpus", start);
        Ok(corpus)
    }

    /// Macro-averaged set F1, handling empty sets per `policy`.
    pub async fn f1_corpus<T>(&self, pairs: Vec<(Vec<T>, Vec<T>)>, policy: DegeneratePolicy) -> Result<f64>
    where
        T: Hash + Eq + Send + 'static,
    {
        let start = Instant::now();
        debug!(examples = pairs.len(), "scoring set-F1 corpus");
        let results = score::score_item_sets_batch(pairs).await;

        let mut scores = Vec::with_capacity(results.len());
        for (idx, result) in results.into_iter().enumerate() {
            match (result, policy) {
                (Ok(score), _) => scores.push(score),
                (Err(MetricError::DegenerateInput { side }), DegeneratePolicy::Skip) => {
                    warn!(example = idx, %side, "skipping example with empty item set");
                }
                (Err(MetricError::DegenerateInput { side }), DegeneratePolicy::Zero) => {
                    warn!(example = idx, %side, "scoring example with empty item set as 0");
                    scores.push(Score::default());
                }
                (Err(err), _) => return Err(err),
            }
        }

        let macro_f1 = observe::timed(self.observer.as_deref(), "aggregate_corpus", || {
            aggregate_corpus(&scores)
        })?;
        self.record("f1_corpus", start);
        Ok(macro_f1)
    }
}
