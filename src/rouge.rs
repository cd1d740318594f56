use std::collections::BTreeMap;

use crate::config::{validate_order, LengthUnit, RougeConfig, TruncationTarget};
use crate::error::{Result, Side};
use crate::ngram::{get_matches_clipped, get_ngram_counts, total_count};
use crate::score::{aggregate_references, Score};
use crate::utils::{truncate_bytes, Sequence, Tokenizer};

/// Generalized F: `p*r / ((1-alpha)*p + alpha*r)`. Equals the harmonic mean at 0.5.
pub fn f_measure(precision: f64, recall: f64, alpha: f64) -> f64 {
    if precision == 0.0 && recall == 0.0 {
        return 0.0;
    }
    let denominator = (1.0 - alpha) * precision + alpha * recall;
    // alpha at either extreme can zero the denominator while one side is positive
    if denominator == 0.0 {
        return 0.0;
    }
    precision * recall / denominator
}

/// ROUGE-N between two prepared sequences. A side with no n-grams scores 0,
/// since empty generated text is a legitimate (poor) candidate.
pub fn rouge_n_score(gold: &Sequence, pred: &Sequence, n: usize, alpha: f64) -> Score {
    let gold_counts = get_ngram_counts(&gold.word_vector, n);
    let pred_counts = get_ngram_counts(&pred.word_vector, n);

    let overlap = get_matches_clipped(&gold_counts, &pred_counts) as f64;
    let total_pred_ngrams = total_count(&pred_counts);
    let total_gold_ngrams = total_count(&gold_counts);

    let precision = if total_pred_ngrams > 0 {
        overlap / total_pred_ngrams as f64
    } else {
        0.0
    };
    let recall = if total_gold_ngrams > 0 {
        overlap / total_gold_ngrams as f64
    } else {
        0.0
    };

    Score::new(precision, recall, f_measure(precision, recall, alpha))
}

/// Tokenizes, truncates and scores texts according to a validated [`RougeConfig`].
#[derive(Debug, Clone)]
pub struct RougeScorer {
    config: RougeConfig,
    tokenizer: Tokenizer,
}

impl RougeScorer {
    pub fn new(config: RougeConfig) -> Result<Self> {
        config.validate()?;
        let tokenizer = Tokenizer::new(config.case);
        Ok(Self { config, tokenizer })
    }

    pub fn config(&self) -> &RougeConfig {
        &self.config
    }

    fn is_truncated(&self, side: Side) -> bool {
        match (side, self.config.truncation) {
            (Side::Candidate, _) => true,
            (Side::Reference, TruncationTarget::Both) => true,
            (Side::Reference, TruncationTarget::CandidateOnly) => false,
        }
    }

    /// Tokenizes `text`, applying the length limit if it targets `side`.
    pub fn prepare(&self, text: &str, side: Side) -> Sequence {
        let limit = match self.config.length_limit {
            Some(limit) if self.is_truncated(side) => limit,
            _ => return Sequence::with_tokenizer(text, &self.tokenizer),
        };
        match self.config.length_unit {
            LengthUnit::Bytes => Sequence::with_tokenizer(truncate_bytes(text, limit), &self.tokenizer),
            LengthUnit::Words => {
                let mut seq = Sequence::with_tokenizer(text, &self.tokenizer);
                seq.truncate_words(limit);
                seq
            }
        }
    }

    /// ROUGE-`n` of one candidate against one reference.
    pub fn score_pair(&self, reference: &str, candidate: &str, n: usize) -> Result<Score> {
        validate_order(n)?;
        let gold = self.prepare(reference, Side::Reference);
        let pred = self.prepare(candidate, Side::Candidate);
        Ok(rouge_n_score(&gold, &pred, n, self.config.alpha))
    }

    /// ROUGE-`n` of one candidate against one or more references, combined
    /// with the configured [`AggregationMode`](crate::config::AggregationMode).
    pub fn score<S: AsRef<str>>(&self, references: &[S], candidate: &str, n: usize) -> Result<Score> {
        validate_order(n)?;
        let pred = self.prepare(candidate, Side::Candidate);
        let golds = self.prepare_references(references);
        self.score_prepared(&golds, &pred, n)
    }

    /// Scores every order `1..=max_n`, keyed by order.
    pub fn score_orders<S: AsRef<str>>(
        &self,
        references: &[S],
        candidate: &str,
    ) -> Result<BTreeMap<usize, Score>> {
        let pred = self.prepare(candidate, Side::Candidate);
        let golds = self.prepare_references(references);
        (1..=self.config.max_n)
            .map(|n| Ok((n, self.score_prepared(&golds, &pred, n)?)))
            .collect()
    }

    fn prepare_references<S: AsRef<str>>(&self, references: &[S]) -> Vec<Sequence> {
        references
            .iter()
            .map(|r| self.prepare(r.as_ref(), Side::Reference))
            .collect()
    }

    fn score_prepared(&self, golds: &[Sequence], pred: &Sequence, n: usize) -> Result<Score> {
        let per_reference: Vec<Score> = golds
            .iter()
            .map(|gold| rouge_n_score(gold, pred, n, self.config.alpha))
            .collect();
        aggregate_references(&per_reference, self.config.aggregation)
    }
}
