use std::sync::Arc;

use once_cell::sync::Lazy;
use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use tokio::runtime::Runtime;

use crate::config::{AggregationMode, RougeConfig};
use crate::error::MetricError;
use crate::rouge::RougeScorer;
use crate::score::{self, Score, TextExample};

static RUNTIME: Lazy<Runtime> =
    Lazy::new(|| Runtime::new().expect("Failed to create async runtime"));

fn to_py_err(err: MetricError) -> PyErr {
    match err {
        MetricError::Task(_) | MetricError::Io(_) => PyRuntimeError::new_err(err.to_string()),
        _ => PyValueError::new_err(err.to_string()),
    }
}

fn parse_mode(mode: &str) -> PyResult<AggregationMode> {
    match mode {
        "average" | "avg" => Ok(AggregationMode::Average),
        "best" => Ok(AggregationMode::Best),
        other => Err(PyValueError::new_err(format!(
            "unknown aggregation mode: {}",
            other
        ))),
    }
}

fn batch_config(
    n: usize,
    length_limit: Option<usize>,
    alpha: f64,
    aggregation: AggregationMode,
) -> RougeConfig {
    RougeConfig {
        max_n: n,
        length_limit,
        alpha,
        aggregation,
        ..RougeConfig::default()
    }
}

fn as_tuple(score: Score) -> (f64, f64, f64) {
    (score.precision, score.recall, score.f)
}

/// Returns (precision, recall, f) of exact-match set F1.
#[pyfunction]
fn score_item_sets(reference: Vec<String>, candidate: Vec<String>) -> PyResult<(f64, f64, f64)> {
    crate::score_item_sets(reference, candidate)
        .map(as_tuple)
        .map_err(to_py_err)
}

/// Returns (precision, recall, f) of ROUGE-n against one or more references.
#[pyfunction]
#[pyo3(signature = (references, candidate, n=1, length_limit=Some(100), alpha=0.5, mode="average"))]
fn score_text(
    references: Vec<String>,
    candidate: String,
    n: usize,
    length_limit: Option<usize>,
    alpha: f64,
    mode: &str,
) -> PyResult<(f64, f64, f64)> {
    crate::score_text(&references, &candidate, n, length_limit, alpha, parse_mode(mode)?)
        .map(as_tuple)
        .map_err(to_py_err)
}

#[pyfunction]
fn aggregate_corpus(f_values: Vec<f64>) -> PyResult<f64> {
    crate::aggregate_corpus(&f_values).map_err(to_py_err)
}

/// Per-example ROUGE-n F values, scored concurrently without the GIL.
#[pyfunction]
#[pyo3(signature = (references, candidates, n=1, length_limit=Some(100), alpha=0.5, mode="average"))]
fn score_text_batch(
    py: Python,
    references: Vec<Vec<String>>,
    candidates: Vec<String>,
    n: usize,
    length_limit: Option<usize>,
    alpha: f64,
    mode: &str,
) -> PyResult<Vec<f64>> {
    if references.len() != candidates.len() {
        return Err(PyValueError::new_err(
            "reference and candidate lists differ in length",
        ));
    }
    let scorer = RougeScorer::new(batch_config(n, length_limit, alpha, parse_mode(mode)?))
        .map_err(to_py_err)?;
    let examples: Vec<TextExample> = references
        .into_iter()
        .zip(candidates)
        .map(|(r, c)| TextExample::new(r, c))
        .collect();

    let scores = py
        .allow_threads(|| RUNTIME.block_on(score::score_text_batch(Arc::new(scorer), examples, n)))
        .map_err(to_py_err)?;
    Ok(scores.into_iter().map(|s| s.f).collect())
}

#[pymodule]
#[pyo3(name = "_rust")]
fn python_module(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(score_item_sets, m)?)?;
    m.add_function(wrap_pyfunction!(score_text, m)?)?;
    m.add_function(wrap_pyfunction!(aggregate_corpus, m)?)?;
    m.add_function(wrap_pyfunction!(score_text_batch, m)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_config_carries_length_limit_and_alpha() {
        let config = batch_config(2, Some(5), 0.8, AggregationMode::Best);
        assert_eq!(config.max_n, 2);
        assert_eq!(config.length_limit, Some(5));
        assert_eq!(config.alpha, 0.8);
        assert_eq!(config.aggregation, AggregationMode::Best);

        let scorer = RougeScorer::new(config).unwrap();
        // candidate cut to its first five words
        let score = scorer
            .score_pair("a b c d e", "a b c d e f g h i j", 1)
            .unwrap();
        assert_eq!(score.precision, 1.0);

        let unlimited = batch_config(1, None, 0.5, AggregationMode::Average);
        assert_eq!(unlimited.length_limit, None);
    }
}
