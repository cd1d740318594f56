//! Loading parallel reference/candidate JSON files.

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{MetricError, Result};
use crate::score::TextExample;

/// A reference entry: one text, or several for multi-reference scoring.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum References {
    Single(String),
    Multiple(Vec<String>),
}

impl References {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            References::Single(text) => vec![text],
            References::Multiple(texts) => texts,
        }
    }
}

fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

fn check_parallel(n_refs: usize, n_cands: usize) -> Result<()> {
    if n_refs != n_cands {
        return Err(MetricError::config(format!(
            "reference and candidate lists differ in length ({} vs {})",
            n_refs, n_cands
        )));
    }
    Ok(())
}

/// Items compare by their canonical JSON text, so `1` and `"1"` stay distinct.
fn canonical_items(items: Vec<Value>) -> Vec<String> {
    items.into_iter().map(|item| item.to_string()).collect()
}

/// Pairs `(reference, candidate)` of item lists, one per example.
pub fn pair_item_lists(
    references: Vec<Vec<Value>>,
    candidates: Vec<Vec<Value>>,
) -> Result<Vec<(Vec<String>, Vec<String>)>> {
    check_parallel(references.len(), candidates.len())?;
    Ok(references
        .into_iter()
        .zip(candidates)
        .map(|(r, c)| (canonical_items(r), canonical_items(c)))
        .collect())
}

pub fn pair_texts(references: Vec<References>, candidates: Vec<String>) -> Result<Vec<TextExample>> {
    check_parallel(references.len(), candidates.len())?;
    Ok(references
        .into_iter()
        .zip(candidates)
        .map(|(r, c)| TextExample::new(r.into_vec(), c))
        .collect())
}

pub fn load_item_pairs(ref_path: &Path, cand_path: &Path) -> Result<Vec<(Vec<String>, Vec<String>)>> {
    pair_item_lists(load_json(ref_path)?, load_json(cand_path)?)
}

pub fn load_text_examples(ref_path: &Path, cand_path: &Path) -> Result<Vec<TextExample>> {
    pair_texts(load_json(ref_path)?, load_json(cand_path)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_references_accept_string_or_list() {
        let refs: Vec<References> = serde_json::from_value(json!(["one", ["two", "three"]])).unwrap();
        assert_eq!(refs[0].clone().into_vec(), vec!["one"]);
        assert_eq!(refs[1].clone().into_vec(), vec!["two", "three"]);
    }

    #[test]
    fn test_item_pairs_keep_json_types_apart() {
        let pairs = pair_item_lists(
            vec![vec![json!(1), json!("a")]],
            vec![vec![json!("1"), json!("a")]],
        )
        .unwrap();
        assert_eq!(pairs[0].0, vec!["1", "\"a\""]);
        assert_eq!(pairs[0].1, vec!["\"1\"", "\"a\""]);
    }

    #[test]
    fn test_unequal_lengths_are_rejected() {
        let err = pair_texts(vec![References::Single("a".into())], vec![]).unwrap_err();
        assert!(matches!(err, MetricError::Configuration(_)));

        let err = pair_item_lists(vec![], vec![vec![json!("a")]]).unwrap_err();
        assert!(matches!(err, MetricError::Configuration(_)));
    }
}
