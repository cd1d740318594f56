//! Run configuration for ROUGE-N scoring.

use serde::{Deserialize, Serialize};

use crate::error::{MetricError, Result};
use crate::utils::CaseMode;

/// How per-reference scores of one example are combined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregationMode {
    /// Component-wise mean over all references.
    #[default]
    Average,
    /// The single reference score with the highest F (first one wins ties).
    Best,
}

/// Which texts the length limit is applied to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TruncationTarget {
    #[default]
    CandidateOnly,
    Both,
}

/// Unit the length limit is measured in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LengthUnit {
    #[default]
    Words,
    Bytes,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RougeConfig {
    /// Highest n-gram order scored; orders `1..=max_n` are reported.
    pub max_n: usize,
    pub length_limit: Option<usize>,
    pub length_unit: LengthUnit,
    pub truncation: TruncationTarget,
    pub aggregation: AggregationMode,
    /// Weight of precision in the F blend: 1 yields precision, 0 yields
    /// recall, 0.5 the harmonic mean.
    pub alpha: f64,
    pub case: CaseMode,
}

pub const DEFAULT_LENGTH_LIMIT: usize = 100;
pub const DEFAULT_ALPHA: f64 = 0.5;

impl Default for RougeConfig {
    fn default() -> Self {
        Self {
            max_n: 1,
            length_limit: Some(DEFAULT_LENGTH_LIMIT),
            length_unit: LengthUnit::Words,
            truncation: TruncationTarget::CandidateOnly,
            aggregation: AggregationMode::Average,
            alpha: DEFAULT_ALPHA,
            case: CaseMode::Sensitive,
        }
    }
}

impl RougeConfig {
    pub fn validate(&self) -> Result<()> {
        validate_order(self.max_n)?;
        validate_length_limit(self.length_limit)?;
        validate_alpha(self.alpha)
    }
}

pub(crate) fn validate_order(n: usize) -> Result<()> {
    if n == 0 {
        return Err(MetricError::config("n-gram order must be at least 1"));
    }
    Ok(())
}

pub(crate) fn validate_length_limit(limit: Option<usize>) -> Result<()> {
    if limit == Some(0) {
        return Err(MetricError::config("length limit must be positive"));
    }
    Ok(())
}

pub(crate) fn validate_alpha(alpha: f64) -> Result<()> {
    // NaN fails the range check too
    if !(0.0..=1.0).contains(&alpha) {
        return Err(MetricError::config(format!(
            "alpha must be within [0, 1], got {}",
            alpha
        )));
    }
    Ok(())
}
