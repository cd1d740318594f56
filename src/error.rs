//! Error types for corpus scoring.

use std::fmt;

use thiserror::Error;

/// Which side of an example an input belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Reference,
    Candidate,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Reference => write!(f, "reference"),
            Side::Candidate => write!(f, "candidate"),
        }
    }
}

/// Error type for scoring operations.
#[derive(Error, Debug)]
pub enum MetricError {
    /// An item set that must be non-empty for a well-defined ratio was empty.
    #[error("degenerate input: {side} item set is empty")]
    DegenerateInput {
        /// The empty side.
        side: Side,
    },

    /// Corpus aggregation was invoked with zero examples.
    #[error("cannot aggregate an empty corpus")]
    EmptyCorpus,

    /// An invalid parameter or malformed driver input.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Failure reading an input file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON decoding error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A concurrent scoring task panicked or was cancelled.
    #[error("scoring task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl MetricError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        MetricError::Configuration(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, MetricError>;
