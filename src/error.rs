//! Error types for each pipeline stage.

use serde::Serialize;
use std::fmt;

/// Failure while resolving or reading a trip source.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("unknown city '{0}'")]
    UnknownSource(String),

    #[error("schema error at line {line}: {message}")]
    Schema { line: u64, message: String },

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl LoadError {
    pub(crate) fn schema(line: u64, message: impl Into<String>) -> Self {
        LoadError::Schema {
            line,
            message: message.into(),
        }
    }
}

/// Failure while computing a statistic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
pub enum StatsError {
    #[error("no data to compute {statistic}")]
    EmptyDataset { statistic: &'static str },
}

impl StatsError {
    pub(crate) fn empty(statistic: &'static str) -> Self {
        StatsError::EmptyDataset { statistic }
    }
}

/// Rejected filter input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CriteriaError {
    #[error("'{0}' is not a month name or 'All'")]
    Month(String),

    #[error("'{0}' is not a weekday name or 'All'")]
    Weekday(String),
}

/// Pipeline stage an [`AnalysisError`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Load,
    Statistic,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Load => f.write_str("load"),
            Stage::Statistic => f.write_str("statistic"),
        }
    }
}

/// Error returned by [`crate::session::AnalysisSession`].
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("load failed: {0}")]
    Load(#[from] LoadError),

    #[error("statistic failed: {0}")]
    Statistic(#[from] StatsError),
}

impl AnalysisError {
    pub fn stage(&self) -> Stage {
        match self {
            AnalysisError::Load(_) => Stage::Load,
            AnalysisError::Statistic(_) => Stage::Statistic,
        }
    }
}
