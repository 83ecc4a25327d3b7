//! Error taxonomy for dataset preparation.
//!
//! Every error aborts the whole run: there are no retries and no
//! partial results.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PrepareError {
    /// The input file path does not resolve.
    #[error("input file not found: {}", .path.display())]
    NotFound { path: PathBuf },

    /// Required columns missing, unreadable records, or no rows at all.
    #[error("malformed input: {reason}")]
    MalformedInput { reason: String },

    /// Split fraction out of range or leaves the training set empty.
    #[error("invalid eval fraction {fraction}: {reason}")]
    InvalidFraction { fraction: f64, reason: String },

    /// A relevance mapping references an id missing from queries or corpus.
    #[error("unknown id '{id}' in relevance mapping")]
    UnknownId { id: String },

    /// A training plan failed validation.
    #[error("invalid training plan: {reason}")]
    InvalidPlan { reason: String },

    /// A required secret was not provided in the environment.
    #[error("secret '{name}' is not set")]
    MissingSecret { name: &'static str },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PrepareError {
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedInput { reason: reason.into() }
    }

    pub fn invalid_fraction(fraction: f64, reason: impl Into<String>) -> Self {
        Self::InvalidFraction { fraction, reason: reason.into() }
    }

    pub fn invalid_plan(reason: impl Into<String>) -> Self {
        Self::InvalidPlan { reason: reason.into() }
    }
}

pub type PrepareResult<T> = Result<T, PrepareError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_problem() {
        let e = PrepareError::NotFound { path: PathBuf::from("data/train.csv") };
        assert_eq!(e.to_string(), "input file not found: data/train.csv");

        let e = PrepareError::invalid_fraction(1.5, "must lie strictly between 0 and 1");
        assert!(e.to_string().contains("1.5"));

        let e = PrepareError::MissingSecret { name: "HF_API_TOKEN" };
        assert_eq!(e.to_string(), "secret 'HF_API_TOKEN' is not set");
    }
}
