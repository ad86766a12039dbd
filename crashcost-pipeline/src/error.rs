//! Pipeline error types.
//!
//! Every failure mode has a named variant. No stringly-typed errors.
//! Note how small this taxonomy is: label mapping, rule lookup and
//! pricing all recover locally (warning + fallback), so the only hard
//! failures are rule-table loading and a stage refusing to run.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EstimateError {
    #[error("failed to open rule table '{path}': {source}")]
    RuleTableIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("rule table parse error at line {line}: {source}")]
    RuleTableParse {
        line: usize,
        #[source]
        source: csv::Error,
    },

    /// A previously failed load, replayed from the process-lifetime cache.
    #[error("rule table unavailable: {0}")]
    RuleTableUnavailable(String),

    #[error("{stage} stage failed: {reason}")]
    Stage { stage: String, reason: String },
}

/// Result type alias for pipeline operations.
pub type EstimateResult<T> = Result<T, EstimateError>;
