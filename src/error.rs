//! Crate-wide error type.
//!
//! One enum covers the whole pipeline so callers can match on the failure
//! class: training failures are recovered inside the store, unknown-category
//! errors drive the fallback policy in the engine, and validation errors
//! (missing columns, empty input) surface to the caller unchanged.

use thiserror::Error;

use crate::domain::Domain;

#[derive(Debug, Error)]
pub enum ModelError {
    /// A trainer failed during synthesis or fitting. Recovered by the store
    /// (domain marked `Error`, prior artifact retained); never fatal.
    #[error("training failed for {domain}: {message}")]
    Training { domain: Domain, message: String },

    /// A categorical input value was never seen at training time.
    #[error("unknown category '{value}' for feature '{feature}'")]
    UnknownCategory { feature: String, value: String },

    /// The domain has no usable artifact (training failed and nothing stale
    /// is available to fall back on).
    #[error("no trained model available for {domain}")]
    NotTrained { domain: Domain },

    /// Batch validation failure: the input table is missing required columns.
    /// Aborts the whole batch before any row is processed.
    #[error("missing required columns: {}", columns.join(", "))]
    MissingColumns { columns: Vec<String> },

    /// A required field is absent from a single input record.
    #[error("missing required field '{field}'")]
    MissingField { field: String },

    /// A field is present but cannot be coerced to the expected type.
    #[error("field '{field}' is not a valid {expected}")]
    InvalidField { field: String, expected: &'static str },

    /// A prediction request with no payload at all.
    #[error("empty input record")]
    EmptyInput,

    /// The least-squares solver could not produce a finite solution.
    #[error("numerical error: {message}")]
    Numerical { message: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ModelError {
    /// Process exit code for the CLI front-end.
    ///
    /// 2 = bad input (caller's fault), 3 = model unavailable, 4 = internal.
    pub fn exit_code(&self) -> u8 {
        match self {
            ModelError::MissingColumns { .. }
            | ModelError::MissingField { .. }
            | ModelError::InvalidField { .. }
            | ModelError::EmptyInput
            | ModelError::UnknownCategory { .. }
            | ModelError::Csv(_)
            | ModelError::Json(_)
            | ModelError::Io(_) => 2,
            ModelError::NotTrained { .. } | ModelError::Training { .. } => 3,
            ModelError::Numerical { .. } => 4,
        }
    }
}

pub type Result<T> = std::result::Result<T, ModelError>;
