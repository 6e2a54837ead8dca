//! Error types.
//!
//! Only rule-definition defects are errors. A label that is missing a field or
//! a panel is the normal "no match" case and surfaces as a `fail` or
//! `needs_review` verdict instead.

use thiserror::Error;

/// A defect in a rule definition or in the engine configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("question '{question_id}': logic '{logic}' requires a `{attribute}` attribute")]
    MissingAttribute { question_id: String, logic: &'static str, attribute: &'static str },

    #[error("question '{question_id}': invalid pattern '{pattern}': {reason}")]
    InvalidPattern { question_id: String, pattern: String, reason: String },

    #[error("question '{question_id}': unknown logic '{logic}'")]
    UnknownLogic { question_id: String, logic: String },

    #[error("question is missing an `id`")]
    MissingId,

    #[error("no rounding table for nutrient category '{category}' ({table})")]
    UnknownCategory { category: String, table: &'static str },

    #[error("cannot round {value} for '{category}': values must be finite and >= 0")]
    InvalidValue { category: String, value: f64 },
}

/// Failure to load input documents (label facts, questions, options).
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ConfigError>;
