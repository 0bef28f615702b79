//! Error types for the funnel engine.
//!
//! The engine itself never fails mid-fold: malformed individual records are
//! skipped with a warning and the computation continues. Errors here cover
//! the few surfaces that can fail wholesale, chiefly normalizing raw JSON
//! input that isn't shaped like a collection at all.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// Top-level input was not the expected shape (e.g. a JSON object where
    /// an array of records was required).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        EngineError::Serialization(err.to_string())
    }
}
