//! Fatal configuration errors.
//!
//! Anything recoverable (a dangling parent, a degenerate orbit, a bad
//! multiplier) is logged with `log::warn!` and replaced by a safe fallback
//! instead of surfacing here.

use thiserror::Error;

/// Result type for dataset loading and system construction.
pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("dataset contains no bodies")]
    Empty,

    #[error("no body is flagged as the reference body")]
    MissingReference,

    #[error("multiple reference bodies: {0:?}")]
    MultipleReferences(Vec<String>),

    #[error("parent cycle among bodies: {0:?}")]
    ParentCycle(Vec<String>),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
