//! Query error model.

use thiserror::Error;

use crate::dimension::Dimension;

/// Result type used by the query layer.
pub type QueryResult<T> = Result<T, QueryError>;

/// Query-level error.
///
/// Keep this focused on failures of a single dashboard request. Load-time
/// failures live with the loader.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// A filter names a value that does not exist in the table.
    #[error("no {dimension} named {value:?}")]
    InvalidFilter { dimension: Dimension, value: String },

    /// A request parameter failed validation (e.g. blank value, zero limit).
    #[error("validation failed: {0}")]
    Validation(String),
}

impl QueryError {
    pub fn invalid_filter(dimension: Dimension, value: impl Into<String>) -> Self {
        Self::InvalidFilter {
            dimension,
            value: value.into(),
        }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Whether the request can be answered with an empty result instead.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::InvalidFilter { .. })
    }
}
