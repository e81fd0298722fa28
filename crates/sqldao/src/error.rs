//! Error types for sqldao

use std::fmt;
use thiserror::Error;

/// Result type alias for sqldao operations
pub type DaoResult<T> = Result<T, DaoError>;

/// The clause a [`DaoError::QueryBuild`] was raised from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Clause {
    /// A filter entry compiled into WHERE.
    Filter,
    /// An order specification compiled into ORDER BY.
    OrderBy,
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Clause::Filter => f.write_str("filter"),
            Clause::OrderBy => f.write_str("order by"),
        }
    }
}

/// Error types for DAO construction and operations
#[derive(Debug, Error)]
pub enum DaoError {
    /// Invalid construction-time settings
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A filter or order entry could not be compiled; nothing was executed
    #[error("Invalid {clause} at position {position}: {reason}")]
    QueryBuild {
        clause: Clause,
        position: usize,
        reason: String,
    },

    /// create/update called without a required key value
    #[error("Missing key '{key}' for {operation}")]
    MissingKey { key: String, operation: &'static str },

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// SQLite execution error
    #[cfg(feature = "sqlite")]
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Execution error from any other connection adapter
    #[error("Driver error: {0}")]
    Driver(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl DaoError {
    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Create a query build error for a filter entry
    pub fn filter(position: usize, reason: impl Into<String>) -> Self {
        Self::QueryBuild {
            clause: Clause::Filter,
            position,
            reason: reason.into(),
        }
    }

    /// Create a query build error for an order entry
    pub fn order_by(position: usize, reason: impl Into<String>) -> Self {
        Self::QueryBuild {
            clause: Clause::OrderBy,
            position,
            reason: reason.into(),
        }
    }

    /// Create a missing key error
    pub fn missing_key(key: impl Into<String>, operation: &'static str) -> Self {
        Self::MissingKey {
            key: key.into(),
            operation,
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Wrap an execution error raised by a connection adapter
    pub fn driver(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Driver(Box::new(err))
    }

    /// Check if this is a configuration error
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }

    /// Check if this is a query build error
    pub fn is_query_build(&self) -> bool {
        matches!(self, Self::QueryBuild { .. })
    }

    /// Check if this is a missing key error
    pub fn is_missing_key(&self) -> bool {
        matches!(self, Self::MissingKey { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_build_message_names_clause_and_position() {
        let err = DaoError::filter(2, "unknown property 'nope'");
        assert_eq!(
            err.to_string(),
            "Invalid filter at position 2: unknown property 'nope'"
        );

        let err = DaoError::order_by(0, "missing property");
        assert_eq!(err.to_string(), "Invalid order by at position 0: missing property");
        assert!(err.is_query_build());
    }

    #[test]
    fn missing_key_message() {
        let err = DaoError::missing_key("id", "update");
        assert_eq!(err.to_string(), "Missing key 'id' for update");
        assert!(err.is_missing_key());
        assert!(!err.is_configuration());
    }
}
