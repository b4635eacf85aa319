use joinery_types::{FieldType, ValueError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum JoineryError {
    /// A predicate shape the compiler cannot linearize
    #[error("unsupported expression `{expr}`: {reason}")]
    UnsupportedExpression { expr: String, reason: &'static str },

    /// More distinct tables in one join graph than the alias space holds
    #[error("alias capacity exceeded: at most {capacity} tables per join graph")]
    AliasCapacityExceeded { capacity: usize },

    /// A column references a table that has no alias in the current session
    #[error("table `{table}` has no alias in this join graph")]
    AliasNotFound { table: &'static str },

    /// A projection cast outside the legality matrix
    #[error("cannot cast `{property}` from {source_type} to {target}")]
    IllegalCast {
        property: &'static str,
        source_type: FieldType,
        target: FieldType,
    },

    /// No stored view or procedure for the requested output type
    #[error("no stored view for `{dto}`")]
    ViewNotFound { dto: &'static str },

    /// A method node has no rendering for the active dialect
    #[error("`{operator}` is not supported by {dialect}")]
    DialectUnsupportedOperator {
        operator: &'static str,
        dialect: joinery_types::Dialect,
    },

    /// A statement that would render as invalid SQL
    #[error("invalid statement: {0}")]
    InvalidStatement(&'static str),

    /// Error executing a statement
    #[error("execution error: {0}")]
    Execution(String),

    /// Error with transaction
    #[error("transaction error: {0}")]
    Transaction(String),

    /// Error mapping a row into an output type
    #[error("mapping error in column `{column}`: {source}")]
    Mapping {
        column: String,
        #[source]
        source: ValueError,
    },

    /// Rusqlite specific errors
    #[cfg(feature = "rusqlite")]
    #[error("rusqlite error: {0}")]
    Rusqlite(#[from] rusqlite::Error),
}

impl JoineryError {
    pub(crate) fn unsupported(expr: impl core::fmt::Display, reason: &'static str) -> Self {
        JoineryError::UnsupportedExpression {
            expr: expr.to_string(),
            reason,
        }
    }
}

/// Result type for compilation and execution
pub type Result<T> = std::result::Result<T, JoineryError>;
