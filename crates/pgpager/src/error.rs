//! Error types for pgpager

use thiserror::Error;

/// Result type alias for pgpager operations
pub type PagerResult<T> = Result<T, PagerError>;

/// Error types for pagination and the queries it runs
#[derive(Debug, Error)]
pub enum PagerError {
    /// Invalid pagination options
    #[error("Paginate error: {0}")]
    Validation(String),

    /// Query execution error, passed through from the driver
    #[error("Query error: {0}")]
    Query(#[from] tokio_postgres::Error),

    /// Database connection error
    #[error("Connection error: {0}")]
    Connection(String),

    /// Row not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Row decode/mapping error
    #[error("Decode error on column '{column}': {message}")]
    Decode { column: String, message: String },

    /// Pool error
    #[cfg(feature = "pool")]
    #[error("Pool error: {0}")]
    Pool(String),
}

impl PagerError {
    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a decode error for a specific column
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// The validation message, if this is a validation error.
    pub fn validation_message(&self) -> Option<&str> {
        match self {
            Self::Validation(message) => Some(message),
            _ => None,
        }
    }
}

#[cfg(feature = "pool")]
impl From<deadpool_postgres::PoolError> for PagerError {
    fn from(err: deadpool_postgres::PoolError) -> Self {
        Self::Pool(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_display_carries_prefix() {
        let err = PagerError::validation("perPage must be a number");
        assert_eq!(err.to_string(), "Paginate error: perPage must be a number");
        assert_eq!(err.validation_message(), Some("perPage must be a number"));
        assert!(err.is_validation());
    }

    #[test]
    fn decode_display_names_column() {
        let err = PagerError::decode("total", "unexpected type");
        assert_eq!(
            err.to_string(),
            "Decode error on column 'total': unexpected type"
        );
        assert!(!err.is_validation());
    }
}
