//! Error types for posty

use thiserror::Error;

/// Result type for posty operations
pub type Result<T> = std::result::Result<T, PostyError>;

/// Failure raised by a column's value producer.
///
/// Carried through [`PostyError::Value`] without being rewrapped, so the
/// host sees exactly what the producer returned.
pub type ValueError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur while building or registering columns and content types
#[derive(Debug, Error)]
pub enum PostyError {
    /// A column descriptor is missing a required field
    #[error("column descriptor is missing required field: {field}")]
    MissingField { field: &'static str },

    /// An add/remove/reorder source did not resolve to a sequence
    #[error("invalid column source: {message}")]
    InvalidInput { message: String },

    /// No column with the given id exists in the registry
    #[error("column not found: {id}")]
    ColumnNotFound { id: String },

    /// A column with the same id is already registered
    #[error("duplicate column id: {id}")]
    DuplicateColumn { id: String },

    /// The column id resolved to an empty string
    #[error("column '{label}' has an empty id")]
    EmptyColumnId { label: String },

    /// A value producer failed while rendering a cell
    #[error(transparent)]
    Value(ValueError),

    /// YAML definition error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

impl PostyError {
    pub(crate) fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PostyError::ColumnNotFound { id: "price".into() };
        assert_eq!(err.to_string(), "column not found: price");
    }

    #[test]
    fn test_missing_field_display() {
        let err = PostyError::MissingField { field: "label" };
        assert!(err.to_string().contains("label"));
    }

    #[test]
    fn test_value_error_is_transparent() {
        let source: ValueError = "price lookup failed".into();
        let err = PostyError::Value(source);
        assert_eq!(err.to_string(), "price lookup failed");
    }
}
