//! Custom error types for FinanceFlow
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions. Validation failures carry per-field
//! messages so callers can report every problem with a submission at once.

use std::fmt;

use thiserror::Error;

/// A single field-level validation failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Collection of field-level validation failures
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failure for a field
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Message recorded for a field, if any
    pub fn for_field(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    /// Convert into a result: `Ok` when nothing was recorded
    pub fn into_result(self) -> FinanceResult<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(FinanceError::Validation(self))
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

/// The main error type for FinanceFlow operations
#[derive(Error, Debug)]
pub enum FinanceError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Per-field validation errors; nothing was persisted
    #[error("Validation error: {0}")]
    Validation(ValidationErrors),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Operation refused by a business rule (e.g. deleting the savings bank)
    #[error("Acción no permitida: {0}")]
    NotPermitted(String),

    /// Persistence errors; in-memory state is unchanged
    #[error("Storage error: {0}")]
    Storage(String),

    /// Relational backend errors
    #[error("Database error: {0}")]
    Database(String),

    /// Import errors
    #[error("Import error: {0}")]
    Import(String),

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),

    /// Advice backend errors
    #[error("Advice error: {0}")]
    Advice(String),
}

impl FinanceError {
    /// Shorthand for a validation error on a single field
    pub fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        let mut errors = ValidationErrors::new();
        errors.add(field, message);
        Self::Validation(errors)
    }

    pub fn not_found(entity_type: &'static str, identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this error came from the persistence layer
    pub fn is_storage(&self) -> bool {
        matches!(self, Self::Storage(_) | Self::Database(_) | Self::Io(_))
    }
}

impl From<std::io::Error> for FinanceError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for FinanceError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<rusqlite::Error> for FinanceError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<csv::Error> for FinanceError {
    fn from(err: csv::Error) -> Self {
        Self::Export(err.to_string())
    }
}

/// Result type alias for FinanceFlow operations
pub type FinanceResult<T> = Result<T, FinanceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FinanceError::Config("test error".into());
        assert_eq!(err.to_string(), "Configuration error: test error");
    }

    #[test]
    fn test_not_found_error() {
        let err = FinanceError::not_found("Bank", "Galicia");
        assert_eq!(err.to_string(), "Bank not found: Galicia");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_validation_errors_collect_fields() {
        let mut errors = ValidationErrors::new();
        errors.add("description", "must be at least 3 characters");
        errors.add("amount", "must be positive");

        assert_eq!(errors.errors().len(), 2);
        assert_eq!(errors.for_field("amount"), Some("must be positive"));

        let err = errors.into_result().unwrap_err();
        assert!(err.is_validation());
        assert_eq!(
            err.to_string(),
            "Validation error: description: must be at least 3 characters; amount: must be positive"
        );
    }

    #[test]
    fn test_empty_validation_is_ok() {
        assert!(ValidationErrors::new().into_result().is_ok());
    }

    #[test]
    fn test_not_permitted_message() {
        let err = FinanceError::NotPermitted("the savings bank cannot be deleted".into());
        assert!(err.to_string().starts_with("Acción no permitida"));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: FinanceError = io_err.into();
        assert!(matches!(err, FinanceError::Io(_)));
        assert!(err.is_storage());
    }
}
