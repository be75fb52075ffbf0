//! Error types for library operations

use promptshelf_common::{ErrorSeverity, Severity};
use promptshelf_templating::TemplatingError;
use thiserror::Error;

/// Result type alias for library operations
pub type Result<T> = std::result::Result<T, LibraryError>;

/// Errors that can occur while working with the prompt library
#[derive(Debug, Error)]
pub enum LibraryError {
    /// No node carries the given id
    #[error("Node not found: {id}")]
    NodeNotFound { id: String },

    /// The node exists but is a folder
    #[error("Node '{id}' is not a prompt")]
    NotAPrompt { id: String },

    /// The node exists but is a prompt
    #[error("Node '{id}' is not a folder")]
    NotAFolder { id: String },

    /// Titles must contain something besides whitespace
    #[error("Title cannot be empty")]
    EmptyTitle,

    /// The wizard received an empty value for a variable without a default
    #[error("A value is required for variable '{name}'")]
    EmptyValue { name: String },

    /// `back` was requested on the first step
    #[error("Already at the first variable")]
    BackUnavailable,

    /// An event arrived after the wizard completed or was cancelled
    #[error("Variable resolution has already finished")]
    WizardFinished,

    /// The user cancelled variable resolution
    #[error("Injection cancelled")]
    InjectionCancelled,

    /// Nothing to inject into; the user has to open or reload a destination
    #[error("No injection target available: {0}")]
    InjectionTargetNotFound(String),

    /// The injector found a target but failed to deliver the text
    #[error("Injection failed: {0}")]
    Injection(String),

    /// The import file is malformed; nothing was imported
    #[error("Invalid import at {path}: {reason}")]
    InvalidImport { path: String, reason: String },

    /// Storage backend error
    #[error("Storage error: {0}")]
    Storage(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Placeholder substitution failed
    #[error("Template error: {0}")]
    Templating(#[from] TemplatingError),
}

impl LibraryError {
    /// Create a node-not-found error
    pub fn node_not_found(id: impl Into<String>) -> Self {
        Self::NodeNotFound { id: id.into() }
    }

    /// Create an import validation error
    pub fn invalid_import(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidImport {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }
}

impl Severity for LibraryError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            // Critical: the store is unreachable or corrupt
            LibraryError::Storage(_) => ErrorSeverity::Critical,
            LibraryError::Io(_) => ErrorSeverity::Critical,
            LibraryError::Json(_) => ErrorSeverity::Critical,

            // Error: the operation failed, the library is unchanged
            LibraryError::NodeNotFound { .. } => ErrorSeverity::Error,
            LibraryError::NotAPrompt { .. } => ErrorSeverity::Error,
            LibraryError::NotAFolder { .. } => ErrorSeverity::Error,
            LibraryError::WizardFinished => ErrorSeverity::Error,
            LibraryError::InjectionTargetNotFound(_) => ErrorSeverity::Error,
            LibraryError::Injection(_) => ErrorSeverity::Error,

            // Warning: the user can fix their input and retry
            LibraryError::EmptyTitle => ErrorSeverity::Warning,
            LibraryError::EmptyValue { .. } => ErrorSeverity::Warning,
            LibraryError::BackUnavailable => ErrorSeverity::Warning,
            LibraryError::InjectionCancelled => ErrorSeverity::Warning,
            LibraryError::InvalidImport { .. } => ErrorSeverity::Warning,

            LibraryError::Templating(err) => err.severity(),
        }
    }
}

#[cfg(test)]
mod severity_tests {
    use super::*;

    #[test]
    fn test_storage_failures_are_critical() {
        let io_error = LibraryError::Io(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "read-only",
        ));
        assert_eq!(io_error.severity(), ErrorSeverity::Critical);
        assert_eq!(
            LibraryError::storage("unreachable").severity(),
            ErrorSeverity::Critical
        );
    }

    #[test]
    fn test_validation_failures_are_recoverable() {
        let empty = LibraryError::EmptyValue {
            name: "topic".to_string(),
        };
        assert!(empty.is_recoverable());
        assert!(LibraryError::invalid_import("forest[0]", "missing id").is_recoverable());
        assert!(!LibraryError::node_not_found("abc").is_recoverable());
    }
}
