//! Error types for the configuration system

use promptshelf_common::{ErrorSeverity, Severity};
use std::path::PathBuf;
use thiserror::Error;

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A source could not be parsed or extracted into [`ShelfConfig`](crate::ShelfConfig)
    #[error("Failed to parse configuration: {source}")]
    ParseError {
        #[source]
        source: Box<figment::Error>,
    },

    /// Values parsed but are not usable
    #[error("Configuration validation failed: {message}")]
    ValidationError { message: String },

    /// A file was named explicitly but doesn't exist
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: PathBuf },
}

impl ConfigError {
    pub fn validation(message: impl Into<String>) -> Self {
        ConfigError::ValidationError {
            message: message.into(),
        }
    }
}

impl From<figment::Error> for ConfigError {
    fn from(error: figment::Error) -> Self {
        ConfigError::ParseError {
            source: Box::new(error),
        }
    }
}

impl Severity for ConfigError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            ConfigError::ParseError { .. } => ErrorSeverity::Error,
            ConfigError::ValidationError { .. } => ErrorSeverity::Error,
            ConfigError::FileNotFound { .. } => ErrorSeverity::Warning,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message() {
        let err = ConfigError::validation("history_capacity must be at least 1");
        assert_eq!(
            err.to_string(),
            "Configuration validation failed: history_capacity must be at least 1"
        );
        assert_eq!(err.severity(), ErrorSeverity::Error);
    }
}
