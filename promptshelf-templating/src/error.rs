//! Error types for template processing

use promptshelf_common::{ErrorSeverity, Severity};
use thiserror::Error;

/// Result type for templating operations
pub type Result<T> = std::result::Result<T, TemplatingError>;

/// Errors that can occur while substituting placeholders
#[derive(Debug, Error)]
pub enum TemplatingError {
    /// The matching pattern for a variable name could not be compiled
    #[error("Cannot build pattern for variable '{name}': {source}")]
    Pattern {
        /// The variable name the pattern was built for
        name: String,
        /// The underlying regex error
        source: regex::Error,
    },
}

impl Severity for TemplatingError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            TemplatingError::Pattern { .. } => ErrorSeverity::Error,
        }
    }
}
