//! Error types shared across PromptShelf crates
//!
//! Every crate in the workspace defines its own error enum. They all
//! implement [`Severity`] so callers can pick a log level and decide whether
//! the user can simply retry.

use thiserror::Error as ThisError;

/// Severity levels for error classification
///
/// - **Warning**: validation problem, nothing was changed and the user may retry.
/// - **Error**: the operation failed but the library state is still consistent.
/// - **Critical**: persistence or IO failure; state on disk may be stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    /// Potential issue, operation can be retried with different input
    Warning,
    /// Operation failed but the system can continue
    Error,
    /// Storage or IO failure, requires attention
    Critical,
}

impl ErrorSeverity {
    /// The tracing level errors of this severity should be logged at
    pub fn log_level(&self) -> tracing::Level {
        match self {
            ErrorSeverity::Warning => tracing::Level::WARN,
            ErrorSeverity::Error | ErrorSeverity::Critical => tracing::Level::ERROR,
        }
    }
}

/// Trait for error types that have severity levels
///
/// ```rust
/// use promptshelf_common::{ErrorSeverity, Severity};
///
/// #[derive(Debug)]
/// enum MyError {
///     StoreUnreachable,
///     EmptyTitle,
/// }
///
/// impl Severity for MyError {
///     fn severity(&self) -> ErrorSeverity {
///         match self {
///             MyError::StoreUnreachable => ErrorSeverity::Critical,
///             MyError::EmptyTitle => ErrorSeverity::Warning,
///         }
///     }
/// }
///
/// assert_eq!(MyError::EmptyTitle.severity(), ErrorSeverity::Warning);
/// ```
pub trait Severity {
    /// Get the severity level of this error
    fn severity(&self) -> ErrorSeverity;

    /// Whether the user can fix the problem by changing their input
    fn is_recoverable(&self) -> bool {
        self.severity() == ErrorSeverity::Warning
    }
}

/// Result type alias for common operations
pub type Result<T> = std::result::Result<T, CommonError>;

/// Infrastructure errors shared across the workspace
#[derive(Debug, ThisError)]
#[non_exhaustive]
pub enum CommonError {
    /// The user's home directory could not be determined
    #[error("Unable to determine home directory")]
    HomeDirectoryNotFound,

    /// IO operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The tracing subscriber could not be installed
    #[error("Failed to initialize logging: {0}")]
    Logging(String),
}

impl Severity for CommonError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            CommonError::HomeDirectoryNotFound => ErrorSeverity::Critical,
            CommonError::Io(_) => ErrorSeverity::Critical,
            CommonError::Logging(_) => ErrorSeverity::Error,
        }
    }
}
