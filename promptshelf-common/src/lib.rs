//! # PromptShelf Common
//!
//! Foundational pieces shared by every PromptShelf crate:
//!
//! - [`error`] - error severity classification and the common error type
//! - [`logging`] - tracing subscriber setup and the [`Pretty`] log wrapper
//! - [`paths`] - locations of the PromptShelf home and data directories

pub mod error;
pub mod logging;
pub mod paths;

pub use error::{CommonError, ErrorSeverity, Result, Severity};
pub use logging::{init_logging, LogLevel, Pretty};
pub use paths::{default_data_dir, shelf_home_dir, SHELF_DIR_NAME};
