//! Logging setup and helpers

use crate::error::{CommonError, Result};
use serde::Serialize;
use std::fmt::Debug;
use std::str::FromStr;
use tracing_subscriber::{fmt, prelude::*, registry, EnvFilter};

/// Verbosity selected on the command line or in configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Only errors
    Quiet,
    /// The default
    Normal,
    /// Debug output
    Verbose,
    /// Everything, including tracing spans
    Trace,
}

impl LogLevel {
    fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Quiet => "error",
            LogLevel::Normal => "info",
            LogLevel::Verbose => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

impl FromStr for LogLevel {
    type Err = CommonError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "error" | "quiet" => Ok(LogLevel::Quiet),
            "warn" | "info" | "normal" => Ok(LogLevel::Normal),
            "debug" | "verbose" => Ok(LogLevel::Verbose),
            "trace" => Ok(LogLevel::Trace),
            other => Err(CommonError::Logging(format!("unknown log level '{other}'"))),
        }
    }
}

/// Install the global tracing subscriber writing to stderr
///
/// `RUST_LOG` takes precedence over `level` when set.
pub fn init_logging(level: LogLevel) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_filter()));

    registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init()
        .map_err(|e| CommonError::Logging(e.to_string()))
}

/// Wrapper for pretty-printing types in logs as YAML
///
/// ```ignore
/// use promptshelf_common::Pretty;
/// tracing::debug!("Imported history: {}", Pretty(&history));
/// ```
///
/// Debug output is used as a fallback if YAML serialization fails.
pub struct Pretty<T>(pub T);

impl<T: Serialize + Debug> std::fmt::Display for Pretty<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match serde_yaml_ng::to_string(&self.0) {
            Ok(yaml) => write!(f, "\n{}", yaml),
            Err(_) => write!(f, "\n{:#?}", self.0),
        }
    }
}

impl<T: Serialize + Debug> std::fmt::Debug for Pretty<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(self, f)
    }
}
