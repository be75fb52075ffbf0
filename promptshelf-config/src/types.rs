//! The configuration model

use crate::error::ConfigError;
use crate::ConfigResult;
use promptshelf_common::{default_data_dir, LogLevel, SHELF_DIR_NAME};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Largest accepted `history_capacity`
pub const MAX_HISTORY_CAPACITY: usize = 50;

/// Destination for injected prompt text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InjectorKind {
    /// Print the text to standard output
    #[default]
    Stdout,
    /// Append the text to `inject_file`
    File,
}

/// Settings for the `shelf` command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShelfConfig {
    /// Directory holding the library records
    pub data_dir: PathBuf,
    /// `error`, `warn`, `info`, `debug` or `trace`
    pub log_level: String,
    /// Values remembered per variable
    pub history_capacity: usize,
    pub injector: InjectorKind,
    /// Target of the `file` injector
    pub inject_file: Option<PathBuf>,
}

impl Default for ShelfConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir()
                .unwrap_or_else(|_| PathBuf::from(SHELF_DIR_NAME).join("data")),
            log_level: "info".to_string(),
            history_capacity: 5,
            injector: InjectorKind::Stdout,
            inject_file: None,
        }
    }
}

impl ShelfConfig {
    /// Check ranges and cross-field requirements
    pub fn validate(&self) -> ConfigResult<()> {
        if !(1..=MAX_HISTORY_CAPACITY).contains(&self.history_capacity) {
            return Err(ConfigError::validation(format!(
                "history_capacity must be between 1 and {MAX_HISTORY_CAPACITY}, got {}",
                self.history_capacity
            )));
        }
        if self.injector == InjectorKind::File && self.inject_file.is_none() {
            return Err(ConfigError::validation(
                "injector 'file' requires inject_file to be set",
            ));
        }
        self.log_level()?;
        Ok(())
    }

    pub fn log_level(&self) -> ConfigResult<LogLevel> {
        self.log_level
            .parse()
            .map_err(|_| ConfigError::validation(format!("unknown log_level '{}'", self.log_level)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = ShelfConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.history_capacity, 5);
        assert_eq!(config.log_level().unwrap(), LogLevel::Normal);
        assert!(config.data_dir.ends_with("data"));
    }

    #[test]
    fn test_capacity_bounds() {
        for capacity in [0, MAX_HISTORY_CAPACITY + 1] {
            let config = ShelfConfig {
                history_capacity: capacity,
                ..Default::default()
            };
            assert!(matches!(
                config.validate(),
                Err(ConfigError::ValidationError { .. })
            ));
        }
    }

    #[test]
    fn test_file_injector_needs_path() {
        let mut config = ShelfConfig {
            injector: InjectorKind::File,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        config.inject_file = Some(PathBuf::from("/tmp/out.txt"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_unknown_log_level() {
        let config = ShelfConfig {
            log_level: "chatty".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
