//! # PromptShelf Configuration
//!
//! Settings for the `shelf` command, merged with [figment] from (lowest to
//! highest precedence):
//!
//! 1. built-in defaults
//! 2. `~/.promptshelf/config.{toml,yaml,yml,json}`
//! 3. `./.promptshelf/config.{toml,yaml,yml,json}`
//! 4. `PROMPTSHELF_*` environment variables, e.g. `PROMPTSHELF_HISTORY_CAPACITY=10`
//!
//! ```no_run
//! use promptshelf_config::ConfigProvider;
//!
//! let config = ConfigProvider::new().load()?;
//! println!("library stored in {}", config.data_dir.display());
//! # Ok::<(), promptshelf_config::ConfigError>(())
//! ```

mod discovery;
mod error;
mod provider;
mod types;

pub use discovery::{ConfigFile, ConfigFormat, ConfigScope, FileDiscovery, CONFIG_FILE_STEM};
pub use error::ConfigError;
pub use provider::{ConfigProvider, ENV_PREFIX};
pub use types::{InjectorKind, ShelfConfig, MAX_HISTORY_CAPACITY};

/// Result type for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
