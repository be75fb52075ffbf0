//! Shared state for command handlers

use anyhow::{Context, Result};
use promptshelf_config::ShelfConfig;
use promptshelf_library::{JsonFileStore, LibraryState};
use std::path::PathBuf;
use std::sync::Arc;

pub struct CliContext {
    pub library: LibraryState,
    pub config: ShelfConfig,
    /// Whether the wizard may prompt on the terminal
    pub interactive: bool,
}

impl CliContext {
    /// Open the library stored in `data_dir` (or the configured directory)
    pub async fn open(config: ShelfConfig, data_dir: Option<PathBuf>, interactive: bool) -> Result<Self> {
        let data_dir = data_dir.unwrap_or_else(|| config.data_dir.clone());
        let store = Arc::new(JsonFileStore::new(&data_dir));
        let library = LibraryState::load_with_capacity(store, config.history_capacity)
            .await
            .with_context(|| format!("failed to load library from {}", data_dir.display()))?;

        Ok(Self {
            library,
            config,
            interactive,
        })
    }
}
