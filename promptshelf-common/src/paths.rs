//! Well-known PromptShelf locations

use crate::error::{CommonError, Result};
use std::path::PathBuf;

/// Name of the per-user (and per-project) PromptShelf directory
pub const SHELF_DIR_NAME: &str = ".promptshelf";

/// `~/.promptshelf`
pub fn shelf_home_dir() -> Result<PathBuf> {
    dirs::home_dir()
        .map(|home| home.join(SHELF_DIR_NAME))
        .ok_or(CommonError::HomeDirectoryNotFound)
}

/// `~/.promptshelf/data`, where the library store lives unless configured otherwise
pub fn default_data_dir() -> Result<PathBuf> {
    Ok(shelf_home_dir()?.join("data"))
}
