//! Destinations for injected prompt text

use async_trait::async_trait;
use promptshelf_config::{InjectorKind, ShelfConfig};
use promptshelf_library::{LibraryError, Result, TextInjector};
use std::path::PathBuf;
use tokio::fs::OpenOptions;
use tokio::io::{self, AsyncWriteExt};

/// Writes the text to standard output
pub struct StdoutInjector;

#[async_trait]
impl TextInjector for StdoutInjector {
    async fn inject(&self, text: &str) -> Result<()> {
        let mut stdout = io::stdout();
        stdout.write_all(text.as_bytes()).await?;
        stdout.write_all(b"\n").await?;
        stdout.flush().await?;
        Ok(())
    }
}

/// Appends the text to an existing file
///
/// The file plays the part of an open text field: it has to exist already.
pub struct FileInjector {
    path: PathBuf,
}

impl FileInjector {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl TextInjector for FileInjector {
    async fn inject(&self, text: &str) -> Result<()> {
        let mut file = match OpenOptions::new().append(true).open(&self.path).await {
            Ok(file) => file,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(LibraryError::InjectionTargetNotFound(
                    self.path.display().to_string(),
                ))
            }
            Err(err) => return Err(LibraryError::Injection(err.to_string())),
        };
        file.write_all(text.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }
}

/// The injector selected in configuration
pub fn from_config(config: &ShelfConfig) -> Box<dyn TextInjector> {
    match (config.injector, &config.inject_file) {
        (InjectorKind::File, Some(path)) => Box::new(FileInjector::new(path.clone())),
        _ => Box::new(StdoutInjector),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_file_injector_appends() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("draft.txt");
        std::fs::write(&path, "Dear team,\n").unwrap();

        FileInjector::new(&path).inject("hello").await.unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "Dear team,\nhello");
    }

    #[tokio::test]
    async fn test_missing_file_is_target_not_found() {
        let temp = TempDir::new().unwrap();
        let result = FileInjector::new(temp.path().join("closed.txt"))
            .inject("hello")
            .await;
        assert!(matches!(
            result,
            Err(LibraryError::InjectionTargetNotFound(_))
        ));
    }
}
