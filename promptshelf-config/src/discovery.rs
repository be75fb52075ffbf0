//! Configuration file discovery
//!
//! Looks for `config.*` inside the global `~/.promptshelf` directory and
//! the project-local `./.promptshelf` directory.

use promptshelf_common::{shelf_home_dir, SHELF_DIR_NAME};
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// File name (without extension) of configuration files
pub const CONFIG_FILE_STEM: &str = "config";

const EXTENSIONS: [&str; 4] = ["toml", "yaml", "yml", "json"];

/// Format detected from a file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Yaml,
    Json,
}

impl ConfigFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "toml" => Some(Self::Toml),
            "yaml" | "yml" => Some(Self::Yaml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Where a file was found; project files override global ones
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ConfigScope {
    Global,
    Project,
}

/// A configuration file found on disk
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    pub path: PathBuf,
    pub format: ConfigFormat,
    pub scope: ConfigScope,
}

/// Finds configuration files in the global and project directories
#[derive(Debug, Clone)]
pub struct FileDiscovery {
    global_dir: Option<PathBuf>,
    project_dir: Option<PathBuf>,
}

impl FileDiscovery {
    /// Discover from `~/.promptshelf` and `<cwd>/.promptshelf`
    pub fn new() -> Self {
        let global_dir = shelf_home_dir().ok();
        let project_dir = std::env::current_dir()
            .ok()
            .map(|cwd| cwd.join(SHELF_DIR_NAME));
        Self::with_dirs(global_dir, project_dir)
    }

    /// Discover from explicit directories (either may be absent)
    pub fn with_dirs(global_dir: Option<PathBuf>, project_dir: Option<PathBuf>) -> Self {
        // Running from the home directory makes both the same directory
        let project_dir = project_dir.filter(|dir| Some(dir) != global_dir.as_ref());
        Self {
            global_dir,
            project_dir,
        }
    }

    /// All existing files, lowest precedence first
    pub fn discover_all(&self) -> Vec<ConfigFile> {
        let mut files = Vec::new();
        if let Some(dir) = &self.global_dir {
            files.extend(Self::scan(dir, ConfigScope::Global));
        }
        if let Some(dir) = &self.project_dir {
            files.extend(Self::scan(dir, ConfigScope::Project));
        }
        debug!("Discovered {} configuration files", files.len());
        files
    }

    fn scan(dir: &Path, scope: ConfigScope) -> Vec<ConfigFile> {
        EXTENSIONS
            .iter()
            .filter_map(|ext| {
                let path = dir.join(format!("{CONFIG_FILE_STEM}.{ext}"));
                if !path.is_file() {
                    return None;
                }
                trace!("Found {:?} config file {}", scope, path.display());
                Some(ConfigFile {
                    format: ConfigFormat::from_extension(ext)?,
                    path,
                    scope,
                })
            })
            .collect()
    }
}

impl Default for FileDiscovery {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(ConfigFormat::from_extension("YML"), Some(ConfigFormat::Yaml));
        assert_eq!(ConfigFormat::from_extension("json"), Some(ConfigFormat::Json));
        assert_eq!(ConfigFormat::from_extension("ini"), None);
    }

    #[test]
    fn test_global_files_come_first() {
        let temp = TempDir::new().unwrap();
        let global = temp.path().join("home");
        let project = temp.path().join("project");
        fs::create_dir_all(&global).unwrap();
        fs::create_dir_all(&project).unwrap();
        fs::write(project.join("config.toml"), "").unwrap();
        fs::write(global.join("config.yaml"), "").unwrap();
        fs::write(global.join("notes.toml"), "").unwrap();

        let files = FileDiscovery::with_dirs(Some(global), Some(project)).discover_all();
        let scopes: Vec<_> = files.iter().map(|f| (f.scope, f.format)).collect();
        assert_eq!(
            scopes,
            vec![
                (ConfigScope::Global, ConfigFormat::Yaml),
                (ConfigScope::Project, ConfigFormat::Toml)
            ]
        );
    }

    #[test]
    fn test_same_directory_scanned_once() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("config.json"), "{}").unwrap();
        let dir = temp.path().to_path_buf();

        let files = FileDiscovery::with_dirs(Some(dir.clone()), Some(dir)).discover_all();
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn test_missing_directories() {
        let files = FileDiscovery::with_dirs(None, Some(PathBuf::from("/nonexistent/.promptshelf")))
            .discover_all();
        assert!(files.is_empty());
    }
}
