//! Configuration provider using Figment

use crate::discovery::{ConfigFile, ConfigFormat, FileDiscovery};
use crate::types::ShelfConfig;
use crate::ConfigResult;
use figment::{
    providers::{Env, Format, Json, Serialized, Toml, Yaml},
    Figment,
};
use tracing::{debug, trace};

/// Prefix of environment variables that override configuration values
pub const ENV_PREFIX: &str = "PROMPTSHELF_";

/// Loads [`ShelfConfig`] from defaults, discovered files and the environment
///
/// Nothing is cached; every [`load`](Self::load) reads the sources again.
#[derive(Debug, Clone, Default)]
pub struct ConfigProvider {
    discovery: FileDiscovery,
}

impl ConfigProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Provider reading files from the given discovery instead of the default locations
    pub fn with_discovery(discovery: FileDiscovery) -> Self {
        Self { discovery }
    }

    /// Merge every source, extract and validate
    pub fn load(&self) -> ConfigResult<ShelfConfig> {
        let config: ShelfConfig = self.build_figment().extract()?;
        config.validate()?;
        debug!(
            "Loaded configuration: data_dir={} history_capacity={}",
            config.data_dir.display(),
            config.history_capacity
        );
        Ok(config)
    }

    /// Sources in precedence order, later ones win
    fn build_figment(&self) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(ShelfConfig::default()));
        for file in self.discovery.discover_all() {
            figment = figment.merge(Self::file_provider(&file));
        }
        figment.merge(Env::prefixed(ENV_PREFIX))
    }

    fn file_provider(file: &ConfigFile) -> Figment {
        trace!("Loading config file {}", file.path.display());
        match file.format {
            ConfigFormat::Toml => Figment::from(Toml::file(&file.path)),
            ConfigFormat::Yaml => Figment::from(Yaml::file(&file.path)),
            ConfigFormat::Json => Figment::from(Json::file(&file.path)),
        }
    }
}
