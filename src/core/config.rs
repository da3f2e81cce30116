//! User configuration stored as JSON in the platform config directory.

use crate::core::cache::DEFAULT_COMPRESSION_LEVEL;
use crate::core::dirs::get_config_directory;
use crate::core::error::{RevCacheError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

const CONFIG_FILE_NAME: &str = "config.json";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// zlib level used when writing the cache (0-9)
    pub compression_level: u32,
    /// Maximum number of revisions visited by `build`
    pub walk_limit: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            compression_level: DEFAULT_COMPRESSION_LEVEL,
            walk_limit: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&get_config_directory()?)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&get_config_directory()?)
    }

    /// Read `config.json` from `dir`, falling back to defaults when absent
    pub fn load_from(dir: &Path) -> Result<Self> {
        let config_file = dir.join(CONFIG_FILE_NAME);
        if !config_file.exists() {
            log::debug!("No config at {}, using defaults", config_file.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&config_file)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save_to(&self, dir: &Path) -> Result<()> {
        self.validate()?;
        std::fs::create_dir_all(dir)?;
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(dir.join(CONFIG_FILE_NAME), content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.compression_level > 9 {
            return Err(RevCacheError::InvalidCompressionLevel {
                level: self.compression_level,
            });
        }
        Ok(())
    }
}
