//! Configuration file support for wodlog.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/wodlog/config.toml`.

use crate::reconcile::DEFAULT_SEARCH_LIMIT;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub import: ImportConfig,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

impl DataConfig {
    /// Library document inside the data directory
    pub fn library_path(&self) -> PathBuf {
        self.data_dir.join("library.json")
    }

    /// Lock file serializing imports into the library
    pub fn lock_path(&self) -> PathBuf {
        self.data_dir.join("library.lock")
    }
}

/// Import behavior configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ImportConfig {
    /// Bound on catalog name searches during reconciliation
    #[serde(default = "default_search_limit")]
    pub search_limit: usize,

    /// User the imported sessions are recorded for
    #[serde(default = "default_user_id")]
    pub user_id: i64,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            search_limit: default_search_limit(),
            user_id: default_user_id(),
        }
    }
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| {
        std::env::var_os("HOME")
            .map(|home| PathBuf::from(home).join(".local/share"))
            .unwrap_or_else(|| PathBuf::from("."))
    });
    base.join("wodlog")
}

fn default_search_limit() -> usize {
    DEFAULT_SEARCH_LIMIT
}

fn default_user_id() -> i64 {
    1
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load and validate configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| {
            std::env::var_os("HOME")
                .map(|home| PathBuf::from(home).join(".config"))
                .unwrap_or_else(|| PathBuf::from("."))
        });
        base.join("wodlog").join("config.toml")
    }

    /// Reject values the importer cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.import.search_limit == 0 {
            return Err(Error::Config(
                "import.search_limit must be greater than zero".into(),
            ));
        }
        if self.data.data_dir.as_os_str().is_empty() {
            return Err(Error::Config("data.data_dir must not be empty".into()));
        }
        Ok(())
    }

    /// Save the current configuration to the default path
    pub fn save(&self) -> Result<()> {
        let config_path = Self::default_config_path();
        self.save_to(&config_path)
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.import.search_limit, 10);
        assert_eq!(config.import.user_id, 1);
        assert!(config.data.data_dir.ends_with("wodlog"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_roundtrip() {
        let mut config = Config::default();
        config.import.user_id = 42;
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();

        assert_eq!(parsed.import.user_id, 42);
        assert_eq!(parsed.data.data_dir, config.data.data_dir);
    }

    #[test]
    fn test_partial_config() {
        let toml_str = r#"
[import]
user_id = 3
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.import.user_id, 3);
        assert_eq!(config.import.search_limit, 10); // default
    }

    #[test]
    fn test_zero_search_limit_rejected() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[import]\nsearch_limit = 0\n").unwrap();

        assert!(matches!(Config::load_from(&path), Err(Error::Config(_))));
    }

    #[test]
    fn test_save_to_and_load_from() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.data.data_dir = temp_dir.path().join("data");
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.data.library_path(), temp_dir.path().join("data/library.json"));
        assert_eq!(loaded.data.lock_path(), temp_dir.path().join("data/library.lock"));
    }
}
