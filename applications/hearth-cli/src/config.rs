/// CLI configuration
use hearth_importer::ImportConfig;
use hearth_playback::PlaybackConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

const DEFAULT_CONFIG_FILE: &str = "hearth.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct HearthConfig {
    #[serde(default)]
    pub storage: StorageSettings,

    #[serde(default)]
    pub import: ImportSettings,

    #[serde(default)]
    pub playback: PlaybackSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageSettings {
    #[serde(default = "default_database_url")]
    pub database_url: String,

    #[serde(default = "default_managed_root")]
    pub managed_root: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ImportSettings {
    #[serde(default = "default_max_concurrent_imports")]
    pub max_concurrent_imports: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlaybackSettings {
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

impl HearthConfig {
    /// Load configuration from file and environment
    ///
    /// `path` must exist when given; otherwise `hearth.toml` in the working
    /// directory is used if present. `HEARTH_`-prefixed variables override
    /// both, with `__` between section and key
    /// (`HEARTH_STORAGE__DATABASE_URL`).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path));
            }
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default.exists() {
                    settings = settings.add_source(config::File::from(default));
                }
            }
        }

        settings = settings.add_source(
            config::Environment::with_prefix("HEARTH")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: Self = settings.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.storage.database_url.trim().is_empty() {
            return Err(ConfigError::Invalid("storage.database_url is empty".to_string()));
        }
        if self.storage.managed_root.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("storage.managed_root is empty".to_string()));
        }
        if self.import.max_concurrent_imports == 0 {
            return Err(ConfigError::Invalid(
                "import.max_concurrent_imports must be at least 1".to_string(),
            ));
        }
        if self.playback.poll_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "playback.poll_interval_ms must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn import_config(&self) -> ImportConfig {
        ImportConfig {
            managed_root: self.storage.managed_root.clone(),
            max_concurrent_imports: self.import.max_concurrent_imports,
        }
    }

    pub fn playback_config(&self) -> PlaybackConfig {
        PlaybackConfig::default()
            .with_poll_interval(Duration::from_millis(self.playback.poll_interval_ms))
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            managed_root: default_managed_root(),
        }
    }
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            max_concurrent_imports: default_max_concurrent_imports(),
        }
    }
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

// Default values
fn default_database_url() -> String {
    "sqlite://./data/hearth.db".to_string()
}

fn default_managed_root() -> PathBuf {
    PathBuf::from("./data/library")
}

fn default_max_concurrent_imports() -> usize {
    4
}

fn default_poll_interval_ms() -> u64 {
    250
}
