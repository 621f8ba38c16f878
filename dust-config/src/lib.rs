use std::{fs, io, path::Path};

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use thiserror::Error;

pub mod redstone;

pub use redstone::{RedstoneConfig, RedstoneImplementation};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to access config file: {0}")]
    Io(#[from] io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config value: {0}")]
    Invalid(String),
}

#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(default)]
pub struct DustConfiguration {
    pub redstone: RedstoneConfig,
}

pub trait LoadConfiguration {
    /// Reads the configuration from `config_dir`, writing the defaults first
    /// when no file exists yet.
    fn load(config_dir: &Path) -> Result<Self, ConfigError>
    where
        Self: Sized + Default + Serialize + DeserializeOwned,
    {
        let path = config_dir.join(Self::get_path());

        let config = if path.exists() {
            let content = fs::read_to_string(&path)?;
            serde_json::from_str::<Self>(&content)?
        } else {
            log::warn!(
                "Config file {} not found, writing defaults",
                path.display()
            );
            let config = Self::default();
            fs::create_dir_all(config_dir)?;
            fs::write(&path, serde_json::to_string_pretty(&config)?)?;
            config
        };

        config.validate()?;
        Ok(config)
    }

    fn get_path() -> &'static Path;

    fn validate(&self) -> Result<(), ConfigError>;
}

impl LoadConfiguration for DustConfiguration {
    fn get_path() -> &'static Path {
        Path::new("dust.json")
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.redstone.device_tick_delay == 0 {
            return Err(ConfigError::Invalid(
                "redstone.device_tick_delay must be at least 1".to_owned(),
            ));
        }
        Ok(())
    }
}
