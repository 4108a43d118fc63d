//! Configuration
//! Layered settings: defaults, then an optional TOML file, then
//! `CRASHBOARD_` environment variables.

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const CONFIG_FILE_NAME: &str = "crashboard.toml";
pub const DEFAULT_DATA_FILE: &str = "Nigerian_Road_Traffic_Crashes_2020_2024.csv";
const ENV_PREFIX: &str = "CRASHBOARD_";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub data: DataConfig,
    pub window: WindowConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// CSV file loaded at startup.
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: f32,
    pub height: f32,
    pub min_width: f32,
    pub min_height: f32,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_DATA_FILE),
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1400.0,
            height: 900.0,
            min_width: 1000.0,
            min_height: 700.0,
        }
    }
}

impl Config {
    /// Load from `config_path`, or `crashboard.toml` in the working directory.
    /// A missing file is not an error.
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = config_path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME));

        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .map_err(Box::new)?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.data.path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("data.path must not be empty".into()));
        }

        let window = &self.window;
        let sizes = [
            ("window.width", window.width),
            ("window.height", window.height),
            ("window.min_width", window.min_width),
            ("window.min_height", window.min_height),
        ];
        if let Some((key, _)) = sizes.iter().find(|(_, v)| !(*v > 0.0)) {
            return Err(ConfigError::Invalid(format!("{key} must be positive")));
        }

        Ok(())
    }
}
