use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

/// Environment variable that overrides the stored API key.
pub const API_KEY_ENV: &str = "OPEN_WEATHER_KEY";

pub const DEFAULT_GEOCODE_URL: &str = "http://api.openweathermap.org/geo/1.0/direct";
pub const DEFAULT_WEATHER_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// data_dir = "/home/me/.local/share/citywx"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// OpenWeather API key. `OPEN_WEATHER_KEY` takes precedence when set.
    pub api_key: Option<String>,

    /// Override for the geocoding endpoint.
    pub geocode_url: Option<String>,

    /// Override for the current-weather endpoint.
    pub weather_url: Option<String>,

    /// Directory holding the search history slot.
    pub data_dir: Option<PathBuf>,
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    pub fn config_file_path() -> Result<PathBuf> {
        Ok(project_dirs()?.config_dir().join("config.toml"))
    }

    /// Apply an API key taken from the environment, if any.
    ///
    /// Blank values are ignored so an exported-but-empty variable does not
    /// shadow the stored key.
    pub fn with_env_api_key(mut self, value: Option<String>) -> Self {
        if let Some(key) = value.filter(|k| !k.trim().is_empty()) {
            self.api_key = Some(key);
        }
        self
    }

    /// Shorthand for `with_env_api_key(std::env::var(API_KEY_ENV).ok())`.
    pub fn with_env(self) -> Self {
        self.with_env_api_key(std::env::var(API_KEY_ENV).ok())
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.api_key = Some(api_key);
    }

    /// API key to send, empty when none is configured. A missing key is not
    /// rejected here; the remote API refuses the request instead.
    pub fn api_key(&self) -> &str {
        self.api_key.as_deref().unwrap_or_default()
    }

    pub fn is_api_key_configured(&self) -> bool {
        !self.api_key().is_empty()
    }

    pub fn geocode_url(&self) -> &str {
        self.geocode_url.as_deref().unwrap_or(DEFAULT_GEOCODE_URL)
    }

    pub fn weather_url(&self) -> &str {
        self.weather_url.as_deref().unwrap_or(DEFAULT_WEATHER_URL)
    }

    /// Directory for persisted state, defaulting to the platform data dir.
    pub fn data_dir(&self) -> Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(project_dirs()?.data_dir().to_path_buf()),
        }
    }
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("dev", "citywx", "citywx")
        .ok_or_else(|| anyhow!("Could not determine platform config directory"))
}
