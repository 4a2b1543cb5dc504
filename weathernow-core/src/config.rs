use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, time::Duration};

use crate::provider::Delays;

/// City shown when nothing is configured and none is passed on the command
/// line.
const FALLBACK_CITY: &str = "New York";

/// Simulated latency, in milliseconds per operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelayConfig {
    pub current_ms: u64,
    pub forecast_ms: u64,
    pub search_ms: u64,
}

impl Default for DelayConfig {
    fn default() -> Self {
        let delays = Delays::default();
        Self {
            current_ms: delays.current.as_millis() as u64,
            forecast_ms: delays.forecast.as_millis() as u64,
            search_ms: delays.search.as_millis() as u64,
        }
    }
}

impl DelayConfig {
    pub fn as_delays(&self) -> Delays {
        Delays {
            current: Duration::from_millis(self.current_ms),
            forecast: Duration::from_millis(self.forecast_ms),
            search: Duration::from_millis(self.search_ms),
        }
    }
}

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Optional city used when none is passed on the command line.
    pub default_city: Option<String>,

    /// Example TOML:
    /// [delays]
    /// current_ms = 500
    #[serde(default)]
    pub delays: DelayConfig,
}

impl Config {
    /// The configured default city, or the stock selection.
    pub fn default_city_name(&self) -> &str {
        self.default_city.as_deref().unwrap_or(FALLBACK_CITY)
    }

    pub fn set_default_city(&mut self, city: impl Into<String>) {
        self.default_city = Some(city.into());
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file, return empty.
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

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weathernow", "weathernow-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}
