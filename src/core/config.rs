use crate::core::state::DEFAULT_AMOUNT;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

pub const DEFAULT_NBP_BASE_URL: &str = "https://api.nbp.pl";

fn default_base_url() -> String {
    DEFAULT_NBP_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_retries() -> usize {
    1
}

fn default_amount() -> String {
    DEFAULT_AMOUNT.to_string()
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct NbpProviderConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_retries")]
    pub retries: usize,
}

impl Default for NbpProviderConfig {
    fn default() -> Self {
        NbpProviderConfig {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            retries: default_retries(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub nbp: NbpProviderConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub providers: ProvidersConfig,
    /// Amount preloaded into the converter
    #[serde(default = "default_amount")]
    pub amount: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            providers: ProvidersConfig::default(),
            amount: default_amount(),
        }
    }
}

impl AppConfig {
    /// Loads the default config file, falling back to built-in defaults when
    /// it does not exist yet.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!(
                "No config at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("pl", "kantor", "kantor")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }
}
