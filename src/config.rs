use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::constants::{DEFAULT_KARTVERKET_BASE_URL, DEFAULT_SEEIENDOM_BASE_URL};
use crate::error::{ResolverError, Result};

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    pub kartverket: KartverketConfig,
    pub seeiendom: SeeiendomConfig,
    pub resolver: ResolverConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct KartverketConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SeeiendomConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Courtesy pause between successive batch resolutions.
    pub batch_delay_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            kartverket: KartverketConfig::default(),
            seeiendom: SeeiendomConfig::default(),
            resolver: ResolverConfig::default(),
        }
    }
}

impl Default for KartverketConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_KARTVERKET_BASE_URL.to_string(),
            timeout_seconds: 10,
        }
    }
}

impl Default for SeeiendomConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_SEEIENDOM_BASE_URL.to_string(),
            timeout_seconds: 10,
        }
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self { batch_delay_ms: 200 }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new("config.toml"))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let config_content = fs::read_to_string(path).map_err(|e| {
            ResolverError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        let config: Config = toml::from_str(&config_content)?;
        Ok(config)
    }
}
