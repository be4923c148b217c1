use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants;
use crate::error::{PipelineError, Result};
use crate::pipeline::processing::enrich::RowFailurePolicy;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub reference: ReferenceConfig,
    pub output: OutputConfig,
    pub transform: TransformConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub resource_version: String,
    pub page_delay_ms: u64,
    pub timeout_seconds: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: constants::DEFAULT_API_BASE_URL.to_string(),
            resource_version: constants::DEFAULT_RESOURCE_VERSION.to_string(),
            page_delay_ms: constants::DEFAULT_PAGE_DELAY_MS,
            timeout_seconds: 30,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReferenceConfig {
    pub dir: PathBuf,
    pub airline_capacity_file: String,
    pub aircraft_capacity_file: String,
    pub passenger_load_factor_file: String,
}

impl Default for ReferenceConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("csv"),
            airline_capacity_file: constants::AIRLINE_CAPACITY_FILE.to_string(),
            aircraft_capacity_file: constants::AIRCRAFT_CAPACITY_FILE.to_string(),
            passenger_load_factor_file: constants::PASSENGER_LOAD_FACTOR_FILE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub dir: PathBuf,
    pub prefix: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("output"),
            prefix: constants::DEFAULT_OUTPUT_PREFIX.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TransformConfig {
    pub row_policy: RowFailurePolicy,
}

/// API credentials, kept out of `config.toml`
#[derive(Clone)]
pub struct ApiCredentials {
    pub app_id: String,
    pub app_key: String,
}

impl std::fmt::Debug for ApiCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiCredentials")
            .field("app_id", &self.app_id)
            .field("app_key", &"<redacted>")
            .finish()
    }
}

impl ApiCredentials {
    /// Reads `SCHIPHOL_APP_ID` / `SCHIPHOL_APP_KEY`, loading `.env` first if present.
    pub fn from_env() -> Result<Self> {
        let _ = dotenv::dotenv();
        Ok(Self {
            app_id: required_var(constants::APP_ID_ENV)?,
            app_key: required_var(constants::APP_KEY_ENV)?,
        })
    }
}

fn required_var(name: &str) -> Result<String> {
    std::env::var(name).map_err(|e| {
        tracing::error!("{} is not usable: {}", name, e);
        PipelineError::from(e)
    })
}

impl Config {
    /// Loads `path`, falling back to defaults when the file does not exist.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let config_content = fs::read_to_string(path).map_err(|e| {
            PipelineError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_toml(&config_content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }
}
