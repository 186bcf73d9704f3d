use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use anyhow::{Result, anyhow};

use crate::client::DEFAULT_BASE_URL;
use crate::policy::ErrorPolicy;

pub const ENDPOINT_ENV: &str = "HOSPICHAT_ENDPOINT";

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub endpoint: Option<String>,
    pub error_policy: Option<String>,
    pub log_file: Option<String>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::get_config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }

        let config_content = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&config_content)?;
        Ok(config)
    }

    /// Base URL of the assistant: explicit override, then env var, then file, then default
    pub fn resolve_endpoint(&self, cli_override: Option<&str>) -> String {
        cli_override
            .map(str::to_string)
            .or_else(|| std::env::var(ENDPOINT_ENV).ok().filter(|v| !v.trim().is_empty()))
            .or_else(|| self.endpoint.clone())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
    }

    /// Unknown policy names fall back to the default with a warning.
    pub fn error_policy(&self) -> ErrorPolicy {
        match self.error_policy.as_deref() {
            None => ErrorPolicy::default(),
            Some(name) => ErrorPolicy::from_str(name).unwrap_or_else(|| {
                tracing::warn!(name, "unknown error policy in config, using silent");
                ErrorPolicy::default()
            }),
        }
    }

    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("hospichat").join("config.json"))
    }
}
