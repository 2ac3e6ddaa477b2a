use std::path::Path;

use serde::{Deserialize, Serialize};

use super::env::Env;
use crate::{RelayError, Result};

pub const DEFAULT_LISTEN: &str = "127.0.0.1:3000";
pub const DEFAULT_BASE_URL: &str = "https://api.studio.nebius.com/v1/";
pub const DEFAULT_API_KEY_ENV: &str = "NEBIUS_API_KEY";
const BASE_URL_ENV: &str = "NEBIUS_BASE_URL";

fn default_listen() -> String {
    DEFAULT_LISTEN.to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ProviderConfig {
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default, alias = "keys")]
    pub api_key_env: Vec<String>,
}

impl ProviderConfig {
    /// `NEBIUS_BASE_URL` wins over the configured value, which wins over the default.
    pub fn resolve_base_url(&self, env: &Env) -> String {
        env.get(BASE_URL_ENV)
            .or_else(|| {
                self.base_url
                    .as_deref()
                    .map(str::trim)
                    .filter(|url| !url.is_empty())
                    .map(str::to_string)
            })
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RelayConfig {
    #[serde(default = "default_listen")]
    pub listen: String,
    #[serde(default)]
    pub json_logs: bool,
    #[serde(default)]
    pub provider: ProviderConfig,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            json_logs: false,
            provider: ProviderConfig::default(),
        }
    }
}

impl RelayConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        toml::from_str(raw).map_err(|err| RelayError::Config(err.to_string()))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|err| {
            RelayError::Config(format!("failed to read {}: {err}", path.display()))
        })?;
        Self::from_toml_str(&raw)
    }
}
