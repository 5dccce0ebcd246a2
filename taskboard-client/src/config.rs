//! Client configuration
//!
//! Layered with the `config` crate: built-in defaults, then an optional TOML file,
//! then `TASKBOARD_*` environment variables (`TASKBOARD_API_URL`,
//! `TASKBOARD_TOKEN`, `TASKBOARD_REQUEST_TIMEOUT_SECS`).

use std::collections::HashMap;

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

/// Default configuration file name, looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "taskboard";

const DEFAULT_API_URL: &str = "http://127.0.0.1:8080";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the API server
    pub api_url: String,

    /// Access token sent as `Authorization: Bearer`
    #[serde(default)]
    pub token: Option<String>,

    /// Per-request timeout
    pub request_timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            token: None,
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ClientConfig {
    /// Loads defaults, then `file` (if it exists), then the process environment
    pub fn load(file: Option<&str>) -> Result<Self, ConfigError> {
        Self::from_sources(file, None)
    }

    /// Like [`ClientConfig::load`], reading variables from `env` instead of the
    /// process environment when given
    pub fn from_sources(
        file: Option<&str>,
        env: Option<HashMap<String, String>>,
    ) -> Result<Self, ConfigError> {
        let config = Config::builder()
            .set_default("api_url", DEFAULT_API_URL)?
            .set_default("request_timeout_secs", DEFAULT_TIMEOUT_SECS as i64)?
            .add_source(File::with_name(file.unwrap_or(DEFAULT_CONFIG_FILE)).required(false))
            .add_source(Environment::with_prefix("TASKBOARD").try_parsing(true).source(env))
            .build()?;

        config.try_deserialize()
    }
}
