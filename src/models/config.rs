//! Client configuration loaded from an optional YAML file and the environment.

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::pagination::DEFAULT_ITEMS_PER_PAGE;

/// Prefix of environment overrides, e.g. `FLEET__API_BASE_URL`.
pub const ENV_PREFIX: &str = "FLEET";

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
/// Settings shared by the gateway and the command handlers.
pub struct ClientConfig {
    /// Base URL of the back-office API; endpoint paths are joined onto it.
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    /// Bearer token; takes precedence over `token_file`.
    pub token: Option<String>,
    /// JSON credentials file written by a previous sign-in.
    pub token_file: Option<PathBuf>,
    pub items_per_page: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:5000".to_string(),
            request_timeout_secs: 30,
            token: None,
            token_file: None,
            items_per_page: DEFAULT_ITEMS_PER_PAGE,
        }
    }
}

impl ClientConfig {
    /// Loads `path` (when given) and applies `FLEET__*` overrides on top.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }
        builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()
    }
}
