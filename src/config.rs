//! Configuration module for Warden.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::auth::{HashParams, ReloadMode};
use crate::{Result, WardenError};

/// Configuration file name (without directory).
pub const CONFIG_FILE_NAME: &str = "server.toml";

/// Directories searched for [`CONFIG_FILE_NAME`], in order.
pub const CONFIG_SEARCH_PATHS: &[&str] = &[".", "./config"];

/// Prefix for environment variable overrides.
pub const ENV_PREFIX: &str = "SERVER_";

/// Smallest accepted session token length, in bytes.
pub const MIN_TOKEN_LENGTH: usize = 16;

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Read deadline in seconds.
    #[serde(default = "default_timeout")]
    pub read_timeout_secs: u64,
    /// Write deadline in seconds.
    #[serde(default = "default_timeout")]
    pub write_timeout_secs: u64,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_timeout() -> u64 {
    15
}

impl ServerConfig {
    /// `host:port` string for binding.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            read_timeout_secs: default_timeout(),
            write_timeout_secs: default_timeout(),
        }
    }
}

/// Authentication and authorization configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Path to the Casbin model document.
    #[serde(default = "default_model_path")]
    pub model_path: String,
    /// Path to the Casbin policy document.
    #[serde(default = "default_policy_path")]
    pub policy_path: String,
    /// Session token length in random bytes.
    #[serde(default = "default_token_length")]
    pub token_length: usize,
    /// When the policy documents are re-parsed.
    #[serde(default)]
    pub policy_reload: ReloadMode,
    /// Argon2 cost parameters.
    #[serde(default)]
    pub hash: HashParams,
}

fn default_model_path() -> String {
    "./config/model.conf".to_string()
}

fn default_policy_path() -> String {
    "./config/policy.csv".to_string()
}

fn default_token_length() -> usize {
    crate::auth::DEFAULT_TOKEN_LENGTH
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            model_path: default_model_path(),
            policy_path: default_policy_path(),
            token_length: default_token_length(),
            policy_reload: ReloadMode::default(),
            hash: HashParams::default(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Output format.
    #[serde(default)]
    pub format: LogFormat,
    /// Optional log file, written in addition to stdout.
    #[serde(default)]
    pub file: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
            file: None,
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Authentication configuration.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(WardenError::Io)?;
        Self::parse(&content)
    }

    /// Find [`CONFIG_FILE_NAME`] in the search paths.
    pub fn find() -> Option<PathBuf> {
        CONFIG_SEARCH_PATHS
            .iter()
            .map(|dir| Path::new(dir).join(CONFIG_FILE_NAME))
            .find(|path| path.is_file())
    }

    /// Load the first config file found in the search paths, or defaults
    /// when there is none. Environment overrides are applied either way.
    pub fn discover() -> Result<(Self, Option<PathBuf>)> {
        let found = Self::find();
        let mut config = match &found {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        config.apply_env_overrides();
        Ok((config, found))
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| WardenError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `SERVER_ADDRESS`: host to bind
    /// - `SERVER_PORT`: port to listen on
    /// - `SERVER_AUTH_MODEL`: path to the model document
    /// - `SERVER_AUTH_POLICY`: path to the policy document
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(format!("{ENV_PREFIX}{key}")).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let lookup = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if let Some(address) = lookup("ADDRESS") {
            self.server.host = address;
        }
        if let Some(port) = lookup("PORT").and_then(|p| p.parse().ok()) {
            self.server.port = port;
        }
        if let Some(model) = lookup("AUTH_MODEL") {
            self.auth.model_path = model;
        }
        if let Some(policy) = lookup("AUTH_POLICY") {
            self.auth.policy_path = policy;
        }
    }

    /// Validate the configuration.
    ///
    /// Returns an error if:
    /// - the token length is below [`MIN_TOKEN_LENGTH`]
    /// - either policy path is empty
    pub fn validate(&self) -> Result<()> {
        if self.auth.token_length < MIN_TOKEN_LENGTH {
            return Err(WardenError::Config(format!(
                "auth.token_length must be at least {MIN_TOKEN_LENGTH}"
            )));
        }
        if self.auth.model_path.is_empty() || self.auth.policy_path.is_empty() {
            return Err(WardenError::Config(
                "auth.model_path and auth.policy_path must be set".to_string(),
            ));
        }
        Ok(())
    }
}
