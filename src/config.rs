//! Configuration loader and validator for the server-status watcher.
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

pub const DEFAULT_WINDOW_SIZE: usize = 5;
pub const MAX_WINDOW_SIZE: usize = 200;
pub const DEFAULT_API_BASE: &str = "https://api.x.com/";
pub const BEARER_TOKEN_ENV: &str = "X_BEARER_TOKEN";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(&'static str),
}

/// Root configuration struct mirroring the YAML schema exactly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    pub app: App,
    #[serde(default)]
    pub x: XApi,
}

/// What to watch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct App {
    pub target_account: String,
    #[serde(default = "default_window_size")]
    pub window_size: usize,
}

/// Upstream API settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct XApi {
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default)]
    pub bearer_token: String,
}

impl Default for XApi {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            bearer_token: String::new(),
        }
    }
}

fn default_window_size() -> usize {
    DEFAULT_WINDOW_SIZE
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

impl App {
    /// Account handle without a leading `@`.
    pub fn account(&self) -> &str {
        self.target_account.trim().trim_start_matches('@')
    }
}

impl Config {
    /// Build a config for `account` with every other field defaulted.
    pub fn for_account(account: impl Into<String>) -> Self {
        Self {
            app: App {
                target_account: account.into(),
                window_size: DEFAULT_WINDOW_SIZE,
            },
            x: XApi::default(),
        }
    }

    /// Replace the bearer token from `X_BEARER_TOKEN` when it is set and non-empty.
    pub fn apply_env(&mut self) {
        if let Ok(token) = std::env::var(BEARER_TOKEN_ENV) {
            if !token.trim().is_empty() {
                self.x.bearer_token = token;
            }
        }
    }
}

/// Load configuration from a YAML file and validate it.
/// - If `path` is None, uses `config.yaml` in the current working directory.
pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
    let path = path.unwrap_or_else(|| Path::new("config.yaml"));
    let content = fs::read_to_string(path)?;
    let mut cfg: Config = serde_yaml::from_str(&content)?;
    cfg.apply_env();
    validate(&cfg)?;
    Ok(cfg)
}

/// Validate a configuration instance.
///
/// The bearer token is not checked here; only the HTTP source needs it.
pub fn validate(cfg: &Config) -> Result<(), ConfigError> {
    if cfg.app.account().is_empty() {
        return Err(ConfigError::Invalid("app.target_account must be non-empty"));
    }
    if cfg.app.window_size == 0 || cfg.app.window_size > MAX_WINDOW_SIZE {
        return Err(ConfigError::Invalid("app.window_size must be between 1 and 200"));
    }
    if cfg.x.api_base.trim().is_empty() {
        return Err(ConfigError::Invalid("x.api_base must be non-empty"));
    }
    if reqwest::Url::parse(&cfg.x.api_base).is_err() {
        return Err(ConfigError::Invalid("x.api_base must be an absolute URL"));
    }
    Ok(())
}

/// Returns a complete example config file.
pub fn example() -> &'static str {
    r#"app:
  target_account: "huntshowdown"
  window_size: 5

x:
  api_base: "https://api.x.com/"
  bearer_token: "YOUR_X_BEARER_TOKEN"
"#
}
