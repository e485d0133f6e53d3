//! Application configuration.

use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use super::args::CliArgs;
use super::storage::ConfigError;
use crate::domain::entities::ApiKey;
use crate::infrastructure::pexels::{DEFAULT_PER_PAGE, Orientation, PEXELS_API_BASE, PexelsOptions};

pub(super) const APP_NAME: &str = crate::NAME;
pub(super) const APP_QUALIFIER: &str = "com";
pub(super) const APP_ORGANIZATION: &str = "linuxmobile";

/// Log level configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level.
    Trace,
    /// Debug level.
    Debug,
    /// Info level.
    #[default]
    Info,
    /// Warning level.
    Warn,
    /// Error level.
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Trace => write!(f, "trace"),
            Self::Debug => write!(f, "debug"),
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Application configuration, read from `config.toml` and overridden by CLI.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Configuration file path.
    #[serde(skip)]
    pub config: Option<PathBuf>,

    /// Log file path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[serde(default)]
    pub log_level: LogLevel,

    /// Pexels API key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Pexels API root.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Results per page.
    #[serde(default = "default_per_page")]
    pub per_page: u32,

    /// Orientation filter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orientation: Option<Orientation>,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum concurrent thumbnail downloads.
    #[serde(default = "default_max_concurrent_downloads")]
    pub max_concurrent_downloads: usize,
}

fn default_api_base_url() -> String {
    PEXELS_API_BASE.to_string()
}

const fn default_per_page() -> u32 {
    DEFAULT_PER_PAGE
}

const fn default_timeout_secs() -> u64 {
    30
}

const fn default_max_concurrent_downloads() -> usize {
    4
}

impl AppConfig {
    /// Merges CLI arguments into the configuration.
    pub fn merge_with_args(&mut self, args: &CliArgs) {
        if let Some(config_path) = &args.config {
            self.config = Some(config_path.clone());
        }
        if let Some(log_path) = &args.log_path {
            self.log_path = Some(log_path.clone());
        }
        if let Some(log_level) = args.log_level {
            self.log_level = log_level;
        }
        if let Some(api_key) = &args.api_key {
            self.api_key = Some(api_key.clone());
        }
        if let Some(per_page) = args.per_page {
            self.per_page = per_page;
        }
        if let Some(orientation) = args.orientation {
            self.orientation = Some(orientation);
        }
    }

    /// Returns the validated API key.
    ///
    /// # Errors
    /// Returns `ConfigError::MissingApiKey` if no non-blank key is configured.
    pub fn api_key(&self) -> Result<ApiKey, ConfigError> {
        self.api_key
            .as_deref()
            .and_then(ApiKey::new)
            .ok_or(ConfigError::MissingApiKey)
    }

    /// Returns request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Returns search client options.
    #[must_use]
    pub fn pexels_options(&self) -> PexelsOptions {
        PexelsOptions {
            base_url: self.api_base_url.clone(),
            per_page: self.per_page,
            orientation: self.orientation,
            timeout: self.timeout(),
        }
    }

    /// Returns default config directory.
    #[must_use]
    pub fn default_config_dir() -> Option<PathBuf> {
        ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Returns default log file path.
    #[must_use]
    pub fn default_log_path() -> Option<PathBuf> {
        ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .map(|dirs| dirs.data_dir().join("pexgrid.log"))
    }

    /// Returns effective log path.
    #[must_use]
    pub fn effective_log_path(&self) -> Option<PathBuf> {
        self.log_path.clone().or_else(Self::default_log_path)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config: None,
            log_path: None,
            log_level: LogLevel::Info,
            api_key: None,
            api_base_url: default_api_base_url(),
            per_page: default_per_page(),
            orientation: None,
            timeout_secs: default_timeout_secs(),
            max_concurrent_downloads: default_max_concurrent_downloads(),
        }
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("config", &self.config)
            .field("log_path", &self.log_path)
            .field("log_level", &self.log_level)
            .field("api_key", &self.api_key.as_deref().and_then(ApiKey::new))
            .field("api_base_url", &self.api_base_url)
            .field("per_page", &self.per_page)
            .field("orientation", &self.orientation)
            .field("timeout_secs", &self.timeout_secs)
            .field("max_concurrent_downloads", &self.max_concurrent_downloads)
            .finish()
    }
}
