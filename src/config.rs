//! Client configuration.
//!
//! Settings are layered, later layers winning:
//! built-in defaults, the TOML file at `~/.config/agenda-search/config.toml`
//! (or XDG equivalent), `AGENDA_SEARCH_*` environment variables (a `.env` file
//! in the working directory is honoured), then command-line flags.
//!
//! # Example Configuration
//!
//! ```toml
//! base_url = "https://sof-query.onrender.com"
//! profile = "production"
//! timeout_secs = 30
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "https://sof-query.onrender.com";

pub const ENV_BASE_URL: &str = "AGENDA_SEARCH_BASE_URL";
pub const ENV_PROFILE: &str = "AGENDA_SEARCH_PROFILE";
pub const ENV_TIMEOUT: &str = "AGENDA_SEARCH_TIMEOUT_SECS";
pub const ENV_CONFIG: &str = "AGENDA_SEARCH_CONFIG";

/// Errors that can occur when loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Build profile the requests are shaped for.
///
/// Production requests carry `Content-Type: application/json`; development
/// requests do not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    Development,
    Production,
}

impl Default for Profile {
    fn default() -> Self {
        if cfg!(debug_assertions) {
            Self::Development
        } else {
            Self::Production
        }
    }
}

impl Profile {
    pub fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }
}

impl std::fmt::Display for Profile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
        }
    }
}

impl FromStr for Profile {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            other => Err(ConfigError::Validation(format!(
                "Unknown profile: '{other}'. Valid profiles: development, production"
            ))),
        }
    }
}

/// Effective client settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Origin of the agenda service, without a trailing path.
    pub base_url: String,

    pub profile: Profile,

    /// Request timeout. `None` leaves the transport default in place.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            profile: Profile::default(),
            timeout_secs: None,
        }
    }
}

/// Command-line values that override file and environment settings.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub base_url: Option<String>,
    pub profile: Option<Profile>,
    pub timeout_secs: Option<u64>,
}

impl AppConfig {
    /// Load from `path` (or the default location), then the process
    /// environment, then `overrides`.
    ///
    /// A missing file is not an error.
    pub fn load(path: Option<&Path>, overrides: &Overrides) -> Result<Self, ConfigError> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::config_path()?,
        };

        let mut config = Self::load_from(&path)?;
        config.apply_env(|key| std::env::var(key).ok())?;
        config.apply_overrides(overrides);
        config.validate()?;

        tracing::debug!(
            path = %path.display(),
            base_url = %config.base_url,
            profile = %config.profile,
            "config_loaded"
        );
        Ok(config)
    }

    /// Load a single file without environment or overrides.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Get the default configuration file path.
    ///
    /// Uses XDG conventions:
    /// - Primary: `$XDG_CONFIG_HOME/agenda-search/config.toml`
    /// - Fallback: platform-specific config dir
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
            return Ok(PathBuf::from(xdg_config)
                .join("agenda-search")
                .join("config.toml"));
        }

        dirs::config_dir()
            .map(|p| p.join("agenda-search").join("config.toml"))
            .ok_or(ConfigError::NoConfigDir)
    }

    /// Apply `AGENDA_SEARCH_*` variables resolved through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_BASE_URL).filter(|v| !v.is_empty()) {
            self.base_url = url;
        }
        if let Some(profile) = lookup(ENV_PROFILE).filter(|v| !v.is_empty()) {
            self.profile = profile.parse()?;
        }
        if let Some(timeout) = lookup(ENV_TIMEOUT).filter(|v| !v.is_empty()) {
            let secs = timeout.trim().parse::<u64>().map_err(|_| {
                ConfigError::Validation(format!("{ENV_TIMEOUT} must be a whole number of seconds"))
            })?;
            self.timeout_secs = Some(secs);
        }
        Ok(())
    }

    pub fn apply_overrides(&mut self, overrides: &Overrides) {
        if let Some(url) = &overrides.base_url {
            self.base_url = url.clone();
        }
        if let Some(profile) = overrides.profile {
            self.profile = profile;
        }
        if let Some(secs) = overrides.timeout_secs {
            self.timeout_secs = Some(secs);
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.base_url.trim();
        if url.is_empty() {
            return Err(ConfigError::Validation("base_url cannot be empty".into()));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::Validation(format!(
                "base_url must start with http:// or https://, got '{url}'"
            )));
        }
        if self.timeout_secs == Some(0) {
            return Err(ConfigError::Validation(
                "timeout_secs must be greater than zero".into(),
            ));
        }
        Ok(())
    }

    /// Render as TOML (used by `agenda config`).
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}
