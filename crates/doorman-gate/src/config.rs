//! Gate configuration.
//!
//! All types implement [`Default`] for compile-time fallback values, so a
//! missing config file simply means defaults. Files are TOML; every field is
//! optional; a loaded layer overlays only its non-default fields.

use crate::routing::RouteTable;
use doorman_probe::DEFAULT_TIMEOUT_SECS;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Configuration error type.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file.
    #[error("failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse TOML.
    #[error("failed to parse config file '{path}': {source}")]
    ParseToml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Failed to serialize config.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// A loaded value fails validation.
    #[error("invalid config: {message}")]
    Invalid { message: String },
}

impl ConfigError {
    /// Creates a read file error.
    pub fn read_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ReadFile {
            path: path.into(),
            source,
        }
    }

    /// Creates a parse TOML error.
    pub fn parse_toml(path: impl Into<PathBuf>, source: toml::de::Error) -> Self {
        Self::ParseToml {
            path: path.into(),
            source,
        }
    }

    /// Creates a validation error.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }
}

/// Gate configuration.
///
/// # Serialization
///
/// Serializes to TOML for file storage. Fields with `#[serde(default)]`
/// are optional in the config file.
///
/// # Example
///
/// ```
/// use doorman_gate::GateConfig;
///
/// let config = GateConfig::default();
/// assert_eq!(config.backend.profile_url(), "http://localhost:8080/users/me");
/// assert_eq!(config.probe.timeout_secs, 30);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GateConfig {
    /// Backend endpoint configuration.
    pub backend: BackendConfig,

    /// Route table for the routing projection.
    pub routes: RouteTable,

    /// Probe transport configuration.
    pub probe: ProbeConfig,
}

impl GateConfig {
    /// Creates a new config with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serializes to TOML string.
    ///
    /// # Errors
    ///
    /// Returns error if serialization fails.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Deserializes from TOML string.
    ///
    /// # Errors
    ///
    /// Returns error if deserialization fails.
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// Loads configuration from a TOML file and validates it.
    ///
    /// `~` expands to the home directory. A missing file is not an error:
    /// the defaults are returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file exists but cannot be read or
    /// parsed, or if the loaded values fail validation.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let expanded = expand_tilde(path.as_ref());
        if !expanded.exists() {
            debug!(path = %expanded.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let content =
            std::fs::read_to_string(&expanded).map_err(|e| ConfigError::read_file(&expanded, e))?;
        let loaded =
            Self::from_toml(&content).map_err(|e| ConfigError::parse_toml(&expanded, e))?;

        let mut config = Self::default();
        config.merge(&loaded);
        config.validate()?;

        debug!(path = %expanded.display(), "Loaded config");
        Ok(config)
    }

    /// Merges another config into this one.
    ///
    /// Values from `other` override values in `self` only if they
    /// differ from the default. This enables layered configuration.
    pub fn merge(&mut self, other: &Self) {
        self.backend.merge(&other.backend);
        self.routes.merge(&other.routes);
        self.probe.merge(&other.probe);
    }

    /// Validates field values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for an empty backend base URL, a
    /// route that is not an absolute path, or a zero probe timeout.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.backend.base_url.is_empty() {
            return Err(ConfigError::invalid("backend.base_url must not be empty"));
        }

        let routes = [
            ("routes.entry", &self.routes.entry),
            ("routes.setup", &self.routes.setup),
            ("routes.landing", &self.routes.landing),
            ("routes.login_alias", &self.routes.login_alias),
        ];
        for (name, path) in routes {
            if !path.starts_with('/') {
                return Err(ConfigError::invalid(format!(
                    "{name} must start with '/', got '{path}'"
                )));
            }
        }

        if self.probe.timeout_secs == 0 {
            return Err(ConfigError::invalid("probe.timeout_secs must be positive"));
        }

        Ok(())
    }
}

/// Backend endpoint configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BackendConfig {
    /// Backend origin (scheme and authority).
    pub base_url: String,

    /// Path of the current identity's profile resource.
    pub profile_path: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".into(),
            profile_path: "/users/me".into(),
        }
    }
}

impl BackendConfig {
    fn merge(&mut self, other: &Self) {
        let default = Self::default();

        if other.base_url != default.base_url {
            self.base_url = other.base_url.clone();
        }
        if other.profile_path != default.profile_path {
            self.profile_path = other.profile_path.clone();
        }
    }

    /// Full URL of the profile endpoint.
    #[must_use]
    pub fn profile_url(&self) -> String {
        format!(
            "{}{}",
            self.base_url.trim_end_matches('/'),
            self.profile_path
        )
    }
}

/// Probe transport configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ProbeConfig {
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ProbeConfig {
    fn merge(&mut self, other: &Self) {
        let default = Self::default();

        if other.timeout_secs != default.timeout_secs {
            self.timeout_secs = other.timeout_secs;
        }
    }

    /// Timeout as a [`Duration`].
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Expands `~` to home directory.
fn expand_tilde(path: &Path) -> PathBuf {
    if let Ok(stripped) = path.strip_prefix("~") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    path.to_path_buf()
}
