// ============================
// website-backend-lib/src/config.rs
// ============================
//! Configuration management.
//!
//! Settings are layered: compiled defaults, then an optional TOML file, then
//! `SITE_`-prefixed environment variables (`__` separates nested keys), and
//! finally the bare `SECRET_KEY`, `API_URL` and `API_KEY` variables.
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;


/// Config file read by [`Settings::load`]
pub const DEFAULT_CONFIG_FILE: &str = "site.toml";

/// Prefix for environment overrides
pub const ENV_PREFIX: &str = "SITE_";

/// Smallest accepted session signing secret, in bytes
pub const MIN_SECRET_KEY_LEN: usize = 64;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Errors raised while assembling or validating [`Settings`]
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to extract settings: {0}")]
    Extract(#[from] figment::Error),

    #[error("invalid setting `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// Listener settings
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ServerSettings {
    /// Interface to bind
    pub host: String,
    /// Port to bind
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

impl ServerSettings {
    /// Socket address the listener binds to
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|e| ConfigError::invalid("server.host", format!("{e}")))?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Application settings
#[derive(Clone, Deserialize, Serialize)]
pub struct Settings {
    /// Listener settings
    pub server: ServerSettings,
    /// Session cookie signing secret
    pub secret_key: String,
    /// Base URL of the Directory API, ending in `/`
    pub api_url: String,
    /// Credential sent as `X-API-KEY`
    pub api_key: String,
    /// Per-request timeout for Directory API calls
    pub api_timeout_secs: u64,
    /// Root of the page templates; fragments live in `elements/`
    pub templates_dir: PathBuf,
    /// Log level used when `RUST_LOG` is unset
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerSettings::default(),
            secret_key: String::new(),
            api_url: String::new(),
            api_key: String::new(),
            api_timeout_secs: 10,
            templates_dir: PathBuf::from("templates"),
            log_level: "debug".to_string(),
        }
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("server", &self.server)
            .field("secret_key", &"<redacted>")
            .field("api_url", &self.api_url)
            .field("api_key", &"<redacted>")
            .field("api_timeout_secs", &self.api_timeout_secs)
            .field("templates_dir", &self.templates_dir)
            .field("log_level", &self.log_level)
            .finish()
    }
}

impl Settings {
    /// Load settings using [`DEFAULT_CONFIG_FILE`]
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(DEFAULT_CONFIG_FILE)
    }

    /// Load settings with `path` as the TOML layer. A missing file is skipped.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Self::from_figment(Self::figment(path))
    }

    /// The provider stack behind [`Settings::load_from`]
    pub fn figment<P: AsRef<Path>>(path: P) -> Figment {
        Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .merge(Env::raw().only(&["secret_key", "api_url", "api_key"]))
    }

    /// Extract and validate settings from an arbitrary provider stack
    pub fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
        let settings: Settings = figment.extract()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Per-request timeout for Directory API calls
    pub fn api_timeout(&self) -> Duration {
        Duration::from_secs(self.api_timeout_secs)
    }

    /// Directory holding the HTML fragments
    pub fn elements_dir(&self) -> PathBuf {
        self.templates_dir.join("elements")
    }

    /// Check the settings are usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::invalid("server.port", "must be non-zero"));
        }
        self.server.bind_addr()?;

        if self.secret_key.len() < MIN_SECRET_KEY_LEN {
            return Err(ConfigError::invalid(
                "secret_key",
                format!("must be at least {MIN_SECRET_KEY_LEN} bytes"),
            ));
        }

        let url = reqwest::Url::parse(&self.api_url)
            .map_err(|e| ConfigError::invalid("api_url", e.to_string()))?;
        if url.cannot_be_a_base() || !self.api_url.ends_with('/') {
            return Err(ConfigError::invalid(
                "api_url",
                "must be an absolute base URL ending in `/`",
            ));
        }

        if self.api_key.trim().is_empty() {
            return Err(ConfigError::invalid("api_key", "must not be empty"));
        }

        if self.api_timeout_secs == 0 {
            return Err(ConfigError::invalid("api_timeout_secs", "must be non-zero"));
        }

        if !LOG_LEVELS.contains(&self.log_level.to_ascii_lowercase().as_str()) {
            return Err(ConfigError::invalid(
                "log_level",
                format!("expected one of {}", LOG_LEVELS.join(", ")),
            ));
        }

        Ok(())
    }
}
