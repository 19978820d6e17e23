//! Global configuration parsing, validation, and backend credential loading.

use std::env;
use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::{AppError, Result};

/// Default page size applied when an offset is given without a limit.
pub const DEFAULT_PAGE_SIZE: u64 = 20;

fn default_ip_echo_url() -> String {
    "https://api.ipify.org?format=json".into()
}

fn default_ip_lookup_timeout_seconds() -> u64 {
    3
}

fn default_http_timeout_seconds() -> u64 {
    10
}

fn default_submissions_table() -> String {
    "phishing_submissions".into()
}

fn default_realtime_poll_seconds() -> u64 {
    5
}

/// Global configuration parsed from `config.toml`.
///
/// Backend credentials are loaded at runtime from environment variables,
/// not from the TOML file (see [`BackendCredentials`]).
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct GlobalConfig {
    /// Public IP-echo endpoint used for best-effort submitter IP capture.
    #[serde(default = "default_ip_echo_url")]
    pub ip_echo_url: String,
    /// Upper bound on the IP lookup; past it the lookup resolves to null.
    #[serde(default = "default_ip_lookup_timeout_seconds")]
    pub ip_lookup_timeout_seconds: u64,
    /// Timeout applied to all other backend HTTP calls.
    #[serde(default = "default_http_timeout_seconds")]
    pub http_timeout_seconds: u64,
    /// Backend table holding submission rows.
    #[serde(default = "default_submissions_table")]
    pub submissions_table: String,
    /// Interval between polls of the backend insert feed.
    #[serde(default = "default_realtime_poll_seconds")]
    pub realtime_poll_seconds: u64,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            ip_echo_url: default_ip_echo_url(),
            ip_lookup_timeout_seconds: default_ip_lookup_timeout_seconds(),
            http_timeout_seconds: default_http_timeout_seconds(),
            submissions_table: default_submissions_table(),
            realtime_poll_seconds: default_realtime_poll_seconds(),
        }
    }
}

impl GlobalConfig {
    /// Load and validate configuration from a TOML file path.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the file cannot be read or contains
    /// invalid TOML, or if validation fails.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .map_err(|err| AppError::Config(format!("failed to read config: {err}")))?;
        Self::from_toml_str(&raw)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if parsing or validation fails.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// IP lookup timeout as a [`Duration`].
    #[must_use]
    pub fn ip_lookup_timeout(&self) -> Duration {
        Duration::from_secs(self.ip_lookup_timeout_seconds)
    }

    /// Backend HTTP timeout as a [`Duration`].
    #[must_use]
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_seconds)
    }

    /// Insert feed poll interval as a [`Duration`].
    #[must_use]
    pub fn realtime_poll_interval(&self) -> Duration {
        Duration::from_secs(self.realtime_poll_seconds)
    }

    fn validate(&self) -> Result<()> {
        if self.ip_echo_url.trim().is_empty() {
            return Err(AppError::Config("ip_echo_url must not be empty".into()));
        }

        if self.ip_lookup_timeout_seconds == 0 {
            return Err(AppError::Config(
                "ip_lookup_timeout_seconds must be greater than zero".into(),
            ));
        }

        if self.http_timeout_seconds == 0 {
            return Err(AppError::Config(
                "http_timeout_seconds must be greater than zero".into(),
            ));
        }

        if self.submissions_table.trim().is_empty() {
            return Err(AppError::Config(
                "submissions_table must not be empty".into(),
            ));
        }

        if self.realtime_poll_seconds == 0 {
            return Err(AppError::Config(
                "realtime_poll_seconds must be greater than zero".into(),
            ));
        }

        Ok(())
    }
}

/// Backend project URL and anon key, supplied through the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendCredentials {
    /// Base project URL, e.g. `https://xyzcompany.supabase.co`.
    pub url: String,
    /// Anonymous API key sent as `apikey` / bearer token.
    pub anon_key: String,
}

impl BackendCredentials {
    /// Load credentials from `SUPABASE_URL` and `SUPABASE_ANON_KEY`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` naming the first missing variable.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            url: require_env("SUPABASE_URL")?,
            anon_key: require_env("SUPABASE_ANON_KEY")?,
        })
    }
}

fn require_env(name: &str) -> Result<String> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(AppError::Config(format!(
            "missing {name}; add it to the environment"
        ))),
    }
}
