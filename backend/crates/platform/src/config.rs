//! Environment Configuration
//!
//! Helpers for reading typed settings from environment variables and the
//! deployment mode that decides which insecure conveniences are allowed.

use std::fmt::Display;
use std::str::FromStr;

use thiserror::Error;

/// Environment variable selecting the deployment mode
pub const APP_ENV_VAR: &str = "APP_ENV";

/// Configuration errors (fatal at startup)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(String),

    #[error("{key} is invalid: {reason}")]
    Invalid { key: String, reason: String },
}

/// Deployment mode
///
/// Anything other than an explicit `development` is production, so a
/// forgotten variable never enables development shortcuts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeploymentMode {
    Development,
    #[default]
    Production,
}

impl DeploymentMode {
    /// Parse a raw `APP_ENV` value; `None` means unset
    pub fn parse(raw: Option<&str>) -> Result<Self, ConfigError> {
        match raw.map(str::trim) {
            None | Some("") => Ok(Self::Production),
            Some(v) if v.eq_ignore_ascii_case("development") || v.eq_ignore_ascii_case("dev") => {
                Ok(Self::Development)
            }
            Some(v) if v.eq_ignore_ascii_case("production") || v.eq_ignore_ascii_case("prod") => {
                Ok(Self::Production)
            }
            Some(v) => Err(ConfigError::Invalid {
                key: APP_ENV_VAR.to_string(),
                reason: format!("unknown mode '{v}'"),
            }),
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::parse(std::env::var(APP_ENV_VAR).ok().as_deref())
    }

    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

/// Parse an optional raw value, falling back to `default` when unset or blank
pub fn parse_or<T>(key: &str, raw: Option<&str>, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    match raw.map(str::trim) {
        None | Some("") => Ok(default),
        Some(v) => v.parse().map_err(|e: T::Err| ConfigError::Invalid {
            key: key.to_string(),
            reason: e.to_string(),
        }),
    }
}

/// Read and parse an environment variable, with a default
pub fn env_or<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    parse_or(key, std::env::var(key).ok().as_deref(), default)
}

/// Read a non-empty environment variable
pub fn require_env(key: &str) -> Result<String, ConfigError> {
    match std::env::var(key) {
        Ok(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ConfigError::Missing(key.to_string())),
    }
}
