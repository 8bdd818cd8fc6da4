//! Server Configuration
//!
//! Process-level settings read once at startup.

use std::net::SocketAddr;

use axum::http::HeaderValue;
use platform::config::{ConfigError, env_or, require_env};

const DEFAULT_FRONTEND_ORIGINS: &str = "http://localhost:5173";

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub frontend_origins: Vec<HeaderValue>,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let default_addr = SocketAddr::from(([0, 0, 0, 0], 8080));
        let origins: String = env_or("FRONTEND_ORIGINS", DEFAULT_FRONTEND_ORIGINS.to_string())?;

        Ok(Self {
            database_url: require_env("DATABASE_URL")?,
            bind_addr: env_or("BIND_ADDR", default_addr)?,
            frontend_origins: parse_origins(&origins),
        })
    }
}

/// Comma-separated origins; unparseable entries are skipped with a warning
pub fn parse_origins(raw: &str) -> Vec<HeaderValue> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect()
}
