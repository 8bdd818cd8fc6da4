//! Application Configuration
//!
//! Configuration for the Auth application layer.

use std::fmt;
use std::time::Duration;

use platform::config::{ConfigError, DeploymentMode};

/// Environment variable holding the token signing secret
pub const JWT_SECRET_VAR: &str = "JWT_SECRET";

/// Shortest accepted signing secret (HS256 key size)
pub const MIN_SECRET_LEN: usize = 32;

/// Session token lifetime
pub const TOKEN_TTL: Duration = Duration::from_secs(24 * 3600);

/// Auth application configuration
///
/// There is no `Default`: a secret is always supplied or generated
/// explicitly.
#[derive(Clone)]
pub struct AuthConfig {
    token_secret: Vec<u8>,
    pub token_ttl: Duration,
}

impl AuthConfig {
    /// Config with an operator-supplied signing secret
    pub fn new(token_secret: impl Into<Vec<u8>>) -> Result<Self, ConfigError> {
        let token_secret = token_secret.into();
        if token_secret.len() < MIN_SECRET_LEN {
            return Err(ConfigError::Invalid {
                key: JWT_SECRET_VAR.to_string(),
                reason: format!("must be at least {MIN_SECRET_LEN} bytes"),
            });
        }
        Ok(Self {
            token_secret,
            token_ttl: TOKEN_TTL,
        })
    }

    /// Create config with a random signing secret
    ///
    /// Tokens do not survive a restart.
    pub fn with_random_secret() -> Self {
        Self {
            token_secret: platform::crypto::random_bytes(MIN_SECRET_LEN),
            token_ttl: TOKEN_TTL,
        }
    }

    /// Resolve the secret from a raw `JWT_SECRET` value
    ///
    /// Production refuses to start without one. Development generates a
    /// random secret and says so.
    pub fn resolve(mode: DeploymentMode, raw_secret: Option<&str>) -> Result<Self, ConfigError> {
        match raw_secret.map(str::trim) {
            Some(secret) if !secret.is_empty() => Self::new(secret.as_bytes()),
            _ if mode.is_development() => {
                tracing::warn!(
                    "{JWT_SECRET_VAR} not set; using a random secret, sessions end on restart"
                );
                Ok(Self::with_random_secret())
            }
            _ => Err(ConfigError::Missing(JWT_SECRET_VAR.to_string())),
        }
    }

    pub fn from_env(mode: DeploymentMode) -> Result<Self, ConfigError> {
        Self::resolve(mode, std::env::var(JWT_SECRET_VAR).ok().as_deref())
    }

    pub fn token_secret(&self) -> &[u8] {
        &self.token_secret
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("token_secret", &"[REDACTED]")
            .field("token_ttl", &self.token_ttl)
            .finish()
    }
}
