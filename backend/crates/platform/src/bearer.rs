//! Bearer Token Header Parsing
//!
//! Strict parsing of `Authorization: Bearer <token>`.

use axum::http::{HeaderMap, header};
use thiserror::Error;

const BEARER_PREFIX: &str = "Bearer ";

/// Why an `Authorization` header was not a usable bearer credential
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BearerError {
    #[error("Authorization header is missing")]
    Missing,

    #[error("Authorization header is not valid visible ASCII")]
    NotAscii,

    #[error("Authorization scheme is not Bearer")]
    WrongScheme,

    #[error("Bearer token is empty or contains whitespace")]
    InvalidToken,
}

/// Extract the token from an `Authorization: Bearer <token>` header
///
/// The scheme must be exactly `Bearer` followed by a single space, and the
/// token must be non-empty with no whitespace. Only the first
/// `Authorization` header is considered.
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, BearerError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(BearerError::Missing)?
        .to_str()
        .map_err(|_| BearerError::NotAscii)?;

    let token = value
        .strip_prefix(BEARER_PREFIX)
        .ok_or(BearerError::WrongScheme)?;

    if token.is_empty() || token.chars().any(char::is_whitespace) {
        return Err(BearerError::InvalidToken);
    }

    Ok(token)
}
