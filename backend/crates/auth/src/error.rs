//! Auth Error Types
//!
//! Auth-specific variants that render through the unified
//! `kernel::error::AppError` problem-details body.

use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Why a session token failed validation
///
/// Kept distinct for logs; the HTTP layer collapses all of them into one
/// generic rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("token is malformed")]
    Malformed,

    #[error("token signature does not verify")]
    BadSignature,

    #[error("token has expired")]
    Expired,
}

/// Why a login attempt failed
///
/// Never shown to the client; both become [`AuthError::InvalidCredentials`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CredentialError {
    #[error("no account for this email")]
    UserNotFound,

    #[error("password does not match")]
    InvalidPassword,
}

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Email already registered")]
    EmailTaken,

    #[error("Invalid email: {0}")]
    InvalidEmail(String),

    #[error("Password validation failed: {0}")]
    PasswordValidation(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Missing or invalid Authorization header")]
    MissingOrInvalidHeader,

    /// Display never includes the inner reason
    #[error("Invalid or expired token")]
    InvalidToken(TokenError),

    /// Token was valid but its account no longer exists
    #[error("User not found")]
    UserNotFound,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::EmailTaken => StatusCode::CONFLICT,
            AuthError::InvalidEmail(_) | AuthError::PasswordValidation(_) => {
                StatusCode::BAD_REQUEST
            }
            AuthError::InvalidCredentials
            | AuthError::MissingOrInvalidHeader
            | AuthError::InvalidToken(_)
            | AuthError::UserNotFound => StatusCode::UNAUTHORIZED,
            AuthError::Database(e) => StatusCode::from_u16(AppError::from(e).status_code())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::EmailTaken => ErrorKind::Conflict,
            AuthError::InvalidEmail(_) | AuthError::PasswordValidation(_) => ErrorKind::BadRequest,
            AuthError::InvalidCredentials
            | AuthError::MissingOrInvalidHeader
            | AuthError::InvalidToken(_)
            | AuthError::UserNotFound => ErrorKind::Unauthorized,
            AuthError::Database(e) => AppError::from(e).kind(),
            AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError
    ///
    /// Server-side failures get a fixed message so driver text never reaches
    /// the client; database errors are classified by the kernel.
    pub fn to_app_error(&self) -> AppError {
        match self {
            AuthError::Database(e) => AppError::from(e),
            AuthError::Internal(_) => AppError::internal("Internal server error"),
            _ => AppError::new(self.kind(), self.to_string()),
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Database(e) if self.kind().is_server_error() => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::Database(e) => {
                tracing::warn!(error = %e, "Auth database request rejected");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::InvalidToken(reason) => {
                tracing::debug!(reason = %reason, "Rejected bearer token");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl From<TokenError> for AuthError {
    fn from(err: TokenError) -> Self {
        AuthError::InvalidToken(err)
    }
}

impl From<CredentialError> for AuthError {
    fn from(err: CredentialError) -> Self {
        tracing::info!(reason = %err, "Login rejected");
        AuthError::InvalidCredentials
    }
}

impl From<platform::password::PasswordPolicyError> for AuthError {
    fn from(err: platform::password::PasswordPolicyError) -> Self {
        AuthError::PasswordValidation(err.to_string())
    }
}

impl From<platform::password::PasswordHashError> for AuthError {
    fn from(err: platform::password::PasswordHashError) -> Self {
        AuthError::Internal(err.to_string())
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        let challenge = self.status_code() == StatusCode::UNAUTHORIZED;
        let mut response = self.to_app_error().into_response();
        if challenge {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}
