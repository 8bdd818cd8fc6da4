//! Links Error Types

use auth::AuthError;
use axum::response::{IntoResponse, Response};
use http::StatusCode;
use kernel::error::{app_error::AppError, kind::ErrorKind};
use platform::http::TransportError;
use thiserror::Error;

pub type LinksResult<T> = Result<T, LinksError>;

/// Why a page could not be turned into metadata
///
/// Absorbed by the enrichment worker; never reaches a client.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("transport failure: {0}")]
    TransportFailure(#[from] TransportError),

    #[error("non-success status {0}")]
    NonSuccessStatus(u16),

    #[error("response is not an HTML document")]
    ParseFailure,
}

#[derive(Debug, Error)]
pub enum LinksError {
    /// Absent or owned by someone else; the two are indistinguishable
    #[error("Link not found")]
    NotFound,

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Title cannot be empty")]
    EmptyTitle,

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl LinksError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            LinksError::NotFound => StatusCode::NOT_FOUND,
            LinksError::InvalidUrl(_) | LinksError::EmptyTitle => StatusCode::BAD_REQUEST,
            LinksError::Auth(e) => e.status_code(),
            LinksError::Database(e) => StatusCode::from_u16(AppError::from(e).status_code())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            LinksError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            LinksError::NotFound => ErrorKind::NotFound,
            LinksError::InvalidUrl(_) | LinksError::EmptyTitle => ErrorKind::BadRequest,
            LinksError::Auth(e) => e.kind(),
            LinksError::Database(e) => AppError::from(e).kind(),
            LinksError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    pub fn to_app_error(&self) -> AppError {
        match self {
            LinksError::Database(e) => AppError::from(e),
            LinksError::Internal(_) => AppError::internal("Internal server error"),
            LinksError::Auth(e) => e.to_app_error(),
            _ => AppError::new(self.kind(), self.to_string()),
        }
    }

    fn log(&self) {
        match self {
            LinksError::Database(e) if self.kind().is_server_error() => {
                tracing::error!(error = %e, "Links database error");
            }
            LinksError::Database(e) => {
                tracing::warn!(error = %e, "Links database request rejected");
            }
            LinksError::Internal(msg) => {
                tracing::error!(message = %msg, "Links internal error");
            }
            _ => {
                tracing::debug!(error = %self, "Links error");
            }
        }
    }
}

impl IntoResponse for LinksError {
    fn into_response(self) -> Response {
        match self {
            LinksError::Auth(e) => e.into_response(),
            other => {
                other.log();
                other.to_app_error().into_response()
            }
        }
    }
}
