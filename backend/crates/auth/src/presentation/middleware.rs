//! Auth Middleware
//!
//! The gate in front of protected routes, and the extractor handlers use to
//! read the identity it attaches.

use axum::body::Body;
use axum::extract::{FromRequestParts, State};
use axum::http::Request;
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use std::sync::Arc;

use crate::application::{CurrentUser, TokenService, authenticate};
use crate::error::AuthError;

/// Middleware that requires a valid bearer token
///
/// On success the caller's [`CurrentUser`] is inserted into the request
/// extensions. Every failure is a 401 with a generic body.
pub async fn require_auth(
    State(tokens): State<Arc<TokenService>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, Response> {
    let current_user = authenticate(req.headers(), &tokens).map_err(IntoResponse::into_response)?;

    req.extensions_mut().insert(current_user);

    Ok(next.run(req).await)
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Absent only when a route skipped `require_auth`
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or(AuthError::MissingOrInvalidHeader)
    }
}
