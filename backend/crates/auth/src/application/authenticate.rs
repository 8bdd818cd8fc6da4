//! Request Authentication
//!
//! Turns an `Authorization` header into the caller's identity.

use axum::http::HeaderMap;
use platform::bearer::extract_bearer_token;

use crate::application::token::TokenService;
use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::email::Email;
use crate::error::{AuthError, AuthResult};

/// Identity of an authenticated caller, attached to the request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub email: Email,
}

impl CurrentUser {
    /// Load the account behind this identity
    pub async fn resolve<U: UserRepository>(&self, user_repo: &U) -> AuthResult<User> {
        user_repo
            .find_by_email(&self.email)
            .await?
            .ok_or(AuthError::UserNotFound)
    }
}

/// Authenticate a request from its headers
///
/// Header problems and token problems surface as different [`AuthError`]
/// variants, but the token reason itself stays internal.
pub fn authenticate(headers: &HeaderMap, tokens: &TokenService) -> AuthResult<CurrentUser> {
    let token = extract_bearer_token(headers).map_err(|e| {
        tracing::debug!(reason = %e, "Rejected Authorization header");
        AuthError::MissingOrInvalidHeader
    })?;

    let email = tokens.validate(token)?;
    Ok(CurrentUser { email })
}
