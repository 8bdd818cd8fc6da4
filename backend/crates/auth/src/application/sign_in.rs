//! Sign In Use Case
//!
//! Checks credentials and issues a session token. Unknown email and wrong
//! password are indistinguishable to the caller.

use std::sync::{Arc, LazyLock};

use platform::password::{ClearTextPassword, HashedPassword};

use crate::application::token::TokenService;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::email::Email;
use crate::error::{AuthError, AuthResult, CredentialError};

/// Verified against when the account does not exist, so both failure paths
/// cost one Argon2 verification
static DUMMY_HASH: LazyLock<Option<HashedPassword>> = LazyLock::new(|| {
    ClearTextPassword::for_verification("timing-equalizer".to_string())
        .hash()
        .ok()
});

pub struct SignInInput {
    pub email: String,
    pub password: String,
}

#[derive(Debug)]
pub struct SignInOutput {
    pub token: String,
}

pub struct SignInUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    tokens: Arc<TokenService>,
}

impl<U> SignInUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, tokens: Arc<TokenService>) -> Self {
        Self { user_repo, tokens }
    }

    pub async fn execute(&self, input: SignInInput) -> AuthResult<SignInOutput> {
        let password = ClearTextPassword::for_verification(input.password);

        let user = match Email::new(&input.email) {
            Ok(email) => self.user_repo.find_by_email(&email).await?,
            Err(_) => None,
        };

        let Some(user) = user else {
            tokio::task::spawn_blocking(move || {
                if let Some(dummy) = DUMMY_HASH.as_ref() {
                    dummy.verify(&password);
                }
            })
            .await
            .map_err(|e| AuthError::Internal(e.to_string()))?;
            return Err(CredentialError::UserNotFound.into());
        };

        let stored = user.password_hash.clone();
        let matches = tokio::task::spawn_blocking(move || stored.verify(&password))
            .await
            .map_err(|e| AuthError::Internal(e.to_string()))?;
        if !matches {
            return Err(CredentialError::InvalidPassword.into());
        }

        tracing::info!(user_id = %user.user_id, "User signed in");

        let token = self.tokens.issue(&user.email)?;
        Ok(SignInOutput { token })
    }
}
