//! Sign Up Use Case
//!
//! Registers an account and signs it in.

use std::sync::Arc;

use platform::password::ClearTextPassword;

use crate::application::token::TokenService;
use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{UserId, email::Email};
use crate::error::{AuthError, AuthResult};

pub struct SignUpInput {
    pub email: String,
    pub password: String,
}

#[derive(Debug)]
pub struct SignUpOutput {
    pub user_id: UserId,
    pub token: String,
}

pub struct SignUpUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    tokens: Arc<TokenService>,
}

impl<U> SignUpUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, tokens: Arc<TokenService>) -> Self {
        Self { user_repo, tokens }
    }

    pub async fn execute(&self, input: SignUpInput) -> AuthResult<SignUpOutput> {
        let email = Email::new(&input.email).map_err(|e| AuthError::InvalidEmail(e.to_string()))?;
        let password = ClearTextPassword::new(input.password)?;

        // Argon2 is deliberately slow; keep it off the async workers
        let password_hash = tokio::task::spawn_blocking(move || password.hash())
            .await
            .map_err(|e| AuthError::Internal(e.to_string()))??;

        let user = User::new(email, password_hash);

        // Uniqueness is enforced by the store, so concurrent sign-ups race safely
        self.user_repo.create(&user).await?;

        tracing::info!(user_id = %user.user_id, email = %user.email, "User signed up");

        let token = self.tokens.issue(&user.email)?;
        Ok(SignUpOutput {
            user_id: user.user_id,
            token,
        })
    }
}
