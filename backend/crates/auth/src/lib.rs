//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - User entity, email value object, repository trait
//! - `application/` - Sign-up/sign-in use cases, token service, request authentication
//! - `infra/` - PostgreSQL and in-memory repositories
//! - `presentation/` - HTTP handlers, DTOs, bearer gate, router
//!
//! ## Security Model
//! - Passwords hashed with Argon2id, salt per hash
//! - Stateless HS256 session tokens, 24 hour lifetime, issuer = account email
//! - Only `Authorization: Bearer <token>` is accepted; rejections are generic

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::{AuthConfig, CurrentUser, TokenService, authenticate};
pub use domain::{Email, User, UserId, UserRepository};
pub use error::{AuthError, AuthResult, CredentialError, TokenError};
pub use infra::{InMemoryUserRepository, PgUserRepository};
pub use presentation::{auth_router, require_auth};
