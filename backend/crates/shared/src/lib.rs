//! Shared Kernel
//!
//! Vocabulary shared by every backend crate:
//! - The unified [`error::app_error::AppError`] and its HTTP-facing
//!   [`error::kind::ErrorKind`]
//! - Typed UUID identifiers ([`id::Id`])
//!
//! Anything domain specific (links, users, tokens) stays out of this crate.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
pub mod id;
