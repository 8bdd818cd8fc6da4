//! Value Object Module

pub mod email;

pub use kernel::id::UserId;
