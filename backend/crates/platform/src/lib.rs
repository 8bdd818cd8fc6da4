//! Platform Crate - Technical Infrastructure
//!
//! Shared technical foundations with no link-vault domain knowledge:
//! - Environment configuration helpers and deployment mode
//! - Random byte generation
//! - Password hashing (Argon2id)
//! - `Authorization: Bearer` header parsing
//! - Outbound HTTP page fetching with a time and size budget

pub mod bearer;
pub mod config;
pub mod crypto;
pub mod http;
pub mod password;
