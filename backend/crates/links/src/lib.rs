//! Links Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Link entity, field patches, metadata extraction, repository trait
//! - `application/` - Owner-scoped use cases and the enrichment pipeline
//! - `infra/` - PostgreSQL and in-memory repositories
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! ## Ownership Model
//! - Every read, edit and delete is scoped by link id and owner
//! - A link owned by someone else is reported exactly like a missing one
//! - Only enrichment writes without an owner, and only description/image

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::{EnrichmentConfig, EnrichmentQueue};
pub use domain::{Link, LinkPatch, LinkRepository};
pub use error::{FetchError, LinksError, LinksResult};
pub use infra::{InMemoryLinkRepository, PgLinkRepository};
pub use presentation::links_router;
