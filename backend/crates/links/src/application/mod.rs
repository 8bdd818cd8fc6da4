//! Application Layer
//!
//! Use cases and the enrichment pipeline.

pub mod config;
pub mod create_link;
pub mod delete_link;
pub mod enrichment;
pub mod get_link;
pub mod list_links;
pub mod update_link;

// Re-exports
pub use config::EnrichmentConfig;
pub use create_link::{CreateLinkInput, CreateLinkUseCase};
pub use delete_link::DeleteLinkUseCase;
pub use enrichment::{EnrichmentJob, EnrichmentQueue, MetadataFetcher, enrich_link};
pub use get_link::GetLinkUseCase;
pub use list_links::ListLinksUseCase;
pub use update_link::{UpdateLinkInput, UpdateLinkUseCase};
