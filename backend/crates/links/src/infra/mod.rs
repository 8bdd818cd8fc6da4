//! Infrastructure Layer

pub mod memory;
pub mod postgres;

pub use memory::InMemoryLinkRepository;
pub use postgres::PgLinkRepository;
