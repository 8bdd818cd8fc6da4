//! Domain Layer

pub mod entities;
pub mod metadata;
pub mod repository;
pub mod value_objects;

pub use entities::{Link, LinkPatch};
pub use metadata::Metadata;
pub use repository::LinkRepository;
pub use kernel::id::{LinkId, UserId};
