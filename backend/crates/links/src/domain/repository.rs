//! Repository Traits

use kernel::id::{LinkId, UserId};

use crate::domain::entities::{Link, LinkPatch};
use crate::error::LinksResult;

/// Link record store
///
/// Every owner-facing call is scoped by both id and owner. Only enrichment
/// calls [`update_partial`](LocalLinkRepository::update_partial) without an
/// owner.
#[trait_variant::make(LinkRepository: Send)]
pub trait LocalLinkRepository {
    async fn create(&self, link: &Link) -> LinksResult<()>;

    async fn find_by_id_and_owner(&self, id: &LinkId, owner: &UserId)
    -> LinksResult<Option<Link>>;

    /// Apply `patch` atomically to the fields it names
    ///
    /// Returns the updated link, or `None` when no link matches (including
    /// when `owner` is given and does not own it).
    async fn update_partial(
        &self,
        id: &LinkId,
        owner: Option<&UserId>,
        patch: &LinkPatch,
    ) -> LinksResult<Option<Link>>;

    /// Returns whether a link was deleted
    async fn delete_by_id_and_owner(&self, id: &LinkId, owner: &UserId) -> LinksResult<bool>;

    /// Newest first
    async fn list_by_owner(&self, owner: &UserId) -> LinksResult<Vec<Link>>;
}
