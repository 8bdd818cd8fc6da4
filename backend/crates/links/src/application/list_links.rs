//! List Links Use Case

use std::sync::Arc;

use kernel::id::UserId;

use crate::domain::entities::Link;
use crate::domain::repository::LinkRepository;
use crate::error::LinksResult;

pub struct ListLinksUseCase<L>
where
    L: LinkRepository,
{
    link_repo: Arc<L>,
}

impl<L> ListLinksUseCase<L>
where
    L: LinkRepository,
{
    pub fn new(link_repo: Arc<L>) -> Self {
        Self { link_repo }
    }

    /// The owner's links, newest first
    pub async fn execute(&self, owner: UserId) -> LinksResult<Vec<Link>> {
        self.link_repo.list_by_owner(&owner).await
    }
}
