//! Get Link Use Case

use std::sync::Arc;

use kernel::id::{LinkId, UserId};

use crate::domain::entities::Link;
use crate::domain::repository::LinkRepository;
use crate::error::{LinksError, LinksResult};

pub struct GetLinkUseCase<L>
where
    L: LinkRepository,
{
    link_repo: Arc<L>,
}

impl<L> GetLinkUseCase<L>
where
    L: LinkRepository,
{
    pub fn new(link_repo: Arc<L>) -> Self {
        Self { link_repo }
    }

    pub async fn execute(&self, owner: UserId, id: LinkId) -> LinksResult<Link> {
        self.link_repo
            .find_by_id_and_owner(&id, &owner)
            .await?
            .ok_or(LinksError::NotFound)
    }
}
