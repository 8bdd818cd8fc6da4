//! Delete Link Use Case

use std::sync::Arc;

use kernel::id::{LinkId, UserId};

use crate::domain::repository::LinkRepository;
use crate::error::{LinksError, LinksResult};

pub struct DeleteLinkUseCase<L>
where
    L: LinkRepository,
{
    link_repo: Arc<L>,
}

impl<L> DeleteLinkUseCase<L>
where
    L: LinkRepository,
{
    pub fn new(link_repo: Arc<L>) -> Self {
        Self { link_repo }
    }

    pub async fn execute(&self, owner: UserId, id: LinkId) -> LinksResult<()> {
        if !self.link_repo.delete_by_id_and_owner(&id, &owner).await? {
            return Err(LinksError::NotFound);
        }
        tracing::info!(link_id = %id, "Link deleted");
        Ok(())
    }
}
