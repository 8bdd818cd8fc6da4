//! In-Memory Repository
//!
//! Process-local link store for tests. Each call holds the lock for its whole
//! read-modify-write, so patches to one link never interleave.

use std::collections::HashMap;
use std::sync::Arc;

use kernel::id::{LinkId, UserId};
use tokio::sync::RwLock;

use crate::domain::entities::{Link, LinkPatch};
use crate::domain::repository::LinkRepository;
use crate::error::{LinksError, LinksResult};

#[derive(Clone, Default)]
pub struct InMemoryLinkRepository {
    links: Arc<RwLock<HashMap<LinkId, Link>>>,
}

impl InMemoryLinkRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look a link up by id alone
    pub async fn get(&self, id: &LinkId) -> Option<Link> {
        self.links.read().await.get(id).cloned()
    }
}

impl LinkRepository for InMemoryLinkRepository {
    async fn create(&self, link: &Link) -> LinksResult<()> {
        let mut links = self.links.write().await;
        if links.contains_key(&link.id) {
            return Err(LinksError::Internal(format!("duplicate link id {}", link.id)));
        }
        links.insert(link.id, link.clone());
        Ok(())
    }

    async fn find_by_id_and_owner(
        &self,
        id: &LinkId,
        owner: &UserId,
    ) -> LinksResult<Option<Link>> {
        Ok(self
            .links
            .read()
            .await
            .get(id)
            .filter(|link| &link.user_id == owner)
            .cloned())
    }

    async fn update_partial(
        &self,
        id: &LinkId,
        owner: Option<&UserId>,
        patch: &LinkPatch,
    ) -> LinksResult<Option<Link>> {
        let mut links = self.links.write().await;
        let Some(link) = links
            .get_mut(id)
            .filter(|link| owner.is_none_or(|o| &link.user_id == o))
        else {
            return Ok(None);
        };

        patch.apply_to(link);
        Ok(Some(link.clone()))
    }

    async fn delete_by_id_and_owner(&self, id: &LinkId, owner: &UserId) -> LinksResult<bool> {
        let mut links = self.links.write().await;
        match links.get(id) {
            Some(link) if &link.user_id == owner => {
                links.remove(id);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn list_by_owner(&self, owner: &UserId) -> LinksResult<Vec<Link>> {
        let mut links: Vec<Link> = self
            .links
            .read()
            .await
            .values()
            .filter(|link| &link.user_id == owner)
            .cloned()
            .collect();
        links.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(links)
    }
}
