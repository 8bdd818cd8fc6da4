//! Create Link Use Case
//!
//! Stores a link for its owner and queues it for enrichment. The caller
//! never waits on the fetch.

use std::sync::Arc;

use kernel::id::UserId;

use crate::application::enrichment::EnrichmentQueue;
use crate::domain::entities::Link;
use crate::domain::repository::LinkRepository;
use crate::domain::value_objects::{LinkTitle, LinkUrl, Tags};
use crate::error::LinksResult;

pub struct CreateLinkInput {
    pub url: String,
    pub title: String,
    pub tags: Vec<String>,
}

pub struct CreateLinkUseCase<L>
where
    L: LinkRepository,
{
    link_repo: Arc<L>,
    enrichment: EnrichmentQueue,
}

impl<L> CreateLinkUseCase<L>
where
    L: LinkRepository,
{
    pub fn new(link_repo: Arc<L>, enrichment: EnrichmentQueue) -> Self {
        Self {
            link_repo,
            enrichment,
        }
    }

    pub async fn execute(&self, owner: UserId, input: CreateLinkInput) -> LinksResult<Link> {
        let url = LinkUrl::parse(&input.url)?;
        let title = LinkTitle::new(&input.title)?;
        let link = Link::new(owner, url, title, Tags::new(input.tags));

        self.link_repo.create(&link).await?;

        tracing::info!(link_id = %link.id, user_id = %owner, "Link created");

        self.enrichment.schedule(link.id, link.url.clone());
        Ok(link)
    }
}
