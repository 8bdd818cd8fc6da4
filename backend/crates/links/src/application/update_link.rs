//! Update Link Use Case
//!
//! Owner edits of url, title and tags. Enrichment fields are not editable.

use std::sync::Arc;

use kernel::id::{LinkId, UserId};

use crate::domain::entities::{Link, LinkPatch};
use crate::domain::repository::LinkRepository;
use crate::domain::value_objects::{LinkTitle, LinkUrl, Tags};
use crate::error::{LinksError, LinksResult};

#[derive(Default)]
pub struct UpdateLinkInput {
    pub url: Option<String>,
    pub title: Option<String>,
    pub tags: Option<Vec<String>>,
}

pub struct UpdateLinkUseCase<L>
where
    L: LinkRepository,
{
    link_repo: Arc<L>,
}

impl<L> UpdateLinkUseCase<L>
where
    L: LinkRepository,
{
    pub fn new(link_repo: Arc<L>) -> Self {
        Self { link_repo }
    }

    pub async fn execute(
        &self,
        owner: UserId,
        id: LinkId,
        input: UpdateLinkInput,
    ) -> LinksResult<Link> {
        let url = input.url.as_deref().map(LinkUrl::parse).transpose()?;
        let title = input.title.as_deref().map(LinkTitle::new).transpose()?;
        let tags = input.tags.map(Tags::new);
        let patch = LinkPatch::edit(url, title, tags);

        // An empty patch still has to prove ownership
        if patch.is_empty() {
            return self
                .link_repo
                .find_by_id_and_owner(&id, &owner)
                .await?
                .ok_or(LinksError::NotFound);
        }

        let link = self
            .link_repo
            .update_partial(&id, Some(&owner), &patch)
            .await?
            .ok_or(LinksError::NotFound)?;

        tracing::info!(link_id = %id, "Link updated");
        Ok(link)
    }
}
