//! Link Entities

use chrono::{DateTime, Utc};
use kernel::id::{LinkId, UserId};

use crate::domain::metadata::Metadata;
use crate::domain::value_objects::{LinkTitle, LinkUrl, Tags};

/// A saved link
///
/// `description` and `image` start empty and are only ever written by
/// enrichment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub id: LinkId,
    pub user_id: UserId,
    pub url: String,
    pub title: String,
    pub tags: Vec<String>,
    pub description: String,
    pub image: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Link {
    pub fn new(user_id: UserId, url: LinkUrl, title: LinkTitle, tags: Tags) -> Self {
        let now = Utc::now();
        Self {
            id: LinkId::new(),
            user_id,
            url: url.into(),
            title: title.into(),
            tags: tags.into(),
            description: String::new(),
            image: String::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Field-level update; `None` leaves a field untouched
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkPatch {
    pub url: Option<String>,
    pub title: Option<String>,
    pub tags: Option<Vec<String>>,
    pub description: Option<String>,
    pub image: Option<String>,
}

impl LinkPatch {
    /// Patch carrying scraped metadata: description and image only
    ///
    /// Values the page did not provide are left out of the patch.
    pub fn enrichment(metadata: &Metadata) -> Self {
        let non_empty = |value: &str| (!value.is_empty()).then(|| value.to_string());
        Self {
            description: non_empty(&metadata.description),
            image: non_empty(&metadata.image),
            ..Self::default()
        }
    }

    /// Patch an owner may request
    pub fn edit(url: Option<LinkUrl>, title: Option<LinkTitle>, tags: Option<Tags>) -> Self {
        Self {
            url: url.map(Into::into),
            title: title.map(Into::into),
            tags: tags.map(Into::into),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    pub fn apply_to(&self, link: &mut Link) {
        if let Some(url) = &self.url {
            link.url.clone_from(url);
        }
        if let Some(title) = &self.title {
            link.title.clone_from(title);
        }
        if let Some(tags) = &self.tags {
            link.tags.clone_from(tags);
        }
        if let Some(description) = &self.description {
            link.description.clone_from(description);
        }
        if let Some(image) = &self.image {
            link.image.clone_from(image);
        }
        link.updated_at = Utc::now();
    }
}
