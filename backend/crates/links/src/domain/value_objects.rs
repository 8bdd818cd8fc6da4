//! Link Value Objects
//!
//! Validated inputs for link creation and edits.

use url::Url;

use crate::error::{LinksError, LinksResult};

/// Absolute `http`/`https` URL, stored in its normalized form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkUrl(String);

impl LinkUrl {
    pub fn parse(raw: &str) -> LinksResult<Self> {
        let url = Url::parse(raw.trim()).map_err(|e| LinksError::InvalidUrl(e.to_string()))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(LinksError::InvalidUrl(format!(
                "unsupported scheme '{}'",
                url.scheme()
            )));
        }
        if url.host_str().is_none_or(str::is_empty) {
            return Err(LinksError::InvalidUrl("missing host".to_string()));
        }

        Ok(Self(url.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<LinkUrl> for String {
    fn from(url: LinkUrl) -> Self {
        url.0
    }
}

/// Non-blank, trimmed title
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkTitle(String);

impl LinkTitle {
    pub fn new(raw: &str) -> LinksResult<Self> {
        let title = raw.trim();
        if title.is_empty() {
            return Err(LinksError::EmptyTitle);
        }
        Ok(Self(title.to_string()))
    }
}

impl From<LinkTitle> for String {
    fn from(title: LinkTitle) -> Self {
        title.0
    }
}

/// Trimmed tags with blanks removed; order and duplicates kept as given
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tags(Vec<String>);

impl Tags {
    pub fn new(raw: Vec<String>) -> Self {
        Self(
            raw.into_iter()
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect(),
        )
    }
}

impl From<Tags> for Vec<String> {
    fn from(tags: Tags) -> Self {
        tags.0
    }
}
