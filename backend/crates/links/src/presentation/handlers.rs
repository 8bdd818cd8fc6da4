//! HTTP Handlers
//!
//! Every handler runs behind `auth::require_auth` and scopes its work to the
//! caller's account.

use auth::{CurrentUser, UserRepository};
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use kernel::id::{LinkId, UserId};
use std::sync::Arc;

use crate::application::{
    CreateLinkInput, CreateLinkUseCase, DeleteLinkUseCase, EnrichmentQueue, GetLinkUseCase,
    ListLinksUseCase, UpdateLinkInput, UpdateLinkUseCase,
};
use crate::domain::repository::LinkRepository;
use crate::error::{LinksError, LinksResult};
use crate::presentation::dto::{CreateLinkRequest, LinkResponse, UpdateLinkRequest};

/// Shared state for link handlers
pub struct LinksAppState<L, U>
where
    L: LinkRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    pub links: Arc<L>,
    pub users: Arc<U>,
    pub enrichment: EnrichmentQueue,
}

impl<L, U> Clone for LinksAppState<L, U>
where
    L: LinkRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            links: self.links.clone(),
            users: self.users.clone(),
            enrichment: self.enrichment.clone(),
        }
    }
}

impl<L, U> LinksAppState<L, U>
where
    L: LinkRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    async fn owner(&self, current_user: &CurrentUser) -> LinksResult<UserId> {
        Ok(current_user.resolve(self.users.as_ref()).await?.user_id)
    }
}

/// A malformed id cannot name any link
fn parse_link_id(raw: &str) -> LinksResult<LinkId> {
    raw.parse().map_err(|_| LinksError::NotFound)
}

/// POST /api/links
pub async fn create_link<L, U>(
    State(state): State<LinksAppState<L, U>>,
    current_user: CurrentUser,
    Json(req): Json<CreateLinkRequest>,
) -> LinksResult<(StatusCode, Json<LinkResponse>)>
where
    L: LinkRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    let owner = state.owner(&current_user).await?;
    let use_case = CreateLinkUseCase::new(state.links.clone(), state.enrichment.clone());

    let link = use_case
        .execute(
            owner,
            CreateLinkInput {
                url: req.url,
                title: req.title,
                tags: req.tags,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(link.into())))
}

/// GET /api/links
pub async fn list_links<L, U>(
    State(state): State<LinksAppState<L, U>>,
    current_user: CurrentUser,
) -> LinksResult<Json<Vec<LinkResponse>>>
where
    L: LinkRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    let owner = state.owner(&current_user).await?;
    let links = ListLinksUseCase::new(state.links.clone()).execute(owner).await?;

    Ok(Json(links.into_iter().map(Into::into).collect()))
}

/// GET /api/links/{id}
pub async fn get_link<L, U>(
    State(state): State<LinksAppState<L, U>>,
    current_user: CurrentUser,
    Path(id): Path<String>,
) -> LinksResult<Json<LinkResponse>>
where
    L: LinkRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    let id = parse_link_id(&id)?;
    let owner = state.owner(&current_user).await?;
    let link = GetLinkUseCase::new(state.links.clone()).execute(owner, id).await?;

    Ok(Json(link.into()))
}

/// PATCH /api/links/{id}
pub async fn update_link<L, U>(
    State(state): State<LinksAppState<L, U>>,
    current_user: CurrentUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateLinkRequest>,
) -> LinksResult<Json<LinkResponse>>
where
    L: LinkRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    let id = parse_link_id(&id)?;
    let owner = state.owner(&current_user).await?;
    let link = UpdateLinkUseCase::new(state.links.clone())
        .execute(
            owner,
            id,
            UpdateLinkInput {
                url: req.url,
                title: req.title,
                tags: req.tags,
            },
        )
        .await?;

    Ok(Json(link.into()))
}

/// DELETE /api/links/{id}
pub async fn delete_link<L, U>(
    State(state): State<LinksAppState<L, U>>,
    current_user: CurrentUser,
    Path(id): Path<String>,
) -> LinksResult<StatusCode>
where
    L: LinkRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    let id = parse_link_id(&id)?;
    let owner = state.owner(&current_user).await?;
    DeleteLinkUseCase::new(state.links.clone())
        .execute(owner, id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
