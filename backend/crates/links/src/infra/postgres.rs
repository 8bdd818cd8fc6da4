//! PostgreSQL Repository Implementation

use chrono::{DateTime, Utc};
use kernel::id::{LinkId, UserId};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entities::{Link, LinkPatch};
use crate::domain::repository::LinkRepository;
use crate::error::LinksResult;

const LINK_COLUMNS: &str =
    "id, user_id, url, title, tags, description, image, created_at, updated_at";

#[derive(Clone)]
pub struct PgLinkRepository {
    pool: PgPool,
}

impl PgLinkRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl LinkRepository for PgLinkRepository {
    async fn create(&self, link: &Link) -> LinksResult<()> {
        sqlx::query(
            r#"
            INSERT INTO links (
                id,
                user_id,
                url,
                title,
                tags,
                description,
                image,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(link.id.as_uuid())
        .bind(link.user_id.as_uuid())
        .bind(&link.url)
        .bind(&link.title)
        .bind(&link.tags)
        .bind(&link.description)
        .bind(&link.image)
        .bind(link.created_at)
        .bind(link.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id_and_owner(
        &self,
        id: &LinkId,
        owner: &UserId,
    ) -> LinksResult<Option<Link>> {
        let row = sqlx::query_as::<_, LinkRow>(&format!(
            "SELECT {LINK_COLUMNS} FROM links WHERE id = $1 AND user_id = $2"
        ))
        .bind(id.as_uuid())
        .bind(owner.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(LinkRow::into_link))
    }

    async fn update_partial(
        &self,
        id: &LinkId,
        owner: Option<&UserId>,
        patch: &LinkPatch,
    ) -> LinksResult<Option<Link>> {
        // One statement, so the row lock covers read and write; untouched
        // columns keep whatever a concurrent writer left there
        let row = sqlx::query_as::<_, LinkRow>(&format!(
            r#"
            UPDATE links SET
                url = COALESCE($3, url),
                title = COALESCE($4, title),
                tags = COALESCE($5, tags),
                description = COALESCE($6, description),
                image = COALESCE($7, image),
                updated_at = now()
            WHERE id = $1 AND ($2::uuid IS NULL OR user_id = $2)
            RETURNING {LINK_COLUMNS}
            "#
        ))
        .bind(id.as_uuid())
        .bind(owner.map(|o| *o.as_uuid()))
        .bind(patch.url.as_deref())
        .bind(patch.title.as_deref())
        .bind(patch.tags.as_deref())
        .bind(patch.description.as_deref())
        .bind(patch.image.as_deref())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(LinkRow::into_link))
    }

    async fn delete_by_id_and_owner(&self, id: &LinkId, owner: &UserId) -> LinksResult<bool> {
        let deleted = sqlx::query("DELETE FROM links WHERE id = $1 AND user_id = $2")
            .bind(id.as_uuid())
            .bind(owner.as_uuid())
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(deleted > 0)
    }

    async fn list_by_owner(&self, owner: &UserId) -> LinksResult<Vec<Link>> {
        let rows = sqlx::query_as::<_, LinkRow>(&format!(
            "SELECT {LINK_COLUMNS} FROM links WHERE user_id = $1 ORDER BY created_at DESC, id"
        ))
        .bind(owner.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(LinkRow::into_link).collect())
    }
}

#[derive(sqlx::FromRow)]
struct LinkRow {
    id: Uuid,
    user_id: Uuid,
    url: String,
    title: String,
    tags: Vec<String>,
    description: String,
    image: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl LinkRow {
    fn into_link(self) -> Link {
        Link {
            id: LinkId::from_uuid(self.id),
            user_id: UserId::from_uuid(self.user_id),
            url: self.url,
            title: self.title,
            tags: self.tags,
            description: self.description,
            image: self.image,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
