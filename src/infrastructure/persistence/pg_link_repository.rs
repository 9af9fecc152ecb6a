//! PostgreSQL implementation of link repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use std::sync::Arc;

use crate::domain::entities::{Link, LinkOwner, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

#[derive(FromRow)]
struct LinkRow {
    id: i64,
    user_id: Option<i64>,
    anonymous_id: Option<String>,
    short_code: String,
    original_url: String,
    clicks: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<LinkRow> for Link {
    fn from(row: LinkRow) -> Self {
        Link {
            id: row.id,
            user_id: row.user_id,
            anonymous_id: row.anonymous_id,
            short_code: row.short_code,
            original_url: row.original_url,
            clicks: row.clicks,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// PostgreSQL repository for link storage and ownership.
///
/// Uses SQLx bound parameters throughout. The `short_code` unique constraint
/// is the authority on code collisions.
pub struct PgLinkRepository {
    pool: Arc<PgPool>,
}

impl PgLinkRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    async fn create(&self, new_link: NewLink) -> Result<Option<Link>, AppError> {
        let row = sqlx::query_as::<_, LinkRow>(
            r#"
            INSERT INTO links (user_id, anonymous_id, short_code, original_url)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (short_code) DO NOTHING
            RETURNING id, user_id, anonymous_id, short_code, original_url, clicks,
                      created_at, updated_at
            "#,
        )
        .bind(new_link.owner.user_id())
        .bind(new_link.owner.anonymous_id())
        .bind(&new_link.short_code)
        .bind(&new_link.original_url)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Link::from))
    }

    async fn find_by_code(&self, short_code: &str) -> Result<Option<Link>, AppError> {
        let row = sqlx::query_as::<_, LinkRow>(
            r#"
            SELECT id, user_id, anonymous_id, short_code, original_url, clicks,
                   created_at, updated_at
            FROM links
            WHERE short_code = $1
            "#,
        )
        .bind(short_code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Link::from))
    }

    async fn list(&self, owner: Option<LinkOwner>) -> Result<Vec<Link>, AppError> {
        let user_id = owner.as_ref().and_then(LinkOwner::user_id);
        let anonymous_id = owner.as_ref().and_then(LinkOwner::anonymous_id);

        let rows = sqlx::query_as::<_, LinkRow>(
            r#"
            SELECT id, user_id, anonymous_id, short_code, original_url, clicks,
                   created_at, updated_at
            FROM links
            WHERE ($1::bigint IS NULL OR user_id = $1)
              AND ($2::text IS NULL OR anonymous_id = $2)
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(user_id)
        .bind(anonymous_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Link::from).collect())
    }

    async fn increment_clicks(&self, short_code: &str) -> Result<u64, AppError> {
        let result = sqlx::query("UPDATE links SET clicks = clicks + 1 WHERE short_code = $1")
            .bind(short_code)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected())
    }

    async fn claim_anonymous(&self, user_id: i64, anonymous_id: &str) -> Result<u64, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE links
            SET user_id = $1, anonymous_id = NULL, updated_at = NOW()
            WHERE anonymous_id = $2 AND user_id IS NULL
            "#,
        )
        .bind(user_id)
        .bind(anonymous_id)
        .execute(self.pool.as_ref())
        .await?;

        Ok(result.rows_affected())
    }

    async fn health_check(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(self.pool.as_ref())
            .await?;

        Ok(())
    }
}
