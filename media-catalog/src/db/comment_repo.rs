//! Storage operations for comment records.

use sqlx::PgPool;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{MediaComment, NewMediaComment};

/// Repository for MediaComment records.
#[derive(Clone)]
pub struct CommentRepository {
    pool: PgPool,
}

impl CommentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Validate a creation document and insert the new comment.
    pub async fn create(&self, new: NewMediaComment) -> Result<MediaComment> {
        let comment = MediaComment::new(new)?;

        let created = sqlx::query_as::<_, MediaComment>(
            r#"
            INSERT INTO media_comments (id, media_entry, author, created, content, content_html)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, media_entry, author, created, content, content_html
            "#,
        )
        .bind(comment.id)
        .bind(comment.media_entry)
        .bind(comment.author)
        .bind(comment.created)
        .bind(&comment.content)
        .bind(&comment.content_html)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    /// Look a comment up by id. Absence is `Ok(None)`.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<MediaComment>> {
        let comment = sqlx::query_as::<_, MediaComment>(
            r#"
            SELECT id, media_entry, author, created, content, content_html
            FROM media_comments
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(comment)
    }

    /// All comments on one entry, newest first. Two comments stamped in
    /// the same instant stay deterministically ordered by id.
    ///
    /// Every call is a fresh query; callers that need pages apply their
    /// own limits.
    pub async fn for_entry(&self, media_entry: Uuid) -> Result<Vec<MediaComment>> {
        let comments = sqlx::query_as::<_, MediaComment>(
            r#"
            SELECT id, media_entry, author, created, content, content_html
            FROM media_comments
            WHERE media_entry = $1
            ORDER BY created DESC, id DESC
            "#,
        )
        .bind(media_entry)
        .fetch_all(&self.pool)
        .await?;

        Ok(comments)
    }
}
