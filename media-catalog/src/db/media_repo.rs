//! Storage operations for media entry records.

use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{CatalogError, Result};
use crate::models::{FilePath, MediaEntry, MediaFileMap, NewMediaEntry, ProcessingState};

/// Repository for MediaEntry records.
#[derive(Clone)]
pub struct MediaEntryRepository {
    pool: PgPool,
}

impl MediaEntryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Validate a creation document and insert the new entry.
    ///
    /// A document without an explicit slug gets one derived from its title
    /// first; when the title slugifies to nothing either, creation fails,
    /// since a persisted entry must carry a slug.
    pub async fn create(&self, new: NewMediaEntry) -> Result<MediaEntry> {
        let mut entry = MediaEntry::new(new)?;
        if entry.slug.is_none() {
            entry.generate_slug(self).await?;
        }
        if entry.slug.is_none() {
            return Err(CatalogError::validation("missing required field: slug"));
        }

        let created = sqlx::query_as::<_, MediaEntry>(
            r#"
            INSERT INTO media_entries (id, uploader, title, slug, created, description,
                                       description_html, media_type, media_data, plugin_data,
                                       tags, state, queued_media_file, media_files,
                                       attachment_files, thumbnail_file)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            RETURNING id, uploader, title, slug, created, description, description_html,
                      media_type, media_data, plugin_data, tags, state, queued_media_file,
                      media_files, attachment_files, thumbnail_file
            "#,
        )
        .bind(entry.id)
        .bind(entry.uploader)
        .bind(&entry.title)
        .bind(&entry.slug)
        .bind(entry.created)
        .bind(&entry.description)
        .bind(&entry.description_html)
        .bind(&entry.media_type)
        .bind(&entry.media_data)
        .bind(&entry.plugin_data)
        .bind(&entry.tags)
        .bind(&entry.state)
        .bind(&entry.queued_media_file)
        .bind(&entry.media_files)
        .bind(&entry.attachment_files)
        .bind(&entry.thumbnail_file)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    /// Persist an in-memory entry wholesale, document style: insert it if
    /// new, otherwise overwrite every mutable column.
    pub async fn save(&self, entry: &MediaEntry) -> Result<()> {
        if entry.slug.is_none() {
            return Err(CatalogError::validation("missing required field: slug"));
        }

        sqlx::query(
            r#"
            INSERT INTO media_entries (id, uploader, title, slug, created, description,
                                       description_html, media_type, media_data, plugin_data,
                                       tags, state, queued_media_file, media_files,
                                       attachment_files, thumbnail_file)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            ON CONFLICT (id) DO UPDATE
            SET uploader = EXCLUDED.uploader,
                title = EXCLUDED.title,
                slug = EXCLUDED.slug,
                description = EXCLUDED.description,
                description_html = EXCLUDED.description_html,
                media_type = EXCLUDED.media_type,
                media_data = EXCLUDED.media_data,
                plugin_data = EXCLUDED.plugin_data,
                tags = EXCLUDED.tags,
                state = EXCLUDED.state,
                queued_media_file = EXCLUDED.queued_media_file,
                media_files = EXCLUDED.media_files,
                attachment_files = EXCLUDED.attachment_files,
                thumbnail_file = EXCLUDED.thumbnail_file
            "#,
        )
        .bind(entry.id)
        .bind(entry.uploader)
        .bind(&entry.title)
        .bind(&entry.slug)
        .bind(entry.created)
        .bind(&entry.description)
        .bind(&entry.description_html)
        .bind(&entry.media_type)
        .bind(&entry.media_data)
        .bind(&entry.plugin_data)
        .bind(&entry.tags)
        .bind(&entry.state)
        .bind(&entry.queued_media_file)
        .bind(&entry.media_files)
        .bind(&entry.attachment_files)
        .bind(&entry.thumbnail_file)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Look an entry up by id. Absence is `Ok(None)`.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<MediaEntry>> {
        let entry = sqlx::query_as::<_, MediaEntry>(
            r#"
            SELECT id, uploader, title, slug, created, description, description_html,
                   media_type, media_data, plugin_data, tags, state, queued_media_file,
                   media_files, attachment_files, thumbnail_file
            FROM media_entries
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(entry)
    }

    /// Look an entry up by slug.
    pub async fn find_by_slug(&self, slug: &str) -> Result<Option<MediaEntry>> {
        let entry = sqlx::query_as::<_, MediaEntry>(
            r#"
            SELECT id, uploader, title, slug, created, description, description_html,
                   media_type, media_data, plugin_data, tags, state, queued_media_file,
                   media_files, attachment_files, thumbnail_file
            FROM media_entries
            WHERE slug = $1
            "#,
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;

        Ok(entry)
    }

    /// Whether any entry already holds this slug. The check is
    /// instance-wide and does not exclude any particular row.
    pub async fn slug_in_use(&self, slug: &str) -> Result<bool> {
        let in_use: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM media_entries WHERE slug = $1)")
                .bind(slug)
                .fetch_one(&self.pool)
                .await?;

        Ok(in_use)
    }

    /// The same uploader's processed entry with the next greater id, if
    /// any. Ids are time-ordered, so this walks toward newer entries.
    pub async fn adjacent_newer(&self, entry: &MediaEntry) -> Result<Option<MediaEntry>> {
        let neighbor = sqlx::query_as::<_, MediaEntry>(
            r#"
            SELECT id, uploader, title, slug, created, description, description_html,
                   media_type, media_data, plugin_data, tags, state, queued_media_file,
                   media_files, attachment_files, thumbnail_file
            FROM media_entries
            WHERE uploader = $1 AND state = $2 AND id > $3
            ORDER BY id ASC
            LIMIT 1
            "#,
        )
        .bind(entry.uploader)
        .bind(ProcessingState::Processed.as_str())
        .bind(entry.id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(neighbor)
    }

    /// Counterpart of [`Self::adjacent_newer`]: next lesser id, walking
    /// toward older entries.
    pub async fn adjacent_older(&self, entry: &MediaEntry) -> Result<Option<MediaEntry>> {
        let neighbor = sqlx::query_as::<_, MediaEntry>(
            r#"
            SELECT id, uploader, title, slug, created, description, description_html,
                   media_type, media_data, plugin_data, tags, state, queued_media_file,
                   media_files, attachment_files, thumbnail_file
            FROM media_entries
            WHERE uploader = $1 AND state = $2 AND id < $3
            ORDER BY id DESC
            LIMIT 1
            "#,
        )
        .bind(entry.uploader)
        .bind(ProcessingState::Processed.as_str())
        .bind(entry.id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(neighbor)
    }

    /// Advance (or fail) an entry's processing state. Returns false when
    /// the entry no longer exists.
    pub async fn mark_state(&self, id: Uuid, state: ProcessingState) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE media_entries
            SET state = $2
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(state.as_str())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Record the pipeline's output files and drop the consumed queue
    /// marker. Returns false when the entry no longer exists.
    pub async fn store_processed_files(
        &self,
        id: Uuid,
        media_files: &MediaFileMap,
        thumbnail_file: Option<&FilePath>,
    ) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE media_entries
            SET media_files = $2, thumbnail_file = $3, queued_media_file = NULL
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(Json(media_files))
        .bind(thumbnail_file.map(Json))
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
