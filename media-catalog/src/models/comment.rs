//! Comments left on media entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::db::{MediaEntryRepository, UserRepository};
use crate::error::{CatalogError, Result};
use crate::models::media::MediaEntry;
use crate::models::user::User;

/// One comment on one media entry.
///
/// `content` is the author's markup as typed; `content_html` is the
/// rendered form the web layer caches alongside it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MediaComment {
    pub id: Uuid,
    /// Weak reference to the commented entry's id.
    pub media_entry: Uuid,
    /// Weak reference to the author's user id.
    pub author: Uuid,
    pub created: DateTime<Utc>,
    pub content: String,
    pub content_html: Option<String>,
}

/// Creation document for a [`MediaComment`]. Strict schema.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewMediaComment {
    pub media_entry: Uuid,
    pub author: Uuid,
    pub content: String,
    #[serde(default)]
    pub content_html: Option<String>,
}

impl MediaComment {
    /// Validates a creation document and stamps the creation time.
    pub fn new(new: NewMediaComment) -> Result<Self> {
        if new.content.trim().is_empty() {
            return Err(CatalogError::validation("content must not be empty"));
        }

        Ok(MediaComment {
            id: Uuid::now_v7(),
            media_entry: new.media_entry,
            author: new.author,
            created: Utc::now(),
            content: new.content,
            content_html: new.content_html,
        })
    }

    /// Parses a JSON creation document and builds the record from it.
    pub fn from_document(doc: serde_json::Value) -> Result<Self> {
        let new: NewMediaComment = serde_json::from_value(doc)?;
        Self::new(new)
    }

    /// The entry this comment sits on, if it still exists.
    pub async fn media_entry(
        &self,
        entries: &MediaEntryRepository,
    ) -> Result<Option<MediaEntry>> {
        entries.find_by_id(self.media_entry).await
    }

    /// The comment's author, if the account still exists.
    pub async fn author(&self, users: &UserRepository) -> Result<Option<User>> {
        users.find_by_id(self.author).await
    }
}
