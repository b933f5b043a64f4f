//! Media entry records and their accessors.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::db::{CommentRepository, MediaEntryRepository, UserRepository};
use crate::error::{CatalogError, Result};
use crate::models::comment::MediaComment;
use crate::models::files::{FilePath, MediaFileMap, DISPLAY_FETCH_ORDER};
use crate::models::user::User;
use crate::models::ExtensionMap;
use crate::urls::{self, UrlGenerator};

/// Processing lifecycle of an entry.
///
/// The column is an open string: the processing pipeline owns transitions
/// and may write values this layer does not know.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessingState {
    Unprocessed,
    Processed,
    Failed,
}

impl ProcessingState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessingState::Unprocessed => "unprocessed",
            ProcessingState::Processed => "processed",
            ProcessingState::Failed => "failed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "unprocessed" => Some(ProcessingState::Unprocessed),
            "processed" => Some(ProcessingState::Processed),
            "failed" => Some(ProcessingState::Failed),
            _ => None,
        }
    }
}

/// The media kinds the catalog stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaType {
    Image,
    Video,
    Audio,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Image => "image",
            MediaType::Video => "video",
            MediaType::Audio => "audio",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "image" => Some(MediaType::Image),
            "video" => Some(MediaType::Video),
            "audio" => Some(MediaType::Audio),
            _ => None,
        }
    }
}

/// Type-specific payload for an image entry.
///
/// `extra` soaks up whatever else the image pipeline records (EXIF
/// summaries and the like) without a schema change.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<i32>,
    #[serde(flatten)]
    pub extra: ExtensionMap,
}

/// Type-specific payload for a video entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<f64>,
    #[serde(flatten)]
    pub extra: ExtensionMap,
}

/// Type-specific payload for an audio entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AudioData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<f64>,
    #[serde(flatten)]
    pub extra: ExtensionMap,
}

/// Per-type media payload, tagged by kind.
///
/// Stored as one JSONB document whose `media_type` tag always agrees with
/// the entry's `media_type` column; [`MediaEntry::new`] enforces that.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "media_type", rename_all = "snake_case")]
pub enum MediaData {
    Image(ImageData),
    Video(VideoData),
    Audio(AudioData),
}

impl MediaData {
    /// The kind this payload is tagged with.
    pub fn media_type(&self) -> MediaType {
        match self {
            MediaData::Image(_) => MediaType::Image,
            MediaData::Video(_) => MediaType::Video,
            MediaData::Audio(_) => MediaType::Audio,
        }
    }

    /// An empty payload for the given kind, for entries created before
    /// processing has measured anything.
    pub fn empty(media_type: MediaType) -> Self {
        match media_type {
            MediaType::Image => MediaData::Image(ImageData::default()),
            MediaType::Video => MediaData::Video(VideoData::default()),
            MediaType::Audio => MediaData::Audio(AudioData::default()),
        }
    }
}

/// One uploaded media item.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MediaEntry {
    pub id: Uuid,
    /// Weak reference to the uploading user's id.
    pub uploader: Uuid,
    pub title: Option<String>,
    /// URL token, unique among entries once generated. `None` only while
    /// the entry has not been persisted yet.
    pub slug: Option<String>,
    pub created: DateTime<Utc>,
    pub description: Option<String>,
    pub description_html: Option<String>,
    pub media_type: String,
    pub media_data: Json<MediaData>,
    pub plugin_data: Json<ExtensionMap>,
    pub tags: Vec<String>,
    pub state: String,
    /// Where the raw upload waits for the processing pipeline.
    pub queued_media_file: Option<Json<FilePath>>,
    pub media_files: Json<MediaFileMap>,
    pub attachment_files: Json<Vec<FilePath>>,
    pub thumbnail_file: Option<Json<FilePath>>,
}

/// Creation document for a [`MediaEntry`]. Strict schema, like
/// [`super::user::NewUser`].
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewMediaEntry {
    pub uploader: Uuid,
    pub media_type: MediaType,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub description_html: Option<String>,
    #[serde(default)]
    pub media_data: Option<MediaData>,
    #[serde(default)]
    pub plugin_data: ExtensionMap,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub queued_media_file: Option<FilePath>,
}

impl MediaEntry {
    /// Validates a creation document and fills every declared default.
    ///
    /// New entries come up `unprocessed` with empty file maps; the raw
    /// upload, if already stored, sits in `queued_media_file` until the
    /// pipeline takes it.
    pub fn new(new: NewMediaEntry) -> Result<Self> {
        let media_data = match new.media_data {
            Some(data) => {
                if data.media_type() != new.media_type {
                    return Err(CatalogError::validation(format!(
                        "media_data is tagged {:?} but media_type is {:?}",
                        data.media_type().as_str(),
                        new.media_type.as_str()
                    )));
                }
                data
            }
            None => MediaData::empty(new.media_type),
        };

        Ok(MediaEntry {
            id: Uuid::now_v7(),
            uploader: new.uploader,
            title: new.title,
            slug: new.slug,
            created: Utc::now(),
            description: new.description,
            description_html: new.description_html,
            media_type: media_data.media_type().as_str().to_string(),
            media_data: Json(media_data),
            plugin_data: Json(new.plugin_data),
            tags: new.tags,
            state: ProcessingState::Unprocessed.as_str().to_string(),
            queued_media_file: new.queued_media_file.map(Json),
            media_files: Json(MediaFileMap::new()),
            attachment_files: Json(Vec::new()),
            thumbnail_file: None,
        })
    }

    /// Parses a JSON creation document and builds the record from it.
    pub fn from_document(doc: serde_json::Value) -> Result<Self> {
        let new: NewMediaEntry = serde_json::from_value(doc)?;
        Self::new(new)
    }

    /// Typed view of the `media_type` column.
    pub fn kind(&self) -> Option<MediaType> {
        MediaType::from_str(&self.media_type)
    }

    /// Typed view of the `state` column.
    pub fn processing_state(&self) -> Option<ProcessingState> {
        ProcessingState::from_str(&self.state)
    }

    pub fn is_processed(&self) -> bool {
        self.processing_state() == Some(ProcessingState::Processed)
    }

    /// The token that addresses this entry in URLs: its slug when one is
    /// set, otherwise its id.
    pub fn slug_or_id(&self) -> String {
        match self.slug.as_deref() {
            Some(slug) if !slug.is_empty() => slug.to_string(),
            _ => self.id.to_string(),
        }
    }

    /// Picks the best file to display using the default preference order.
    pub fn get_display_media(&self) -> Option<(&str, &FilePath)> {
        self.get_display_media_with(DISPLAY_FETCH_ORDER)
    }

    /// Picks the best file to display, trying `fetch_order` labels in the
    /// order given.
    pub fn get_display_media_with<S>(&self, fetch_order: &[S]) -> Option<(&str, &FilePath)>
    where
        S: AsRef<str>,
    {
        self.media_files.0.pick_display(fetch_order)
    }

    /// All comments on this entry, newest first.
    pub async fn get_comments(&self, comments: &CommentRepository) -> Result<Vec<MediaComment>> {
        comments.for_entry(self.id).await
    }

    /// The uploading user, if the account still exists.
    pub async fn uploader(&self, users: &UserRepository) -> Result<Option<User>> {
        users.find_by_id(self.uploader).await
    }

    /// Derives this entry's slug from its title, in memory.
    ///
    /// A title with no sluggable characters leaves the slug unset and the
    /// entry stays addressable by id. When another entry already holds
    /// the candidate slug, this entry's id is prefixed to disambiguate.
    /// The duplicate check does not exclude this entry's own row, so
    /// regenerating the slug of a saved entry rewrites it to the
    /// id-prefixed form.
    pub async fn generate_slug(&mut self, entries: &MediaEntryRepository) -> Result<()> {
        let candidate = slug::slugify(self.title.as_deref().unwrap_or(""));
        if candidate.is_empty() {
            self.slug = None;
            return Ok(());
        }

        if entries.slug_in_use(&candidate).await? {
            let disambiguated = format!("{}-{}", self.id, candidate);
            tracing::debug!(slug = %candidate, rewritten = %disambiguated, "slug already in use");
            self.slug = Some(disambiguated);
        } else {
            self.slug = Some(candidate);
        }
        Ok(())
    }

    /// URL of this entry's public page.
    ///
    /// The uploader's username is part of the URL, so a dangling uploader
    /// reference is an error here rather than an absence.
    pub async fn url_for_self(
        &self,
        users: &UserRepository,
        urlgen: &impl UrlGenerator,
    ) -> Result<String> {
        let uploader = self.require_uploader(users).await?;
        let media = self.slug_or_id();
        Ok(urlgen.generate(
            urls::MEDIA_HOME,
            &[("user", &uploader.username), ("media", &media)],
        ))
    }

    /// URL of the previous entry in the uploader's processed gallery, or
    /// `None` at the gallery's edge.
    ///
    /// Galleries run newest first, so the previous page holds the entry
    /// with the next greater id.
    pub async fn url_to_prev(
        &self,
        entries: &MediaEntryRepository,
        users: &UserRepository,
        urlgen: &impl UrlGenerator,
    ) -> Result<Option<String>> {
        let Some(neighbor) = entries.adjacent_newer(self).await? else {
            return Ok(None);
        };
        self.neighbor_url(&neighbor, users, urlgen).await.map(Some)
    }

    /// URL of the next entry in the uploader's processed gallery, or
    /// `None` at the gallery's edge. Counterpart of [`Self::url_to_prev`]:
    /// the entry with the next lesser id.
    pub async fn url_to_next(
        &self,
        entries: &MediaEntryRepository,
        users: &UserRepository,
        urlgen: &impl UrlGenerator,
    ) -> Result<Option<String>> {
        let Some(neighbor) = entries.adjacent_older(self).await? else {
            return Ok(None);
        };
        self.neighbor_url(&neighbor, users, urlgen).await.map(Some)
    }

    async fn require_uploader(&self, users: &UserRepository) -> Result<User> {
        self.uploader(users)
            .await?
            .ok_or(CatalogError::MissingReference {
                entity: "user",
                id: self.uploader,
            })
    }

    async fn neighbor_url(
        &self,
        neighbor: &MediaEntry,
        users: &UserRepository,
        urlgen: &impl UrlGenerator,
    ) -> Result<String> {
        let uploader = self.require_uploader(users).await?;
        let media = neighbor.slug_or_id();
        Ok(urlgen.generate(
            urls::MEDIA_HOME,
            &[("user", &uploader.username), ("media", &media)],
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn new_image_entry(uploader: Uuid) -> NewMediaEntry {
        NewMediaEntry {
            uploader,
            media_type: MediaType::Image,
            title: Some("Balanced Goblin".to_string()),
            slug: None,
            description: None,
            description_html: None,
            media_data: None,
            plugin_data: ExtensionMap::new(),
            tags: vec![],
            queued_media_file: Some(FilePath::new(["queue", "goblin.png"])),
        }
    }

    #[test]
    fn test_new_entry_fills_defaults() {
        let entry = MediaEntry::new(new_image_entry(Uuid::now_v7())).expect("should create");

        assert_eq!(entry.processing_state(), Some(ProcessingState::Unprocessed));
        assert!(!entry.is_processed());
        assert_eq!(entry.media_type, "image");
        assert_eq!(entry.kind(), Some(MediaType::Image));
        assert_eq!(entry.media_data.0, MediaData::Image(ImageData::default()));
        assert!(entry.media_files.0.is_empty());
        assert!(entry.attachment_files.0.is_empty());
        assert!(entry.thumbnail_file.is_none());
        assert!(entry.slug.is_none());
        assert!(entry.created <= Utc::now());
        assert_eq!(
            entry.queued_media_file.as_ref().map(|q| q.0.to_string()),
            Some("queue/goblin.png".to_string())
        );
    }

    #[test]
    fn test_entry_ids_are_time_ordered() {
        // Creation order and id order agree; gallery navigation leans on
        // this.
        let uploader = Uuid::now_v7();
        let first = MediaEntry::new(new_image_entry(uploader)).expect("should create");
        let second = MediaEntry::new(new_image_entry(uploader)).expect("should create");
        assert!(first.id < second.id);
    }

    #[test]
    fn test_media_data_must_agree_with_media_type() {
        let mut doc = new_image_entry(Uuid::now_v7());
        doc.media_data = Some(MediaData::Video(VideoData::default()));
        let err = MediaEntry::new(doc).expect_err("mismatch must fail");
        assert!(matches!(err, CatalogError::Validation(_)));
    }

    #[test]
    fn test_matching_media_data_is_kept() {
        let mut doc = new_image_entry(Uuid::now_v7());
        doc.media_data = Some(MediaData::Image(ImageData {
            width: Some(60),
            height: Some(120),
            extra: ExtensionMap::new(),
        }));
        let entry = MediaEntry::new(doc).expect("should create");
        match &entry.media_data.0 {
            MediaData::Image(image) => {
                assert_eq!(image.width, Some(60));
                assert_eq!(image.height, Some(120));
            }
            other => panic!("expected image data, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_media_type_is_rejected() {
        let err = MediaEntry::from_document(json!({
            "uploader": Uuid::now_v7(),
            "media_type": "document",
        }))
        .expect_err("unknown kind must fail");
        assert!(matches!(err, CatalogError::Validation(_)));
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let err = MediaEntry::from_document(json!({
            "uploader": Uuid::now_v7(),
            "media_type": "image",
            "licence": "CC-BY",
        }))
        .expect_err("unknown field must fail");
        assert!(err.to_string().contains("licence"));
    }

    #[test]
    fn test_missing_uploader_is_rejected() {
        let err = MediaEntry::from_document(json!({ "media_type": "image" }))
            .expect_err("missing uploader must fail");
        assert!(matches!(err, CatalogError::Validation(_)));
    }

    #[test]
    fn test_document_with_payload_and_extras() {
        let entry = MediaEntry::from_document(json!({
            "uploader": Uuid::now_v7(),
            "media_type": "image",
            "title": "Marmalade skies",
            "media_data": {
                "media_type": "image",
                "width": 1024,
                "exif": {"Model": "Holga"},
            },
        }))
        .expect("should create");

        match &entry.media_data.0 {
            MediaData::Image(image) => {
                assert_eq!(image.width, Some(1024));
                assert_eq!(image.height, None);
                // Unknown payload keys land in the open extra map.
                assert_eq!(image.extra.get("exif"), Some(&json!({"Model": "Holga"})));
            }
            other => panic!("expected image data, got {:?}", other),
        }
    }

    #[test]
    fn test_media_data_serializes_with_tag() {
        let data = MediaData::Audio(AudioData {
            duration_seconds: Some(12.5),
            extra: ExtensionMap::new(),
        });
        let encoded = serde_json::to_value(&data).expect("should serialize");
        assert_eq!(
            encoded,
            json!({"media_type": "audio", "duration_seconds": 12.5})
        );
    }

    #[test]
    fn test_slug_or_id() {
        let mut entry = MediaEntry::new(new_image_entry(Uuid::now_v7())).expect("should create");
        assert_eq!(entry.slug_or_id(), entry.id.to_string());

        entry.slug = Some("balanced-goblin".to_string());
        assert_eq!(entry.slug_or_id(), "balanced-goblin");

        entry.slug = Some(String::new());
        assert_eq!(entry.slug_or_id(), entry.id.to_string());
    }

    #[test]
    fn test_get_display_media_uses_default_order() {
        let mut entry = MediaEntry::new(new_image_entry(Uuid::now_v7())).expect("should create");
        assert!(entry.get_display_media().is_none());

        let mut files = MediaFileMap::new();
        files.insert("original", FilePath::new(["m", "original.png"]));
        files.insert("thumb", FilePath::new(["m", "thumb.png"]));
        entry.media_files = Json(files);

        let (label, _) = entry.get_display_media().expect("should pick");
        assert_eq!(label, "original");

        let (label, _) = entry
            .get_display_media_with(&["thumb", "medium"])
            .expect("should pick");
        assert_eq!(label, "thumb");
    }

    #[test]
    fn test_state_round_trip() {
        for state in [
            ProcessingState::Unprocessed,
            ProcessingState::Processed,
            ProcessingState::Failed,
        ] {
            assert_eq!(ProcessingState::from_str(state.as_str()), Some(state));
        }
        assert_eq!(ProcessingState::from_str("exploded"), None);
    }
}
