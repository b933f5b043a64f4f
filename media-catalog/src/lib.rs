//! Record schemas and accessors for the Lumen media catalog.
//!
//! The data-access layer of a media-hosting site: three persisted record
//! types ([`User`], [`MediaEntry`], [`MediaComment`]) with creation-time
//! defaults, strict-schema validation, and the one-shot lookups the web
//! layer needs (find-by-id, newest-first comments, prev/next gallery
//! navigation, slug de-duplication).
//!
//! Storage is Postgres behind per-record repositories sharing a `PgPool`.
//! Nothing here caches, retries or opens transactions; every accessor is
//! a single query, and callers compose them.
//!
//! ```no_run
//! use media_catalog::{Config, MediaEntryRepository, UserRepository};
//!
//! # async fn demo() -> media_catalog::Result<()> {
//! let config = Config::from_env()?;
//! let pool = config.database.connect().await?;
//! media_catalog::run_migrations(&pool).await?;
//!
//! let users = UserRepository::new(pool.clone());
//! let entries = MediaEntryRepository::new(pool);
//!
//! if let Some(user) = users.find_by_username("chris").await? {
//!     assert!(user.check_login("toast and mushrooms")?);
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod security;
pub mod urls;
pub mod validators;

pub use config::Config;
pub use db::{run_migrations, CommentRepository, MediaEntryRepository, UserRepository};
pub use error::{CatalogError, Result};
pub use models::{
    AccountStatus, AudioData, ExtensionMap, FilePath, ImageData, MediaComment, MediaData,
    MediaEntry, MediaFileMap, MediaType, NewMediaComment, NewMediaEntry, NewUser,
    ProcessingState, User, VideoData, DISPLAY_FETCH_ORDER,
};
pub use urls::UrlGenerator;
