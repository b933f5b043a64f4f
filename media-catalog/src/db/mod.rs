//! Database access: one repository per record type, each a cheap `Clone`
//! over a shared [`PgPool`]. Accessors issue exactly one query; there are
//! no transactions, retries or caches at this layer.

use sqlx::PgPool;

use crate::error::{CatalogError, Result};

pub mod comment_repo;
pub mod media_repo;
pub mod user_repo;

pub use comment_repo::CommentRepository;
pub use media_repo::MediaEntryRepository;
pub use user_repo::UserRepository;

/// Register the record schemas: apply the embedded SQL migrations.
pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| CatalogError::Database(e.into()))?;
    tracing::debug!("catalog schema is up to date");
    Ok(())
}
