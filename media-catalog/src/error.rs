use thiserror::Error;
use uuid::Uuid;

pub type Result<T> = std::result::Result<T, CatalogError>;

/// Errors surfaced by the catalog.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// A creation document broke the record schema: a required field was
    /// missing, a value was malformed, or an unknown field was present.
    #[error("validation error: {0}")]
    Validation(String),

    /// The storage backend failed or was unreachable. Propagated as-is;
    /// this layer never retries.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// An operation had to dereference a record that no longer exists.
    /// Lookups that may return absence use `Ok(None)` instead.
    #[error("{entity} {id} no longer exists")]
    MissingReference { entity: &'static str, id: Uuid },

    /// Required configuration was missing or malformed at load time.
    #[error("configuration error: {0}")]
    Config(String),

    /// Machinery below this layer misbehaved: a stored hash that does not
    /// parse, a hashing failure. Not the caller's document.
    #[error("internal error: {0}")]
    Internal(String),
}

impl CatalogError {
    pub(crate) fn validation(msg: impl Into<String>) -> Self {
        CatalogError::Validation(msg.into())
    }
}

// Strict-schema parse failures (unknown or missing fields in a creation
// document) are validation errors, not internal ones.
impl From<serde_json::Error> for CatalogError {
    fn from(err: serde_json::Error) -> Self {
        CatalogError::Validation(err.to_string())
    }
}
