//! Storage operations for user records.

use sqlx::PgPool;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{AccountStatus, NewUser, User};

/// Repository for User records.
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Validate a creation document and insert the new account.
    ///
    /// Username uniqueness is enforced by the database index; a duplicate
    /// surfaces as a database error.
    pub async fn create(&self, new: NewUser) -> Result<User> {
        let user = User::new(new)?;

        let created = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, username, email, created, plugin_data, pw_hash,
                               email_verified, status, verification_key, is_admin,
                               url, bio, bio_html)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING id, username, email, created, plugin_data, pw_hash,
                      email_verified, status, verification_key, is_admin,
                      url, bio, bio_html
            "#,
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(user.created)
        .bind(&user.plugin_data)
        .bind(&user.pw_hash)
        .bind(user.email_verified)
        .bind(&user.status)
        .bind(&user.verification_key)
        .bind(user.is_admin)
        .bind(&user.url)
        .bind(&user.bio)
        .bind(&user.bio_html)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    /// Look an account up by id. Absence is `Ok(None)`.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, created, plugin_data, pw_hash,
                   email_verified, status, verification_key, is_admin,
                   url, bio, bio_html
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Look an account up by its unique username.
    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, created, plugin_data, pw_hash,
                   email_verified, status, verification_key, is_admin,
                   url, bio, bio_html
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Registration pre-check; the unique index stays authoritative.
    pub async fn username_exists(&self, username: &str) -> Result<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)")
                .bind(username)
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }

    /// Flip the account to verified once the emailed key checks out.
    ///
    /// Returns the updated record, or `None` when the account is gone.
    pub async fn mark_email_verified(&self, id: Uuid) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET email_verified = TRUE, status = $2
            WHERE id = $1
            RETURNING id, username, email, created, plugin_data, pw_hash,
                      email_verified, status, verification_key, is_admin,
                      url, bio, bio_html
            "#,
        )
        .bind(id)
        .bind(AccountStatus::Active.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Overwrite the profile fields with the submitted form values.
    pub async fn update_profile(
        &self,
        id: Uuid,
        url: Option<&str>,
        bio: Option<&str>,
        bio_html: Option<&str>,
    ) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET url = $2, bio = $3, bio_html = $4
            WHERE id = $1
            RETURNING id, username, email, created, plugin_data, pw_hash,
                      email_verified, status, verification_key, is_admin,
                      url, bio, bio_html
            "#,
        )
        .bind(id)
        .bind(url)
        .bind(bio)
        .bind(bio_html)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }
}
