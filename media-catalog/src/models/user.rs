//! User account records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::error::{CatalogError, Result};
use crate::models::ExtensionMap;
use crate::security;
use crate::urls::{self, UrlGenerator};
use crate::validators;

/// Account lifecycle status.
///
/// The column itself is an open string so future flows can add values
/// without a migration; these are the two this layer writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountStatus {
    NeedsEmailVerification,
    Active,
}

impl AccountStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountStatus::NeedsEmailVerification => "needs_email_verification",
            AccountStatus::Active => "active",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "needs_email_verification" => Some(AccountStatus::NeedsEmailVerification),
            "active" => Some(AccountStatus::Active),
            _ => None,
        }
    }
}

/// A registered account.
///
/// `pw_hash` is a PHC-formatted Argon2id string; nothing here ever holds
/// a plaintext password beyond the [`User::check_login`] call frame.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub created: DateTime<Utc>,
    pub plugin_data: Json<ExtensionMap>,
    pub pw_hash: String,
    pub email_verified: bool,
    pub status: String,
    pub verification_key: String,
    pub is_admin: bool,
    pub url: Option<String>,
    pub bio: Option<String>,
    pub bio_html: Option<String>,
}

/// Creation document for a [`User`].
///
/// Strict schema: unknown fields fail deserialization instead of being
/// silently dropped.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub pw_hash: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub bio_html: Option<String>,
    #[serde(default)]
    pub plugin_data: ExtensionMap,
}

impl User {
    /// Validates a creation document and fills every declared default.
    ///
    /// New accounts start unverified: `email_verified` is false, `status`
    /// is [`AccountStatus::NeedsEmailVerification`] and a fresh random
    /// `verification_key` is minted for the confirmation email.
    pub fn new(new: NewUser) -> Result<Self> {
        if !validators::validate_username(&new.username) {
            return Err(CatalogError::validation(format!(
                "invalid username: {:?}",
                new.username
            )));
        }
        if !validators::validate_email(&new.email) {
            return Err(CatalogError::validation(format!(
                "invalid email: {:?}",
                new.email
            )));
        }
        if new.pw_hash.trim().is_empty() {
            return Err(CatalogError::validation("pw_hash must not be empty"));
        }

        Ok(User {
            id: Uuid::now_v7(),
            username: new.username,
            email: new.email,
            created: Utc::now(),
            plugin_data: Json(new.plugin_data),
            pw_hash: new.pw_hash,
            email_verified: false,
            status: AccountStatus::NeedsEmailVerification.as_str().to_string(),
            verification_key: Uuid::new_v4().to_string(),
            is_admin: false,
            url: new.url,
            bio: new.bio,
            bio_html: new.bio_html,
        })
    }

    /// Parses a JSON creation document and builds the record from it.
    pub fn from_document(doc: serde_json::Value) -> Result<Self> {
        let new: NewUser = serde_json::from_value(doc)?;
        Self::new(new)
    }

    /// Typed view of the open `status` string, when it carries a value
    /// this layer knows.
    pub fn account_status(&self) -> Option<AccountStatus> {
        AccountStatus::from_str(&self.status)
    }

    /// See if a password matches this account.
    ///
    /// A merely wrong password is `Ok(false)`; only a corrupt stored hash
    /// errors.
    pub fn check_login(&self, password: &str) -> Result<bool> {
        security::verify_password(password, &self.pw_hash)
    }

    /// URL of this user's public profile page.
    pub fn url_for_self(&self, urlgen: &impl UrlGenerator) -> String {
        urlgen.generate(urls::USER_HOME, &[("user", &self.username)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn new_chris() -> NewUser {
        NewUser {
            username: "chris".to_string(),
            email: "chris@example.com".to_string(),
            pw_hash: security::hash_password("toast").expect("should hash"),
            url: None,
            bio: None,
            bio_html: None,
            plugin_data: ExtensionMap::new(),
        }
    }

    #[test]
    fn test_new_user_fills_defaults() {
        let user = User::new(new_chris()).expect("should create");

        assert!(!user.email_verified);
        assert!(!user.is_admin);
        assert_eq!(user.account_status(), Some(AccountStatus::NeedsEmailVerification));
        assert!(user.plugin_data.0.is_empty());
        assert!(user.created <= Utc::now());
        // The verification key is a one-shot random token.
        Uuid::parse_str(&user.verification_key).expect("key should be a uuid");
    }

    #[test]
    fn test_new_users_get_distinct_ids_and_keys() {
        let a = User::new(new_chris()).expect("should create");
        let mut doc = new_chris();
        doc.username = "other".to_string();
        let b = User::new(doc).expect("should create");

        assert_ne!(a.id, b.id);
        assert_ne!(a.verification_key, b.verification_key);
    }

    #[test]
    fn test_new_user_rejects_bad_username() {
        let mut doc = new_chris();
        doc.username = "a".to_string();
        assert!(matches!(User::new(doc), Err(CatalogError::Validation(_))));
    }

    #[test]
    fn test_new_user_rejects_bad_email() {
        let mut doc = new_chris();
        doc.email = "not-an-email".to_string();
        assert!(matches!(User::new(doc), Err(CatalogError::Validation(_))));
    }

    #[test]
    fn test_new_user_rejects_empty_pw_hash() {
        let mut doc = new_chris();
        doc.pw_hash = "  ".to_string();
        assert!(matches!(User::new(doc), Err(CatalogError::Validation(_))));
    }

    #[test]
    fn test_document_with_unknown_field_is_rejected() {
        let result = User::from_document(json!({
            "username": "chris",
            "email": "chris@example.com",
            "pw_hash": "$argon2id$fake",
            "favourite_color": "green",
        }));
        let err = result.expect_err("unknown field must fail");
        assert!(err.to_string().contains("favourite_color"));
    }

    #[test]
    fn test_document_with_missing_required_field_is_rejected() {
        let result = User::from_document(json!({
            "username": "chris",
            "email": "chris@example.com",
        }));
        assert!(matches!(result, Err(CatalogError::Validation(_))));
    }

    #[test]
    fn test_check_login() {
        let user = User::new(new_chris()).expect("should create");
        assert!(user.check_login("toast").expect("should verify"));
        assert!(!user.check_login("jam").expect("should verify"));
        assert!(!user.check_login("").expect("should verify"));
    }

    #[test]
    fn test_check_login_corrupt_hash_errors() {
        let mut user = User::new(new_chris()).expect("should create");
        user.pw_hash = "garbage".to_string();
        assert!(user.check_login("toast").is_err());
    }

    #[test]
    fn test_account_status_unknown_value() {
        let mut user = User::new(new_chris()).expect("should create");
        user.status = "suspended_by_moderator".to_string();
        assert_eq!(user.account_status(), None);
    }

    #[test]
    fn test_url_for_self_uses_username() {
        let user = User::new(new_chris()).expect("should create");
        let urlgen = |route: &str, params: &[(&str, &str)]| {
            assert_eq!(route, urls::USER_HOME);
            format!("/u/{}/", params[0].1)
        };
        assert_eq!(user.url_for_self(&urlgen), "/u/chris/");
    }
}
