/// Field-format validation for record creation.
use validator::ValidateEmail;

/// Validates email format according to RFC 5322.
pub fn validate_email(email: &str) -> bool {
    email.validate_email()
}

/// Validates username format.
///
/// Usernames appear verbatim in profile and media URLs, so they are kept
/// lowercase: 3 to 30 characters from [a-z0-9_-], starting with a letter
/// or digit.
pub fn validate_username(username: &str) -> bool {
    let len = username.len();
    if !(3..=30).contains(&len) {
        return false;
    }

    let mut chars = username.chars();
    match chars.next() {
        Some(c) if c.is_ascii_lowercase() || c.is_ascii_digit() => {}
        _ => return false,
    }

    chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-')
}
