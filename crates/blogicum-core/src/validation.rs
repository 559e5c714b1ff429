use chrono::{DateTime, NaiveDateTime, Utc};

use crate::error::ValidationError;

pub const TITLE_MAX_LEN: usize = 256;
pub const USERNAME_MAX_LEN: usize = 150;
pub const PERSON_NAME_MAX_LEN: usize = 150;
pub const EMAIL_MAX_LEN: usize = 254;
pub const PASSWORD_MIN_LEN: usize = 8;

/// Validator for submitted form fields.
pub struct Validator;

impl Validator {
    /// Validate a required single-line field such as a post title.
    /// Must be non-blank and at most 256 chars.
    pub fn validate_title(field: &'static str, value: &str) -> Result<(), ValidationError> {
        if value.trim().is_empty() {
            return Err(ValidationError::Required(field));
        }
        Self::validate_max_len(field, value, TITLE_MAX_LEN)
    }

    /// Validate free text such as a post body or a comment. Must be non-blank.
    pub fn validate_text(field: &'static str, value: &str) -> Result<(), ValidationError> {
        if value.trim().is_empty() {
            return Err(ValidationError::Required(field));
        }
        Ok(())
    }

    /// Validate a username.
    /// Must be non-empty, max 150 chars, letters, digits and `@.+-_` only.
    pub fn validate_username(username: &str) -> Result<(), ValidationError> {
        if username.is_empty() {
            return Err(ValidationError::Required("username"));
        }
        Self::validate_max_len("username", username, USERNAME_MAX_LEN)?;
        if !username
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
        {
            return Err(ValidationError::InvalidCharacters {
                field: "username",
                value: username.to_string(),
            });
        }
        Ok(())
    }

    /// Validate an optional first or last name.
    pub fn validate_person_name(field: &'static str, value: &str) -> Result<(), ValidationError> {
        Self::validate_max_len(field, value, PERSON_NAME_MAX_LEN)
    }

    /// Validate an optional email. Empty is allowed.
    pub fn validate_email(email: &str) -> Result<(), ValidationError> {
        if email.is_empty() {
            return Ok(());
        }
        Self::validate_max_len("email", email, EMAIL_MAX_LEN)?;

        let invalid = || ValidationError::InvalidEmail(email.to_string());
        let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
        if local.is_empty()
            || domain.contains('@')
            || email.chars().any(char::is_whitespace)
            || !domain.contains('.')
            || domain.starts_with('.')
            || domain.ends_with('.')
        {
            return Err(invalid());
        }
        Ok(())
    }

    /// Validate a URL slug: latin letters, digits, `-` and `_`.
    pub fn validate_slug(slug: &str) -> Result<(), ValidationError> {
        if slug.is_empty() {
            return Err(ValidationError::Required("slug"));
        }
        Self::validate_max_len("slug", slug, 50)?;
        if !slug
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(ValidationError::InvalidCharacters {
                field: "slug",
                value: slug.to_string(),
            });
        }
        Ok(())
    }

    /// Validate a new password and its confirmation.
    pub fn validate_new_password(password: &str, confirmation: &str) -> Result<(), ValidationError> {
        if password.chars().count() < PASSWORD_MIN_LEN {
            return Err(ValidationError::PasswordTooShort(PASSWORD_MIN_LEN));
        }
        if password != confirmation {
            return Err(ValidationError::PasswordMismatch);
        }
        Ok(())
    }

    /// Parse the value of a `datetime-local` input as UTC.
    /// Accepts `YYYY-MM-DDTHH:MM` and `YYYY-MM-DDTHH:MM:SS`.
    pub fn parse_datetime_local(value: &str) -> Result<DateTime<Utc>, ValidationError> {
        let value = value.trim();
        if value.is_empty() {
            return Err(ValidationError::Required("pub_date"));
        }
        ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"]
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
            .map(|naive| naive.and_utc())
            .ok_or_else(|| ValidationError::InvalidDateTime(value.to_string()))
    }

    fn validate_max_len(field: &'static str, value: &str, max: usize) -> Result<(), ValidationError> {
        let len = value.chars().count();
        if len > max {
            return Err(ValidationError::TooLong { field, len, max });
        }
        Ok(())
    }
}
