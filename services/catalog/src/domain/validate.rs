//! Input validation shared by the use cases. Each check returns the list of
//! field errors it found so callers can merge several into one response.

use chrono::{Datelike, Utc};
use uuid::Uuid;

use filmrate_core::error::FieldError;
use filmrate_domain::rating::Score;

use crate::error::CatalogError;

pub const USERNAME_MIN: usize = 3;
pub const USERNAME_MAX: usize = 30;
pub const REVIEW_MIN: usize = 10;
pub const REVIEW_MAX: usize = 5000;
pub const TITLE_MAX: usize = 200;
pub const DESCRIPTION_MAX: usize = 2000;
pub const LIST_NAME_MAX: usize = 100;
pub const LIST_DESCRIPTION_MAX: usize = 500;
pub const BIO_MAX: usize = 500;
pub const MIN_RELEASE_YEAR: i32 = 1800;
pub const PASSWORD_MIN: usize = 6;

pub const SCORE_MESSAGE: &str = "Rating must be between 1 and 10";

/// Turn collected field errors into a `Validation` error, or `Ok` when empty.
pub fn into_result(errors: Vec<FieldError>) -> Result<(), CatalogError> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(CatalogError::Validation(errors))
    }
}

/// Parse a path or body id.
pub fn parse_id(field: &str, raw: &str) -> Result<Uuid, CatalogError> {
    Uuid::parse_str(raw).map_err(|_| CatalogError::invalid(field, "Invalid ID format"))
}

pub fn username(value: &str, errors: &mut Vec<FieldError>) {
    let len = value.chars().count();
    if !(USERNAME_MIN..=USERNAME_MAX).contains(&len) {
        errors.push(FieldError::new(
            "username",
            "Username must be between 3 and 30 characters",
        ));
    } else if !value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        errors.push(FieldError::new(
            "username",
            "Username can only contain letters, numbers, and underscores",
        ));
    }
}

/// `local@domain.tld`: no whitespace, a single `@`, and a dot inside the
/// domain with text on both sides.
pub fn email(value: &str, errors: &mut Vec<FieldError>) {
    let ok = !value.chars().any(char::is_whitespace)
        && value.split_once('@').is_some_and(|(local, domain)| {
            !local.is_empty()
                && !domain.contains('@')
                && domain
                    .char_indices()
                    .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
        });
    if !ok {
        errors.push(FieldError::new("email", "Please provide a valid email"));
    }
}

/// Strength rules for a new password.
pub fn new_password(value: &str, errors: &mut Vec<FieldError>) {
    if value.chars().count() < PASSWORD_MIN {
        errors.push(FieldError::new(
            "password",
            "Password must be at least 6 characters long",
        ));
    } else if !(value.chars().any(|c| c.is_ascii_lowercase())
        && value.chars().any(|c| c.is_ascii_uppercase())
        && value.chars().any(|c| c.is_ascii_digit()))
    {
        errors.push(FieldError::new(
            "password",
            "Password must contain at least one uppercase letter, one lowercase letter, and one number",
        ));
    }
}

/// `None` (with a recorded error) when `value` is off the 1-10 scale.
pub fn score(field: &str, value: i64, errors: &mut Vec<FieldError>) -> Option<Score> {
    let score = Score::new(value).ok();
    if score.is_none() {
        errors.push(FieldError::new(field, SCORE_MESSAGE));
    }
    score
}

/// Single-field form of [`score`].
pub fn required_score(field: &str, value: i64) -> Result<Score, CatalogError> {
    Score::new(value).map_err(|_| CatalogError::invalid(field, SCORE_MESSAGE))
}

pub fn review_content(value: &str, errors: &mut Vec<FieldError>) {
    let len = value.trim().chars().count();
    if !(REVIEW_MIN..=REVIEW_MAX).contains(&len) {
        errors.push(FieldError::new(
            "content",
            "Review content must be between 10 and 5000 characters",
        ));
    }
}

pub fn movie_title(value: &str, errors: &mut Vec<FieldError>) {
    let value = value.trim();
    if value.is_empty() {
        errors.push(FieldError::new("title", "Movie title is required"));
    } else if value.chars().count() > TITLE_MAX {
        errors.push(FieldError::new("title", "Title cannot exceed 200 characters"));
    }
}

pub fn movie_description(value: &str, errors: &mut Vec<FieldError>) {
    let value = value.trim();
    if value.is_empty() {
        errors.push(FieldError::new("description", "Description is required"));
    } else if value.chars().count() > DESCRIPTION_MAX {
        errors.push(FieldError::new(
            "description",
            "Description cannot exceed 2000 characters",
        ));
    }
}

/// Latest accepted release year: five years past the current one.
pub fn max_release_year() -> i32 {
    Utc::now().year() + 5
}

pub fn release_year(value: i32, errors: &mut Vec<FieldError>) {
    if !(MIN_RELEASE_YEAR..=max_release_year()).contains(&value) {
        errors.push(FieldError::new(
            "releaseYear",
            "Please provide a valid release year",
        ));
    }
}

pub fn duration(value: i32, errors: &mut Vec<FieldError>) {
    if value < 1 {
        errors.push(FieldError::new(
            "duration",
            "Duration must be a positive number",
        ));
    }
}

/// Absolute http(s) URL.
pub fn url(field: &str, value: &str, errors: &mut Vec<FieldError>) {
    let ok = url::Url::parse(value.trim())
        .map(|u| matches!(u.scheme(), "http" | "https") && u.host().is_some())
        .unwrap_or(false);
    if !ok {
        errors.push(FieldError::new(field, format!("Please provide a valid {field}")));
    }
}

pub fn list_name(value: &str, errors: &mut Vec<FieldError>) {
    let len = value.trim().chars().count();
    if !(1..=LIST_NAME_MAX).contains(&len) {
        errors.push(FieldError::new(
            "name",
            "List name must be between 1 and 100 characters",
        ));
    }
}

pub fn max_len(field: &str, value: &str, max: usize, errors: &mut Vec<FieldError>) {
    if value.chars().count() > max {
        errors.push(FieldError::new(
            field,
            format!("{field} cannot exceed {max} characters"),
        ));
    }
}

/// URL-safe slug: lowercase, word characters only, runs of whitespace,
/// underscores and hyphens collapsed to a single `-`, no leading or trailing
/// dashes.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;
    for c in text.trim().to_lowercase().chars() {
        if c.is_whitespace() || c == '_' || c == '-' {
            pending_dash = true;
        } else if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c);
        }
    }
    slug
}
