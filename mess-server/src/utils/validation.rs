//! Input validation helpers
//!
//! Centralized text length constants and validation functions used by the
//! CRUD handlers on top of the declarative form schemas in `shared`.

use crate::utils::AppError;

// ── Text length limits ──────────────────────────────────────────────

/// Dish titles, usernames, tag names
pub const MAX_NAME_LEN: usize = 200;

/// Short descriptions and serving-time labels
pub const MAX_SHORT_TEXT_LEN: usize = 500;

/// Detailed descriptions and feedback comments
pub const MAX_LONG_TEXT_LEN: usize = 2000;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// Passwords (before hashing)
pub const MAX_PASSWORD_LEN: usize = 128;

/// URLs / image paths
pub const MAX_URL_LEN: usize = 2048;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::field_validation(
            field,
            format!("{field} must not be empty"),
        ));
    }
    if value.len() > max_len {
        return Err(AppError::field_validation(
            field,
            format!("{field} is too long ({} chars, max {max_len})", value.len()),
        ));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(AppError::field_validation(
            field,
            format!("{field} is too long ({} chars, max {max_len})", v.len()),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_required_text_is_rejected() {
        assert!(validate_required_text("  ", "title", MAX_NAME_LEN).is_err());
        assert!(validate_required_text("Masala Dosa", "title", MAX_NAME_LEN).is_ok());
    }

    #[test]
    fn overlong_optional_text_is_rejected() {
        let long = Some("x".repeat(MAX_LONG_TEXT_LEN + 1));
        assert!(validate_optional_text(&long, "comment", MAX_LONG_TEXT_LEN).is_err());
        assert!(validate_optional_text(&None, "comment", MAX_LONG_TEXT_LEN).is_ok());
    }
}
