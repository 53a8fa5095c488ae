//! Input validation helpers
//!
//! Centralized text length constants and validation functions.
//! SQLite TEXT has no built-in length enforcement, so limits live here.

use shared::AppError;

// ── Text length limits ──────────────────────────────────────────────

/// Worker names and subtask labels
pub const MAX_NAME_LEN: usize = 200;

/// External inventory-system ids
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Passwords (before hashing)
pub const MAX_PASSWORD_LEN: usize = 128;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value {
        if v.len() > max_len {
            return Err(AppError::validation(format!(
                "{field} is too long ({} chars, max {max_len})",
                v.len()
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_required_text_rejected() {
        assert!(validate_required_text("  ", "name", MAX_NAME_LEN).is_err());
        assert!(validate_required_text("Maria", "name", MAX_NAME_LEN).is_ok());
    }

    #[test]
    fn overlong_text_rejected() {
        let long = "x".repeat(MAX_NAME_LEN + 1);
        assert!(validate_required_text(&long, "name", MAX_NAME_LEN).is_err());
        assert!(validate_optional_text(&Some(long), "subtask", MAX_NAME_LEN).is_err());
        assert!(validate_optional_text(&None, "subtask", MAX_NAME_LEN).is_ok());
    }
}
