pub mod booking;
pub mod experience;
pub mod promo;

use crate::errors::{BookitError, BookitResult};

/// Longest title, location, guest name or email the stores accept.
pub const MAX_TEXT_LENGTH: usize = 255;
/// Longest phone number or promo code the stores accept.
pub const MAX_CODE_LENGTH: usize = 64;

/// Returns the trimmed value, or a validation error naming `field` when blank.
pub(crate) fn required(value: &str, field: &str) -> BookitResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(BookitError::Validation(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}

/// Rejects `value` when it is longer than `limit` characters.
pub(crate) fn bounded(value: String, field: &str, limit: usize) -> BookitResult<String> {
    if value.chars().count() > limit {
        return Err(BookitError::Validation(format!(
            "{field} must be at most {limit} characters"
        )));
    }
    Ok(value)
}
