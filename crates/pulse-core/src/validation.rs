//! Input checks applied before any cache or storage access

use crate::error::CoreError;

/// Reject non-positive ids
pub fn validate_id(id: i64, what: &str) -> Result<(), CoreError> {
    if id <= 0 {
        return Err(CoreError::InvalidInput(format!(
            "{} id must be positive, got {}",
            what, id
        )));
    }
    Ok(())
}

/// Reject empty or whitespace-only values
pub fn require_non_blank(value: &str, field: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::InvalidInput(format!("{} cannot be empty", field)));
    }
    Ok(())
}
