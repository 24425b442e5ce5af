use crate::error::AppError;

pub fn require_non_empty(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Like [`require_non_empty`] but only checks values that were supplied.
pub fn require_non_empty_if_present(field: &str, value: Option<&str>) -> Result<(), AppError> {
    match value {
        Some(v) => require_non_empty(field, v),
        None => Ok(()),
    }
}
