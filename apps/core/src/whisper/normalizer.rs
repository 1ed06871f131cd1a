use crate::error::AppError;

/// Lowercases and trims raw user input.
///
/// Missing, empty and whitespace-only input is rejected.
pub fn normalize(raw: Option<&str>) -> Result<String, AppError> {
    let raw = raw.ok_or_else(|| AppError::InvalidInput("input is missing".to_string()))?;
    let normalized = raw.trim().to_lowercase();
    if normalized.is_empty() {
        return Err(AppError::InvalidInput("input is empty".to_string()));
    }
    Ok(normalized)
}
