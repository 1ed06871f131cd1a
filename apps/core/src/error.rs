use thiserror::Error;

/// Application-wide error type, consolidating all possible errors into a single enum.
#[derive(Debug, Error)]
pub enum AppError {
    /// The caller supplied no usable input (missing, empty or whitespace-only).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A content data file is missing or malformed.
    #[error("Content source unavailable: {0}")]
    ContentSource(String),

    /// Represents data validation errors (e.g., invalid input format).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Represents configuration-related errors (e.g., malformed environment variables).
    #[error("Configuration error: {0}")]
    Config(String),

    /// Represents unexpected internal errors that indicate a bug.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Whether the error was caused by the caller rather than the server.
    pub fn is_client_error(&self) -> bool {
        matches!(self, AppError::InvalidInput(_))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(format!("Validation errors: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_invalid_input_is_client_error() {
        assert!(AppError::InvalidInput("empty".into()).is_client_error());
        assert!(!AppError::ContentSource("missing".into()).is_client_error());
        assert!(!AppError::Config("bad port".into()).is_client_error());
    }
}
