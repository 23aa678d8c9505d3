//! Error types for tokdash
//!
//! All errors derive from `thiserror` for convenient error handling and
//! automatic `From` implementations. The aggregation core itself is total
//! over normal inputs; errors only arise at the edges (parsing rows handed
//! over by the backend, invalid timezone names, out-of-range configuration).

use thiserror::Error;

/// Main error type for tokdash operations
#[derive(Error, Debug)]
pub enum TokdashError {
    /// JSON parsing error on a usage-record payload
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// Unknown model identifier
    #[error("Unknown model: {0}")]
    UnknownModel(String),

    /// Invalid timezone name
    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    /// Configuration value out of range
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Convenience type alias for Results in tokdash
pub type Result<T> = std::result::Result<T, TokdashError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = TokdashError::UnknownModel("gpt-42".to_string());
        assert_eq!(error.to_string(), "Unknown model: gpt-42");
    }

    #[test]
    fn test_json_error_conversion() {
        let json_error = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let error: TokdashError = json_error.into();
        assert!(matches!(error, TokdashError::Json(_)));
    }
}
