//! Error types for the komoju-rs library.
//!
//! Provider-reported declines are *not* errors: they come back as an
//! [`OperationResult`](crate::types::OperationResult) with `success == false`.
//! The variants here cover everything that prevents a result from being built
//! at all: transport failures, unparseable bodies and bad configuration.

use thiserror::Error;

/// Main error type for gateway operations.
#[derive(Error, Debug)]
pub enum KomojuError {
    /// Error during HTTP request/response handling
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Error during JSON serialization/deserialization
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Error parsing the configured base URL
    #[error("URL parse error: {0}")]
    UrlParseError(#[from] url::ParseError),

    /// A header value could not be built (e.g. a login with control characters)
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// The provider answered with JSON that has no usable shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Missing required field
    #[error("Missing required field: {0}")]
    MissingField(String),
}

/// Result type alias for gateway operations.
pub type Result<T> = std::result::Result<T, KomojuError>;

impl From<reqwest::header::InvalidHeaderValue> for KomojuError {
    fn from(err: reqwest::header::InvalidHeaderValue) -> Self {
        KomojuError::InvalidHeader(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = KomojuError::ConfigError("login is required".to_string());
        assert_eq!(err.to_string(), "Configuration error: login is required");
    }

    #[test]
    fn test_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("<html>").unwrap_err();
        let err: KomojuError = json_err.into();
        assert!(matches!(err, KomojuError::JsonError(_)));

        let url_err = url::Url::parse("not a url").unwrap_err();
        let err: KomojuError = url_err.into();
        assert!(matches!(err, KomojuError::UrlParseError(_)));
    }

    #[test]
    fn test_header_error_conversion() {
        let header_err = reqwest::header::HeaderValue::from_str("bad\nvalue").unwrap_err();
        let err: KomojuError = header_err.into();
        assert!(matches!(err, KomojuError::InvalidHeader(_)));
    }
}
