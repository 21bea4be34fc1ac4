//! Error types for the Quill provider

use thiserror::Error;

/// Quill provider errors
#[derive(Error, Debug)]
pub enum QuillError {
    /// Authentication failed or token is invalid
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// API request returned an error
    #[error("Quill API error (status {status_code}): {message}")]
    ApiError { status_code: u16, message: String },

    /// Rate limit exceeded after retries
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Folder or thread not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Failed to parse API response
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Connector error from the transport layer
    #[error(transparent)]
    Connector(#[from] docsync_traits::ConnectorError),
}

pub type Result<T> = std::result::Result<T, QuillError>;

impl From<QuillError> for docsync_traits::ConnectorError {
    fn from(error: QuillError) -> Self {
        match error {
            QuillError::NotFound(id) => docsync_traits::ConnectorError::NotFound(id),
            QuillError::ParseError(msg) => docsync_traits::ConnectorError::InvalidResponse(msg),
            QuillError::Connector(e) => e,
            other => docsync_traits::ConnectorError::SourceUnavailable(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docsync_traits::ConnectorError;

    #[test]
    fn test_error_display() {
        let error = QuillError::ApiError {
            status_code: 503,
            message: "Service unavailable".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Quill API error (status 503): Service unavailable"
        );
    }

    #[test]
    fn test_not_found_maps_to_permanent_error() {
        let error: ConnectorError = QuillError::NotFound("FOLDER1".to_string()).into();
        assert!(matches!(error, ConnectorError::NotFound(_)));
        assert!(!error.is_transient());
    }

    #[test]
    fn test_api_error_maps_to_transient_error() {
        let error: ConnectorError = QuillError::ApiError {
            status_code: 500,
            message: "boom".to_string(),
        }
        .into();
        assert!(error.is_transient());
    }
}
