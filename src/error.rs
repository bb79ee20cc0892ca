use thiserror::Error;

/// Boxed underlying cause of an error
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Main error type for account API operations
#[derive(Debug, Error)]
pub enum AccountError {
    /// Caller input rejected before any network or filesystem side effect
    #[error("validation failed: {0}")]
    Validation(String),

    /// No credential, expired credential, or credential exchange rejected
    #[error("authentication failed: {message}")]
    Authentication {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    /// Authenticated request failed
    #[error("API request failed: {message}")]
    Api {
        message: String,
        status: Option<u16>,
        body: Option<String>,
        #[source]
        source: Option<BoxError>,
    },

    /// Multipart upload failed
    #[error("file upload failed: {message}")]
    Upload {
        message: String,
        status: Option<u16>,
        body: Option<String>,
        #[source]
        source: Option<BoxError>,
    },

    /// Response or cache content does not have the expected shape
    #[error("parse error: {0}")]
    Parse(String),

    /// JSON encoding error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AccountError {
    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        AccountError::Validation(message.into())
    }

    /// Create an authentication error without an underlying cause
    pub fn authentication(message: impl Into<String>) -> Self {
        AccountError::Authentication {
            message: message.into(),
            source: None,
        }
    }

    /// Create an API error that carries no HTTP response
    pub fn api(message: impl Into<String>) -> Self {
        AccountError::Api {
            message: message.into(),
            status: None,
            body: None,
            source: None,
        }
    }

    /// Get the HTTP status code if the server answered
    pub fn status_code(&self) -> Option<u16> {
        match self {
            AccountError::Api { status, .. } | AccountError::Upload { status, .. } => *status,
            _ => None,
        }
    }

    /// Get the raw response body the server sent with an error status
    pub fn response_body(&self) -> Option<&str> {
        match self {
            AccountError::Api { body, .. } | AccountError::Upload { body, .. } => body.as_deref(),
            _ => None,
        }
    }

    /// Check if this error came from a request or upload after authentication
    pub fn is_api_error(&self) -> bool {
        matches!(self, AccountError::Api { .. } | AccountError::Upload { .. })
    }

    /// Check if this error is a permission denied error (403)
    pub fn is_permission_denied(&self) -> bool {
        self.status_code() == Some(403)
    }

    /// Check if this error is a not found error (404)
    pub fn is_not_found(&self) -> bool {
        self.status_code() == Some(404)
    }
}

/// Result type for account API operations
pub type Result<T> = std::result::Result<T, AccountError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_not_found() {
        let error = AccountError::Api {
            message: "404 Not Found".to_string(),
            status: Some(404),
            body: Some(r#"{"code":"NotFound"}"#.to_string()),
            source: None,
        };

        assert!(error.is_not_found());
        assert!(!error.is_permission_denied());
        assert_eq!(error.response_body(), Some(r#"{"code":"NotFound"}"#));
    }

    #[test]
    fn test_upload_error_is_api_error() {
        let error = AccountError::Upload {
            message: "403 Forbidden".to_string(),
            status: Some(403),
            body: None,
            source: None,
        };

        assert!(error.is_api_error());
        assert!(error.is_permission_denied());
        assert!(error.to_string().starts_with("file upload failed"));
    }

    #[test]
    fn test_transport_error_has_no_status() {
        let error = AccountError::api("connection refused");
        assert_eq!(error.status_code(), None);
        assert_eq!(error.response_body(), None);
        assert!(!AccountError::validation("Email cannot be empty").is_api_error());
    }
}
