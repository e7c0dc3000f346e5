use thiserror::Error;

/// Type alias for Result with InsightError
pub type Result<T> = std::result::Result<T, InsightError>;

/// Fixed fallback shown when a failure carries no usable message
pub const FALLBACK_DATA_ERROR: &str = "Failed to load data";

/// Error types for the JobMail Insight client engine
#[derive(Error, Debug)]
pub enum InsightError {
    /// Backend returned a non-success status; `message` holds the structured
    /// `error` field from the response body when one was present
    #[error("API error (HTTP {status}): {}", message.as_deref().unwrap_or("no detail"))]
    Api { status: u16, message: Option<String> },

    /// Session credential rejected (401)
    #[error("Not authenticated")]
    Unauthorized { message: Option<String> },

    /// Request exceeded the client timeout
    #[error("Request timed out")]
    Timeout,

    /// Connection-level failure (DNS, refused, reset, TLS)
    #[error("Network error: {0}")]
    Network(String),

    /// Login/logout orchestration failed (shown inline, dismissible)
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Response body did not match the expected shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// IO error (CSV export, config files)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl InsightError {
    /// Whether this error means the backend no longer recognizes the session
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, InsightError::Unauthorized { .. })
    }

    /// Message to surface on the data-error screen.
    ///
    /// Priority order: the structured backend `error` field, then the transport
    /// error's own text, then a fixed fallback.
    pub fn user_message(&self) -> String {
        match self {
            InsightError::Api {
                message: Some(msg), ..
            } => msg.clone(),
            InsightError::Unauthorized { message: Some(msg) } => msg.clone(),
            InsightError::Unauthorized { message: None } => "Not authenticated".to_string(),
            InsightError::Timeout => "Request timed out".to_string(),
            InsightError::Network(msg) => msg.clone(),
            _ => FALLBACK_DATA_ERROR.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_prefers_backend_error_field() {
        let err = InsightError::Api {
            status: 500,
            message: Some("Gmail quota exceeded".to_string()),
        };
        assert_eq!(err.user_message(), "Gmail quota exceeded");
    }

    #[test]
    fn test_user_message_transport_text() {
        let err = InsightError::Network("connection refused".to_string());
        assert_eq!(err.user_message(), "connection refused");

        assert_eq!(InsightError::Timeout.user_message(), "Request timed out");
    }

    #[test]
    fn test_user_message_fallback() {
        let err = InsightError::Api {
            status: 502,
            message: None,
        };
        assert_eq!(err.user_message(), FALLBACK_DATA_ERROR);
    }

    #[test]
    fn test_unauthorized_detection() {
        let err = InsightError::Unauthorized { message: None };
        assert!(err.is_unauthorized());
        assert!(!InsightError::Timeout.is_unauthorized());
    }

    #[test]
    fn test_error_display() {
        let err = InsightError::Api {
            status: 503,
            message: Some("upstream down".to_string()),
        };
        let display = format!("{}", err);
        assert!(display.contains("503"));
        assert!(display.contains("upstream down"));
    }
}
