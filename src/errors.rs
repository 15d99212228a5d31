use reqwest::StatusCode;
use thiserror::Error;

/// Error type shared by the API client, the resource stores and the
/// services layered on top of them.
///
/// The UI surface collapses all of these into a single transient toast;
/// the distinctions only exist for logging and for tests.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("API error: status {status}: {body}")]
    Api { status: StatusCode, body: String },

    #[error("Failed to parse response body: {0}")]
    ResponseParse(#[from] serde_json::Error),

    #[error("Unexpected empty response body from {0}")]
    EmptyResponse(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("Invalid status: {0}")]
    InvalidStatus(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl ServiceError {
    /// True when the failure came from the wire rather than from local
    /// validation. Wire failures leave cached state untouched and surface
    /// as a one-shot error notification.
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            ServiceError::Network(_)
                | ServiceError::Api { .. }
                | ServiceError::ResponseParse(_)
                | ServiceError::EmptyResponse(_)
        )
    }
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ServiceError::ValidationError(errors.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_errors_are_flagged() {
        let err = ServiceError::Api {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: "boom".to_string(),
        };
        assert!(err.is_remote());
        assert!(!ServiceError::ValidationError("bad".into()).is_remote());
    }
}
