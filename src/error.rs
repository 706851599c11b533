//! Error types for the agent console

use thiserror::Error;

/// Errors returned by a directory client
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// Non-success HTTP status
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Requested agent/provider/chain does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Network error
    #[error("Network error: {0}")]
    Network(String),

    /// Timeout
    #[error("Request timed out")]
    Timeout,

    /// Response body did not match the expected shape
    #[error("Parse error: {0}")]
    Parse(String),

    /// Client could not be built from configuration
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<reqwest::Error> for DirectoryError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            DirectoryError::Timeout
        } else if err.is_connect() {
            DirectoryError::Network(format!("Connection error: {}", err))
        } else if err.is_decode() {
            DirectoryError::Parse(err.to_string())
        } else {
            DirectoryError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for DirectoryError {
    fn from(err: serde_json::Error) -> Self {
        DirectoryError::Parse(err.to_string())
    }
}

/// Pre-submit validation failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

/// Errors raised while editing or submitting a form
#[derive(Debug, Error)]
pub enum FormError {
    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),

    #[error("A submission is already in flight")]
    SubmissionInFlight,

    #[error("Agent {agent} could not be loaded ({reason}); refusing to overwrite it")]
    AgentUnavailable { agent: String, reason: String },

    #[error("Unknown extension: {0}")]
    UnknownExtension(String),

    #[error("Extension {0} is not enabled")]
    ExtensionDisabled(String),

    #[error("Invalid field edit: {0}")]
    InvalidEdit(String),

    #[error(transparent)]
    Directory(#[from] DirectoryError),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Result type alias for directory operations
pub type DirectoryResult<T> = Result<T, DirectoryError>;

/// Result type alias for form operations
pub type FormResult<T> = Result<T, FormError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_joins_errors() {
        let err = FormError::Validation(vec![
            ValidationError::MissingField("agent_name".into()),
            ValidationError::InvalidValue {
                field: "provider".into(),
                reason: "no language provider selected".into(),
            },
        ]);
        assert_eq!(
            err.to_string(),
            "Validation failed: Missing required field: agent_name; Invalid value for provider: no language provider selected"
        );
    }

    #[test]
    fn test_directory_error_display() {
        let err = DirectoryError::Api {
            status: 500,
            message: "boom".into(),
        };
        assert_eq!(err.to_string(), "API error: 500 - boom");
    }
}
