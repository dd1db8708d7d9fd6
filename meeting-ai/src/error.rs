//! Error types for meeting AI operations.

use std::fmt;

/// Universal error type that abstracts provider-specific errors into common variants.
///
/// All provider implementations should map their native errors to these variants,
/// preserving context while maintaining a provider-agnostic interface.
#[derive(Debug)]
pub enum Error {
    /// Network connectivity issues, DNS failures, or connection resets.
    Network(String),

    /// Invalid parameters, missing required fields, or malformed configuration.
    /// These errors indicate a programming error and should be fixed at development time.
    Configuration(String),

    /// Operation exceeded the configured timeout period.
    Timeout(String),

    /// The provider answered with a non-success HTTP status. The body is kept
    /// verbatim so it can be logged and reported to the caller.
    Upstream { status: u16, body: String },

    /// Failed to read local media before sending it to the provider.
    Io(String),

    /// Failed to serialize a request payload.
    Serialization(String),

    /// The provider response could not be decoded at all.
    Deserialization(String),
}

impl Error {
    /// Upstream HTTP status, when the provider was reached and answered.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            Error::Upstream { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Upstream response body, when the provider was reached and answered.
    pub fn upstream_body(&self) -> Option<&str> {
        match self {
            Error::Upstream { body, .. } => Some(body),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Network(msg) => write!(f, "Network error: {}", msg),
            Error::Configuration(msg) => write!(f, "Invalid configuration: {}", msg),
            Error::Timeout(msg) => write!(f, "Timeout: {}", msg),
            Error::Upstream { status, body } => {
                write!(f, "Request failed with status code {}: {}", status, body)
            }
            Error::Io(msg) => write!(f, "I/O error: {}", msg),
            Error::Serialization(msg) => write!(f, "Serialization error: {}", msg),
            Error::Deserialization(msg) => write!(f, "Deserialization error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_error_exposes_status_and_body() {
        let err = Error::Upstream {
            status: 401,
            body: r#"{"error":{"message":"Incorrect API key provided"}}"#.to_string(),
        };

        assert_eq!(err.upstream_status(), Some(401));
        assert!(err.upstream_body().unwrap().contains("Incorrect API key"));
        assert!(err.to_string().starts_with("Request failed with status code 401"));
    }

    #[test]
    fn test_non_upstream_errors_have_no_upstream_detail() {
        let err = Error::Timeout("operation timed out".to_string());
        assert_eq!(err.upstream_status(), None);
        assert_eq!(err.upstream_body(), None);
        assert_eq!(err.to_string(), "Timeout: operation timed out");
    }
}
